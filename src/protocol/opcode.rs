// author: kodeholic (powered by Claude)

/// 와이어 버전 바이트 (offset 6)
pub mod version {
    /// 버전 필드 도입 이전 레이아웃. AMBE 계열 모뎀만 지원
    pub const V0: u8 = 0;
    /// voice_id 필드 추가, P25/IMBE 지원
    pub const V1: u8 = 1;
}

/// 패킷 타입 바이트 (offset 7)
pub mod packet_type {
    /// 스트림 종료 센티널: 항상 마지막 패킷
    pub const RESPONSE_TERMINATOR: u8 = 0;
    /// AMBE 프레임 응답 (v0 응답은 코덱과 무관하게 이 값)
    pub const AMBE_RESPONSE:       u8 = 1;
    /// 클라이언트 → 서버 요청. 서버가 받아들이는 유일한 타입
    pub const REQUEST:             u8 = 2;
    /// IMBE 프레임 응답 (v1 P25 전용)
    pub const IMBE_RESPONSE:       u8 = 3;
}

/// 모뎀 모드 (offset 22, 모든 버전 동일 위치)
pub mod modem_mode {
    pub const DMR:                 u8 = 2;
    pub const DSTAR:               u8 = 3;
    pub const C4FM:                u8 = 4;
    pub const C4FM_HALF_DEVIATION: u8 = 5;
    pub const NXDN:                u8 = 6;
    /// v1 전용
    pub const P25:                 u8 = 7;
}

/// 클라이언트 쪽 네트워크 브리지 소프트웨어 식별자 (0 및 그 외 값은 미지)
pub mod connector_id {
    pub const DMRPLUS:          u8 = 1;
    pub const HOMEBREW:         u8 = 2;
    pub const HOMEBREW_MMDVM:   u8 = 3;
    pub const DCS:              u8 = 4;
    pub const FCS:              u8 = 5;
    pub const SRFIPCONN_CLIENT: u8 = 6;
    pub const SRFIPCONN_SERVER: u8 = 7;
    pub const REF:              u8 = 8;
    pub const YSFREF:           u8 = 9;
}

/// 안내 방송 종류: announce_data 두 워드의 해석을 결정
pub mod announce_type {
    pub const DEFAULT:                          u8 = 0;
    pub const CONNECTING:                       u8 = 1;
    pub const CONNECTED:                        u8 = 2;
    pub const CONNECTOR_STATUS:                 u8 = 3;
    pub const STARTUP:                          u8 = 4;
    pub const DISCONNECTED:                     u8 = 5;
    pub const CONNECTED_BRANDMEISTER_SHORTENED: u8 = 6;
    pub const WIFI_CONNECTING:                  u8 = 7;
    pub const WIFI_CONNECTED:                   u8 = 8;
    pub const WIFI_AP_MODE:                     u8 = 9;
}

/// v1 음성 뱅크 선택
pub mod voice_id {
    pub const MALE_EN:   u8 = 0;
    pub const FEMALE_EN: u8 = 1;
}
