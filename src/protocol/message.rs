// author: kodeholic (powered by Claude)

use std::fmt;
use std::net::Ipv4Addr;

use crate::config;
use crate::error::{SpkError, SpkResult};
use crate::protocol::opcode::{announce_type, connector_id, modem_mode, packet_type, version, voice_id};

// ----------------------------------------------------------------------------
// [와이어 버전] 버전마다 고정 크기 + 필드 구성이 다름
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireVersion {
    V0,
    V1,
}

impl WireVersion {
    pub fn from_byte(b: u8) -> SpkResult<Self> {
        match b {
            version::V0 => Ok(WireVersion::V0),
            version::V1 => Ok(WireVersion::V1),
            other       => Err(SpkError::UnsupportedVersion(other)),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            WireVersion::V0 => version::V0,
            WireVersion::V1 => version::V1,
        }
    }

    /// 이 버전의 요청 패킷 전체 크기 (정확히 일치해야 수락)
    pub fn request_size(self) -> usize {
        match self {
            WireVersion::V0 => config::REQUEST_V0_SIZE,
            WireVersion::V1 => config::REQUEST_V1_SIZE,
        }
    }

    /// voice_id 필드 존재 여부
    pub fn has_voice_id(self) -> bool {
        matches!(self, WireVersion::V1)
    }
}

// ----------------------------------------------------------------------------
// [코덱] 프레임 크기와 응답 패킷 타입을 결정
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Ambe,
    Imbe,
}

impl Codec {
    pub fn frame_size(self) -> usize {
        match self {
            Codec::Ambe => config::AMBE_FRAME_SIZE,
            Codec::Imbe => config::IMBE_FRAME_SIZE,
        }
    }

    /// 데이터 응답 패킷 타입
    /// v0 응답은 버전 도입 이전의 단일 레이아웃이라 항상 AMBE_RESPONSE
    pub fn data_packet_type(self, version: WireVersion) -> u8 {
        match (version, self) {
            (WireVersion::V0, _)           => packet_type::AMBE_RESPONSE,
            (WireVersion::V1, Codec::Ambe) => packet_type::AMBE_RESPONSE,
            (WireVersion::V1, Codec::Imbe) => packet_type::IMBE_RESPONSE,
        }
    }

    /// 응답 패킷 전체 크기 (헤더 + 3 프레임)
    pub fn response_size(self) -> usize {
        config::RESPONSE_HEADER_LEN + config::FRAMES_PER_PACKET * self.frame_size()
    }
}

// ----------------------------------------------------------------------------
// [모뎀 모드] 유효하지 않은 값은 디코드 단계에서 거부
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModemMode {
    Dmr,
    Dstar,
    C4fm,
    C4fmHalfDeviation,
    Nxdn,
    P25,
}

impl ModemMode {
    /// P25 는 v1 에서만 유효
    pub fn from_wire(version: WireVersion, raw: u8) -> SpkResult<Self> {
        let mode = match raw {
            modem_mode::DMR                 => ModemMode::Dmr,
            modem_mode::DSTAR               => ModemMode::Dstar,
            modem_mode::C4FM                => ModemMode::C4fm,
            modem_mode::C4FM_HALF_DEVIATION => ModemMode::C4fmHalfDeviation,
            modem_mode::NXDN                => ModemMode::Nxdn,
            modem_mode::P25 if version == WireVersion::V1 => ModemMode::P25,
            _ => return Err(SpkError::InvalidModemMode { version: version.as_byte(), mode: raw }),
        };
        Ok(mode)
    }

    pub fn codec(self) -> Codec {
        match self {
            ModemMode::P25 => Codec::Imbe,
            ModemMode::Dmr
            | ModemMode::Dstar
            | ModemMode::C4fm
            | ModemMode::C4fmHalfDeviation
            | ModemMode::Nxdn => Codec::Ambe,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            ModemMode::Dmr               => "dmr",
            ModemMode::Dstar             => "dstar",
            ModemMode::C4fm              => "c4fm",
            ModemMode::C4fmHalfDeviation => "c4fmh",
            ModemMode::Nxdn              => "nxdn",
            ModemMode::P25               => "p25",
        }
    }
}

// ----------------------------------------------------------------------------
// [커넥터 ID] 와이어에서 검증하지 않으므로 미지의 값도 그대로 보관
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorId {
    DmrPlus,
    Homebrew,
    HomebrewMmdvm,
    Dcs,
    Fcs,
    SrfIpConnClient,
    SrfIpConnServer,
    Ref,
    YsfRef,
    Unknown(u8),
}

impl ConnectorId {
    pub fn from_byte(b: u8) -> Self {
        match b {
            connector_id::DMRPLUS          => ConnectorId::DmrPlus,
            connector_id::HOMEBREW         => ConnectorId::Homebrew,
            connector_id::HOMEBREW_MMDVM   => ConnectorId::HomebrewMmdvm,
            connector_id::DCS              => ConnectorId::Dcs,
            connector_id::FCS              => ConnectorId::Fcs,
            connector_id::SRFIPCONN_CLIENT => ConnectorId::SrfIpConnClient,
            connector_id::SRFIPCONN_SERVER => ConnectorId::SrfIpConnServer,
            connector_id::REF              => ConnectorId::Ref,
            connector_id::YSFREF           => ConnectorId::YsfRef,
            other                          => ConnectorId::Unknown(other),
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            ConnectorId::DmrPlus         => "dmp",
            ConnectorId::Homebrew        => "hbr",
            ConnectorId::HomebrewMmdvm   => "mmd",
            ConnectorId::Dcs             => "dcs",
            ConnectorId::Fcs             => "fcs",
            ConnectorId::SrfIpConnClient => "sfc",
            ConnectorId::SrfIpConnServer => "sfs",
            ConnectorId::Ref             => "ref",
            ConnectorId::YsfRef          => "ysf",
            ConnectorId::Unknown(_)      => "unk",
        }
    }
}

// ----------------------------------------------------------------------------
// [안내 종류]
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceType {
    Default,
    Connecting,
    Connected,
    ConnectorStatus,
    Startup,
    Disconnected,
    ConnectedBrandmeisterShortened,
    WifiConnecting,
    WifiConnected,
    WifiApMode,
    Unknown(u8),
}

impl AnnounceType {
    pub fn from_byte(b: u8) -> Self {
        match b {
            announce_type::DEFAULT                          => AnnounceType::Default,
            announce_type::CONNECTING                       => AnnounceType::Connecting,
            announce_type::CONNECTED                        => AnnounceType::Connected,
            announce_type::CONNECTOR_STATUS                 => AnnounceType::ConnectorStatus,
            announce_type::STARTUP                          => AnnounceType::Startup,
            announce_type::DISCONNECTED                     => AnnounceType::Disconnected,
            announce_type::CONNECTED_BRANDMEISTER_SHORTENED => AnnounceType::ConnectedBrandmeisterShortened,
            announce_type::WIFI_CONNECTING                  => AnnounceType::WifiConnecting,
            announce_type::WIFI_CONNECTED                   => AnnounceType::WifiConnected,
            announce_type::WIFI_AP_MODE                     => AnnounceType::WifiApMode,
            other                                           => AnnounceType::Unknown(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AnnounceType::Default                        => "default",
            AnnounceType::Connecting                     => "connecting",
            AnnounceType::Connected                      => "connected",
            AnnounceType::ConnectorStatus                => "status",
            AnnounceType::Startup                        => "startup",
            AnnounceType::Disconnected                   => "disconnected",
            AnnounceType::ConnectedBrandmeisterShortened => "connected-bm-short",
            AnnounceType::WifiConnecting                 => "wifi-connecting",
            AnnounceType::WifiConnected                  => "wifi-connected",
            AnnounceType::WifiApMode                     => "wifi-ap",
            AnnounceType::Unknown(_)                     => "unknown",
        }
    }

    /// announce_data = [서버 IPv4, client id] 로 해석되는 종류
    pub fn carries_server_address(self) -> bool {
        match self {
            AnnounceType::Connecting
            | AnnounceType::Connected
            | AnnounceType::ConnectorStatus
            | AnnounceType::Disconnected
            | AnnounceType::ConnectedBrandmeisterShortened => true,
            AnnounceType::Default
            | AnnounceType::Startup
            | AnnounceType::WifiConnecting
            | AnnounceType::WifiConnected
            | AnnounceType::WifiApMode
            | AnnounceType::Unknown(_) => false,
        }
    }

    /// BrandMeister 상태 조회 결과를 코드 문자열에 끼워 넣는 종류
    pub fn wants_status_splice(self) -> bool {
        matches!(
            self,
            AnnounceType::Connected
                | AnnounceType::ConnectedBrandmeisterShortened
                | AnnounceType::ConnectorStatus
        )
    }
}

// ----------------------------------------------------------------------------
// [음성 ID] v0 요청은 항상 기본 남성 음성
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoiceId {
    #[default]
    MaleEn,
    FemaleEn,
}

impl VoiceId {
    /// 알 수 없는 값은 기본 뱅크로
    pub fn from_byte(b: u8) -> Self {
        match b {
            voice_id::MALE_EN   => VoiceId::MaleEn,
            voice_id::FEMALE_EN => VoiceId::FemaleEn,
            _                   => VoiceId::MaleEn,
        }
    }
}

// ----------------------------------------------------------------------------
// [코드 문자열] 두 글자씩 소비되는 ASCII 바이트열
// ----------------------------------------------------------------------------

/// NUL 패딩을 제거한 코드 문자열
/// 클라이언트가 보낸 바이트를 그대로 다루므로 &str 이 아닌 바이트 단위로 인덱싱
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeString(Vec<u8>);

impl CodeString {
    /// 고정 폭 필드에서 생성. 마지막 바이트는 무조건 NUL 로 강제 후 뒤쪽 NUL 제거
    pub fn from_field(field: &[u8; config::CODE_STR_LEN]) -> Self {
        let mut raw = *field;
        raw[config::CODE_STR_LEN - 1] = 0;
        let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        CodeString(raw[..end].to_vec())
    }

    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        CodeString(code.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// pos 위치의 코드 쌍. 두 글자가 남지 않았으면 None
    pub fn pair_at(&self, pos: usize) -> Option<[u8; 2]> {
        match self.0.get(pos..pos + 2) {
            Some(&[a, b]) => Some([a, b]),
            _             => None,
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.find(needle.as_bytes()).is_some()
    }

    /// 처음 나오는 needle 하나만 replacement 로 치환. 치환했으면 true
    pub fn replace_first(&mut self, needle: &str, replacement: &str) -> bool {
        let Some(start) = self.find(needle.as_bytes()) else {
            return false;
        };
        self.0.splice(start..start + needle.len(), replacement.bytes());
        true
    }

    fn find(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.0.len() {
            return None;
        }
        self.0.windows(needle.len()).position(|w| w == needle)
    }
}

impl fmt::Display for CodeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

// ----------------------------------------------------------------------------
// [요청] 파싱 이후 불변, 스트리밍 태스크가 단독 소유
// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Request {
    pub version:       WireVersion,
    pub session_id:    u32,
    pub connector:     ConnectorId,
    pub announce_type: AnnounceType,
    pub announce_data: [u32; 2],
    pub modem_mode:    ModemMode,
    pub voice:         VoiceId,
    pub code:          CodeString,
}

impl Request {
    pub fn codec(&self) -> Codec {
        self.modem_mode.codec()
    }

    /// announce_data[0] 을 점 표기 IPv4 로 해석
    pub fn server_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.announce_data[0])
    }

    pub fn client_id(&self) -> u32 {
        self.announce_data[1]
    }

    /// 로그용 announce_data 설명
    pub fn describe_announce_data(&self) -> String {
        if self.announce_type.carries_server_address() {
            format!("srv:{} cid:{}", self.server_ip(), self.client_id())
        } else {
            format!("{:08x}{:08x}", self.announce_data[0], self.announce_data[1])
        }
    }
}

// ----------------------------------------------------------------------------
// [테스트]
// ----------------------------------------------------------------------------
