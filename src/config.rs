// author: kodeholic (powered by Claude)
// 매직 넘버를 배제하고 서버 전체의 프로토콜 상수와 타이밍을 제어하는 상수 모음입니다.

use std::time::Duration;

/// 요청 수신/응답 송신 공용 UDP 포트
pub const DEFAULT_UDP_PORT: u16 = 65200;

/// 기본 바인드 주소 (모든 IPv4 인터페이스)
pub const DEFAULT_BIND_IP: &str = "0.0.0.0";

/// `-f` 지정 시 stdout과 함께 기록할 로그 파일
pub const LOG_FILE_NAME: &str = "spk-srv.log";

/// 음성 에셋 루트 디렉터리 기본값
pub const DEFAULT_VOICES_DIR: &str = "voices";

/// 수신 버퍼 크기: 가장 큰 요청(v1)보다 충분히 크게
pub const UDP_RECV_BUF_SIZE: usize = 2048;

// ----------------------------------------------------------------------------
// 와이어 프로토콜 (빅엔디안, 고정 크기)
// ----------------------------------------------------------------------------

/// 모든 버전 공통 패킷 매직
pub const PACKET_MAGIC: &[u8; 6] = b"SRFSPK";

/// 코드 문자열 필드 폭 (마지막 바이트는 항상 NUL로 강제)
pub const CODE_STR_LEN: usize = 33;

/// magic(6) version(1) type(1) sid(4) connector(1) announce_type(1) data(8) modem(1)
const REQUEST_HEADER_LEN: usize = 23;

/// v0 요청 패킷 크기
pub const REQUEST_V0_SIZE: usize = REQUEST_HEADER_LEN + CODE_STR_LEN;

/// v1 요청 패킷 크기: code_str 앞에 voice_id(1) 추가
pub const REQUEST_V1_SIZE: usize = REQUEST_HEADER_LEN + 1 + CODE_STR_LEN;

/// 응답 헤더: magic(6) version(1) type(1) sid(4) seq(1) frame_count(1)
pub const RESPONSE_HEADER_LEN: usize = 14;

/// 응답 패킷 하나에 실리는 최대 코덱 프레임 수
pub const FRAMES_PER_PACKET: usize = 3;

/// AMBE 프레임 크기 (DMR / D-STAR / C4FM / NXDN)
pub const AMBE_FRAME_SIZE: usize = 9;

/// IMBE 프레임 크기 (P25)
pub const IMBE_FRAME_SIZE: usize = 18;

/// 보코더 프레임 하나의 재생 시간: 페이싱 기준
pub const FRAME_DURATION: Duration = Duration::from_millis(20);

// ----------------------------------------------------------------------------
// BrandMeister 상태 조회 / 스플라이스
// ----------------------------------------------------------------------------

/// 커서가 이 위치(문자 단위) 이전일 때만 조회 결과를 코드 문자열에 반영
pub const SPLICE_WINDOW: usize = 4;

/// 코드 문자열 안에서 치환 대상이 되는 자리표시자
pub const SPLICE_PLACEHOLDER_HB: &str = "HBSV";
pub const SPLICE_PLACEHOLDER_BM: &str = "BMSV";

/// 클라이언트 상태 조회 HTTP 타임아웃 (2초)
pub const STATUS_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2_000);

/// 클라이언트 상태(PROFILE) 조회 API: 끝에 client id를 붙여 사용
pub const BM_PROFILE_URL: &str = "https://api.brandmeister.network/v1.0/repeater/?action=PROFILE&q=";

/// Homebrew 서버 목록 JSON
pub const SERVER_LIST_URL: &str = "http://x.sharkrf.com/db/homebrew/servers.json";

/// 서버 목록 중 IP 맵에 포함할 네트워크 이름
pub const SERVER_LIST_NETWORK: &str = "BrandMeister";

/// 서버 목록 갱신 주기 (1시간)
pub const DIRECTORY_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// 새로 해석된 IP 수가 이 값 이하면 갱신을 거부하고 기존 맵 유지
pub const DIRECTORY_MIN_ENTRIES: usize = 3;

/// 반사기 id가 이 값이면 "연결 없음"으로 취급
pub const REFLECTOR_NONE: u32 = 4000;
