// author: kodeholic (powered by Claude)
// 통합 테스트 공용 헬퍼: 가짜 음성 저장소, 가짜 상태 조회, 요청 빌더, 서버 기동

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use portpicker::pick_unused_port;
use tokio::net::UdpSocket;

use spk_server::announce::AnnounceContext;
use spk_server::bm::{ClientStatus, ReflectorState, StatusLookup, Subscription};
use spk_server::config;
use spk_server::core::{RequestLedger, ServerDirectory, ServerIpMap, ServerRecord};
use spk_server::error::{SpkError, SpkResult};
use spk_server::media::run_udp_listener;
use spk_server::protocol::{ModemMode, ResponseView, VoiceId};
use spk_server::voice::{ClipPath, VoiceAssets};

// ----------------------------------------------------------------------------
// [ClipSet] 코드 쌍 → 클립, 요청된 코드 쌍을 순서대로 기록
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct ClipSet {
    clips:     HashMap<[u8; 2], Bytes>,
    requested: Mutex<Vec<String>>,
}

impl ClipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// frames 개의 프레임 (프레임 i 의 모든 바이트 = fill + i)
    pub fn with_clip(mut self, pair: &str, frame_size: usize, frames: usize, fill: u8) -> Self {
        let mut data = Vec::with_capacity(frame_size * frames);
        for i in 0..frames {
            data.extend(std::iter::repeat(fill.wrapping_add(i as u8)).take(frame_size));
        }
        let p = pair.as_bytes();
        self.clips.insert([p[0], p[1]], Bytes::from(data));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl VoiceAssets for ClipSet {
    fn resolve(&self, _mode: ModemMode, _voice: VoiceId, pair: [u8; 2]) -> Option<ClipPath> {
        let name = String::from_utf8_lossy(&pair).into_owned();
        self.requested.lock().unwrap().push(name.clone());
        self.clips.contains_key(&pair).then_some(name)
    }

    fn read_clip(&self, path: &str) -> SpkResult<Bytes> {
        let p = path.as_bytes();
        self.clips
            .get(&[p[0], p[1]])
            .cloned()
            .ok_or_else(|| SpkError::ClipNotFound(path.to_string()))
    }
}

// ----------------------------------------------------------------------------
// [FakeLookup] 지연 후 고정 결과, 호출 횟수 기록
// ----------------------------------------------------------------------------

pub struct FakeLookup {
    pub delay:  Duration,
    pub result: Option<ClientStatus>,
    pub calls:  AtomicUsize,
}

impl FakeLookup {
    pub fn new(delay: Duration, result: Option<ClientStatus>) -> Self {
        Self { delay, result, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusLookup for FakeLookup {
    async fn fetch_client_status(&self, client_id: u32) -> SpkResult<ClientStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.result.clone().ok_or(SpkError::LookupTimeout(client_id))
    }
}

/// static TG 91, 반사기 없음
pub fn sample_status() -> ClientStatus {
    ClientStatus {
        reflector:             ReflectorState { active: 4000 },
        static_subscriptions:  vec![Subscription { talkgroup: 91 }],
        dynamic_subscriptions: vec![],
    }
}

/// 10.0.0.1 → BrandMeister/2162
pub fn sample_directory() -> ServerDirectory {
    let mut map = ServerIpMap::new();
    map.insert("10.0.0.1".to_string(), ServerRecord {
        network: "BrandMeister".into(),
        name:    "BrandMeister/2162".into(),
        host:    "bm2162.example.net".into(),
    });
    ServerDirectory::with_entries(map)
}

// ----------------------------------------------------------------------------
// [요청 빌더]
// ----------------------------------------------------------------------------

pub struct RequestSpec {
    pub version:       u8,
    pub session_id:    u32,
    pub connector:     u8,
    pub announce_type: u8,
    pub announce_data: [u32; 2],
    pub modem_mode:    u8,
    pub voice:         u8,
    pub code:          &'static str,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self {
            version:       1,
            session_id:    0x1234_5678,
            connector:     0,
            announce_type: 0,
            announce_data: [0, 0],
            modem_mode:    2,
            voice:         0,
            code:          "",
        }
    }
}

impl RequestSpec {
    pub fn encode(&self) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(config::PACKET_MAGIC);
        b.push(self.version);
        b.push(2);
        b.extend_from_slice(&self.session_id.to_be_bytes());
        b.push(self.connector);
        b.push(self.announce_type);
        b.extend_from_slice(&self.announce_data[0].to_be_bytes());
        b.extend_from_slice(&self.announce_data[1].to_be_bytes());
        b.push(self.modem_mode);
        if self.version == 1 {
            b.push(self.voice);
        }
        let mut field = [0u8; config::CODE_STR_LEN];
        field[..self.code.len()].copy_from_slice(self.code.as_bytes());
        b.extend_from_slice(&field);
        b
    }
}

// ----------------------------------------------------------------------------
// [서버 / 클라이언트]
// ----------------------------------------------------------------------------

pub async fn context(
    assets:    Arc<dyn VoiceAssets>,
    directory: ServerDirectory,
    status:    Arc<dyn StatusLookup>,
) -> AnnounceContext {
    let port = pick_unused_port().expect("사용 가능한 포트를 찾을 수 없습니다.");
    let socket = UdpSocket::bind(("127.0.0.1", port)).await.unwrap();
    AnnounceContext {
        socket:    Arc::new(socket),
        ledger:    Arc::new(RequestLedger::new()),
        directory: Arc::new(directory),
        assets,
        status,
    }
}

/// 수신 루프를 띄우고 서버 주소 반환
pub async fn spawn_test_server(ctx: AnnounceContext) -> SocketAddr {
    let addr = ctx.socket.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = run_udp_listener(ctx).await;
    });
    addr
}

pub async fn client() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").await.unwrap()
}

/// wait 안에 패킷이 오면 파싱해서 반환
pub async fn recv_packet(sock: &UdpSocket, wait: Duration) -> Option<ResponseView> {
    let mut buf = [0u8; 256];
    match tokio::time::timeout(wait, sock.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => Some(ResponseView::parse(&buf[..len]).expect("응답 파싱 실패")),
        _                => None,
    }
}

/// 센티널까지 수집
pub async fn collect_stream(sock: &UdpSocket) -> Vec<ResponseView> {
    let mut out = Vec::new();
    while let Some(p) = recv_packet(sock, Duration::from_secs(2)).await {
        let done = p.is_terminator();
        out.push(p);
        if done {
            break;
        }
    }
    out
}
