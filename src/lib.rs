// author: kodeholic (powered by Claude)

pub mod announce;
pub mod bm;
pub mod config;
pub mod core;
pub mod error;
pub mod media;
pub mod protocol;
pub mod refresher;
pub mod voice;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{error, info};

use crate::announce::AnnounceContext;
use crate::bm::BrandmeisterApi;
use crate::core::{RequestLedger, ServerDirectory};
use crate::error::SpkResult;
use crate::voice::VoiceLibrary;

/// CLI에서 주입되는 런타임 설정
/// - 기본값은 config.rs 상수
pub struct ServerArgs {
    pub bind_ip:    IpAddr,
    pub port:       u16,
    pub voices_dir: PathBuf,
}

/// 소켓 바인드 실패 또는 수신 오류 시에만 Err 로 반환 (그 외엔 영원히 실행)
pub async fn run_server(args: ServerArgs) -> SpkResult<()> {
    let addr = SocketAddr::new(args.bind_ip, args.port);
    info!("[spk-srv] binding to {}", addr);
    let socket = match UdpSocket::bind(addr).await {
        Ok(s)  => Arc::new(s),
        Err(e) => {
            error!("[spk-srv] bind failed on {}: {}", addr, e);
            return Err(e.into());
        }
    };

    let assets    = Arc::new(VoiceLibrary::load(&args.voices_dir).await?);
    let api       = Arc::new(BrandmeisterApi::new()?);
    let directory = Arc::new(ServerDirectory::new());

    // BrandMeister 서버 IP 맵 주기 갱신 태스크
    tokio::spawn(refresher::run_directory_refresher(
        Arc::clone(&api),
        Arc::clone(&directory),
    ));

    let ctx = AnnounceContext {
        socket,
        ledger: Arc::new(RequestLedger::new()),
        directory,
        assets,
        status: api,
    };

    let result = media::run_udp_listener(ctx).await;
    if let Err(ref e) = result {
        error!("[spk-srv] listening loop stopped: {}", e);
    }
    result
}
