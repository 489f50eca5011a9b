// author: kodeholic (powered by Claude)
// UDP 수신 루프
//
// 패킷 수신 흐름:
//   recv_from(src_addr)
//     → decode_request : magic / version / type / size / 필드 / 모뎀 모드 검증
//     → RequestLedger  : 같은 (sid, src_addr) 처리 중이면 드롭
//     → tokio::spawn(play_announcement) 후 즉시 다음 수신으로
//
// 디코드/검증은 루프 안에서 동기로, 수락 이후 전부 스트리밍 태스크에서.
// 루프 자체가 죽는 경우는 소켓 수신 오류뿐.

use std::net::SocketAddr;
use tracing::{debug, info, trace};

use crate::announce::{play_announcement, AnnounceContext};
use crate::config;
use crate::error::{SpkError, SpkResult};
use crate::protocol::request::decode_request;

pub async fn run_udp_listener(ctx: AnnounceContext) -> SpkResult<()> {
    let mut buf = vec![0u8; config::UDP_RECV_BUF_SIZE];

    match ctx.socket.local_addr() {
        Ok(addr) => info!("[udp] starting listening loop on {}", addr),
        Err(_)   => info!("[udp] starting listening loop"),
    }

    loop {
        let (len, src_addr) = ctx.socket.recv_from(&mut buf).await?;

        if let Err(e) = handle_datagram(&ctx, &buf[..len], src_addr) {
            log_rejection(&e, src_addr, len);
        }
    }
}

/// 데이터그램 1개 처리. 수락되면 스트리밍 태스크를 띄우고 바로 반환
/// 반드시 tokio 런타임 안에서 호출
pub fn handle_datagram(ctx: &AnnounceContext, datagram: &[u8], src_addr: SocketAddr) -> SpkResult<()> {
    let request = decode_request(datagram)?;
    debug!("[udp] got {} byte request from {}", datagram.len(), src_addr);

    let guard = ctx.ledger
        .try_acquire(request.session_id, src_addr)
        .ok_or(SpkError::DuplicateRequest { session_id: request.session_id, addr: src_addr })?;

    info!("[udp] sending \"{}\" to {} (sid:0x{:08x} v:{} t:{} con:{} at:{} {})",
        request.code,
        src_addr,
        request.session_id,
        request.version.as_byte(),
        request.modem_mode.short_name(),
        request.connector.short_name(),
        request.announce_type.name(),
        request.describe_announce_data());

    tokio::spawn(play_announcement(ctx.clone(), request, src_addr, guard));
    Ok(())
}

fn log_rejection(err: &SpkError, src_addr: SocketAddr, len: usize) {
    match err {
        // 프로토콜 트래픽이 아님: 조용히 무시
        SpkError::BadMagic => trace!("[udp] non-protocol datagram ({} bytes) from {}", len, src_addr),
        SpkError::DuplicateRequest { .. } => debug!("[udp] ignoring packet from {}: {}", src_addr, err),
        _ => info!("[udp] ignoring {} byte packet from {}: {}", len, src_addr, err),
    }
}

// ----------------------------------------------------------------------------
// [테스트]
// ----------------------------------------------------------------------------
