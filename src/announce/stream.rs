// author: kodeholic (powered by Claude)
// 응답 스트리밍 엔진: 요청 1개 = 태스크 1개
//
// 상태 흐름:
//   Init          : 모뎀 모드로 코덱 선택, 응답 골격(magic/version/type/sid) 생성, seq 0
//   CodePairLoop  : 코드 쌍마다 (스플라이스 poll → 클립 조회 → 프레임을 배치에 채움)
//                   배치가 3 프레임이 되면 송신 후 비움. 클립 끝의 부분 배치는 다음 클립으로 이어짐
//   Terminate     : type 0 센티널 1회 송신 (남은 부분 배치 포함, 빈 배치여도 송신)
//   Drain         : 소비 안 된 상태 조회가 있으면 완료까지 대기
//   Cleanup       : LedgerGuard drop → 원장 항목 제거 (모든 종료 경로)
//
// 페이싱: 데이터 패킷 송신 후 frame_count × 20ms 대기. 센티널 뒤에는 대기 없음

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, trace, warn};

use crate::announce::splice::Splicer;
use crate::announce::AnnounceContext;
use crate::config;
use crate::core::LedgerGuard;
use crate::protocol::message::{CodeString, Request};
use crate::protocol::response::ResponsePacket;
use crate::voice::VoiceAssets;

/// 스트림 1회 결과 요약
#[derive(Debug, Clone)]
pub struct StreamOutcome {
    /// 센티널 제외 데이터 패킷 수
    pub data_packets: usize,
    /// 스플라이스 반영 후 실제로 재생에 사용된 코드 문자열
    pub final_code:   CodeString,
    pub spliced:      bool,
    /// 클립을 찾지 못해 건너뛴 코드 쌍 수
    pub skipped:      usize,
}

// ----------------------------------------------------------------------------
// [FrameSender] 배치 조립 + 페이싱 송신
// ----------------------------------------------------------------------------

struct FrameSender<'a> {
    socket:       &'a UdpSocket,
    to:           SocketAddr,
    packet:       ResponsePacket,
    data_packets: usize,
}

impl<'a> FrameSender<'a> {
    fn new(socket: &'a UdpSocket, to: SocketAddr, request: &Request) -> Self {
        Self {
            socket,
            to,
            packet: ResponsePacket::new(request.version, request.codec(), request.session_id),
            data_packets: 0,
        }
    }

    /// 클립의 프레임을 순서대로 배치에 채움. 가득 차면 송신
    /// 프레임 크기에 못 미치는 꼬리 바이트는 버림
    async fn feed_clip(&mut self, clip: &[u8]) {
        let frame_size = self.packet.codec().frame_size();
        let frames = clip.chunks_exact(frame_size);
        if !frames.remainder().is_empty() {
            trace!("[announce] dropping {} trailing byte(s) of clip for {}", frames.remainder().len(), self.to);
        }

        for frame in frames {
            self.packet.push_frame(frame);
            if self.packet.is_full() {
                self.send_data().await;
                self.packet.clear_frames();
            }
        }
    }

    async fn send_data(&mut self) {
        let frame_count = self.packet.frame_count();
        self.emit().await;
        self.data_packets += 1;
        self.packet.advance_seq();
        tokio::time::sleep(config::FRAME_DURATION * u32::from(frame_count)).await;
    }

    /// 남은 부분 배치를 실은 센티널 1회 송신 (대기 없음)
    async fn terminate(&mut self) {
        self.packet.mark_terminator();
        self.emit().await;
    }

    /// 송신 실패는 로그만 남기고 계속 (UDP best-effort)
    async fn emit(&self) {
        let bytes = self.packet.encode();
        match self.socket.send_to(&bytes, self.to).await {
            Ok(n) if n == bytes.len() => {
                trace!("[announce] sent seq={} frames={} term={} to {}",
                    self.packet.seq(), self.packet.frame_count(), self.packet.is_terminator(), self.to);
            }
            Ok(n) => warn!("[announce] short write {}/{} bytes to {}", n, bytes.len(), self.to),
            Err(e) => warn!("[announce] can't send udp packet to {}: {}", self.to, e),
        }
    }
}

// ----------------------------------------------------------------------------
// [play_announcement] 스트리밍 태스크 본체
// ----------------------------------------------------------------------------

/// guard 는 이 함수가 끝날 때 (정상/중간 break/panic 모두) drop 되어 원장에서 빠짐
pub async fn play_announcement(
    ctx:     AnnounceContext,
    request: Request,
    to:      SocketAddr,
    guard:   LedgerGuard,
) -> StreamOutcome {
    let _guard = guard;

    let mut sender  = FrameSender::new(&ctx.socket, to, &request);
    let mut splicer = Splicer::start(&request, to, &ctx.directory, Arc::clone(&ctx.status));
    let mut code    = request.code.clone();
    let mut skipped = 0;

    let mut pos = 0;
    while pos < code.len() {
        if let Some(s) = splicer.as_mut() {
            s.poll(pos, &mut code);
        }

        let Some(pair) = code.pair_at(pos) else {
            warn!("[announce] last code pair is broken for {} (\"{}\")", to, code);
            break;
        };

        if !play_pair(&mut sender, ctx.assets.as_ref(), &request, pair).await {
            skipped += 1;
        }
        pos += 2;
    }

    sender.terminate().await;

    let spliced = splicer.as_ref().map_or(false, Splicer::spliced);
    if let Some(s) = splicer {
        s.drain().await;
    }

    info!("[announce] playing to {} finished (sid:0x{:08x} packets={} skipped={})",
        to, request.session_id, sender.data_packets, skipped);

    StreamOutcome {
        data_packets: sender.data_packets,
        final_code:   code,
        spliced,
        skipped,
    }
}

/// 코드 쌍 하나 재생. 클립이 없으면 경고 후 false (요청 전체는 계속)
async fn play_pair(
    sender:  &mut FrameSender<'_>,
    assets:  &dyn VoiceAssets,
    request: &Request,
    pair:    [u8; 2],
) -> bool {
    let pair_str = String::from_utf8_lossy(&pair).into_owned();

    let Some(path) = assets.resolve(request.modem_mode, request.voice, pair) else {
        warn!("[announce] file not found for modem mode {} code pair \"{}\", skipping",
            request.modem_mode.short_name(), pair_str);
        return false;
    };

    let clip = match assets.read_clip(&path) {
        Ok(c)  => c,
        Err(e) => { warn!("[announce] can't read \"{}\": {}, skipping", path, e); return false; }
    };

    debug!("[announce] playing {} to {}", path, sender.to);
    sender.feed_clip(&clip).await;
    true
}
