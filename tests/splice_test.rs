// author: kodeholic (powered by Claude)
// BrandMeister 상태 조회 결과로 코드 문자열을 치환하는 경로 검증

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::*;
use spk_server::announce::{play_announcement, AnnounceContext, StreamOutcome};
use spk_server::protocol::decode_request;
use spk_server::protocol::opcode::{announce_type, connector_id};

const BM_SERVER_IP: u32 = 0x0A00_0001; // 10.0.0.1
const CLIENT_ID:    u32 = 2_162_001;

fn homebrew_connected(code: &'static str) -> RequestSpec {
    RequestSpec {
        connector:     connector_id::HOMEBREW,
        announce_type: announce_type::CONNECTED,
        announce_data: [BM_SERVER_IP, CLIENT_ID],
        code,
        ..Default::default()
    }
}

/// 스트림을 끝까지 재생하고 결과 반환
async fn play(ctx: &AnnounceContext, spec: RequestSpec) -> (StreamOutcome, Duration) {
    let sink = client().await;
    let to: SocketAddr = sink.local_addr().unwrap();
    let request = decode_request(&spec.encode()).unwrap();
    let guard = ctx.ledger.try_acquire(request.session_id, to).unwrap();

    let started = Instant::now();
    let outcome = play_announcement(ctx.clone(), request, to, guard).await;
    (outcome, started.elapsed())
}

/// "AA", "BB", "CC" 모두 3프레임: 쌍마다 한 패킷 간격(60ms)이 생김
fn paced_clips() -> Arc<ClipSet> {
    Arc::new(
        ClipSet::new()
            .with_clip("AA", 9, 3, 1)
            .with_clip("BB", 9, 3, 2)
            .with_clip("CC", 9, 3, 3),
    )
}

#[tokio::test]
async fn test_status_spliced_inside_window() {
    let lookup = Arc::new(FakeLookup::new(Duration::ZERO, Some(sample_status())));
    let assets = paced_clips();
    let ctx    = context(assets.clone(), sample_directory(), lookup.clone()).await;

    let (outcome, _) = play(&ctx, homebrew_connected("AAHBSV")).await;

    assert!(outcome.spliced);
    assert_eq!(outcome.final_code.to_string(), "AABM02010602LKSTTG0901");
    assert_eq!(lookup.calls(), 1);
    assert_eq!(&assets.requested()[..2], &["AA", "BM"]);
    assert!(ctx.ledger.is_empty());
}

#[tokio::test]
async fn test_bmsv_placeholder_preferred() {
    let lookup = Arc::new(FakeLookup::new(Duration::ZERO, Some(sample_status())));
    let ctx    = context(paced_clips(), sample_directory(), lookup).await;

    let (outcome, _) = play(&ctx, homebrew_connected("AAHBSVBMSV")).await;

    assert!(outcome.spliced);
    assert_eq!(outcome.final_code.to_string(), "AAHBSVBM02010602LKSTTG0901");
}

#[tokio::test]
async fn test_late_status_discarded_and_drained() {
    // 결과가 스트림 종료 이후에 도착 → 치환 없음, 태스크는 조회 완료까지 대기
    let lookup = Arc::new(FakeLookup::new(Duration::from_millis(400), Some(sample_status())));
    let ctx    = context(paced_clips(), sample_directory(), lookup.clone()).await;

    let (outcome, elapsed) = play(&ctx, homebrew_connected("AABBHBSV")).await;

    assert!(!outcome.spliced);
    assert_eq!(outcome.final_code.to_string(), "AABBHBSV");
    assert!(elapsed >= Duration::from_millis(350));
    assert_eq!(lookup.calls(), 1);
    assert!(ctx.ledger.is_empty());
}

#[tokio::test]
async fn test_status_after_window_discarded() {
    // 세 번째 쌍(pos 4) 이후에 결과 확인 → 버림
    let lookup = Arc::new(FakeLookup::new(Duration::from_millis(150), Some(sample_status())));
    let ctx    = context(paced_clips(), sample_directory(), lookup).await;

    let (outcome, _) = play(&ctx, homebrew_connected("AABBCCHBSV")).await;

    assert!(!outcome.spliced);
    assert_eq!(outcome.final_code.to_string(), "AABBCCHBSV");
}

#[tokio::test]
async fn test_failed_lookup_leaves_code_unchanged() {
    let lookup = Arc::new(FakeLookup::new(Duration::ZERO, None));
    let ctx    = context(paced_clips(), sample_directory(), lookup.clone()).await;

    let (outcome, _) = play(&ctx, homebrew_connected("AAHBSV")).await;

    assert!(!outcome.spliced);
    assert_eq!(outcome.final_code.to_string(), "AAHBSV");
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_no_lookup_for_other_connectors() {
    let lookup = Arc::new(FakeLookup::new(Duration::ZERO, Some(sample_status())));
    let ctx    = context(paced_clips(), sample_directory(), lookup.clone()).await;

    let spec = RequestSpec { connector: connector_id::DMRPLUS, ..homebrew_connected("AAHBSV") };
    let (outcome, _) = play(&ctx, spec).await;

    assert!(!outcome.spliced);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_no_lookup_for_unrelated_announce_type() {
    let lookup = Arc::new(FakeLookup::new(Duration::ZERO, Some(sample_status())));
    let ctx    = context(paced_clips(), sample_directory(), lookup.clone()).await;

    let spec = RequestSpec { announce_type: announce_type::DISCONNECTED, ..homebrew_connected("AAHBSV") };
    let (outcome, _) = play(&ctx, spec).await;

    assert!(!outcome.spliced);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_no_lookup_for_unknown_server() {
    let lookup = Arc::new(FakeLookup::new(Duration::ZERO, Some(sample_status())));
    let ctx    = context(paced_clips(), sample_directory(), lookup.clone()).await;

    let spec = RequestSpec { announce_data: [0x0A00_0002, CLIENT_ID], ..homebrew_connected("AAHBSV") };
    let (outcome, _) = play(&ctx, spec).await;

    assert!(!outcome.spliced);
    assert_eq!(outcome.final_code.to_string(), "AAHBSV");
    assert_eq!(lookup.calls(), 0);
}
