// author: kodeholic (powered by Claude)

pub mod fragment;
pub mod splice;
pub mod stream;

pub use fragment::build_code_fragment;
pub use splice::{PendingStatus, Splicer};
pub use stream::{play_announcement, StreamOutcome};

use std::sync::Arc;
use tokio::net::UdpSocket;

use crate::bm::StatusLookup;
use crate::core::{RequestLedger, ServerDirectory};
use crate::voice::VoiceAssets;

/// 수신 루프와 모든 스트리밍 태스크가 공유하는 핸들 묶음
/// 송신은 항상 수신에 쓰는 같은 소켓으로
#[derive(Clone)]
pub struct AnnounceContext {
    pub socket:    Arc<UdpSocket>,
    pub ledger:    Arc<RequestLedger>,
    pub directory: Arc<ServerDirectory>,
    pub assets:    Arc<dyn VoiceAssets>,
    pub status:    Arc<dyn StatusLookup>,
}
