// author: kodeholic (powered by Claude)
// 네트워크 로직과 분리된 공유 상태 모듈
//   RequestLedger  : 처리 중인 요청 중복 방지
//   ServerDirectory: 서버 IP → BrandMeister 서버 정보

pub mod directory;
pub mod ledger;

pub use directory::{ServerDirectory, ServerIpMap, ServerRecord};
pub use ledger::{LedgerGuard, RequestLedger};
