// author: kodeholic (powered by Claude)
// RequestLedger: 처리 중인 (session_id, 송신 주소) 목록
//
// UDP 재전송으로 같은 요청이 여러 번 도착해도 스트리밍 태스크는 하나만 돌도록 함.
//   수신 루프   : try_acquire() → 이미 있으면 None (드롭)
//   스트리밍 태스크: LedgerGuard 소유 → 어떤 경로로 종료하든 drop 시 remove()

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LedgerEntry {
    session_id: u32,
    addr:       SocketAddr,
}

pub struct RequestLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl RequestLedger {
    pub fn new() -> Self {
        trace!("Initializing RequestLedger");
        Self { entries: Mutex::new(Vec::new()) }
    }

    pub fn add(&self, session_id: u32, addr: SocketAddr) {
        self.entries.lock().unwrap().push(LedgerEntry { session_id, addr });
        trace!("[ledger] added sid:0x{:08x} addr={}", session_id, addr);
    }

    pub fn is_present(&self, session_id: u32, addr: SocketAddr) -> bool {
        let entries = self.entries.lock().unwrap();
        Self::index_of(&entries, session_id, addr).is_some()
    }

    /// swap_remove: 순서 보장 없음, O(1). 없는 항목이면 no-op
    pub fn remove(&self, session_id: u32, addr: SocketAddr) {
        let mut entries = self.entries.lock().unwrap();
        match Self::index_of(&entries, session_id, addr) {
            Some(i) => {
                entries.swap_remove(i);
                trace!("[ledger] removed sid:0x{:08x} addr={}", session_id, addr);
            }
            None => warn!("[ledger] remove of unknown sid:0x{:08x} addr={}", session_id, addr),
        }
    }

    /// is_present + add 를 한 번의 lock 안에서 수행
    /// 이미 처리 중이면 None, 아니면 등록 후 drop 시 자동 해제되는 가드 반환
    pub fn try_acquire(self: &Arc<Self>, session_id: u32, addr: SocketAddr) -> Option<LedgerGuard> {
        let mut entries = self.entries.lock().unwrap();
        if Self::index_of(&entries, session_id, addr).is_some() {
            return None;
        }
        entries.push(LedgerEntry { session_id, addr });
        trace!("[ledger] acquired sid:0x{:08x} addr={}", session_id, addr);
        Some(LedgerGuard { ledger: Arc::clone(self), session_id, addr })
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index_of(entries: &[LedgerEntry], session_id: u32, addr: SocketAddr) -> Option<usize> {
        entries.iter().position(|e| e.session_id == session_id && e.addr == addr)
    }
}

impl Default for RequestLedger {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// [LedgerGuard] 스트리밍 태스크 수명 = 원장 항목 수명
// ----------------------------------------------------------------------------

pub struct LedgerGuard {
    ledger:     Arc<RequestLedger>,
    session_id: u32,
    addr:       SocketAddr,
}

impl Drop for LedgerGuard {
    fn drop(&mut self) {
        self.ledger.remove(self.session_id, self.addr);
    }
}
