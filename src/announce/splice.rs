// author: kodeholic (powered by Claude)
// 동적 안내 스플라이스
//
// 적용 조건: connector == Homebrew && announce_type ∈ {connected, connected-bm-short, status}
//   1. announce_data[0] → IPv4 → ServerDirectory 조회
//   2. 적중 시 announce_data[1](client id)로 상태 조회를 별도 태스크에서 시작
//   3. 스트리밍 루프는 코드 쌍마다 poll(): 절대 기다리지 않음
//   4. 결과가 커서 < SPLICE_WINDOW 일 때 도착하면 자리표시자(BMSV 우선, 없으면 HBSV)를 1회 치환
//      늦게 도착한 결과는 버림 (이미 해당 위치 음성을 지나쳤음)
//   5. 루프 종료 후에도 조회가 안 끝났으면 drain() 으로 완료까지 대기

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::announce::fragment::build_code_fragment;
use crate::bm::{ClientStatus, StatusLookup};
use crate::config;
use crate::core::{ServerDirectory, ServerRecord};
use crate::error::{SpkError, SpkResult};
use crate::protocol::message::{CodeString, ConnectorId, Request};

// ----------------------------------------------------------------------------
// [PendingStatus] 비차단 try_take + 정리용 wait 를 제공하는 조회 핸들
// ----------------------------------------------------------------------------

pub struct PendingStatus {
    rx: oneshot::Receiver<SpkResult<ClientStatus>>,
}

impl PendingStatus {
    /// 조회 태스크 시작. 실패/타임아웃도 반드시 결과로 전달되므로 wait() 가 영원히 막히지 않음
    pub fn spawn(lookup: Arc<dyn StatusLookup>, client_id: u32) -> Self {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = match tokio::time::timeout(
                config::STATUS_LOOKUP_TIMEOUT,
                lookup.fetch_client_status(client_id),
            ).await {
                Ok(r)  => r,
                Err(_) => Err(SpkError::LookupTimeout(client_id)),
            };
            // 수신 측이 이미 사라졌으면 (태스크 종료) 그냥 버림
            let _ = tx.send(result);
        });
        Self { rx }
    }

    /// 완료됐으면 결과, 아직이면 None
    pub fn try_take(&mut self) -> Option<SpkResult<ClientStatus>> {
        match self.rx.try_recv() {
            Ok(result)                => Some(result),
            Err(TryRecvError::Empty)  => None,
            Err(TryRecvError::Closed) => Some(Err(SpkError::Directory("status lookup task dropped".into()))),
        }
    }

    /// 완료까지 대기: 결과는 사용하지 않음
    pub async fn wait(self) {
        let _ = self.rx.await;
    }
}

// ----------------------------------------------------------------------------
// [Splicer] 스트리밍 태스크 1개당 최대 1개
// ----------------------------------------------------------------------------

pub struct Splicer {
    pending: Option<PendingStatus>,
    server:  ServerRecord,
    to:      SocketAddr,
    spliced: bool,
}

impl Splicer {
    /// 적용 조건을 만족하고 서버 IP가 디렉터리에 있으면 조회를 시작
    pub fn start(
        request:   &Request,
        to:        SocketAddr,
        directory: &ServerDirectory,
        lookup:    Arc<dyn StatusLookup>,
    ) -> Option<Self> {
        if request.connector != ConnectorId::Homebrew || !request.announce_type.wants_status_splice() {
            return None;
        }

        let server_ip = request.server_ip().to_string();
        let server = match directory.lookup(&server_ip) {
            Some(s) => s,
            None    => { debug!("[splice] srv:{} not a known bm server", server_ip); return None; }
        };

        let client_id = request.client_id();
        info!("[splice] getting bm client data srv:{} cid:{}", server_ip, client_id);
        Some(Self {
            pending: Some(PendingStatus::spawn(lookup, client_id)),
            server,
            to,
            spliced: false,
        })
    }

    pub fn spliced(&self) -> bool {
        self.spliced
    }

    /// 코드 쌍 반복 시작마다 호출. 결과가 아직이면 아무것도 하지 않음
    pub fn poll(&mut self, pos: usize, code: &mut CodeString) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let Some(result) = pending.try_take() else {
            return;
        };
        self.pending = None;

        let status = match result {
            Ok(s)  => s,
            Err(e) => { warn!("[splice] bm client data for {} failed: {}", self.to, e); return; }
        };

        if pos >= config::SPLICE_WINDOW {
            debug!("[splice] bm client data for {} arrived late (pos={}), discarded", self.to, pos);
            return;
        }

        let fragment = build_code_fragment(&status, &self.server);
        if apply_splice(code, &fragment) {
            self.spliced = true;
            info!("[splice] code str modified for {} to {}", self.to, code);
        } else {
            debug!("[splice] no placeholder in code str for {}", self.to);
        }
    }

    /// 소비되지 않은 조회가 있으면 끝날 때까지 대기 (결과는 버림)
    pub async fn drain(self) {
        if let Some(pending) = self.pending {
            debug!("[splice] waiting for outstanding bm lookup for {}", self.to);
            pending.wait().await;
        }
    }
}

/// 자리표시자를 fragment 로 1회 치환. BMSV 가 있으면 BMSV, 아니면 HBSV
pub fn apply_splice(code: &mut CodeString, fragment: &str) -> bool {
    let placeholder = if code.contains(config::SPLICE_PLACEHOLDER_BM) {
        config::SPLICE_PLACEHOLDER_BM
    } else {
        config::SPLICE_PLACEHOLDER_HB
    };
    code.replace_first(placeholder, fragment)
}
