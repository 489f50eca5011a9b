// author: kodeholic (powered by Claude)
// ServerDirectory: 서버 IP → BrandMeister 서버 정보 역방향 맵
//
// 갱신 태스크(refresher.rs)가 서버 목록을 받아 DNS 해석까지 lock 밖에서 끝낸 뒤
// 완성된 맵을 replace()로 통째로 교체한다. 읽는 쪽은 항상 완전한 맵만 본다.

use std::collections::HashMap;
use std::sync::RwLock;
use serde::Deserialize;
use tracing::{info, trace, warn};

use crate::config;

/// 서버 목록 JSON 항목 하나
/// 예: { "Network": "BrandMeister", "Name": "BrandMeister/2162", "Host": "srv.example.net" }
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerRecord {
    #[serde(rename = "Network", alias = "network", default)]
    pub network: String,
    #[serde(rename = "Name", alias = "name", default)]
    pub name:    String,
    #[serde(rename = "Host", alias = "host", default)]
    pub host:    String,
}

pub type ServerIpMap = HashMap<String, ServerRecord>;

pub struct ServerDirectory {
    servers: RwLock<ServerIpMap>,
}

impl ServerDirectory {
    pub fn new() -> Self {
        trace!("Initializing ServerDirectory");
        Self { servers: RwLock::new(HashMap::new()) }
    }

    /// 테스트/초기화용: 최소 크기 검사 없이 바로 채움
    pub fn with_entries(entries: ServerIpMap) -> Self {
        Self { servers: RwLock::new(entries) }
    }

    pub fn lookup(&self, ip: &str) -> Option<ServerRecord> {
        self.servers.read().unwrap().get(ip).cloned()
    }

    /// 새 맵이 DIRECTORY_MIN_ENTRIES 보다 클 때만 교체. 교체했으면 true
    pub fn replace(&self, fresh: ServerIpMap) -> bool {
        if fresh.len() <= config::DIRECTORY_MIN_ENTRIES {
            warn!("[directory] refusing update with {} address(es), keeping {} cached",
                fresh.len(), self.len());
            return false;
        }
        let count = fresh.len();
        *self.servers.write().unwrap() = fresh;
        info!("[directory] server map replaced ({} addresses)", count);
        true
    }

    pub fn len(&self) -> usize {
        self.servers.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ServerDirectory {
    fn default() -> Self {
        Self::new()
    }
}
