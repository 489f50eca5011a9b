// author: kodeholic (powered by Claude)
// BrandMeister 서버 IP 맵 주기 갱신 태스크
//
// 주기마다 수행 (시작 직후 1회 포함):
//   1. 서버 목록 JSON 조회
//   2. Network == "BrandMeister" 항목만 남김
//   3. 각 Host DNS 해석 → 해석된 모든 IP를 키로 등록
//   4. 결과가 최소 크기를 넘을 때만 ServerDirectory 통째 교체
//
// HTTP/DNS는 전부 lock 밖에서 끝내고, 교체만 짧은 write lock 안에서

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bm::BrandmeisterApi;
use crate::config;
use crate::core::{ServerDirectory, ServerIpMap, ServerRecord};

pub async fn run_directory_refresher(api: Arc<BrandmeisterApi>, directory: Arc<ServerDirectory>) {
    let mut timer = tokio::time::interval(config::DIRECTORY_REFRESH_INTERVAL);

    info!("[directory-refresher] Started (interval={}s, min_entries={})",
        config::DIRECTORY_REFRESH_INTERVAL.as_secs(), config::DIRECTORY_MIN_ENTRIES);

    loop {
        // 첫 틱은 즉시: 시작하자마자 맵을 채움
        timer.tick().await;
        refresh_once(&api, &directory).await;
    }
}

/// 1회 갱신. 실패나 최소 크기 미달이면 기존 맵 유지
pub async fn refresh_once(api: &BrandmeisterApi, directory: &ServerDirectory) {
    info!("[directory-refresher] updating bm server list");

    let servers = match api.fetch_server_list().await {
        Ok(s)  => s,
        Err(e) => {
            warn!("[directory-refresher] server list fetch failed: {}", e);
            return;
        }
    };

    let fresh = resolve_servers(servers).await;
    if !directory.replace(fresh) {
        debug!("[directory-refresher] keeping {} cached address(es)", directory.len());
    }
}

/// BrandMeister 서버만 골라 호스트별 모든 IP를 키로 하는 맵 생성
pub async fn resolve_servers(servers: Vec<ServerRecord>) -> ServerIpMap {
    let mut map = ServerIpMap::new();

    for server in servers.into_iter().filter(|s| s.network == config::SERVER_LIST_NETWORK) {
        // lookup_host 는 포트가 필요: 0 으로 채우고 IP만 사용
        let addrs = match tokio::net::lookup_host((server.host.as_str(), 0)).await {
            Ok(a)  => a,
            Err(e) => {
                debug!("[directory-refresher] resolve failed host={}: {}", server.host, e);
                continue;
            }
        };
        for addr in addrs {
            map.insert(addr.ip().to_string(), server.clone());
        }
    }

    map
}
