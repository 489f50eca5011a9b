// author: kodeholic (powered by Claude)
// BrandMeister HTTP API 클라이언트
//
//   PROFILE 조회 : 클라이언트(리피터) id → 반사기 + static/dynamic 토크그룹 구독
//   서버 목록    : Homebrew 서버 목록 JSON (refresher.rs 에서 주기 갱신)

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config;
use crate::core::ServerRecord;
use crate::error::SpkResult;

// ----------------------------------------------------------------------------
// [응답 타입] 요청마다 새로 받아 한 번 쓰고 버림
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReflectorState {
    #[serde(default)]
    pub active: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub talkgroup: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStatus {
    #[serde(default)]
    pub reflector:             ReflectorState,
    #[serde(default)]
    pub static_subscriptions:  Vec<Subscription>,
    #[serde(default)]
    pub dynamic_subscriptions: Vec<Subscription>,
}

// ----------------------------------------------------------------------------
// [StatusLookup] 스트리밍 엔진이 의존하는 조회 seam (테스트에서 교체)
// ----------------------------------------------------------------------------

#[async_trait]
pub trait StatusLookup: Send + Sync {
    async fn fetch_client_status(&self, client_id: u32) -> SpkResult<ClientStatus>;
}

// ----------------------------------------------------------------------------
// [BrandmeisterApi] reqwest 기반 실제 구현
// ----------------------------------------------------------------------------

pub struct BrandmeisterApi {
    client:          reqwest::Client,
    profile_url:     String,
    server_list_url: String,
}

impl BrandmeisterApi {
    pub fn new() -> SpkResult<Self> {
        Self::with_urls(config::BM_PROFILE_URL, config::SERVER_LIST_URL, config::STATUS_LOOKUP_TIMEOUT)
    }

    pub fn with_urls(profile_url: &str, server_list_url: &str, timeout: Duration) -> SpkResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            profile_url:     profile_url.to_string(),
            server_list_url: server_list_url.to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> SpkResult<T> {
        trace!("[bm-api] GET {}", url);
        let body = self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(body)
    }

    /// Homebrew 서버 전체 목록 (네트워크 필터링은 호출 측에서)
    pub async fn fetch_server_list(&self) -> SpkResult<Vec<ServerRecord>> {
        let list: Vec<ServerRecord> = self.get_json(&self.server_list_url).await?;
        debug!("[bm-api] server list: {} entries", list.len());
        Ok(list)
    }
}

#[async_trait]
impl StatusLookup for BrandmeisterApi {
    async fn fetch_client_status(&self, client_id: u32) -> SpkResult<ClientStatus> {
        let url = format!("{}{}", self.profile_url, client_id);
        let status: ClientStatus = self.get_json(&url).await?;
        debug!("[bm-api] profile cid:{} ref={} static={} dynamic={}",
            client_id,
            status.reflector.active,
            status.static_subscriptions.len(),
            status.dynamic_subscriptions.len());
        Ok(status)
    }
}
