use crate::config::SidecarConfig;
use crate::domain::ports::EventPublisher;
use crate::utils::error::{PubSubError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tokio::time::Instant;

pub const API_TOKEN_HEADER: &str = "dapr-api-token";
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Sidecar 的 HTTP 客戶端，只負責轉交；投遞、重試都由 sidecar 處理
#[derive(Debug, Clone)]
pub struct DaprClient {
    config: SidecarConfig,
    client: Client,
}

impl DaprClient {
    pub fn new(config: SidecarConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.http_endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.http_endpoint.trim_end_matches('/'), path)
    }

    fn with_token(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.header(API_TOKEN_HEADER, token),
            None => request,
        }
    }

    /// 等待 sidecar 的 outbound 健康檢查回應 2xx
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        let url = self.url("/v1.0/healthz/outbound");
        let deadline = Instant::now() + timeout;

        tracing::debug!("Waiting for sidecar at {}", url);
        loop {
            // 單次探測不可超過剩餘的等待時間
            let remaining = deadline.saturating_duration_since(Instant::now());
            let request = self
                .with_token(self.client.get(&url))
                .timeout(remaining.min(self.config.request_timeout()));

            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::info!("✅ Sidecar ready at {}", self.config.http_endpoint);
                    return Ok(());
                }
                Ok(response) => {
                    tracing::debug!("Sidecar not ready yet: status {}", response.status());
                }
                Err(e) => {
                    tracing::debug!("Sidecar not reachable yet: {}", e);
                }
            }

            if Instant::now() + READY_POLL_INTERVAL > deadline {
                return Err(PubSubError::SidecarUnavailable {
                    endpoint: self.config.http_endpoint.clone(),
                    timeout_seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl EventPublisher for DaprClient {
    async fn publish_event(
        &self,
        pubsub_name: &str,
        topic: &str,
        data: String,
        content_type: &str,
    ) -> Result<()> {
        let url = self.url(&format!("/v1.0/publish/{}/{}", pubsub_name, topic));
        tracing::debug!("POST {} ({} bytes, {})", url, data.len(), content_type);

        let response = self
            .with_token(self.client.post(&url))
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Sidecar publish response status: {}", status);

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PubSubError::PublishRejected {
            topic: topic.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}
