//! 웹훅 발행기.
//!
//! 가입 이벤트를 JSON으로 설정된 URL에 POST합니다.

use std::time::Duration;

use async_trait::async_trait;
use identity_core::NotifierConfig;
use tracing::{debug, warn};

use crate::types::{EventPublisher, PublishError, PublishResult, UserRegistered};

/// 웹훅 발행 설정.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// 이벤트를 받을 URL
    pub url: String,
    /// 요청 타임아웃
    pub timeout: Duration,
}

impl WebhookConfig {
    /// 새 웹훅 설정을 생성합니다.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// 요청 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 알림 설정에서 웹훅 설정을 생성합니다.
    ///
    /// 비활성화되었거나 URL이 없으면 `None`을 반환합니다.
    pub fn from_notifier(config: &NotifierConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        config
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(Self::new)
    }
}

/// 웹훅 발행기.
pub struct WebhookPublisher {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookPublisher {
    /// 새 웹훅 발행기를 생성합니다.
    pub fn new(config: WebhookConfig) -> PublishResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    /// 알림 설정에서 발행기를 생성합니다.
    pub fn from_notifier(config: &NotifierConfig) -> PublishResult<Option<Self>> {
        WebhookConfig::from_notifier(config)
            .map(Self::new)
            .transpose()
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl EventPublisher for WebhookPublisher {
    async fn publish_registered(&self, event: &UserRegistered) -> PublishResult<()> {
        let body = serde_json::to_vec(event)?;

        debug!(user_id = event.user_id, "Posting registration webhook");

        let response = self
            .client
            .post(&self.config.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            warn!(
                user_id = event.user_id,
                status = status.as_u16(),
                "Registration webhook rejected"
            );
            Err(PublishError::Rejected(status.as_u16()))
        }
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn event() -> UserRegistered {
        UserRegistered::new(42, "a@x.com", "A B")
    }

    #[tokio::test]
    async fn test_publish_posts_event_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/hooks/registered")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "userId": 42,
                "email": "a@x.com",
                "fullName": "A B"
            })))
            .with_status(202)
            .create_async()
            .await;

        let publisher =
            WebhookPublisher::new(WebhookConfig::new(format!("{}/hooks/registered", server.url())))
                .unwrap();
        publisher.publish_registered(&event()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/hooks/registered")
            .with_status(503)
            .create_async()
            .await;

        let publisher =
            WebhookPublisher::new(WebhookConfig::new(format!("{}/hooks/registered", server.url())))
                .unwrap();
        let result = publisher.publish_registered(&event()).await;

        assert!(matches!(result, Err(PublishError::Rejected(503))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // 바인딩되지 않은 포트
        let publisher = WebhookPublisher::new(
            WebhookConfig::new("http://127.0.0.1:9/hooks").with_timeout(Duration::from_millis(500)),
        )
        .unwrap();
        let result = publisher.publish_registered(&event()).await;

        assert!(matches!(result, Err(PublishError::Network(_))));
    }

    #[test]
    fn test_from_notifier_requires_url_and_enabled() {
        let mut config = NotifierConfig::default();
        assert!(WebhookConfig::from_notifier(&config).is_none());

        config.webhook_url = Some("  ".to_string());
        assert!(WebhookConfig::from_notifier(&config).is_none());

        config.webhook_url = Some("http://hooks.internal/registered".to_string());
        let webhook = WebhookConfig::from_notifier(&config).unwrap();
        assert_eq!(webhook.url, "http://hooks.internal/registered");

        config.enabled = false;
        assert!(WebhookConfig::from_notifier(&config).is_none());
    }
}
