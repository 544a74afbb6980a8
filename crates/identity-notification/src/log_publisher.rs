//! 로그 발행기.

use async_trait::async_trait;
use tracing::info;

use crate::types::{EventPublisher, PublishResult, UserRegistered};

/// 가입 이벤트를 tracing 로그로만 기록하는 발행기.
///
/// 웹훅이 설정되지 않은 개발 환경에서 사용합니다.
#[derive(Debug, Clone, Default)]
pub struct LogPublisher;

impl LogPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish_registered(&self, event: &UserRegistered) -> PublishResult<()> {
        info!(
            user_id = event.user_id,
            registered_at = %event.registered_at,
            "User registered"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
