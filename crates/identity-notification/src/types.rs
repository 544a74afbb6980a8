//! 가입 이벤트 타입 및 발행기 trait 정의.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use identity_core::UserId;
use serde::{Deserialize, Serialize};

/// 신규 사용자 가입 사실.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistered {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    pub registered_at: DateTime<Utc>,
}

impl UserRegistered {
    /// 현재 시각으로 가입 이벤트를 생성합니다.
    pub fn new(user_id: UserId, email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            full_name: full_name.into(),
            registered_at: Utc::now(),
        }
    }
}

/// 발행 작업용 Result 타입.
pub type PublishResult<T> = Result<T, PublishError>;

/// 발행 에러.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("이벤트 발행 실패: {0}")]
    SendFailed(String),

    #[error("수신 측 거부: HTTP {0}")]
    Rejected(u16),

    #[error("네트워크 에러: {0}")]
    Network(#[from] reqwest::Error),

    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 가입 이벤트 발행기 trait.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// 가입 이벤트를 발행합니다.
    async fn publish_registered(&self, event: &UserRegistered) -> PublishResult<()>;

    /// 발행기 이름을 반환합니다.
    fn name(&self) -> &str;
}
