//! 감사(audit) 메타데이터.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// 생성/수정 시각과 수행자.
///
/// 엔티티 상속 대신 각 엔티티에 값으로 포함됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetadata {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<UserId>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<UserId>,
}

impl AuditMetadata {
    /// 현재 시각으로 생성 메타데이터를 만듭니다.
    pub fn created_now(created_by: Option<UserId>) -> Self {
        Self {
            created_at: Utc::now(),
            created_by,
            updated_at: None,
            updated_by: None,
        }
    }

    /// 수정 시각과 수행자를 갱신합니다.
    pub fn touch(&mut self, updated_by: Option<UserId>) {
        self.updated_at = Some(Utc::now());
        self.updated_by = updated_by;
    }
}

impl Default for AuditMetadata {
    fn default() -> Self {
        Self::created_now(None)
    }
}
