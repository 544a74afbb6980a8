//! 자격 증명 저장소.
//!
//! 사용자, 역할, 사용자-역할 할당을 관리합니다.
//! 유일성 제약(이메일, 사용자-역할 쌍)은 저장소 계층에서 강제됩니다.
//!
//! # 할당 정책
//!
//! 이미 있는 사용자-역할 쌍을 다시 할당하면 `Conflict`로 실패합니다.

mod memory;
mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

use async_trait::async_trait;
use identity_core::{IdentityError, NewUser, RoleName, User, UserId, UserWithRoles};

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 유일성 제약 위반
    #[error("{0}")]
    Conflict(String),
    /// 사용자 또는 역할 없음
    #[error("{0}")]
    NotFound(String),
    /// 저장소 연결/쿼리 실패
    #[error("저장소 사용 불가: {0}")]
    Unavailable(String),
}

/// 저장소 작업용 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for IdentityError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => IdentityError::Conflict(msg),
            StoreError::NotFound(msg) => IdentityError::NotFound(msg),
            StoreError::Unavailable(msg) => IdentityError::Transient(msg),
        }
    }
}

/// 사용자 없음 메시지.
pub const USER_NOT_FOUND: &str = "User not found";

/// 자격 증명 저장소 trait.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 이메일로 사용자 조회.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// ID로 사용자와 역할 이름 조회.
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserWithRoles>>;

    /// 사용자 생성. 이메일이 이미 있으면 `Conflict`.
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// 사용자 생성과 역할 할당을 하나의 원자적 작업으로 수행.
    ///
    /// 둘 중 하나라도 실패하면 아무것도 남지 않습니다.
    async fn create_with_role(&self, user: NewUser, role: RoleName) -> StoreResult<User>;

    /// 사용자에게 역할 할당.
    ///
    /// 알 수 없는 역할이나 사용자는 `NotFound`, 중복 할당은 `Conflict`.
    async fn assign_role(&self, user_id: UserId, role_name: &str) -> StoreResult<()>;

    /// 사용자의 역할 이름 (역할 ID 순).
    async fn roles_for_user(&self, user_id: UserId) -> StoreResult<Vec<String>>;

    /// 저장소 연결 상태 확인.
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err: IdentityError = StoreError::Conflict("Email already registered".into()).into();
        assert!(matches!(err, IdentityError::Conflict(_)));

        let err: IdentityError = StoreError::NotFound(USER_NOT_FOUND.into()).into();
        assert!(matches!(err, IdentityError::NotFound(_)));

        let err: IdentityError = StoreError::Unavailable("pool timed out".into()).into();
        assert!(err.is_retryable());
    }
}
