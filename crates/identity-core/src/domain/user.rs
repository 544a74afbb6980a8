//! 사용자 엔티티.

use super::AuditMetadata;

/// 저장소가 부여하는 사용자 ID.
pub type UserId = i64;

/// 사용자 레코드.
///
/// `password_hash`는 API 응답으로 직렬화하지 않습니다.
/// 외부로 내보낼 때는 [`UserProfile`](super::UserProfile)을 사용합니다.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// 전역적으로 유일한 이메일
    pub email: String,
    /// PHC 형식 비밀번호 해시 (평문은 저장하지 않음)
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    /// 비활성 계정은 로그인할 수 없음
    pub is_active: bool,
    pub audit: AuditMetadata,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .field("is_active", &self.is_active)
            .field("audit", &self.audit)
            .finish()
    }
}

/// 새 사용자 입력.
///
/// 비밀번호는 이미 해싱된 상태로 전달됩니다.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .finish()
    }
}

impl NewUser {
    /// 활성 상태의 사용자 레코드로 변환합니다.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            phone: self.phone,
            is_active: true,
            audit: AuditMetadata::created_now(None),
        }
    }
}

/// 역할 이름이 해석된 사용자.
#[derive(Debug, Clone)]
pub struct UserWithRoles {
    pub user: User,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewUser {
        NewUser {
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            full_name: "A B".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_new_user_is_active() {
        let user = sample().into_user(1);
        assert!(user.is_active);
        assert_eq!(user.id, 1);
        assert!(user.audit.updated_at.is_none());
    }

    #[test]
    fn test_debug_redacts_hash() {
        let user = sample().into_user(1);
        let debug = format!("{:?}", user);
        assert!(!debug.contains("argon2id"));
        assert!(debug.contains("<redacted>"));

        let debug = format!("{:?}", sample());
        assert!(!debug.contains("argon2id"));
    }
}
