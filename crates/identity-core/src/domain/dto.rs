//! 요청 및 응답 DTO.
//!
//! JSON 필드명은 camelCase를 사용합니다 (`fullName`, `userId`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{UserId, UserWithRoles};

/// 회원가입 요청.
#[derive(Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "must be between 1 and 128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub full_name: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub phone: Option<String>,
}

impl RegisterRequest {
    /// 앞뒤 공백을 제거하고 빈 전화번호를 `None`으로 정리합니다.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.full_name = self.full_name.trim().to_string();
        self.phone = self
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        self
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .finish()
    }
}

/// 로그인 요청.
#[derive(Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 역할 할당 요청 (관리자 전용).
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct AssignRoleRequest {
    /// 역할 이름 (`admin`, `pati_bakici`, `bagisci`)
    #[validate(length(min = 1, message = "is required"))]
    pub role: String,
}

/// 회원가입/로그인 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    /// 서명된 Bearer 토큰
    pub token: String,
    pub roles: Vec<String>,
}

/// 인증된 사용자의 프로필.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserWithRoles> for UserProfile {
    fn from(found: UserWithRoles) -> Self {
        let UserWithRoles { user, roles } = found;
        Self {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            is_active: user.is_active,
            roles,
            created_at: user.audit.created_at,
        }
    }
}
