//! Axum용 JWT 인증 추출기.
//!
//! `Authorization: Bearer <token>` 헤더를 검증하고 클레임을 핸들러에 전달합니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use identity_core::{RoleName, INVALID_TOKEN};
use serde_json::json;

use super::{TokenClaims, TokenService};

/// 토큰 검증기를 제공하는 라우터 상태.
pub trait TokenState {
    fn token_service(&self) -> &TokenService;
}

impl TokenState for Arc<TokenService> {
    fn token_service(&self) -> &TokenService {
        self
    }
}

/// JWT 인증 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(
///     JwtAuth(claims): JwtAuth,
/// ) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub TokenClaims);

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid authorization header")]
    InvalidAuthHeader,
    #[error("{}", INVALID_TOKEN)]
    InvalidToken,
    #[error("Insufficient permission")]
    InsufficientPermission,
}

impl IntoResponse for JwtAuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            JwtAuthError::InsufficientPermission => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl<S> FromRequestParts<S> for JwtAuth
where
    S: TokenState + Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(JwtAuthError::MissingToken)?;

        // Bearer 토큰 형식 확인
        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(JwtAuthError::InvalidAuthHeader)?;

        let claims = state
            .token_service()
            .verify(token)
            .map_err(|_| JwtAuthError::InvalidToken)?;

        Ok(JwtAuth(claims))
    }
}

/// 특정 역할을 요구합니다.
pub fn require_role(required_role: RoleName, claims: &TokenClaims) -> Result<(), JwtAuthError> {
    if claims.has_role(required_role) {
        Ok(())
    } else {
        Err(JwtAuthError::InsufficientPermission)
    }
}

/// Admin 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub TokenClaims);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: TokenState + Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        require_role(RoleName::Admin, &claims)?;
        Ok(AdminAuth(claims))
    }
}
