//! API 에러 응답.
//!
//! 모든 실패는 `{"error": "..."}` 형식으로 응답합니다.
//! 내부 실패는 상세 내용을 로그에만 남기고 일반 메시지로 응답합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use identity_core::IdentityError;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// API 에러 응답 본문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// 사람이 읽을 수 있는 에러 메시지
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// 인증 에러를 HTTP 응답으로 변환하는 래퍼.
#[derive(Debug)]
pub struct ApiError(pub IdentityError);

/// API 핸들러용 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// 에러 종류별 HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            IdentityError::Validation(_) | IdentityError::Conflict(_) => StatusCode::BAD_REQUEST,
            IdentityError::Authentication | IdentityError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            IdentityError::NotFound(_) => StatusCode::NOT_FOUND,
            IdentityError::Transient(_) | IdentityError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if !self.0.is_expected() {
            error!(error = %self.0, retryable = self.0.is_retryable(), "Request failed");
        }

        (status, Json(ErrorBody::new(self.0.public_message()))).into_response()
    }
}
