//! 인증 서비스의 에러 타입.
//!
//! 호출자에게 노출되는 결과는 이 모듈의 분류 체계로만 구분됩니다.
//! 예상된 결과(검증 실패, 중복, 인증 실패 등)는 짧은 메시지와 함께 그대로 전달되고,
//! 예상하지 못한 실패는 내부적으로만 상세히 기록됩니다.

use thiserror::Error;
use validator::ValidationErrors;

/// 로그인 실패 시 항상 사용하는 메시지.
///
/// 계정 없음, 비활성 계정, 비밀번호 불일치를 구분하지 않습니다.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// 토큰 검증 실패 시 항상 사용하는 메시지.
pub const INVALID_TOKEN: &str = "Invalid token";

/// 내부 실패를 호출자에게 알릴 때 사용하는 메시지.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// 이미 등록된 이메일.
pub const EMAIL_ALREADY_REGISTERED: &str = "Email already registered";

/// 이미 할당된 역할.
pub const ROLE_ALREADY_ASSIGNED: &str = "Role already assigned";

/// 인증 핵심 에러.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// 잘못되었거나 누락된 입력 (저장소 접근 전에 검출)
    #[error("{0}")]
    Validation(String),

    /// 중복 이메일, 중복 역할 할당
    #[error("{0}")]
    Conflict(String),

    /// 잘못된 자격 증명 또는 비활성 계정
    #[error("{}", INVALID_CREDENTIALS)]
    Authentication,

    /// 토큰 검증 실패 (원인은 구분하지 않음)
    #[error("{}", INVALID_TOKEN)]
    InvalidToken,

    /// 프로필 조회 실패, 알 수 없는 역할 이름
    #[error("{0}")]
    NotFound(String),

    /// 저장소/알림 I/O 실패 또는 타임아웃
    #[error("일시적 장애: {0}")]
    Transient(String),

    /// 서명 설정 오류 등 예상하지 못한 내부 실패
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 인증 작업을 위한 Result 타입.
pub type IdentityResult<T> = Result<T, IdentityError>;

impl IdentityError {
    /// 호출자에게 그대로 전달되는 예상된 결과인지 확인합니다.
    pub fn is_expected(&self) -> bool {
        !matches!(self, IdentityError::Transient(_) | IdentityError::Internal(_))
    }

    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IdentityError::Transient(_))
    }

    /// 호출자에게 노출해도 안전한 메시지.
    ///
    /// 내부 실패의 상세 내용은 절대 포함하지 않습니다.
    pub fn public_message(&self) -> String {
        if self.is_expected() {
            self.to_string()
        } else {
            INTERNAL_ERROR.to_string()
        }
    }
}

impl From<ValidationErrors> for IdentityError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();

        if messages.is_empty() {
            IdentityError::Validation("Invalid request".to_string())
        } else {
            IdentityError::Validation(messages.join("; "))
        }
    }
}
