//! 인증 및 권한 부여.
//!
//! JWT 발급/검증과 Argon2 비밀번호 해싱을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenService`]: HS256 토큰 발급 및 검증
//! - [`TokenClaims`]: JWT 페이로드 구조체
//! - [`JwtAuth`]: Axum 핸들러용 JWT 검증 추출기
//! - [`AdminAuth`]: `admin` 역할을 요구하는 추출기
//! - 비밀번호 해싱/검증 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     JwtAuth(claims): JwtAuth,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.name)
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{ClaimSet, IssuedToken, TokenClaims, TokenError, TokenService};
pub use middleware::{require_role, AdminAuth, JwtAuth, JwtAuthError, TokenState};
pub use password::{
    burn_verification, hash_password, hash_password_blocking, verify_password,
    verify_password_blocking, warm_dummy_hash, PasswordError,
};
