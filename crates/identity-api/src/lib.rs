//! 인증 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (회원가입, 로그인, 프로필)
//! - JWT 발급/검증 및 Argon2 비밀번호 해싱
//! - 자격 증명 저장소 (PostgreSQL, 인메모리)
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 비밀번호 해싱
//! - [`services`]: 인증 핵심 로직
//! - [`repository`]: 자격 증명 저장소
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{hash_password, verify_password, JwtAuth, JwtAuthError, TokenClaims, TokenService};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use repository::{CredentialStore, MemoryCredentialStore, PgCredentialStore, StoreError};
pub use routes::{create_api_router, create_router};
pub use services::{AuthService, NotificationOutcome};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
