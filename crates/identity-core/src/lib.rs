//! # Identity Core
//!
//! 인증 서비스 전반에서 사용되는 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 사용자, 역할, 역할 할당 엔티티와 감사(audit) 메타데이터
//! - 요청/응답 DTO (회원가입, 로그인, 프로필)
//! - 에러 분류 체계 ([`IdentityError`])
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
