//! 핵심 도메인 모델.
//!
//! - [`audit`]: 모든 엔티티에 포함되는 감사 메타데이터
//! - [`user`]: 사용자 엔티티
//! - [`role`]: 역할 및 사용자-역할 할당
//! - [`dto`]: 회원가입/로그인/프로필 요청 및 응답

pub mod audit;
pub mod dto;
pub mod role;
pub mod user;

pub use audit::*;
pub use dto::*;
pub use role::*;
pub use user::*;
