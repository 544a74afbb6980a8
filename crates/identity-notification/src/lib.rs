//! # Identity Notification
//!
//! 신규 가입 사실을 다른 서비스에 알리는 발행기.
//!
//! 지원 채널:
//! - Webhook (HTTP POST)
//! - 로그 (전송 수단이 설정되지 않은 경우)
//!
//! 발행은 최선 노력(best-effort)이며 재시도하지 않습니다.
//! 소비자는 누락된 알림을 스스로 보정해야 합니다.

pub mod log_publisher;
pub mod types;
pub mod webhook;

pub use log_publisher::*;
pub use types::*;
pub use webhook::*;
