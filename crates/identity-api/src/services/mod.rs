//! 비즈니스 서비스.

pub mod auth;

pub use auth::{AuthService, NotificationOutcome};
