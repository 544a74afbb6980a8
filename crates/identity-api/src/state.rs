//! 애플리케이션 공유 상태.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use identity_core::AuthSettings;
use identity_notification::EventPublisher;

use crate::auth::{TokenService, TokenState};
use crate::repository::CredentialStore;
use crate::services::AuthService;

/// 모든 핸들러가 공유하는 상태.
///
/// 요청 간에 보존되는 가변 상태는 저장소 핸들뿐입니다.
pub struct AppState {
    /// 인증 서비스
    pub auth: Arc<AuthService>,
    /// 토큰 검증기 (`JwtAuth` 추출기용)
    pub tokens: Arc<TokenService>,
    /// 자격 증명 저장소 (헬스 체크용)
    pub store: Arc<dyn CredentialStore>,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
    /// API 버전
    pub version: String,
}

impl AppState {
    /// 협력 객체들로 상태를 구성합니다.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        tokens: Arc<TokenService>,
        publisher: Arc<dyn EventPublisher>,
        settings: AuthSettings,
    ) -> Self {
        let auth = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::clone(&tokens),
            publisher,
            settings,
        ));

        Self {
            auth,
            tokens,
            store,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// 저장소 연결 상태 확인.
    pub async fn is_store_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}

impl TokenState for Arc<AppState> {
    fn token_service(&self) -> &TokenService {
        &self.tokens
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 인메모리 저장소와 로그 발행기를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::repository::MemoryCredentialStore;
    use identity_core::JwtSettings;
    use identity_notification::LogPublisher;

    let tokens = TokenService::new(&JwtSettings::new(
        "test-secret-key-for-jwt-testing-minimum-32-chars",
        "identity-service",
        "pati-platform",
        24,
    ))
    .expect("test JWT settings are valid");

    AppState::new(
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(tokens),
        Arc::new(LogPublisher::new()),
        AuthSettings::default(),
    )
}
