//! 인증 API 서버.
//!
//! 설정을 읽고 저장소와 알림 발행기를 구성한 뒤 Axum 서버를 시작합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use identity_core::{init_logging, AppConfig, DatabaseConfig, LogConfig};
use identity_notification::{EventPublisher, LogPublisher, WebhookPublisher};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};

use identity_api::metrics::setup_metrics_recorder;
use identity_api::repository::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
use identity_api::routes::create_router;
use identity_api::state::AppState;
use identity_api::auth::warm_dummy_hash;
use identity_api::TokenService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (없으면 무시)
    dotenvy::dotenv().ok();

    let config = AppConfig::load_default()?;
    init_logging(LogConfig::from(&config.logging))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting identity API server");

    // 서명 키 검증 실패 시 시작하지 않음
    let tokens = Arc::new(TokenService::new(&config.jwt)?);
    info!(
        issuer = tokens.issuer(),
        audience = tokens.audience(),
        "Token service configured"
    );

    warm_dummy_hash().await?;

    let metrics_handle = match setup_metrics_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Failed to install metrics recorder, /metrics disabled");
            None
        }
    };

    let store = connect_store(&config.database).await?;
    let publisher = build_publisher(&config);

    let state = Arc::new(AppState::new(
        store,
        tokens,
        publisher,
        config.auth.clone(),
    ));

    let app = create_router(state, metrics_handle);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "API server listening");
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// 자격 증명 저장소 구성.
///
/// 데이터베이스 URL이 없으면 인메모리 저장소로 시작합니다 (개발 모드).
async fn connect_store(
    database: &DatabaseConfig,
) -> Result<Arc<dyn CredentialStore>, Box<dyn std::error::Error>> {
    let Some(url) = database.url.as_deref() else {
        warn!("DATABASE url not set, using in-memory credential store (development mode)");
        return Ok(Arc::new(MemoryCredentialStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
        .connect(url)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to connect to database");
            e
        })?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    info!(max_connections = database.max_connections, "Database connected");

    let store = PgCredentialStore::new(pool);
    store.seed_roles().await?;

    Ok(Arc::new(store))
}

/// 가입 알림 발행기 구성.
///
/// 웹훅이 설정되지 않았거나 생성에 실패하면 로그 발행기를 사용합니다.
fn build_publisher(config: &AppConfig) -> Arc<dyn EventPublisher> {
    match WebhookPublisher::from_notifier(&config.notifier) {
        Ok(Some(webhook)) => {
            info!(url = webhook.url(), "Registration webhook configured");
            Arc::new(webhook)
        }
        Ok(None) => {
            info!("No registration webhook configured, logging events only");
            Arc::new(LogPublisher::new())
        }
        Err(e) => {
            warn!(error = %e, "Failed to build webhook publisher, logging events only");
            Arc::new(LogPublisher::new())
        }
    }
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
