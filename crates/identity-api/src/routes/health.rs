//! 헬스 체크 endpoint.
//!
//! - `GET /health` - liveness, 프로세스가 요청을 받을 수 있는지만 확인
//! - `GET /health/ready` - readiness, 자격 증명 저장소 `ping` 포함

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 서비스 전체 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// 개별 컴포넌트 상태 값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Up,
    Down,
}

/// 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: ServiceStatus,
    /// API 버전
    pub version: String,
    /// 서버 업타임(초)
    pub uptime_secs: i64,
    /// 현재 시간 (RFC 3339)
    pub timestamp: String,
    pub components: ComponentHealth,
}

/// 컴포넌트별 상태.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    /// 자격 증명 저장소
    pub store: ComponentStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatus {
    pub status: ComponentState,
    /// 확인에 걸린 시간 (밀리초)
    pub latency_ms: u64,
}

impl ComponentStatus {
    fn measured(healthy: bool, started: Instant) -> Self {
        Self {
            status: if healthy {
                ComponentState::Up
            } else {
                ComponentState::Down
            },
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ComponentState::Up
    }
}

/// liveness 확인.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "서버 응답 가능")),
    tag = "health"
)]
pub async fn health_check() -> &'static str {
    "OK"
}

/// readiness 확인.
///
/// 저장소가 응답하지 않으면 503을 반환합니다.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "모든 컴포넌트 정상", body = HealthResponse),
        (status = 503, description = "저장소 연결 실패", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_ready(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let store = ComponentStatus::measured(state.is_store_healthy().await, started);

    let (status, code) = if store.is_up() {
        (ServiceStatus::Healthy, StatusCode::OK)
    } else {
        (ServiceStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE)
    };

    let response = HealthResponse {
        status,
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components: ComponentHealth { store },
    };

    (code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
