//! Prometheus 메트릭.
//!
//! HTTP 요청 메트릭과 가입/로그인/알림 결과 카운터를 `/metrics`로 노출합니다.
//! 결과 라벨은 `&'static str`만 받아 라벨 카디널리티를 고정합니다.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const HTTP_DURATION: &str = "http_request_duration_seconds";

/// Prometheus 메트릭 레코더를 설치하고 핸들을 반환합니다.
///
/// 레코더는 프로세스당 하나만 설치할 수 있으며, 두 번째 호출은 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_DURATION.to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()?;

    describe_metrics();
    Ok(handle)
}

/// `/metrics` 출력의 HELP 줄.
fn describe_metrics() {
    describe_counter!("http_requests_total", "Total HTTP requests received");
    describe_counter!("http_responses_total", "Total HTTP responses by status");
    describe_histogram!(HTTP_DURATION, Unit::Seconds, "HTTP request latency");
    describe_counter!("identity_registrations_total", "Registration attempts by outcome");
    describe_counter!("identity_logins_total", "Login attempts by outcome");
    describe_counter!(
        "identity_notifications_total",
        "Registration event publishes by outcome"
    );
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// 요청 수신 기록.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_owned(), "path" => path.to_owned())
        .increment(1);
}

/// 응답 상태와 처리 시간 기록.
pub fn record_http_response(method: &str, path: &str, status: u16, elapsed: Duration) {
    counter!(
        "http_responses_total",
        "method" => method.to_owned(),
        "path" => path.to_owned(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(HTTP_DURATION, "method" => method.to_owned(), "path" => path.to_owned())
        .record(elapsed.as_secs_f64());
}

// ============================================================================
// 인증 메트릭 헬퍼 함수
// ============================================================================

/// 회원가입 결과 카운터 증가.
pub fn record_registration(outcome: &'static str) {
    counter!("identity_registrations_total", "outcome" => outcome).increment(1);
}

/// 로그인 결과 카운터 증가.
pub fn record_login(outcome: &'static str) {
    counter!("identity_logins_total", "outcome" => outcome).increment(1);
}

/// 가입 알림 발행 결과 카운터 증가.
pub fn record_notification(outcome: &'static str) {
    counter!("identity_notifications_total", "outcome" => outcome).increment(1);
}
