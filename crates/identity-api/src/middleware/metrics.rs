//! HTTP 요청 metrics middleware.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::metrics::{record_http_request, record_http_response};

/// 라우트에 매칭되지 않은 요청의 경로 라벨.
pub const UNMATCHED_PATH: &str = "unmatched";

/// 메트릭 라벨용 경로.
///
/// 매칭된 라우트 템플릿(`/api/auth/users/{id}/roles` 형태)만 라벨로 사용합니다.
/// 매칭되지 않은 요청은 모두 [`UNMATCHED_PATH`] 하나로 집계됩니다.
fn path_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_PATH, MatchedPath::as_str)
        .to_string()
}

/// 요청 수, 응답 상태, 처리 시간을 기록하는 미들웨어.
///
/// `http_requests_total`, `http_responses_total`, `http_request_duration_seconds`
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().as_str().to_owned();
    let path = path_label(&request);

    record_http_request(&method, &path);
    let response = next.run(request).await;

    record_http_response(&method, &path, response.status().as_u16(), started.elapsed());

    response
}
