//! 회원가입, 로그인, 프로필 endpoint.
//!
//! - `POST /api/auth/register` - 회원가입 (201)
//! - `POST /api/auth/login` - 로그인
//! - `GET /api/auth/me` - 현재 사용자 프로필 (Bearer 토큰 필요)
//! - `POST /api/auth/users/{id}/roles` - 역할 할당 (`admin` 역할 필요)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use identity_core::{
    AssignRoleRequest, AuthResponse, IdentityError, LoginRequest, RegisterRequest, UserId,
    UserProfile,
};
use tracing::{debug, info};

use crate::auth::{AdminAuth, JwtAuth};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::state::AppState;

/// 회원가입.
///
/// 기본 역할(`bagisci`)을 부여하고 즉시 사용할 수 있는 토큰을 발급합니다.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 성공", body = AuthResponse),
        (status = 400, description = "입력 오류 또는 이메일 중복", body = ErrorBody),
        (status = 500, description = "서버 오류", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// 로그인.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = AuthResponse),
        (status = 400, description = "입력 오류", body = ErrorBody),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state.auth.login(request).await?;
    Ok(Json(response))
}

/// 현재 사용자 프로필.
///
/// 역할 목록은 토큰이 아닌 저장소의 현재 상태를 반영합니다.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "프로필", body = UserProfile),
        (status = 401, description = "토큰 없음 또는 무효", body = ErrorBody),
        (status = 404, description = "사용자 없음", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
) -> ApiResult<Json<UserProfile>> {
    let user_id = claims
        .user_id()
        .ok_or(ApiError(IdentityError::InvalidToken))?;

    debug!(user_id, "Profile requested");
    let profile = state.auth.profile(user_id).await?;
    Ok(Json(profile))
}

/// 역할 할당.
///
/// 이미 가진 역할은 400 `Role already assigned`입니다.
#[utoipa::path(
    post,
    path = "/api/auth/users/{id}/roles",
    params(("id" = i64, Path, description = "사용자 ID")),
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "갱신된 프로필", body = UserProfile),
        (status = 400, description = "입력 오류 또는 중복 할당", body = ErrorBody),
        (status = 401, description = "토큰 없음 또는 무효", body = ErrorBody),
        (status = 403, description = "admin 역할 없음", body = ErrorBody),
        (status = 404, description = "사용자 또는 역할 없음", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn assign_role(
    State(state): State<Arc<AppState>>,
    AdminAuth(admin): AdminAuth,
    Path(user_id): Path<UserId>,
    Json(request): Json<AssignRoleRequest>,
) -> ApiResult<Json<UserProfile>> {
    info!(admin = %admin.sub, user_id, role = %request.role, "Role assignment requested");
    let profile = state.auth.assign_role(user_id, request).await?;
    Ok(Json(profile))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/users/{id}/roles", post(assign_role))
}
