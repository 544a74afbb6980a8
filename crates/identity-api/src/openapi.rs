//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! 스펙은 `/api-docs/openapi.json` 경로로 제공됩니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use identity_core::{AssignRoleRequest, AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::routes::{ComponentHealth, ComponentState, ComponentStatus, HealthResponse, ServiceStatus};

/// Identity API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Identity API",
        description = r#"
# 인증 서비스 REST API

회원가입, 로그인, 프로필 조회를 위한 REST API입니다.

## 인증

`/api/auth/me`는 JWT Bearer 토큰 인증이 필요합니다.
`/api/auth/users/{id}/roles`는 `admin` 역할이 있는 토큰이 필요합니다.
`Authorization: Bearer <token>` 헤더를 포함하세요.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5001", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 회원가입, 로그인, 프로필")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ServiceStatus,
            ComponentHealth,
            ComponentStatus,
            ComponentState,

            // ===== Common =====
            ErrorBody,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            AssignRoleRequest,
            AuthResponse,
            UserProfile,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::assign_role,
    )
)]
pub struct ApiDoc;
