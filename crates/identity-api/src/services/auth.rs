//! 인증 서비스.
//!
//! 회원가입, 로그인, 프로필 조회를 저장소와 토큰 서비스 위에서 조합합니다.
//! 요청 간에 상태를 보유하지 않으며, 공유 가변 자원은 저장소뿐입니다.
//!
//! # 실패 처리
//!
//! - 저장소 호출은 `store_timeout`으로 제한되며 초과 시 `Transient`
//! - 가입 알림은 별도 태스크에서 `notifier_timeout`으로 제한되며, 실패해도 가입 결과에 영향 없음
//! - 로그인 실패는 원인과 관계없이 같은 메시지

use std::future::Future;
use std::sync::Arc;

use identity_core::{
    AssignRoleRequest, AuthResponse, AuthSettings, IdentityError, IdentityResult, LoginRequest,
    NewUser, RegisterRequest, RoleName, User, UserId, UserProfile, EMAIL_ALREADY_REGISTERED,
};
use identity_notification::{EventPublisher, UserRegistered};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::auth::{
    burn_verification, hash_password_blocking, verify_password_blocking, ClaimSet, PasswordError,
    TokenClaims, TokenService,
};
use crate::metrics::{record_login, record_notification, record_registration};
use crate::repository::{CredentialStore, StoreResult, USER_NOT_FOUND};

/// 가입 알림 발행 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    Failed,
    TimedOut,
}

impl NotificationOutcome {
    fn as_label(&self) -> &'static str {
        match self {
            NotificationOutcome::Delivered => "delivered",
            NotificationOutcome::Failed => "failed",
            NotificationOutcome::TimedOut => "timeout",
        }
    }
}

/// 메트릭 라벨용 결과 분류.
fn outcome_label<T>(result: &IdentityResult<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(IdentityError::Validation(_)) => "invalid",
        Err(IdentityError::Conflict(_)) => "conflict",
        Err(IdentityError::Authentication) => "rejected",
        Err(_) => "error",
    }
}

/// 인증 서비스.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
    publisher: Arc<dyn EventPublisher>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        tokens: Arc<TokenService>,
        publisher: Arc<dyn EventPublisher>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            store,
            tokens,
            publisher,
            settings,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// 회원가입.
    ///
    /// 사용자 생성과 기본 역할(`bagisci`) 할당은 하나의 원자적 작업입니다.
    pub async fn register(&self, request: RegisterRequest) -> IdentityResult<AuthResponse> {
        let result = self.register_inner(request).await;
        record_registration(outcome_label(&result));
        result
    }

    async fn register_inner(&self, request: RegisterRequest) -> IdentityResult<AuthResponse> {
        let request = request.normalized();
        request.validate()?;

        let existing = self
            .with_store_timeout("find_by_email", self.store.find_by_email(&request.email))
            .await?;
        if existing.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(IdentityError::Conflict(EMAIL_ALREADY_REGISTERED.to_string()));
        }

        let password_hash = hash_password_blocking(request.password)
            .await
            .map_err(|e| IdentityError::Internal(e.to_string()))?;

        let new_user = NewUser {
            email: request.email,
            password_hash,
            full_name: request.full_name,
            phone: request.phone,
        };

        // 사전 확인 이후 경쟁에서 진 경우에도 저장소 제약이 같은 Conflict를 반환
        let user = self
            .with_store_timeout(
                "create_with_role",
                self.store.create_with_role(new_user, RoleName::DEFAULT),
            )
            .await?;

        let roles = self
            .with_store_timeout("roles_for_user", self.store.roles_for_user(user.id))
            .await?;
        let token = self.issue_token(&user, &roles)?;

        info!(user_id = user.id, roles = ?roles, "User registered");
        // 발행 태스크는 분리됨
        let _ = self.notify_registered(&user);

        Ok(AuthResponse {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            token,
            roles,
        })
    }

    /// 로그인.
    ///
    /// 계정 없음, 비활성 계정, 비밀번호 불일치는 모두 같은 `Authentication` 에러입니다.
    pub async fn login(&self, request: LoginRequest) -> IdentityResult<AuthResponse> {
        let result = self.login_inner(request).await;
        record_login(outcome_label(&result));
        result
    }

    async fn login_inner(&self, request: LoginRequest) -> IdentityResult<AuthResponse> {
        request.validate()?;
        let LoginRequest { email, password } = request;

        let user = self
            .with_store_timeout("find_by_email", self.store.find_by_email(email.trim()))
            .await?;

        let user = match user {
            Some(user) if user.is_active => user,
            Some(user) => {
                burn_verification(password).await;
                debug!(user_id = user.id, "Login rejected: inactive account");
                return Err(IdentityError::Authentication);
            }
            None => {
                burn_verification(password).await;
                debug!("Login rejected: unknown email");
                return Err(IdentityError::Authentication);
            }
        };

        verify_password_blocking(password, user.password_hash.clone())
            .await
            .map_err(|e| match e {
                PasswordError::VerificationFailed => {
                    debug!(user_id = user.id, "Login rejected: wrong password");
                    IdentityError::Authentication
                }
                other => {
                    error!(user_id = user.id, error = %other, "Stored password hash unusable");
                    IdentityError::Internal(other.to_string())
                }
            })?;

        let roles = self
            .with_store_timeout("roles_for_user", self.store.roles_for_user(user.id))
            .await?;
        let token = self.issue_token(&user, &roles)?;

        info!(user_id = user.id, "User logged in");

        Ok(AuthResponse {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            token,
            roles,
        })
    }

    /// 프로필 조회.
    ///
    /// 신원은 호출 전에 토큰 검증으로 확인되어 있어야 합니다.
    pub async fn profile(&self, user_id: UserId) -> IdentityResult<UserProfile> {
        self.with_store_timeout("find_by_id", self.store.find_by_id(user_id))
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| IdentityError::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// 사용자에게 역할을 추가로 할당합니다.
    ///
    /// 알 수 없는 역할 이름은 저장소 호출 없이 `NotFound`입니다.
    /// 갱신된 프로필을 반환합니다.
    pub async fn assign_role(
        &self,
        user_id: UserId,
        request: AssignRoleRequest,
    ) -> IdentityResult<UserProfile> {
        request.validate()?;
        let role = RoleName::parse(&request.role).ok_or_else(|| {
            IdentityError::NotFound(format!("Role not found: {}", request.role.trim()))
        })?;

        self.with_store_timeout("assign_role", self.store.assign_role(user_id, role.as_str()))
            .await?;
        info!(user_id, role = %role, "Role assigned");

        self.profile(user_id).await
    }

    /// Bearer 토큰을 검증합니다.
    pub fn authenticate(&self, token: &str) -> IdentityResult<TokenClaims> {
        self.tokens
            .verify(token)
            .map_err(|_| IdentityError::InvalidToken)
    }

    /// 가입 이벤트를 별도 태스크에서 발행합니다.
    ///
    /// 결과는 로그와 메트릭으로만 남습니다. 재시도하지 않습니다.
    pub fn notify_registered(&self, user: &User) -> JoinHandle<NotificationOutcome> {
        let publisher = Arc::clone(&self.publisher);
        let timeout = self.settings.notifier_timeout();
        let event = UserRegistered::new(user.id, &user.email, &user.full_name);

        tokio::spawn(async move {
            let outcome =
                match tokio::time::timeout(timeout, publisher.publish_registered(&event)).await {
                    Ok(Ok(())) => {
                        debug!(
                            user_id = event.user_id,
                            publisher = publisher.name(),
                            "Registration event published"
                        );
                        NotificationOutcome::Delivered
                    }
                    Ok(Err(e)) => {
                        error!(
                            user_id = event.user_id,
                            publisher = publisher.name(),
                            error = %e,
                            "Failed to publish registration event"
                        );
                        NotificationOutcome::Failed
                    }
                    Err(_) => {
                        warn!(
                            user_id = event.user_id,
                            publisher = publisher.name(),
                            timeout_ms = timeout.as_millis() as u64,
                            "Registration event publish timed out"
                        );
                        NotificationOutcome::TimedOut
                    }
                };

            record_notification(outcome.as_label());
            outcome
        })
    }

    fn issue_token(&self, user: &User, roles: &[String]) -> IdentityResult<String> {
        let claims = ClaimSet {
            user_id: user.id,
            email: user.email.clone(),
            name: user.full_name.clone(),
            roles: roles.to_vec(),
        };

        self.tokens
            .issue(&claims)
            .map(|issued| issued.token)
            .map_err(|e| {
                error!(user_id = user.id, error = %e, "Token issuance failed");
                IdentityError::Internal(e.to_string())
            })
    }

    async fn with_store_timeout<T, F>(&self, operation: &'static str, fut: F) -> IdentityResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match tokio::time::timeout(self.settings.store_timeout(), fut).await {
            Ok(result) => result.map_err(IdentityError::from),
            Err(_) => {
                warn!(operation, "Credential store call timed out");
                Err(IdentityError::Transient(format!(
                    "credential store {} timed out",
                    operation
                )))
            }
        }
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .field("publisher", &self.publisher.name())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
