//! PostgreSQL 자격 증명 저장소.
//!
//! 스키마는 `migrations/0001_identity_schema.sql`을 따릅니다.
//! 유일성 위반(23505)은 제약 이름으로 구분해 `Conflict`로 변환합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use identity_core::{
    AuditMetadata, NewUser, Role, RoleName, User, UserId, UserWithRoles,
    EMAIL_ALREADY_REGISTERED, ROLE_ALREADY_ASSIGNED,
};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use super::{CredentialStore, StoreError, StoreResult, USER_NOT_FOUND};

/// 사용자-역할 쌍 유일성 제약 이름.
const USER_ROLE_UNIQUE: &str = "uq_user_roles_user_role";

const USER_COLUMNS: &str = "id, email, password_hash, full_name, phone, is_active, \
                            created_at, created_by, updated_at, updated_by";

/// users 테이블 레코드.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    full_name: String,
    phone: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    created_by: Option<i64>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            full_name: row.full_name,
            phone: row.phone,
            is_active: row.is_active,
            audit: AuditMetadata {
                created_at: row.created_at,
                created_by: row.created_by,
                updated_at: row.updated_at,
                updated_by: row.updated_by,
            },
        }
    }
}

/// 데이터베이스 제약 위반 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    Unique,
    ForeignKey,
    Other,
}

/// 제약 위반을 저장소 에러로 분류합니다.
///
/// 사용자-역할 쌍 제약만 역할 중복이고, 나머지 유일성 위반은 이메일 중복입니다.
/// 외래 키 위반은 참조한 사용자가 없다는 뜻입니다.
fn classify_violation(violation: Violation, constraint: Option<&str>) -> Option<StoreError> {
    match violation {
        Violation::Unique if constraint == Some(USER_ROLE_UNIQUE) => {
            Some(StoreError::Conflict(ROLE_ALREADY_ASSIGNED.to_string()))
        }
        Violation::Unique => Some(StoreError::Conflict(EMAIL_ALREADY_REGISTERED.to_string())),
        Violation::ForeignKey => Some(StoreError::NotFound(USER_NOT_FOUND.to_string())),
        Violation::Other => None,
    }
}

/// sqlx 에러를 저장소 에러로 변환합니다.
fn map_db_error(e: sqlx::Error) -> StoreError {
    let classified = e.as_database_error().and_then(|db_err| {
        let violation = if db_err.is_unique_violation() {
            Violation::Unique
        } else if db_err.is_foreign_key_violation() {
            Violation::ForeignKey
        } else {
            Violation::Other
        };
        classify_violation(violation, db_err.constraint())
    });

    classified.unwrap_or_else(|| StoreError::Unavailable(e.to_string()))
}

/// PostgreSQL 자격 증명 저장소.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 시드 역할을 삽입합니다. 이미 있으면 건너뜁니다.
    pub async fn seed_roles(&self) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut inserted = 0;

        for role in Role::seed() {
            let result = sqlx::query(
                r#"
                INSERT INTO roles (name, description, created_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(&role.name)
            .bind(&role.description)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(map_db_error)?;

        info!(inserted, "Seed roles ensured");
        Ok(inserted)
    }

    async fn fetch_roles(&self, user_id: UserId) -> StoreResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserWithRoles>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match row {
            Some(row) => {
                let roles = self.fetch_roles(id).await?;
                Ok(Some(UserWithRoles {
                    user: row.into(),
                    roles,
                }))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, password_hash, full_name, phone, is_active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    async fn create_with_role(&self, user: NewUser, role: RoleName) -> StoreResult<User> {
        // 트랜잭션은 커밋 전에 drop되면 롤백됩니다.
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, password_hash, full_name, phone, is_active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let assigned = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id, created_at)
            SELECT $1, id, NOW() FROM roles WHERE name = $2
            "#,
        )
        .bind(row.id)
        .bind(role.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if assigned.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Role not found: {}", role)));
        }

        tx.commit().await.map_err(map_db_error)?;

        debug!(user_id = row.id, role = %role, "User created with role");
        Ok(row.into())
    }

    async fn assign_role(&self, user_id: UserId, role_name: &str) -> StoreResult<()> {
        let assigned = sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id, created_at)
            SELECT $1, id, NOW() FROM roles WHERE name = $2
            "#,
        )
        .bind(user_id)
        .bind(role_name)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if assigned.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Role not found: {}", role_name)));
        }
        Ok(())
    }

    async fn roles_for_user(&self, user_id: UserId) -> StoreResult<Vec<String>> {
        self.fetch_roles(user_id).await
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_unavailable() {
        assert!(matches!(
            map_db_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_db_error(sqlx::Error::RowNotFound),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn test_unique_violation_by_constraint_name() {
        assert!(matches!(
            classify_violation(Violation::Unique, Some("uq_user_roles_user_role")),
            Some(StoreError::Conflict(ref msg)) if msg == ROLE_ALREADY_ASSIGNED
        ));
        assert!(matches!(
            classify_violation(Violation::Unique, Some("uq_users_email")),
            Some(StoreError::Conflict(ref msg)) if msg == EMAIL_ALREADY_REGISTERED
        ));
        // 제약 이름을 알 수 없으면 이메일 중복으로 취급
        assert!(matches!(
            classify_violation(Violation::Unique, None),
            Some(StoreError::Conflict(ref msg)) if msg == EMAIL_ALREADY_REGISTERED
        ));
    }

    #[test]
    fn test_foreign_key_violation_is_user_not_found() {
        assert!(matches!(
            classify_violation(Violation::ForeignKey, Some("user_roles_user_id_fkey")),
            Some(StoreError::NotFound(ref msg)) if msg == USER_NOT_FOUND
        ));
        assert!(classify_violation(Violation::Other, Some("uq_users_email")).is_none());
    }

    #[test]
    fn test_user_row_conversion() {
        let now = Utc::now();
        let user: User = UserRow {
            id: 5,
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            full_name: "A B".to_string(),
            phone: None,
            is_active: false,
            created_at: now,
            created_by: None,
            updated_at: Some(now),
            updated_by: Some(1),
        }
        .into();

        assert_eq!(user.id, 5);
        assert!(!user.is_active);
        assert_eq!(user.audit.updated_by, Some(1));
    }
}
