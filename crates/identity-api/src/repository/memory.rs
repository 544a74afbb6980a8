//! 인메모리 자격 증명 저장소.
//!
//! 테스트와 데이터베이스 없는 개발 모드에서 사용합니다.
//! 모든 쓰기는 하나의 쓰기 잠금 안에서 검사와 삽입을 함께 수행합니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use identity_core::{
    AuditMetadata, NewUser, Role, RoleName, User, UserId, UserRoleAssignment, UserWithRoles,
    EMAIL_ALREADY_REGISTERED, ROLE_ALREADY_ASSIGNED,
};
use tokio::sync::RwLock;

use super::{CredentialStore, StoreError, StoreResult, USER_NOT_FOUND};

#[derive(Debug)]
struct Tables {
    users: BTreeMap<UserId, User>,
    roles: Vec<Role>,
    assignments: Vec<UserRoleAssignment>,
    next_user_id: UserId,
    next_assignment_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }

    fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    fn roles_for(&self, user_id: UserId) -> Vec<String> {
        let mut role_ids: Vec<_> = self
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.role_id)
            .collect();
        role_ids.sort_unstable();

        role_ids
            .into_iter()
            .filter_map(|id| self.roles.iter().find(|r| r.id == id))
            .map(|r| r.name.clone())
            .collect()
    }

    fn insert_user(&mut self, user: NewUser) -> User {
        let id = self.next_user_id;
        self.next_user_id += 1;

        let user = user.into_user(id);
        self.users.insert(id, user.clone());
        user
    }

    fn insert_assignment(&mut self, user_id: UserId, role_id: i64) {
        let id = self.next_assignment_id;
        self.next_assignment_id += 1;

        self.assignments.push(UserRoleAssignment {
            id,
            user_id,
            role_id,
            audit: AuditMetadata::created_now(None),
        });
    }
}

/// 인메모리 자격 증명 저장소.
#[derive(Debug)]
pub struct MemoryCredentialStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCredentialStore {
    /// 시드 역할이 들어 있는 저장소를 생성합니다.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                users: BTreeMap::new(),
                roles: Role::seed(),
                assignments: Vec::new(),
                next_user_id: 1,
                next_assignment_id: 1,
            }),
        }
    }

    /// 주어진 이메일을 가진 사용자 수.
    pub async fn user_count_for_email(&self, email: &str) -> usize {
        let tables = self.tables.read().await;
        tables.users.values().filter(|u| u.email == email).count()
    }

    /// 계정 활성 상태를 변경합니다 (관리자 작업).
    pub async fn set_active(&self, user_id: UserId, is_active: bool) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound(USER_NOT_FOUND.to_string()))?;

        user.is_active = is_active;
        user.audit.touch(None);
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserWithRoles>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|user| UserWithRoles {
            user: user.clone(),
            roles: tables.roles_for(id),
        }))
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email) {
            return Err(StoreError::Conflict(EMAIL_ALREADY_REGISTERED.to_string()));
        }
        Ok(tables.insert_user(user))
    }

    async fn create_with_role(&self, user: NewUser, role: RoleName) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email) {
            return Err(StoreError::Conflict(EMAIL_ALREADY_REGISTERED.to_string()));
        }
        let role_id = tables
            .role_by_name(role.as_str())
            .map(|r| r.id)
            .ok_or_else(|| StoreError::NotFound(format!("Role not found: {}", role)))?;

        let user = tables.insert_user(user);
        tables.insert_assignment(user.id, role_id);
        Ok(user)
    }

    async fn assign_role(&self, user_id: UserId, role_name: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound(USER_NOT_FOUND.to_string()));
        }
        let role_id = tables
            .role_by_name(role_name)
            .map(|r| r.id)
            .ok_or_else(|| StoreError::NotFound(format!("Role not found: {}", role_name)))?;

        let duplicate = tables
            .assignments
            .iter()
            .any(|a| a.user_id == user_id && a.role_id == role_id);
        if duplicate {
            return Err(StoreError::Conflict(ROLE_ALREADY_ASSIGNED.to_string()));
        }

        tables.insert_assignment(user_id, role_id);
        Ok(())
    }

    async fn roles_for_user(&self, user_id: UserId) -> StoreResult<Vec<String>> {
        let tables = self.tables.read().await;
        Ok(tables.roles_for(user_id))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
