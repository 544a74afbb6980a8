//! 역할 및 사용자-역할 할당.
//!
//! 역할은 시스템 부트스트랩 시 시드되는 고정 참조 데이터입니다.

use serde::{Deserialize, Serialize};

use super::{AuditMetadata, UserId};

/// 역할 ID.
pub type RoleId = i64;

/// 시드 역할 이름.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    /// 시스템 관리자
    Admin,
    /// 반려동물 돌보미
    PatiBakici,
    /// 후원자 - 자체 가입 사용자의 기본 역할
    Bagisci,
}

impl RoleName {
    /// 자체 가입 사용자에게 자동으로 부여되는 역할.
    pub const DEFAULT: RoleName = RoleName::Bagisci;

    /// 시드 순서대로 모든 역할.
    pub const ALL: [RoleName; 3] = [RoleName::Admin, RoleName::PatiBakici, RoleName::Bagisci];

    /// 저장소와 토큰에서 사용하는 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::PatiBakici => "pati_bakici",
            RoleName::Bagisci => "bagisci",
        }
    }

    /// 시드 데이터의 역할 설명.
    pub fn description(&self) -> &'static str {
        match self {
            RoleName::Admin => "System Administrator",
            RoleName::PatiBakici => "Pati Bakıcısı",
            RoleName::Bagisci => "Bağışçı",
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(RoleName::Admin),
            "pati_bakici" => Some(RoleName::PatiBakici),
            "bagisci" => Some(RoleName::Bagisci),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 역할 레코드.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    /// 유일한 역할 이름
    pub name: String,
    pub description: String,
    pub audit: AuditMetadata,
}

impl Role {
    /// 시드 역할 목록 (ID는 1부터 시드 순서대로).
    pub fn seed() -> Vec<Role> {
        RoleName::ALL
            .iter()
            .zip(1..)
            .map(|(name, id)| Role {
                id,
                name: name.as_str().to_string(),
                description: name.description().to_string(),
                audit: AuditMetadata::created_now(None),
            })
            .collect()
    }
}

/// 사용자-역할 할당 (user_id, role_id 쌍은 유일).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleAssignment {
    pub id: i64,
    pub user_id: UserId,
    pub role_id: RoleId,
    pub audit: AuditMetadata,
}
