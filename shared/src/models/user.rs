//! Caller identity and roles

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an authenticated user within an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Manager,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Manager => "MANAGER",
            UserRole::User => "USER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(UserRole::Admin),
            "MANAGER" => Some(UserRole::Manager),
            "USER" => Some(UserRole::User),
            _ => None,
        }
    }
}

/// Who is calling into the ledger. Resolved by the transport layer before any
/// service is invoked; every operation is scoped to `organization_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: UserRole,
}

impl CallerIdentity {
    pub fn new(user_id: Uuid, organization_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            organization_id,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
