//! Role value type.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_CUSTOMERS, ROLE_SUPPLIERS, ROLE_SYSTEM_ADMIN};

/// The fixed set of roles a user can hold. Each user holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "System Admin")]
    SystemAdmin,
    Suppliers,
    Customers,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 3] = [Role::SystemAdmin, Role::Suppliers, Role::Customers];

    /// Stored and displayed role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => ROLE_SYSTEM_ADMIN,
            Role::Suppliers => ROLE_SUPPLIERS,
            Role::Customers => ROLE_CUSTOMERS,
        }
    }

    /// All role names.
    pub fn names() -> [&'static str; 3] {
        Self::ALL.map(|role| role.as_str())
    }
}

/// Returned when a string does not name one of the fixed roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    /// Exact, case-sensitive match against the role names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}
