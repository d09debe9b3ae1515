//! Account roles and their landing pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role attached to every login account.
///
/// Wire names match the stored codes: `Admin`, `IT`, `Manager`, `Employee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Full access including user management and maintenance approval.
    Admin,
    /// Inventory maintenance.
    #[serde(rename = "IT")]
    It,
    /// Read access plus reports and notifications.
    Manager,
    /// Own assets only.
    #[default]
    Employee,
}

/// Raised when a role code is not one of the four known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role")]
pub struct RoleParseError {
    /// The rejected input.
    pub raw: String,
}

impl Role {
    /// Every role, in privilege order.
    pub const ALL: [Self; 4] = [Self::Admin, Self::It, Self::Manager, Self::Employee];

    /// Roles whose members receive notification copies and act as sender.
    pub const STAFF: [Self; 2] = [Self::Admin, Self::It];

    /// Stored code for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::It => "IT",
            Self::Manager => "Manager",
            Self::Employee => "Employee",
        }
    }

    /// Path of the dashboard a user with this role lands on.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::It => "/it/dashboard",
            Self::Manager => "/manager/dashboard",
            Self::Employee => "/employee/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleParseError { raw: s.to_owned() })
    }
}
