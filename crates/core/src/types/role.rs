//! Display roles and the capabilities they grant.
//!
//! The role is a plain string handed back by the user API at login. It gates
//! which screens are shown; it is not a security boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role string that unlocks the management screens.
pub const ADMIN_ROLE: &str = "admin";

/// A visitor's role as stored in the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Exactly `"admin"`.
    Admin,
    /// Any other value, kept verbatim.
    Other(String),
}

/// Something a role may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create, edit and delete products and orders.
    ManageStore,
}

impl Role {
    /// Whether this role grants `capability`.
    #[must_use]
    pub const fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageStore => matches!(self, Self::Admin),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => ADMIN_ROLE,
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == ADMIN_ROLE {
            Self::Admin
        } else {
            Self::Other(value)
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => ADMIN_ROLE.to_string(),
            Role::Other(s) => s,
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_admin_grants_manage() {
        assert!(Role::from("admin".to_string()).grants(Capability::ManageStore));
        assert!(!Role::from("Admin".to_string()).grants(Capability::ManageStore));
        assert!(!Role::from(" admin".to_string()).grants(Capability::ManageStore));
        assert!(!Role::from("cliente".to_string()).grants(Capability::ManageStore));
        assert!(!Role::from(String::new()).grants(Capability::ManageStore));
    }

    #[test]
    fn test_role_round_trips_as_plain_string() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let role: Role = serde_json::from_str("\"cliente\"").unwrap();
        assert_eq!(role, Role::Other("cliente".to_string()));
        assert_eq!(role.to_string(), "cliente");
    }
}
