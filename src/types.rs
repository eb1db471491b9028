/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Access level of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
    NoAccess,
}

impl Role {
    /// Maps free text onto a role. Unknown values fall back to `User`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim() {
            "admin" => Role::Admin,
            "no_access" => Role::NoAccess,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::NoAccess => "no_access",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated identity as exposed to clients and held by sessions.
/// Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i32,
    pub name: String,
    pub login: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_roles() {
        assert_eq!(Role::normalize("admin"), Role::Admin);
        assert_eq!(Role::normalize(" no_access "), Role::NoAccess);
        assert_eq!(Role::normalize("user"), Role::User);
        assert_eq!(Role::normalize("superuser"), Role::User);
        assert_eq!(Role::normalize(""), Role::User);
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::NoAccess).unwrap(), "\"no_access\"");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
