use serde::Serialize;
use sqlx::FromRow;

use crate::types::{Principal, Role};

/// Row of the `users` table. Holds the stored password, so it is never
/// serialized directly; responses go through [`UserView`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub login: String,
    pub password: String,
    pub role: String,
}

impl User {
    pub fn role(&self) -> Role {
        Role::normalize(&self.role)
    }

    /// Exact text comparison. Passwords are stored as entered.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    pub fn into_principal(self) -> Principal {
        let role = self.role();
        Principal {
            id: self.id,
            name: self.name,
            login: self.login,
            role,
        }
    }
}

/// Client-facing projection of a user account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub login: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        let role = user.role();
        Self {
            id: user.id,
            name: user.name,
            login: user.login,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User {
            id: 7,
            name: "Иванова Анна".to_string(),
            login: "ivanova".to_string(),
            password: "secret".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn view_never_contains_password() {
        let json = serde_json::to_value(UserView::from(user("admin"))).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn unknown_stored_role_reads_as_user() {
        assert_eq!(user("legacy").role(), Role::User);
        assert_eq!(user("no_access").into_principal().role, Role::NoAccess);
    }

    #[test]
    fn password_comparison_is_exact() {
        let u = user("user");
        assert!(u.password_matches("secret"));
        assert!(!u.password_matches("secret "));
        assert!(!u.password_matches("SECRET"));
    }
}
