//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed role set. Every account holds `User` from signup on;
/// `Author` is appended by admin approval; `Admin` is provisioned
/// out of band. Roles are append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Author,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Author => "AUTHOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "AUTHOR" => Ok(Role::Author),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User account
///
/// Roles are stored as a `TEXT[]` column; unknown strings are ignored when
/// converting to [`Role`], so a rolled-back deploy cannot lock parsing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub login_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub realname: String,
    pub email: String,
    /// 作者笔名（获得 AUTHOR 权限后展示用）
    pub author_name: Option<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Parsed role set, skipping anything this build does not know.
    pub fn role_set(&self) -> Vec<Role> {
        self.roles
            .iter()
            .filter_map(|r| r.parse::<Role>().ok())
            .collect()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }
}

/// Insert payload for a new account (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login_id: String,
    pub password_hash: String,
    pub realname: String,
    pub email: String,
    pub author_name: Option<String>,
    pub roles: Vec<String>,
}

/// User response DTO (never exposes the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub login_id: String,
    pub realname: String,
    pub email: String,
    pub author_name: Option<String>,
    pub roles: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            login_id: user.login_id,
            realname: user.realname,
            email: user.email,
            author_name: user.author_name,
            roles: user.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user(roles: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            login_id: "alice".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            realname: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            author_name: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Author, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("ROLE_USER".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_set_skips_unknown() {
        let user = sample_user(&["USER", "EDITOR", "ADMIN"]);
        assert_eq!(user.role_set(), vec![Role::User, Role::Admin]);
    }

    #[test]
    fn test_has_role() {
        let user = sample_user(&["USER", "AUTHOR"]);
        assert!(user.has_role(Role::Author));
        assert!(!user.has_role(Role::Admin));
    }
}
