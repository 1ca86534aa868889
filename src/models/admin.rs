//! Admin (role approval) models

use serde::Serialize;

use super::user::User;

/// Author-role approval response
#[derive(Debug, Serialize)]
pub struct RoleApprovalResponse {
    pub login_id: String,
    pub author_name: Option<String>,
    pub roles: Vec<String>,
}

impl From<User> for RoleApprovalResponse {
    fn from(user: User) -> Self {
        Self {
            login_id: user.login_id,
            author_name: user.author_name,
            roles: user.roles,
        }
    }
}
