//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::{User, UserResponse};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 4, max = 32, message = "登录 ID 长度必须在 4 到 32 之间"))]
    pub login_id: String,
    pub password: String,
    #[validate(length(min = 1, max = 64, message = "姓名不能为空"))]
    pub realname: String,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    /// 作者笔名，可在注册时预留
    pub author_name: Option<String>,
}

/// Signin request
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub login_id: String,
    pub password: String,
}

/// Signup/signin response: user info plus a freshly issued token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_in: u64,
}

impl AuthResponse {
    pub fn from_user(user: User, token: String, expires_in: u64) -> Self {
        Self {
            user: UserResponse::from(user),
            token,
            expires_in,
        }
    }
}
