//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("User not found")]
    UserNotFound,

    #[error("Login id already in use")]
    DuplicateLoginId,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Role already granted")]
    AlreadyHasRole,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateLoginId | AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::AlreadyHasRole | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取稳定的错误码字符串（客户端据此分支，而非 message）
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized => "INVALID_TOKEN",
            AppError::Forbidden => "NO_PERMISSION",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::DuplicateLoginId => "DUPLICATE_LOGIN_ID",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::AlreadyHasRole => "ALREADY_HAS_ROLE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "用户名或密码错误".to_string(),
            AppError::Unauthorized => "认证失败，请重新登录".to_string(),
            AppError::Forbidden => "没有执行该操作的权限".to_string(),
            AppError::UserNotFound => "用户不存在".to_string(),
            AppError::DuplicateLoginId => "该登录 ID 已被使用".to_string(),
            AppError::DuplicateEmail => "该邮箱已被注册".to_string(),
            AppError::AlreadyHasRole => "已拥有该权限".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Database(_) => "数据库操作失败".to_string(),
            AppError::Config(_) => "配置错误".to_string(),
            AppError::Internal => "服务器内部错误".to_string(),
        }
    }
}

/// 错误响应 DTO
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub status: u16,
    pub message: String,
    pub request_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                status: status.as_u16(),
                message: self.user_message(),
                request_id,
            },
        };

        // 记录错误日志（5xx 为 error，其余为 warn）
        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Application error"
            );
        } else {
            tracing::warn!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

/// 从 String 转换为 AppError::Config
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Config(s)
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}
