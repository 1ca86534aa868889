//! 认证处理器：注册、登录、登出、当前用户

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::{
    auth::middleware::{extract_token, AuthContext},
    auth::password::PasswordHasher,
    error::AppError,
    middleware::AppState,
    models::auth::{AuthResponse, SignInRequest, SignUpRequest},
    models::user::Role,
};

/// 登出响应
#[derive(Serialize)]
pub struct SignOutResponse {
    pub message: String,
}

/// 当前用户信息（取自令牌，不回源数据库）
#[derive(Serialize)]
pub struct MeResponse {
    pub login_id: String,
    pub roles: Vec<Role>,
}

/// 用户注册
/// POST /auth/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    PasswordHasher::validate_password_policy(&payload.password, &state.config)?;

    let response = state.auth_service.signup(payload).await?;

    Ok(Json(response))
}

/// 用户登录
/// POST /auth/signin
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = state.auth_service.signin(payload).await?;

    Ok(Json(response))
}

/// 用户登出
/// POST /auth/signout
///
/// 没有携带令牌的登出请求没有可退役的凭据，直接按未认证拒绝。
pub async fn signout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SignOutResponse>, AppError> {
    let token = extract_token(&headers).ok_or(AppError::Unauthorized)?;

    state.auth_service.signout(&token).await?;

    Ok(Json(SignOutResponse {
        message: "已成功登出".to_string(),
    }))
}

/// 当前登录用户
/// GET /auth/me
pub async fn me(ctx: AuthContext) -> Json<MeResponse> {
    Json(MeResponse {
        login_id: ctx.login_id,
        roles: ctx.roles,
    })
}
