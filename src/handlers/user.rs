//! 用户资料处理器

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    auth::middleware::AuthContext,
    auth::policy,
    error::AppError,
    middleware::AppState,
    models::user::{Role, UserResponse},
};

/// 查询用户资料
/// GET /users/{login_id}
///
/// 仅本人或管理员可见。
pub async fn get_user(
    ctx: AuthContext,
    State(state): State<Arc<AppState>>,
    Path(login_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    policy::require_owner_or_role(Some(&ctx), &login_id, Role::Admin)?;

    let user = state
        .directory
        .find_by_login_id(&login_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(UserResponse::from(user)))
}
