//! 管理处理器：作者角色审批

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
    models::admin::RoleApprovalResponse,
    models::user::Role,
};

/// 审批作者角色
/// POST /admin/users/{login_id}/approve-author
pub async fn approve_author(
    ctx: AuthContext,
    State(state): State<Arc<AppState>>,
    Path(login_id): Path<String>,
) -> Result<Json<RoleApprovalResponse>, AppError> {
    policy::require_role(Some(&ctx), Role::Admin)?;

    let response = state.admin_service.approve_author_role(&login_id).await?;

    Ok(Json(response))
}
