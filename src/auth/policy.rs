//! 角色与属主授权策略
//!
//! 纯函数检查，无副作用；必须在认证关卡之后、受保护操作之前求值。
//! 空上下文与角色缺失统一拒绝为 Forbidden。

use crate::{auth::middleware::AuthContext, error::AppError, models::user::Role};

/// 要求上下文持有指定角色
pub fn require_role(ctx: Option<&AuthContext>, role: Role) -> Result<(), AppError> {
    let ctx = ctx.ok_or_else(|| denied(None, &[role]))?;

    if ctx.has_role(role) {
        Ok(())
    } else {
        Err(denied(Some(ctx), &[role]))
    }
}

/// 要求上下文持有任一指定角色
pub fn require_any_role(ctx: Option<&AuthContext>, roles: &[Role]) -> Result<(), AppError> {
    let ctx = ctx.ok_or_else(|| denied(None, roles))?;

    if roles.iter().any(|r| ctx.has_role(*r)) {
        Ok(())
    } else {
        Err(denied(Some(ctx), roles))
    }
}

/// 要求上下文是资源属主，或持有指定角色（如"作者本人或管理员"）
pub fn require_owner_or_role(
    ctx: Option<&AuthContext>,
    owner_login_id: &str,
    role: Role,
) -> Result<(), AppError> {
    let ctx = ctx.ok_or_else(|| denied(None, &[role]))?;

    if ctx.login_id == owner_login_id || ctx.has_role(role) {
        Ok(())
    } else {
        Err(denied(Some(ctx), &[role]))
    }
}

fn denied(ctx: Option<&AuthContext>, required: &[Role]) -> AppError {
    tracing::warn!(
        login_id = ctx.map(|c| c.login_id.as_str()).unwrap_or("<anonymous>"),
        required = ?required,
        "Permission denied"
    );
    AppError::Forbidden
}
