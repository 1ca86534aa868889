//! 管理服务：作者权限审批

use std::sync::Arc;

use crate::{
    error::AppError,
    models::admin::RoleApprovalResponse,
    models::user::Role,
    repository::IdentityDirectory,
};

pub struct AdminService {
    directory: Arc<dyn IdentityDirectory>,
}

impl AdminService {
    pub fn new(directory: Arc<dyn IdentityDirectory>) -> Self {
        Self { directory }
    }

    /// 为指定用户追加 AUTHOR 角色
    ///
    /// 用户不存在与重复授权是两种不同的失败，调用方需要分别提示。
    /// 角色只增不减：审批通过后用户在下次签发的令牌中携带新角色。
    pub async fn approve_author_role(
        &self,
        login_id: &str,
    ) -> Result<RoleApprovalResponse, AppError> {
        tracing::debug!(login_id = %login_id, "Author role approval requested");

        let user = self
            .directory
            .find_by_login_id(login_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(login_id = %login_id, "Approval failed: unknown user");
                AppError::UserNotFound
            })?;

        if user.has_role(Role::Author) {
            tracing::warn!(login_id = %login_id, "Approval failed: role already granted");
            return Err(AppError::AlreadyHasRole);
        }

        let updated = self.directory.add_role(login_id, Role::Author).await?;

        tracing::info!(
            login_id = %updated.login_id,
            roles = ?updated.roles,
            "Author role granted"
        );

        Ok(RoleApprovalResponse::from(updated))
    }
}
