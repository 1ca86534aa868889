//! 认证服务：注册、登录、登出

use std::sync::Arc;

use crate::{
    auth::jwt::JwtService,
    auth::password::PasswordHasher,
    auth::revocation::{RevocationStore, SIGNOUT_MARKER},
    error::AppError,
    models::auth::{AuthResponse, SignInRequest, SignUpRequest},
    models::user::{NewUser, Role},
    repository::IdentityDirectory,
};

pub struct AuthService {
    directory: Arc<dyn IdentityDirectory>,
    jwt_service: Arc<JwtService>,
    revocation_store: Arc<dyn RevocationStore>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(
        directory: Arc<dyn IdentityDirectory>,
        jwt_service: Arc<JwtService>,
        revocation_store: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            directory,
            jwt_service,
            revocation_store,
            hasher: PasswordHasher::new(),
        }
    }

    /// 用户注册
    ///
    /// 两项唯一性检查都在哈希与落库之前完成：重复时调用方拿到的是
    /// 具体的冲突种类，而失败路径上不产生任何副作用。注册成功后
    /// 直接签发令牌（自动登录）。
    pub async fn signup(&self, req: SignUpRequest) -> Result<AuthResponse, AppError> {
        tracing::info!(login_id = %req.login_id, "Signup requested");

        if self.directory.exists_by_login_id(&req.login_id).await? {
            tracing::warn!(login_id = %req.login_id, "Signup rejected: duplicate login id");
            return Err(AppError::DuplicateLoginId);
        }

        if self.directory.exists_by_email(&req.email).await? {
            tracing::warn!(login_id = %req.login_id, "Signup rejected: duplicate email");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user = self
            .directory
            .save(NewUser {
                login_id: req.login_id,
                password_hash,
                realname: req.realname,
                email: req.email,
                author_name: req.author_name,
                roles: vec![Role::User.as_str().to_string()],
            })
            .await?;

        tracing::info!(login_id = %user.login_id, "User registered");

        let token = self.jwt_service.issue(&user.login_id, &user.role_set())?;

        Ok(AuthResponse::from_user(
            user,
            token,
            self.jwt_service.validity_secs(),
        ))
    }

    /// 用户登录
    ///
    /// 账号不存在与密码错误返回同一种错误，避免暴露账号是否注册。
    pub async fn signin(&self, req: SignInRequest) -> Result<AuthResponse, AppError> {
        tracing::info!(login_id = %req.login_id, "Signin requested");

        let user = self
            .directory
            .find_by_login_id(&req.login_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(login_id = %req.login_id, "Signin failed: unknown login id");
                AppError::InvalidCredentials
            })?;

        if !self.hasher.matches(&req.password, &user.password_hash)? {
            tracing::warn!(login_id = %req.login_id, "Signin failed: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.jwt_service.issue(&user.login_id, &user.role_set())?;

        tracing::info!(login_id = %user.login_id, "Signin succeeded");

        Ok(AuthResponse::from_user(
            user,
            token,
            self.jwt_service.validity_secs(),
        ))
    }

    /// 用户登出
    ///
    /// 以令牌剩余有效期作为 TTL 写入吊销表；剩余有效期非正说明令牌
    /// 已自然过期，无需记录。重复登出是幂等的空操作。伪造或无法解析
    /// 的令牌不属于"可退役"的凭据，按认证失败处理。
    pub async fn signout(&self, token: &str) -> Result<(), AppError> {
        let remaining = self.jwt_service.remaining_validity(token).map_err(|e| {
            tracing::warn!(error = %e, "Signout with unverifiable token");
            AppError::Unauthorized
        })?;

        if remaining > chrono::Duration::zero() {
            self.revocation_store
                .revoke(token, SIGNOUT_MARKER, remaining)
                .await?;
            tracing::info!(ttl_secs = remaining.num_seconds(), "Token revoked");
        } else {
            tracing::debug!("Signout with already-expired token, nothing to revoke");
        }

        Ok(())
    }
}
