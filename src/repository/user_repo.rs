//! User repository (数据库访问层)

use async_trait::async_trait;
use sqlx::PgPool;

use super::IdentityDirectory;
use crate::{
    error::AppError,
    models::user::{NewUser, Role, User},
};

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityDirectory for UserRepository {
    /// 根据登录 ID 查找用户
    async fn find_by_login_id(&self, login_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE login_id = $1"
        )
        .bind(login_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 登录 ID 是否已被占用
    async fn exists_by_login_id(&self, login_id: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE login_id = $1)"
        )
        .bind(login_id)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    /// 邮箱是否已被注册
    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"
        )
        .bind(email)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    /// 持久化新用户
    async fn save(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login_id, password_hash, realname, email, author_name, roles)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        )
        .bind(&new_user.login_id)
        .bind(&new_user.password_hash)
        .bind(&new_user.realname)
        .bind(&new_user.email)
        .bind(&new_user.author_name)
        .bind(&new_user.roles)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    /// 为用户追加角色
    async fn add_role(&self, login_id: &str, role: Role) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                roles = array_append(roles, $2),
                updated_at = NOW()
            WHERE login_id = $1
            RETURNING *
            "#
        )
        .bind(login_id)
        .bind(role.as_str())
        .fetch_optional(&self.db)
        .await?;

        user.ok_or(AppError::UserNotFound)
    }

    /// 连通性检查
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
