//! 数据访问层
//!
//! IdentityDirectory 是用户目录的边界契约；默认实现走 PostgreSQL，
//! 测试可以用内存目录替换。

pub mod user_repo;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::user::{NewUser, Role, User},
};

/// 用户目录契约（外部协作方，单次原子读写）
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// 按登录 ID 查找用户
    async fn find_by_login_id(&self, login_id: &str) -> Result<Option<User>, AppError>;

    /// 登录 ID 是否已被占用
    async fn exists_by_login_id(&self, login_id: &str) -> Result<bool, AppError>;

    /// 邮箱是否已被注册
    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;

    /// 持久化新用户
    async fn save(&self, new_user: NewUser) -> Result<User, AppError>;

    /// 为用户追加角色（角色只增不减）
    async fn add_role(&self, login_id: &str, role: Role) -> Result<User, AppError>;

    /// 就绪探针用的连通性检查
    async fn ping(&self) -> Result<(), AppError>;
}

pub use user_repo::UserRepository;
