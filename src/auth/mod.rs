//! 认证与授权核心
//! 令牌编解码、密码哈希、吊销存储、认证中间件与角色策略

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod revocation;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::AuthContext;
pub use revocation::RevocationStore;
