//! 业务服务层

pub mod admin_service;
pub mod auth_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
