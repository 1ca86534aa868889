//! 领域模型与 DTO

pub mod admin;
pub mod auth;
pub mod user;
