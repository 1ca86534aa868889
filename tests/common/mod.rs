//! 集成测试公共工具
//!
//! MockDirectory 实现 IdentityDirectory 并记录调用日志，
//! 让测试可以断言"失败路径上没有副作用"这类性质。

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use secrecy::Secret;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use novel_system::{
    auth::password::PasswordHasher,
    auth::revocation::InMemoryRevocationStore,
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    error::AppError,
    middleware::AppState,
    models::user::{NewUser, Role, User},
    repository::IdentityDirectory,
    routes,
};

pub const TEST_SECRET: &str = "test_secret_key_32_characters_long!";

/// 构造测试配置（不读环境变量）
pub fn test_config() -> AppConfig {
    test_config_with_secret(TEST_SECRET)
}

pub fn test_config_with_secret(secret: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:3000".to_string(),
            graceful_shutdown_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: Secret::new("postgresql://localhost/test".to_string()),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(secret.to_string()),
            token_validity_secs: 3600,
            password_min_length: 8,
            trust_proxy: false,
        },
    }
}

/// 内存用户目录，带调用日志
#[derive(Default)]
pub struct MockDirectory {
    users: Mutex<Vec<User>>,
    calls: Mutex<Vec<String>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一个用户，密码以 Argon2 真实哈希
    pub fn with_user(self, login_id: &str, password: &str, roles: &[Role]) -> Self {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash(password).unwrap();

        self.users.lock().unwrap().push(User {
            id: Uuid::new_v4(),
            login_id: login_id.to_string(),
            password_hash: hash,
            realname: format!("{login_id} 测试用户"),
            email: format!("{login_id}@example.com"),
            author_name: None,
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        self
    }

    /// 目前记录过的调用名
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl IdentityDirectory for MockDirectory {
    async fn find_by_login_id(&self, login_id: &str) -> Result<Option<User>, AppError> {
        self.record("find_by_login_id");
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.login_id == login_id)
            .cloned())
    }

    async fn exists_by_login_id(&self, login_id: &str) -> Result<bool, AppError> {
        self.record("exists_by_login_id");
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.login_id == login_id))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        self.record("exists_by_email");
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn save(&self, new_user: NewUser) -> Result<User, AppError> {
        self.record("save");
        let user = User {
            id: Uuid::new_v4(),
            login_id: new_user.login_id,
            password_hash: new_user.password_hash,
            realname: new_user.realname,
            email: new_user.email,
            author_name: new_user.author_name,
            roles: new_user.roles,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn add_role(&self, login_id: &str, role: Role) -> Result<User, AppError> {
        self.record("add_role");
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.login_id == login_id)
            .ok_or(AppError::UserNotFound)?;

        user.roles.push(role.as_str().to_string());
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.record("ping");
        Ok(())
    }
}

/// 基于 mock 目录与进程内吊销存储构建完整应用
pub fn test_app(directory: Arc<MockDirectory>) -> (Router, Arc<AppState>) {
    let state = routes::build_state(
        test_config(),
        directory,
        Arc::new(InMemoryRevocationStore::new()),
    )
    .unwrap();

    (routes::create_router(state.clone()), state)
}

/// 发送 JSON 请求
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

/// 读取响应体为 JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// 断言错误响应的状态码与错误码
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], code);
    assert_eq!(json["error"]["status"], status.as_u16());
}
