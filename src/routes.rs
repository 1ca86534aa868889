//! 路由配置

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::jwt::JwtService,
    auth::middleware::authentication_gate,
    auth::revocation::RevocationStore,
    config::AppConfig,
    error::AppError,
    handlers,
    middleware::{request_tracking_middleware, AppState},
    repository::IdentityDirectory,
    services::{AdminService, AuthService},
};

/// 组装应用状态
///
/// 用户目录与吊销存储以 trait 对象传入，生产环境是 Postgres 与
/// 进程内存储，测试可以替换为 mock。
pub fn build_state(
    config: AppConfig,
    directory: Arc<dyn IdentityDirectory>,
    revocation_store: Arc<dyn RevocationStore>,
) -> Result<Arc<AppState>, AppError> {
    let jwt_service = Arc::new(JwtService::from_config(&config)?);

    let auth_service = Arc::new(AuthService::new(
        directory.clone(),
        jwt_service.clone(),
        revocation_store.clone(),
    ));
    let admin_service = Arc::new(AdminService::new(directory.clone()));

    Ok(Arc::new(AppState {
        config,
        jwt_service,
        revocation_store,
        directory,
        auth_service,
        admin_service,
    }))
}

/// 创建应用路由
///
/// 中间件从外到内：CORS → 追踪日志 → 请求追踪 → 认证关卡 → handler。
/// 认证关卡对所有路由生效但从不短路，强制认证在 handler 的提取器上。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // 探针
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // 认证
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/signin", post(handlers::auth::signin))
        .route("/auth/signout", post(handlers::auth::signout))
        .route("/auth/me", get(handlers::auth::me))
        // 用户资料
        .route("/users/{login_id}", get(handlers::user::get_user))
        // 管理
        .route(
            "/admin/users/{login_id}/approve-author",
            post(handlers::admin::approve_author),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_gate,
        ))
        .layer(middleware::from_fn(request_tracking_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
