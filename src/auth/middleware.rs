//! 认证关卡中间件
//!
//! 每个请求恰好经过一次：提取 Bearer 令牌 → 验签/验期 → 查吊销表 →
//! 写入请求级 AuthContext。任何一步失败都只让请求以未认证身份继续，
//! 不在这里短路（公开端点合法存在）；强制认证由提取器在受保护的
//! handler 上完成。

use crate::{
    auth::jwt::TokenError, error::AppError, middleware::AppState, models::user::Role,
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

/// 请求级认证上下文（附加到请求扩展，随请求销毁）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub login_id: String,
    pub roles: Vec<Role>,
}

impl AuthContext {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
// 缺失时拒绝为 401（受保护端点的强制认证入口）
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

// Option<AuthContext> 提取：公开端点可感知登录态但不强制
impl<S> OptionalFromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthContext>().cloned())
    }
}

/// 从 Authorization 头提取 Bearer 令牌；缺失不是错误
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// 认证关卡：解析 → 吊销检查 → 填充上下文，随后无条件放行
///
/// 步骤严格有序：签名未验证前不信任任何 claim，吊销未排除前不建立
/// 身份。吊销表查询失败按"无法确认"处理，宁可降级为未认证也不放行。
pub async fn authentication_gate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(req.headers()) {
        match state.jwt_service.parse(&token) {
            Ok(claims) => match state.revocation_store.is_revoked(&token).await {
                Ok(false) => {
                    let roles: Vec<Role> = claims
                        .roles
                        .iter()
                        .filter_map(|r| r.parse::<Role>().ok())
                        .collect();

                    req.extensions_mut().insert(AuthContext {
                        login_id: claims.sub,
                        roles,
                    });
                }
                Ok(true) => {
                    // 已登出的令牌不是"非法"，只是自愿退役
                    tracing::debug!("Bearer token has been revoked, continuing unauthenticated");
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Revocation lookup failed, treating request as unauthenticated"
                    );
                }
            },
            Err(TokenError::Expired) => {
                tracing::debug!("Bearer token expired, continuing unauthenticated");
            }
            Err(e @ (TokenError::BadSignature | TokenError::Malformed)) => {
                tracing::warn!(error = %e, "Rejected bearer token, continuing unauthenticated");
            }
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer test_token_123".parse().unwrap());

        let token = extract_token(&headers).unwrap();
        assert_eq!(token, "test_token_123");
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_extract_token_invalid_format() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic dXNlcjpwdw==".parse().unwrap());

        assert!(extract_token(&headers).is_none());
    }
}
