//! 令牌吊销存储
//!
//! 登出时把令牌写入吊销表，TTL 等于令牌的剩余有效期，因此条目绝不会比
//! 令牌本身活得更久，存储规模自然有界。外部键值服务（如 Redis）可以
//! 通过实现 [`RevocationStore`] 接入；默认实现是进程内的惰性过期表。

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// 登出产生的吊销标记值
pub const SIGNOUT_MARKER: &str = "signout";

/// 吊销存储契约：单次原子写 / 单次原子读
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// 以给定 TTL 记录一条吊销；TTL 非正时为空操作
    async fn revoke(&self, token: &str, marker: &str, ttl: Duration) -> Result<(), AppError>;

    /// 查询令牌是否处于吊销状态
    async fn is_revoked(&self, token: &str) -> Result<bool, AppError>;
}

/// 吊销键：原始令牌的 SHA-256，避免存储原始凭据
pub fn token_key(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

struct RevocationEntry {
    marker: String,
    expires_at: DateTime<Utc>,
}

/// 进程内吊销存储，读取时惰性清理过期条目
#[derive(Default)]
pub struct InMemoryRevocationStore {
    entries: DashMap<String, RevocationEntry>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// 当前未过期条目数（测试与指标用）
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .iter()
            .filter(|e| e.value().expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token: &str, marker: &str, ttl: Duration) -> Result<(), AppError> {
        // TTL 非正说明令牌本身已过期，无需记录
        if ttl <= Duration::zero() {
            tracing::debug!("Skipping revocation of already-expired token");
            return Ok(());
        }

        self.entries.insert(
            token_key(token),
            RevocationEntry {
                marker: marker.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );

        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AppError> {
        let key = token_key(token);

        if let Some(entry) = self.entries.get(&key) {
            if entry.expires_at > Utc::now() {
                tracing::trace!(marker = %entry.marker, "Token found in revocation store");
                return Ok(true);
            }
            // 条目已到期，顺手清理
            drop(entry);
            self.entries.remove(&key);
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_revoke_then_lookup() {
        let store = InMemoryRevocationStore::new();

        store
            .revoke("token-abc", SIGNOUT_MARKER, Duration::seconds(60))
            .await
            .unwrap();

        assert!(store.is_revoked("token-abc").await.unwrap());
        assert!(!store.is_revoked("token-xyz").await.unwrap());
    }

    #[tokio::test]
    async fn test_non_positive_ttl_is_noop() {
        let store = InMemoryRevocationStore::new();

        store
            .revoke("token-abc", SIGNOUT_MARKER, Duration::seconds(-5))
            .await
            .unwrap();
        store
            .revoke("token-def", SIGNOUT_MARKER, Duration::zero())
            .await
            .unwrap();

        assert!(!store.is_revoked("token-abc").await.unwrap());
        assert!(!store.is_revoked("token-def").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_entry_expires_with_token() {
        let store = InMemoryRevocationStore::new();

        store
            .revoke("token-abc", SIGNOUT_MARKER, Duration::milliseconds(50))
            .await
            .unwrap();
        assert!(store.is_revoked("token-abc").await.unwrap());

        tokio::time::sleep(std::time::Duration::from_millis(120)).await;

        assert!(!store.is_revoked("token-abc").await.unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_token_key_is_not_the_token() {
        let key = token_key("my-raw-token");
        assert_ne!(key, "my-raw-token");
        assert_eq!(key.len(), 64);
        assert_eq!(key, token_key("my-raw-token"));
    }
}
