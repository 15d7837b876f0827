use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use pricecast_core::cache::error::CacheError;
use pricecast_core::cache::port::PayloadCache;
use pricecast_core::common::DatasetKey;
use pricecast_core::common::time::TimeProvider;
use pricecast_core::source::entity::ResolvedPayload;
use std::sync::Arc;

/// 缓存条目：载荷及其过期时间
struct CacheEntry {
    payload: ResolvedPayload,
    expires_at: DateTime<Utc>,
}

/// # Summary
/// 基于 DashMap 的带 TTL 内存载荷缓存。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 过期判断只依赖注入的 `TimeProvider`；过期条目在读取时惰性移除。
/// - 不提供容量限制，键空间受标的数量 × 数据集类型约束。
pub struct MemPayloadCache {
    // 线程安全的 KV 存储容器
    storage: DashMap<DatasetKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn TimeProvider>,
}

impl MemPayloadCache {
    /// # Summary
    /// 创建一个新的 MemPayloadCache 实例。
    ///
    /// # Arguments
    /// * `ttl`: 每个条目的存活时长。
    /// * `clock`: 时间供给器。
    pub fn new(ttl: Duration, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            storage: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// 当前条目数（含尚未被惰性清理的过期条目）
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl PayloadCache for MemPayloadCache {
    /// # Summary
    /// 读取未过期的载荷。
    ///
    /// # Logic
    /// 1. 检索条目并与当前时间比较。
    /// 2. 未过期则克隆载荷返回（`Bytes` 克隆只增加引用计数）。
    /// 3. 已过期则移除条目并视为未命中。
    async fn get(&self, key: &DatasetKey) -> Result<Option<ResolvedPayload>, CacheError> {
        let now = self.clock.now();
        let expired = match self.storage.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.payload.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.storage.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        Ok(None)
    }

    /// # Summary
    /// 写入载荷，同名键直接覆盖；合成载荷被拒绝。
    async fn put(&self, key: &DatasetKey, payload: ResolvedPayload) -> Result<(), CacheError> {
        if !payload.source.is_authoritative() {
            return Err(CacheError::NotAuthoritative(payload.source));
        }
        let expires_at = self.clock.now() + self.ttl;
        self.storage
            .insert(key.clone(), CacheEntry { payload, expires_at });
        Ok(())
    }

    async fn invalidate(&self, key: &DatasetKey) -> Result<(), CacheError> {
        self.storage.remove(key);
        Ok(())
    }
}
