use crate::cache::error::CacheError;
use crate::common::DatasetKey;
use crate::source::entity::ResolvedPayload;
use async_trait::async_trait;

/// # Summary
/// 解析结果缓存接口 (Port)。
///
/// # Invariants
/// - 以 `DatasetKey` 为键，值为载荷及其过期时间。
/// - 过期条目视为未命中。
/// - 只应写入权威载荷，合成数据不入缓存。
#[async_trait]
pub trait PayloadCache: Send + Sync {
    /// # Summary
    /// 读取未过期的载荷。
    ///
    /// # Arguments
    /// * `key`: 数据集键。
    ///
    /// # Returns
    /// 命中返回 `Some(payload)`，未命中或已过期返回 `None`。
    async fn get(&self, key: &DatasetKey) -> Result<Option<ResolvedPayload>, CacheError>;

    /// # Summary
    /// 写入载荷，过期时间由实现按自身 TTL 计算。
    /// 非权威载荷返回 `CacheError::NotAuthoritative`。
    async fn put(&self, key: &DatasetKey, payload: ResolvedPayload) -> Result<(), CacheError>;

    /// # Summary
    /// 删除指定键。无论键是否存在均返回 Ok。
    async fn invalidate(&self, key: &DatasetKey) -> Result<(), CacheError>;
}
