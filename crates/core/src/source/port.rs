use crate::common::DatasetKey;
use crate::source::entity::{ResolvedPayload, SourceTag};
use crate::source::error::SourceError;
use async_trait::async_trait;

/// # Summary
/// 单个数据后端的获取策略 (Port)。
///
/// # Invariants
/// - 实现者只负责读取，不写入、不缓存。
/// - 任何失败都以 `SourceError` 返回，由解析器决定是否继续。
#[async_trait]
pub trait SourceStrategy: Send + Sync {
    /// # Summary
    /// 该策略产出数据时附带的来源标记。
    fn tag(&self) -> SourceTag;

    /// # Summary
    /// 按数据集键读取原始载荷。
    ///
    /// # Logic
    /// 1. 根据数据集类型映射到该后端的路径约定。
    /// 2. 执行读取，非成功状态或 IO 错误转为 `SourceError`。
    ///
    /// # Arguments
    /// * `key`: 逻辑数据集键。
    ///
    /// # Returns
    /// 成功返回载荷，失败返回 `SourceError`。
    async fn fetch(&self, key: &DatasetKey) -> Result<ResolvedPayload, SourceError>;
}

/// # Summary
/// 合成兜底数据源。
///
/// # Invariants
/// - 不读取任何外部状态，对同一数据集键总是立即产出相同的结果。
/// - 产出的载荷来源标记必须为 `SourceTag::Mock`。
pub trait SyntheticSource: Send + Sync {
    /// 根据数据集键确定性地生成占位载荷；该数据集没有合成形态时返回 None
    fn synthesize(&self, key: &DatasetKey) -> Option<ResolvedPayload>;
}
