use thiserror::Error;

use crate::dataset::error::DatasetError;

/// # Summary
/// 聚合服务错误枚举。
///
/// # Invariants
/// - 历史或预测数据集的 `NotFound` 会令整个聚合失败，不返回缺少历史的残缺图表。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    // 没有历史点，无法计算预测起点
    #[error("Historical data is empty, cannot compute forecast start time")]
    EmptyHistory,
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    // 历史载荷无法解码为 K 线
    #[error("Failed to decode historical payload: {0}")]
    Decode(String),
}
