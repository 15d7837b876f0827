use thiserror::Error;

use crate::common::DatasetType;

/// # Summary
/// 数据集适配器错误。
///
/// # Invariants
/// - 看板数据集永远不会产生 `NotFound`，它总是以合成数据收尾。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    // 所有策略耗尽且该数据集没有合成兜底
    #[error("No {dataset} data available for {symbol}")]
    NotFound { symbol: String, dataset: DatasetType },
}
