use crate::dataset::entity::{
    DashboardRecord, HistoricalPayload, PredictionPayload, PredictionSeries,
};
use crate::dataset::error::DatasetError;
use async_trait::async_trait;

/// # Summary
/// 看板数据集端口。
///
/// # Invariants
/// - 全函数：任何标的都返回结构合法的记录，最差情况为合成数据。
#[async_trait]
pub trait DashboardPort: Send + Sync {
    /// # Summary
    /// 获取规范化后的看板记录。
    ///
    /// # Arguments
    /// * `symbol`: 已规范化的小写标的代码。
    ///
    /// # Returns
    /// 看板记录，`source` 标明数据来源。
    async fn dashboard(&self, symbol: &str) -> DashboardRecord;
}

/// 历史数据集端口，全部后端失败时返回 `DatasetError::NotFound`。
#[async_trait]
pub trait HistoricalPort: Send + Sync {
    async fn historical(&self, symbol: &str) -> Result<HistoricalPayload, DatasetError>;
}

/// # Summary
/// 预测数据集端口。
///
/// # Invariants
/// - 成交量预测缺失不构成错误。
/// - 全部后端失败时返回 `DatasetError::NotFound`。
#[async_trait]
pub trait PredictionPort: Send + Sync {
    /// 获取原始 CSV 文本（供 HTTP 层透传）
    async fn prediction_csv(&self, symbol: &str) -> Result<PredictionPayload, DatasetError>;

    /// 获取并解析为按样本展开的预测序列
    async fn predictions(&self, symbol: &str) -> Result<PredictionSeries, DatasetError>;
}
