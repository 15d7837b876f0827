use crate::chart::entity::ChartData;
use crate::chart::error::ChartError;
use async_trait::async_trait;

/// # Summary
/// 图表聚合服务端口。
///
/// # Invariants
/// - 三个数据集并发获取，全部结束后才判定成败（非快速失败）。
#[async_trait]
pub trait ChartPort: Send + Sync {
    /// # Summary
    /// 获取合并后的图表数据。
    ///
    /// # Logic
    /// 1. 并发请求看板、历史、预测三个数据集。
    /// 2. 解码历史数据并计算预测起点。
    /// 3. 汇总预测样本并与历史点拼接为时间线。
    ///
    /// # Arguments
    /// * `symbol`: 已规范化的小写标的代码。
    ///
    /// # Returns
    /// 成功返回 `ChartData`，历史或预测缺失时返回 `ChartError`。
    async fn chart_data(&self, symbol: &str) -> Result<ChartData, ChartError>;
}
