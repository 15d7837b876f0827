use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::dataset::entity::{DashboardConfig, HistoricalPoint, PredictionSummary};
use crate::source::entity::SourceTag;

/// # Summary
/// 合并时间线上的单个点。
///
/// # Invariants
/// - 历史点只携带 OHLCV 字段且 `is_forecast = false`。
/// - 预测点只携带均值与上下界且 `is_forecast = true`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    #[schema(example = "2024-01-01T06:00:00Z")]
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_prediction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_lower: Option<f64>,
    pub is_forecast: bool,
}

/// 三个数据集各自的来源标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChartSources {
    pub dashboard: SourceTag,
    pub historical: SourceTag,
    pub prediction: SourceTag,
}

/// # Summary
/// 聚合服务输出的图表数据。
///
/// # Invariants
/// - `forecast_start_time` 是最新历史点之后的下一个整点，属于派生数据。
/// - `timeline` 中历史点全部排在预测点之前。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    #[schema(example = "btc")]
    pub symbol: String,
    pub historical_data: Vec<HistoricalPoint>,
    pub prediction_data: Vec<PredictionSummary>,
    #[schema(example = "2024-01-01T06:00:00Z")]
    pub forecast_start_time: DateTime<Utc>,
    pub current_price: f64,
    pub config: DashboardConfig,
    pub metrics: BTreeMap<String, f64>,
    pub last_updated: Option<DateTime<Utc>>,
    pub sources: ChartSources,
    pub timeline: Vec<ChartPoint>,
}
