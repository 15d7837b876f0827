use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::source::entity::{PayloadFormat, SourceTag};

/// 预测步数缺省值
pub const DEFAULT_FORECAST_HORIZON: u32 = 8;
/// 采样数缺省值
pub const DEFAULT_NUM_SAMPLES: u32 = 30;
/// 波动率窗口缺省值
pub const DEFAULT_VOLATILITY_WINDOW: u32 = 8;

/// # Summary
/// 看板模型配置。
///
/// # Invariants
/// - 三个字段始终大于 0；上游缺失时使用文档化的缺省值 (8, 30, 8)，缺失不是错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardConfig {
    #[schema(example = 8)]
    pub forecast_horizon: u32,
    #[schema(example = 30)]
    pub num_samples: u32,
    #[schema(example = 8)]
    pub volatility_window: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            forecast_horizon: DEFAULT_FORECAST_HORIZON,
            num_samples: DEFAULT_NUM_SAMPLES,
            volatility_window: DEFAULT_VOLATILITY_WINDOW,
        }
    }
}

/// # Summary
/// 规范化后的看板记录。
///
/// # Invariants
/// - `current_price` 为非负有限数。
/// - `source` 永不为空，调用方据此区分权威数据与合成数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRecord {
    /// 上游记录的生成时间，上游未提供时为 null
    #[schema(example = "2024-01-01T05:00:00Z")]
    pub last_updated: Option<DateTime<Utc>>,
    #[schema(example = 64250.0)]
    pub current_price: f64,
    pub config: DashboardConfig,
    pub metrics: BTreeMap<String, f64>,
    pub formatted: BTreeMap<String, String>,
    #[schema(value_type = Option<Object>)]
    pub validation: Option<serde_json::Value>,
    pub source: SourceTag,
}

/// 单根历史 K 线，序列按时间升序排列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoricalPoint {
    #[schema(example = "2024-01-01T05:00:00Z")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// 历史数据载荷，二进制列式内容原样透传。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalPayload {
    pub data: Bytes,
    pub source: SourceTag,
    pub format: PayloadFormat,
}

/// 预测 CSV 原文及可选的成交量预测 CSV。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionPayload {
    pub close_csv: String,
    pub volume_csv: Option<String>,
    pub source: SourceTag,
}

/// # Summary
/// 按样本展开的预测点，是数据集适配器边界上的规范形态。
///
/// # Invariants
/// - `timestamp` 保留 CSV 原文，解析推迟到聚合层。
/// - `close_predictions` 只包含可解析的数值，顺序与 CSV 列一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SampledPrediction {
    pub timestamp: String,
    pub close_predictions: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_predictions: Option<Vec<f64>>,
}

/// 汇总后的预测点，供图表直接使用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionSummary {
    pub timestamp: String,
    pub mean_prediction: f64,
    pub prediction_upper: f64,
    pub prediction_lower: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_prediction: Option<f64>,
}

/// # Summary
/// 预测点的两种形态。
///
/// # Invariants
/// - 转换只能由 `Samples` 单向汇总为 `Summary`，已汇总的点原样透传。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionPoint {
    Samples(SampledPrediction),
    Summary(PredictionSummary),
}

impl PredictionPoint {
    pub fn timestamp(&self) -> &str {
        match self {
            PredictionPoint::Samples(p) => &p.timestamp,
            PredictionPoint::Summary(p) => &p.timestamp,
        }
    }
}

impl From<SampledPrediction> for PredictionPoint {
    fn from(value: SampledPrediction) -> Self {
        PredictionPoint::Samples(value)
    }
}

impl From<PredictionSummary> for PredictionPoint {
    fn from(value: PredictionSummary) -> Self {
        PredictionPoint::Summary(value)
    }
}

/// 已解析的预测序列
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSeries {
    pub points: Vec<SampledPrediction>,
    pub source: SourceTag,
}
