pub mod time;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 数据集类型枚举，决定对象路径约定与解析方式。
///
/// # Invariants
/// - `PredictionVolume` 永远是可选数据集，缺失不会导致预测请求失败。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DatasetType {
    // 看板指标 (records/latest_{symbol}.json)
    Dashboard,
    // 历史 K 线 (data/{symbol}_cache.parquet)
    Historical,
    // 收盘价预测样本 (predictions_raw/latest_{symbol}_close.csv)
    Prediction,
    // 成交量预测样本，收盘价预测的兄弟文件
    PredictionVolume,
}

impl FromStr for DatasetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dashboard" => Ok(DatasetType::Dashboard),
            "historical" | "historical-data" => Ok(DatasetType::Historical),
            "prediction" | "prediction-data" => Ok(DatasetType::Prediction),
            "prediction_volume" | "prediction-volume" => Ok(DatasetType::PredictionVolume),
            _ => Err(format!("Unknown DatasetType: {}", s)),
        }
    }
}

impl std::fmt::Display for DatasetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetType::Dashboard => write!(f, "dashboard"),
            DatasetType::Historical => write!(f, "historical"),
            DatasetType::Prediction => write!(f, "prediction"),
            DatasetType::PredictionVolume => write!(f, "prediction_volume"),
        }
    }
}

/// # Summary
/// 逻辑数据集键，每个请求构造一次，不可变。
///
/// # Invariants
/// - `symbol` 已经过 trim 与小写化，但不做合法性校验（未知代码会一路落到兜底策略）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetKey {
    symbol: String,
    dataset: DatasetType,
}

impl DatasetKey {
    pub fn new(symbol: &str, dataset: DatasetType) -> Self {
        Self {
            symbol: symbol.trim().to_lowercase(),
            dataset,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dataset(&self) -> DatasetType {
        self.dataset
    }

    /// 同一标的下切换数据集类型（例如由收盘价预测派生成交量预测）
    pub fn with_dataset(&self, dataset: DatasetType) -> Self {
        Self {
            symbol: self.symbol.clone(),
            dataset,
        }
    }
}

impl std::fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.dataset, self.symbol)
    }
}

/// # Summary
/// 规范化查询参数中的标的代码。
///
/// # Logic
/// 1. 去除首尾空白并转为小写。
/// 2. 若结果为空（或参数缺失），返回配置的默认标的。
pub fn normalize_symbol(raw: Option<&str>, default_symbol: &str) -> String {
    match raw.map(|s| s.trim().to_lowercase()) {
        Some(s) if !s.is_empty() => s,
        _ => default_symbol.trim().to_lowercase(),
    }
}

/// 判断标的代码能否安全地拼接进文件路径或对象 URL。
pub fn is_path_safe_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && !symbol.contains("..")
        && !symbol.contains(['/', '\\', '\0'])
}
