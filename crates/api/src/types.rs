//! # DTO (Data Transfer Object) 层
//!
//! 面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use pricecast_core::source::entity::{PayloadFormat, SourceTag};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// 看板响应的 HTTP 缓存策略
pub const DASHBOARD_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";

/// 所有数据接口共用的查询参数
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SymbolQuery {
    /// 标的代码，不区分大小写；缺失时使用默认标的
    #[param(example = "btc")]
    pub symbol: Option<String>,
}

// ============================================================
//  数据集 DTO
// ============================================================

/// 历史数据响应：二进制列式内容经 base64 编码
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoricalDataResponse {
    /// base64 编码的 Parquet 文件
    pub data: String,
    pub source: SourceTag,
    #[schema(example = "parquet")]
    pub format: PayloadFormat,
}

/// 预测数据响应：CSV 原文
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionDataResponse {
    #[schema(example = "timestamp,s1,s2\n2024-01-01T06:00:00Z,64100.5,64380.2\n")]
    pub data: String,
    /// 成交量预测 CSV 原文（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_data: Option<String>,
    pub source: SourceTag,
}

// ============================================================
//  错误 DTO
// ============================================================

/// 失败响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 错误概述
    #[schema(example = "Failed to load historical data")]
    pub error: String,
    /// 面向用户的说明
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "No historical data available for btc")]
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}
