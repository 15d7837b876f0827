//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pricecast_core::chart::error::ChartError;
use pricecast_core::dataset::error::DatasetError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 数据不可用 (404)，`message` 会点名标的
    #[error("{error}: {message}")]
    NotFound { error: String, message: String },

    /// 请求参数错误 (400)
    #[error("请求参数错误: {0}")]
    BadRequest(String),

    /// 内部错误 (500)，`detail` 只记录日志
    #[error("{error}: {detail}")]
    Internal { error: String, detail: String },
}

impl ApiError {
    /// # Summary
    /// 把数据集错误映射为 API 错误。
    ///
    /// # Arguments
    /// * `err`: 下层数据集错误。
    /// * `label`: 数据集的可读名称，例如 `"historical data"`。
    pub fn from_dataset(err: DatasetError, label: &str) -> Self {
        let DatasetError::NotFound { symbol, .. } = err;
        ApiError::NotFound {
            error: format!("Failed to load {}", label),
            message: format!("No {} available for {}", label, symbol),
        }
    }

    /// 图表聚合错误：历史或预测缺失、历史为空都属于数据不足 (404)
    pub fn from_chart(err: ChartError, symbol: &str) -> Self {
        match err {
            ChartError::Dataset(DatasetError::NotFound { symbol, dataset }) => ApiError::NotFound {
                error: "Failed to load chart data".to_string(),
                message: format!("No {} data available for {}", dataset, symbol),
            },
            ChartError::EmptyHistory => ApiError::NotFound {
                error: "Failed to load chart data".to_string(),
                message: format!("No historical data available for {}", symbol),
            },
            other => ApiError::Internal {
                error: "Failed to load chart data".to_string(),
                detail: other.to_string(),
            },
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound { error, message } => (
                StatusCode::NOT_FOUND,
                ApiErrorResponse::with_message(error, message),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::with_message("Invalid request", msg),
            ),
            ApiError::Internal { error, detail } => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("{}: {}", error, detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::from_msg(error),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
