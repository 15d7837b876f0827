//! # 数据集路由控制器
//!
//! 实现 `/api/dashboard`、`/api/historical-data`、`/api/prediction-data` 三个接口。

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pricecast_core::dataset::entity::DashboardRecord;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{
    ApiErrorResponse, DASHBOARD_CACHE_CONTROL, HistoricalDataResponse, PredictionDataResponse,
    SymbolQuery,
};

/// 获取看板指标
///
/// 该接口永远返回数据：所有后端都不可用时返回 `source = "mock"` 的合成数据。
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "数据集 (Dataset)",
    params(SymbolQuery),
    responses(
        (status = 200, description = "看板数据", body = DashboardRecord),
        (status = 400, description = "查询参数非法", body = ApiErrorResponse)
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<SymbolQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let symbol = state.symbol_of(&query);

    let record = state.dashboard.dashboard(&symbol).await;
    tracing::debug!("Dashboard for {} served from {}", symbol, record.source);

    Ok((
        [(header::CACHE_CONTROL, DASHBOARD_CACHE_CONTROL)],
        Json(record),
    ))
}

/// 获取历史 K 线数据
///
/// 返回 base64 编码的 Parquet 文件；所有后端都不可用时返回 404。
#[utoipa::path(
    get,
    path = "/api/historical-data",
    tag = "数据集 (Dataset)",
    params(SymbolQuery),
    responses(
        (status = 200, description = "历史数据", body = HistoricalDataResponse),
        (status = 400, description = "查询参数非法", body = ApiErrorResponse),
        (status = 404, description = "该标的没有历史数据", body = ApiErrorResponse)
    )
)]
pub async fn get_historical_data(
    State(state): State<AppState>,
    query: Result<Query<SymbolQuery>, QueryRejection>,
) -> Result<Json<HistoricalDataResponse>, ApiError> {
    let Query(query) = query?;
    let symbol = state.symbol_of(&query);

    let payload = state
        .historical
        .historical(&symbol)
        .await
        .map_err(|e| ApiError::from_dataset(e, "historical data"))?;

    Ok(Json(HistoricalDataResponse {
        data: STANDARD.encode(&payload.data),
        source: payload.source,
        format: payload.format,
    }))
}

/// 获取预测数据
///
/// 返回收盘价预测 CSV 原文，以及可选的成交量预测 CSV；所有后端都不可用时返回 404。
#[utoipa::path(
    get,
    path = "/api/prediction-data",
    tag = "数据集 (Dataset)",
    params(SymbolQuery),
    responses(
        (status = 200, description = "预测数据", body = PredictionDataResponse),
        (status = 400, description = "查询参数非法", body = ApiErrorResponse),
        (status = 404, description = "该标的没有预测数据", body = ApiErrorResponse)
    )
)]
pub async fn get_prediction_data(
    State(state): State<AppState>,
    query: Result<Query<SymbolQuery>, QueryRejection>,
) -> Result<Json<PredictionDataResponse>, ApiError> {
    let Query(query) = query?;
    let symbol = state.symbol_of(&query);

    let payload = state
        .prediction
        .prediction_csv(&symbol)
        .await
        .map_err(|e| ApiError::from_dataset(e, "prediction data"))?;

    Ok(Json(PredictionDataResponse {
        data: payload.close_csv,
        volume_data: payload.volume_csv,
        source: payload.source,
    }))
}
