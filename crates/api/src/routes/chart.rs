use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use pricecast_core::chart::entity::ChartData;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, SymbolQuery};

/// 获取合并后的图表数据
///
/// 并发读取看板、历史与预测数据，返回历史点与预测点拼接后的时间线。
/// 历史或预测缺失（或历史为空）时返回 404。
#[utoipa::path(
    get,
    path = "/api/chart-data",
    tag = "图表 (Chart)",
    params(SymbolQuery),
    responses(
        (status = 200, description = "图表数据", body = ChartData),
        (status = 404, description = "数据不足", body = ApiErrorResponse),
        (status = 500, description = "服务器内部错误", body = ApiErrorResponse)
    )
)]
pub async fn get_chart_data(
    State(state): State<AppState>,
    query: Result<Query<SymbolQuery>, QueryRejection>,
) -> Result<Json<ChartData>, ApiError> {
    let Query(query) = query?;
    let symbol = state.symbol_of(&query);

    state
        .chart
        .chart_data(&symbol)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_chart(e, &symbol))
}
