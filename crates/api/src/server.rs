//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 装配好依赖后调用。

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use pricecast_core::chart::port::ChartPort;
use pricecast_core::common::normalize_symbol;
use pricecast_core::dataset::port::{DashboardPort, HistoricalPort, PredictionPort};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes::{chart, dataset};
use crate::types::SymbolQuery;

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 各端口在服务启动前由 app 装配注入，生命周期与进程等同。
/// - 不保存任何请求级状态。
#[derive(Clone)]
pub struct AppState {
    /// 看板数据集
    pub dashboard: Arc<dyn DashboardPort>,
    /// 历史数据集
    pub historical: Arc<dyn HistoricalPort>,
    /// 预测数据集
    pub prediction: Arc<dyn PredictionPort>,
    /// 图表聚合服务
    pub chart: Arc<dyn ChartPort>,
    /// 查询参数缺失时使用的标的
    pub default_symbol: String,
}

impl AppState {
    /// 规范化查询参数中的标的
    pub fn symbol_of(&self, query: &SymbolQuery) -> String {
        normalize_symbol(query.symbol.as_deref(), &self.default_symbol)
    }
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pricecast API",
        version = "0.1.0",
        description = "加密货币价格历史与模型预测看板的数据接口。每个响应都带有 `source` 标记，`mock` 表示合成数据。",
        license(name = "MIT")
    ),
    tags(
        (name = "数据集 (Dataset)", description = "看板指标、历史 K 线与预测样本"),
        (name = "图表 (Chart)", description = "合并历史与预测的图表数据")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树（含 Swagger UI 与 CORS）。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(dataset::get_dashboard))
        .routes(routes!(dataset::get_historical_data))
        .routes(routes!(dataset::get_prediction_data))
        .routes(routes!(chart::get_chart_data))
        .with_state(state)
        .split_for_parts();

    // 前端可能部署在任意域名下
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 绑定端口并启动 HTTP 服务，`shutdown` 完成后优雅退出。
///
/// # Arguments
/// * `state` - 由 app 装配注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
/// * `shutdown` - 关停信号
pub async fn start_server<F>(
    state: AppState,
    bind_addr: &str,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Pricecast API Server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
