mod settings;
mod telemetry;

use std::sync::Arc;

use chrono::TimeDelta;
use pricecast_api::server::{AppState, start_server};
use pricecast_cache::mem::MemPayloadCache;
use pricecast_chart::service::ChartService;
use pricecast_core::cache::port::PayloadCache;
use pricecast_core::common::time::{RealTimeProvider, TimeProvider};
use pricecast_core::config::CacheConfig;
use pricecast_dataset::builder::build_adapters;
use tracing::info;

/// 缓存 TTL 为 0 或超出范围时不启用缓存
fn build_cache(config: &CacheConfig, clock: Arc<dyn TimeProvider>) -> Option<Arc<dyn PayloadCache>> {
    let ttl = i64::try_from(config.ttl_secs)
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(TimeDelta::try_seconds)?;
    Some(Arc::new(MemPayloadCache::new(ttl, clock)))
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 API 层。
///
/// # Logic
/// 1. 加载分层配置。
/// 2. 初始化全局日志。
/// 3. 实例化基础设施层（时钟、载荷缓存）。
/// 4. 实例化数据集适配器与图表服务。
/// 5. 启动 HTTP 服务，收到 Ctrl-C 后优雅退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config = settings::load()?;

    // 2. 初始化日志
    let _log_guard = telemetry::init(&config.log)?;
    info!("Pricecast starting...");
    match config.source.remote_base() {
        Some(base) => info!("Remote object store: {}", base),
        None => info!("Remote object store not configured, serving local data only"),
    }

    // 3. 实例化基础设施层
    let clock: Arc<dyn TimeProvider> = Arc::new(RealTimeProvider);
    let cache = build_cache(&config.cache, clock.clone());
    if cache.is_some() {
        info!("Payload cache enabled, ttl {}s", config.cache.ttl_secs);
    }

    // 4. 实例化数据集适配器与图表服务
    let adapters = build_adapters(&config.source, clock, cache)?;
    let chart = Arc::new(ChartService::new(
        adapters.dashboard.clone(),
        adapters.historical.clone(),
        adapters.prediction.clone(),
        config.chart.history_hours,
    ));

    let state = AppState {
        dashboard: adapters.dashboard,
        historical: adapters.historical,
        prediction: adapters.prediction,
        chart,
        default_symbol: config.server.default_symbol.clone(),
    };

    // 5. 启动服务并等待退出信号
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    start_server(state, &bind_addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received. Exiting...");
    })
    .await?;

    Ok(())
}
