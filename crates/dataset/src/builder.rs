use pricecast_core::cache::port::PayloadCache;
use pricecast_core::common::time::TimeProvider;
use pricecast_core::config::SourceConfig;
use pricecast_core::source::error::SourceError;
use pricecast_core::source::port::SourceStrategy;
use pricecast_source::local::LocalFileStore;
use pricecast_source::mock::MockSource;
use pricecast_source::remote::RemoteObjectStore;
use pricecast_source::resolver::{BackendChain, Resolver};
use pricecast_source::static_asset::StaticAssetStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::dashboard::DashboardAdapter;
use crate::historical::HistoricalAdapter;
use crate::prediction::PredictionAdapter;

/// 三个数据集适配器的集合，由配置一次性装配
pub struct DatasetAdapters {
    pub dashboard: Arc<DashboardAdapter>,
    pub historical: Arc<HistoricalAdapter>,
    pub prediction: Arc<PredictionAdapter>,
}

/// # Summary
/// 按配置装配全部策略链与适配器。
///
/// # Logic
/// 1. 远端前缀为空时，远端策略从所有链中移除。
/// 2. 看板：远端 → 本地 → 静态 → 合成兜底。
/// 3. 历史、预测、成交量预测：远端 → 本地，不挂载兜底。
/// 4. 所有适配器共享同一个解析器（超时与可选缓存）。
///
/// # Arguments
/// * `config`: 数据源配置。
/// * `clock`: 注入的时钟，供合成数据使用。
/// * `cache`: 可选的载荷缓存。
///
/// # Returns
/// 装配好的适配器；HTTP 客户端初始化失败时返回错误。
pub fn build_adapters(
    config: &SourceConfig,
    clock: Arc<dyn TimeProvider>,
    cache: Option<Arc<dyn PayloadCache>>,
) -> Result<DatasetAdapters, SourceError> {
    let timeout = Duration::from_millis(config.timeout_ms);

    let mut resolver = Resolver::new(timeout);
    if let Some(cache) = cache {
        resolver = resolver.with_cache(cache);
    }

    let mut files: Vec<Arc<dyn SourceStrategy>> = Vec::new();
    match config.remote_base() {
        Some(base) => {
            info!("Remote object store enabled at {}", base);
            files.push(Arc::new(RemoteObjectStore::new(Some(base), timeout)?));
        }
        None => info!("Remote object store not configured, using local data only"),
    }
    files.push(Arc::new(LocalFileStore::new(&config.local_root)));
    let files = BackendChain::new(files);

    let dashboard_chain = files
        .clone()
        .then(Arc::new(StaticAssetStore::new(&config.static_dir)))
        .with_fallback(Arc::new(MockSource::new(clock.clone())));

    Ok(DatasetAdapters {
        dashboard: Arc::new(DashboardAdapter::new(
            resolver.clone(),
            dashboard_chain,
            clock,
        )),
        historical: Arc::new(HistoricalAdapter::new(resolver.clone(), files.clone())),
        prediction: Arc::new(PredictionAdapter::new(resolver, files.clone(), files)),
    })
}
