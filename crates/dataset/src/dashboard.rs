use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pricecast_core::common::time::{TimeProvider, parse_utc};
use pricecast_core::common::{DatasetKey, DatasetType};
use pricecast_core::dataset::entity::{
    DEFAULT_FORECAST_HORIZON, DEFAULT_NUM_SAMPLES, DEFAULT_VOLATILITY_WINDOW, DashboardConfig,
    DashboardRecord,
};
use pricecast_core::dataset::port::DashboardPort;
use pricecast_core::source::entity::{ResolvedPayload, SourceTag};
use pricecast_core::source::error::SourceError;
use pricecast_core::source::port::SyntheticSource;
use pricecast_source::mock::MockSource;
use pricecast_source::resolver::{BackendChain, Resolver};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// # Summary
/// 看板数据集适配器。
///
/// # Invariants
/// - 全函数：即使策略链耗尽（或链上未挂载兜底），也直接构造合成记录返回。
pub struct DashboardAdapter {
    resolver: Resolver,
    chain: BackendChain,
    mock: MockSource,
}

impl DashboardAdapter {
    pub fn new(resolver: Resolver, chain: BackendChain, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            resolver,
            chain,
            mock: MockSource::new(clock),
        }
    }

    /// 策略链之外的最后兜底，直接规范化合成数据源的载荷
    fn synthetic_record(&self, key: &DatasetKey) -> DashboardRecord {
        match self.mock.synthesize(key).map(|payload| normalize_dashboard(&payload)) {
            Some(Ok(record)) => record,
            Some(Err(e)) => {
                warn!("Synthetic dashboard for {} unusable: {}", key, e);
                empty_record()
            }
            None => empty_record(),
        }
    }
}

/// 价格为 0、配置取缺省值的空记录
fn empty_record() -> DashboardRecord {
    DashboardRecord {
        last_updated: None,
        current_price: 0.0,
        config: DashboardConfig::default(),
        metrics: BTreeMap::new(),
        formatted: BTreeMap::new(),
        validation: None,
        source: SourceTag::Mock,
    }
}

#[async_trait]
impl DashboardPort for DashboardAdapter {
    async fn dashboard(&self, symbol: &str) -> DashboardRecord {
        let key = DatasetKey::new(symbol, DatasetType::Dashboard);
        match self
            .resolver
            .resolve_with(&key, &self.chain, normalize_dashboard)
            .await
        {
            Ok(resolved) => resolved.value,
            Err(e) => {
                warn!("{}, building synthetic dashboard", e);
                self.synthetic_record(&key)
            }
        }
    }
}

/// # Summary
/// 把任意后端的看板 JSON 规范化为 `DashboardRecord`。
///
/// # Logic
/// 同时接受上游原始记录的字段名（`timestamp`、`prediction_results.current_price`、
/// `data_config`/`sampling_config`、`raw_metrics`、`formatted_metrics`）
/// 与已规范化的字段名（`lastUpdated`、`currentPrice`、`config`、`metrics`、`formatted`）。
/// 1. 配置值缺失、为 0 或为负时取缺省值 (8, 30, 8)。
/// 2. 价格缺失、为负或非有限数时取 0。
/// 3. 指标只保留数值项；格式化指标一律转为字符串。
///
/// # Returns
/// 规范化后的记录；载荷不是 JSON 对象时返回 `SourceError::Malformed`。
pub fn normalize_dashboard(payload: &ResolvedPayload) -> Result<DashboardRecord, SourceError> {
    let root: Value = serde_json::from_slice(&payload.body)
        .map_err(|e| SourceError::Malformed(format!("dashboard json: {}", e)))?;
    let root = root
        .as_object()
        .ok_or_else(|| SourceError::Malformed("dashboard json is not an object".to_string()))?;

    let last_updated = first_of(root, &[&["timestamp"], &["lastUpdated"], &["last_updated"]])
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    let current_price = first_of(
        root,
        &[
            &["prediction_results", "current_price"],
            &["currentPrice"],
            &["current_price"],
        ],
    )
    .and_then(Value::as_f64)
    .filter(|p| p.is_finite() && *p > 0.0)
    .unwrap_or(0.0);

    let config = DashboardConfig {
        forecast_horizon: positive_u32(
            root,
            &[
                &["data_config", "forecast_horizon"],
                &["config", "forecast_horizon"],
                &["config", "forecastHorizon"],
            ],
        )
        .unwrap_or(DEFAULT_FORECAST_HORIZON),
        num_samples: positive_u32(
            root,
            &[
                &["sampling_config", "num_samples"],
                &["config", "num_samples"],
                &["config", "numSamples"],
            ],
        )
        .unwrap_or(DEFAULT_NUM_SAMPLES),
        volatility_window: positive_u32(
            root,
            &[
                &["data_config", "volatility_window"],
                &["config", "volatility_window"],
                &["config", "volatilityWindow"],
            ],
        )
        .unwrap_or(DEFAULT_VOLATILITY_WINDOW),
    };

    let metrics = first_of(root, &[&["raw_metrics"], &["metrics"]])
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default();

    let formatted = first_of(root, &[&["formatted_metrics"], &["formatted"]])
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default();

    let validation = root.get("validation").filter(|v| !v.is_null()).cloned();

    Ok(DashboardRecord {
        last_updated,
        current_price,
        config,
        metrics,
        formatted,
        validation,
        source: payload.source,
    })
}

/// 按顺序查找第一个存在且非 null 的路径
fn first_of<'a>(root: &'a Map<String, Value>, paths: &[&[&str]]) -> Option<&'a Value> {
    paths.iter().find_map(|path| {
        let (head, rest) = path.split_first()?;
        let mut current = root.get(*head)?;
        for segment in rest {
            current = current.get(*segment)?;
        }
        (!current.is_null()).then_some(current)
    })
}

fn positive_u32(root: &Map<String, Value>, paths: &[&[&str]]) -> Option<u32> {
    first_of(root, paths)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let parsed = parse_utc(raw);
    if parsed.is_none() {
        info!("Ignoring unparseable dashboard timestamp {}", raw);
    }
    parsed
}
