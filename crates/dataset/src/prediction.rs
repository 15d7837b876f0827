use async_trait::async_trait;
use pricecast_core::common::{DatasetKey, DatasetType};
use pricecast_core::dataset::entity::{PredictionPayload, PredictionSeries};
use pricecast_core::dataset::error::DatasetError;
use pricecast_core::dataset::port::PredictionPort;
use pricecast_core::source::entity::ResolvedPayload;
use pricecast_core::source::error::SourceError;
use pricecast_source::resolver::{BackendChain, Resolver};
use tracing::{debug, warn};

use crate::samples::parse_prediction_csv;

/// # Summary
/// 预测数据集适配器。
///
/// # Invariants
/// - 收盘价与成交量预测各走一条独立的策略链，并发解析。
/// - 成交量预测失败只记录日志，不影响收盘价预测的结果。
pub struct PredictionAdapter {
    resolver: Resolver,
    close_chain: BackendChain,
    volume_chain: BackendChain,
}

impl PredictionAdapter {
    pub fn new(resolver: Resolver, close_chain: BackendChain, volume_chain: BackendChain) -> Self {
        Self {
            resolver,
            close_chain,
            volume_chain,
        }
    }
}

fn decode_text(payload: &ResolvedPayload) -> Result<String, SourceError> {
    payload.text().map(str::to_string)
}

#[async_trait]
impl PredictionPort for PredictionAdapter {
    async fn prediction_csv(&self, symbol: &str) -> Result<PredictionPayload, DatasetError> {
        let close_key = DatasetKey::new(symbol, DatasetType::Prediction);
        let volume_key = close_key.with_dataset(DatasetType::PredictionVolume);

        let (close, volume) = tokio::join!(
            self.resolver
                .resolve_with(&close_key, &self.close_chain, decode_text),
            self.resolver
                .resolve_with(&volume_key, &self.volume_chain, decode_text),
        );

        let close = close.map_err(|e| {
            warn!("{}", e);
            DatasetError::NotFound {
                symbol: close_key.symbol().to_string(),
                dataset: DatasetType::Prediction,
            }
        })?;

        let volume_csv = match volume {
            Ok(resolved) => Some(resolved.value),
            Err(e) => {
                debug!("Volume predictions unavailable: {}", e);
                None
            }
        };

        Ok(PredictionPayload {
            close_csv: close.value,
            volume_csv,
            source: close.source,
        })
    }

    async fn predictions(&self, symbol: &str) -> Result<PredictionSeries, DatasetError> {
        let payload = self.prediction_csv(symbol).await?;
        let points = parse_prediction_csv(&payload.close_csv, payload.volume_csv.as_deref());
        Ok(PredictionSeries {
            points,
            source: payload.source,
        })
    }
}
