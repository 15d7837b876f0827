use async_trait::async_trait;
use pricecast_core::common::{DatasetKey, DatasetType};
use pricecast_core::dataset::entity::HistoricalPayload;
use pricecast_core::dataset::error::DatasetError;
use pricecast_core::dataset::port::HistoricalPort;
use pricecast_core::source::entity::ResolvedPayload;
use pricecast_core::source::error::SourceError;
use pricecast_source::resolver::{BackendChain, Resolver};
use tracing::warn;

/// # Summary
/// 历史 K 线数据集适配器，二进制内容原样透传，不在此处解码。
///
/// # Invariants
/// - 链上不挂载合成兜底，耗尽时返回 `DatasetError::NotFound`。
pub struct HistoricalAdapter {
    resolver: Resolver,
    chain: BackendChain,
}

impl HistoricalAdapter {
    pub fn new(resolver: Resolver, chain: BackendChain) -> Self {
        Self { resolver, chain }
    }
}

/// 空对象视为上游损坏，交由下一个后端
fn accept_historical(payload: &ResolvedPayload) -> Result<HistoricalPayload, SourceError> {
    if payload.body.is_empty() {
        return Err(SourceError::Malformed("empty historical object".to_string()));
    }
    Ok(HistoricalPayload {
        data: payload.body.clone(),
        source: payload.source,
        format: payload.format,
    })
}

#[async_trait]
impl HistoricalPort for HistoricalAdapter {
    async fn historical(&self, symbol: &str) -> Result<HistoricalPayload, DatasetError> {
        let key = DatasetKey::new(symbol, DatasetType::Historical);
        self.resolver
            .resolve_with(&key, &self.chain, accept_historical)
            .await
            .map(|resolved| resolved.value)
            .map_err(|e| {
                warn!("{}", e);
                DatasetError::NotFound {
                    symbol: key.symbol().to_string(),
                    dataset: DatasetType::Historical,
                }
            })
    }
}
