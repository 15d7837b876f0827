use pricecast_core::common::time::TimeProvider;
use pricecast_core::common::{DatasetKey, DatasetType};
use pricecast_core::dataset::entity::{
    DEFAULT_FORECAST_HORIZON, DEFAULT_NUM_SAMPLES, DEFAULT_VOLATILITY_WINDOW,
};
use pricecast_core::source::entity::{ResolvedPayload, SourceTag};
use pricecast_core::source::port::SyntheticSource;
use serde_json::json;
use std::sync::Arc;

use crate::layout::payload_format;

/// 合成数据使用的确定性价格，按标的区分
pub fn mock_price(symbol: &str) -> f64 {
    match symbol {
        "eth" => 3200.0,
        _ => 64250.0,
    }
}

/// # Summary
/// 合成兜底数据源。
///
/// # Invariants
/// - 只读取注入的时钟，不访问任何外部状态。
/// - 只有看板数据集有合成形态；历史与预测数据集返回 None。
pub struct MockSource {
    clock: Arc<dyn TimeProvider>,
}

impl MockSource {
    pub fn new(clock: Arc<dyn TimeProvider>) -> Self {
        Self { clock }
    }

    fn dashboard_json(&self, symbol: &str) -> String {
        json!({
            "lastUpdated": self.clock.now().to_rfc3339(),
            "currentPrice": mock_price(symbol),
            "config": {
                "forecast_horizon": DEFAULT_FORECAST_HORIZON,
                "num_samples": DEFAULT_NUM_SAMPLES,
                "volatility_window": DEFAULT_VOLATILITY_WINDOW,
            },
            "metrics": { "upside_0.5%_prob": 0.73, "confidence_score": 0.82 },
            "formatted": { "upside_0.5%_prob": "73.0%", "confidence_score": "82.0%" },
            "validation": null,
        })
        .to_string()
    }
}

impl SyntheticSource for MockSource {
    fn synthesize(&self, key: &DatasetKey) -> Option<ResolvedPayload> {
        match key.dataset() {
            DatasetType::Dashboard => Some(ResolvedPayload::new(
                self.dashboard_json(key.symbol()),
                SourceTag::Mock,
                payload_format(key.dataset()),
            )),
            DatasetType::Historical | DatasetType::Prediction | DatasetType::PredictionVolume => {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pricecast_core::common::time::FakeClockProvider;

    #[test]
    fn test_mock_dashboard_is_keyed_by_symbol() {
        let clock = Arc::new(FakeClockProvider::new(
            chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let mock = MockSource::new(clock);

        let btc = mock
            .synthesize(&DatasetKey::new("btc", DatasetType::Dashboard))
            .unwrap();
        let eth = mock
            .synthesize(&DatasetKey::new("eth", DatasetType::Dashboard))
            .unwrap();
        assert_eq!(btc.source, SourceTag::Mock);

        let btc: serde_json::Value = serde_json::from_slice(&btc.body).unwrap();
        let eth: serde_json::Value = serde_json::from_slice(&eth.body).unwrap();
        assert_eq!(btc["currentPrice"], 64250.0);
        assert_eq!(eth["currentPrice"], 3200.0);
        assert_eq!(btc["lastUpdated"], "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_mock_is_deterministic() {
        let clock = Arc::new(FakeClockProvider::new(chrono::Utc::now()));
        let mock = MockSource::new(clock);
        let key = DatasetKey::new("doge", DatasetType::Dashboard);
        assert_eq!(mock.synthesize(&key), mock.synthesize(&key));
    }

    #[test]
    fn test_only_dashboard_has_synthetic_form() {
        let mock = MockSource::new(Arc::new(FakeClockProvider::new(chrono::Utc::now())));
        for dataset in [
            DatasetType::Historical,
            DatasetType::Prediction,
            DatasetType::PredictionVolume,
        ] {
            assert!(mock.synthesize(&DatasetKey::new("btc", dataset)).is_none());
        }
    }
}
