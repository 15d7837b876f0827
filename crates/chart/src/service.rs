use async_trait::async_trait;
use pricecast_core::chart::entity::{ChartData, ChartSources};
use pricecast_core::chart::error::ChartError;
use pricecast_core::chart::port::ChartPort;
use pricecast_core::dataset::port::{DashboardPort, HistoricalPort, PredictionPort};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::decode::decode_historical;
use crate::timeline::{forecast_start_time, merge_timeline, summarize_predictions, trim_history};

/// # Summary
/// 图表聚合服务，组合三个数据集端口。
///
/// # Invariants
/// - 三个数据集并发获取，全部完成后才判定成败。
/// - 历史或预测缺失时整体失败，不返回残缺图表；看板永远可用。
pub struct ChartService {
    dashboard: Arc<dyn DashboardPort>,
    historical: Arc<dyn HistoricalPort>,
    prediction: Arc<dyn PredictionPort>,
    history_hours: u32,
}

impl ChartService {
    pub fn new(
        dashboard: Arc<dyn DashboardPort>,
        historical: Arc<dyn HistoricalPort>,
        prediction: Arc<dyn PredictionPort>,
        history_hours: u32,
    ) -> Self {
        Self {
            dashboard,
            historical,
            prediction,
            history_hours,
        }
    }
}

#[async_trait]
impl ChartPort for ChartService {
    async fn chart_data(&self, symbol: &str) -> Result<ChartData, ChartError> {
        let (dashboard, historical, predictions) = tokio::join!(
            self.dashboard.dashboard(symbol),
            self.historical.historical(symbol),
            self.prediction.predictions(symbol),
        );

        let (historical, predictions) = match (historical, predictions) {
            (Ok(h), Ok(p)) => (h, p),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Chart data for {} incomplete: {}", symbol, e);
                return Err(e.into());
            }
        };

        let history = trim_history(decode_historical(historical.data)?, self.history_hours);
        let forecast_start = forecast_start_time(&history)?;
        let prediction_data = summarize_predictions(&predictions.points, forecast_start);
        let timeline = merge_timeline(&history, &prediction_data);

        debug!(
            "Chart for {}: {} historical, {} forecast points from {}",
            symbol,
            history.len(),
            prediction_data.len(),
            forecast_start
        );

        Ok(ChartData {
            symbol: symbol.to_string(),
            historical_data: history,
            prediction_data,
            forecast_start_time: forecast_start,
            current_price: dashboard.current_price,
            config: dashboard.config,
            metrics: dashboard.metrics,
            last_updated: dashboard.last_updated,
            sources: ChartSources {
                dashboard: dashboard.source,
                historical: historical.source,
                prediction: predictions.source,
            },
            timeline,
        })
    }
}
