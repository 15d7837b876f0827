use chrono::{DateTime, DurationRound, SecondsFormat, TimeDelta, Utc};
use pricecast_core::chart::entity::ChartPoint;
use pricecast_core::chart::error::ChartError;
use pricecast_core::common::time::parse_utc;
use pricecast_core::dataset::entity::{
    HistoricalPoint, PredictionPoint, PredictionSummary, SampledPrediction,
};

/// 时间线上统一使用的时间戳格式，例如 `2024-01-01T06:00:00Z`
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// # Summary
/// 计算预测起点：最新历史点所在小时的下一个整点。
///
/// # Logic
/// 1. 取最后一个历史点的时间戳（序列按时间升序）。
/// 2. 截断到整点，再加一小时；恰好落在整点上的时间同样前进一小时。
///
/// # Returns
/// 预测起点；历史为空时返回 `ChartError::EmptyHistory`。
pub fn forecast_start_time(history: &[HistoricalPoint]) -> Result<DateTime<Utc>, ChartError> {
    let last = history.last().ok_or(ChartError::EmptyHistory)?;
    let hour = TimeDelta::hours(1);
    let truncated = last
        .timestamp
        .duration_trunc(hour)
        .map_err(|e| ChartError::Decode(e.to_string()))?;
    Ok(truncated + hour)
}

/// 从 `start` 开始生成 `horizon` 个逐小时的时间戳
pub fn generate_prediction_timestamps(start: DateTime<Utc>, horizon: usize) -> Vec<DateTime<Utc>> {
    (0..horizon)
        .filter_map(|i| i64::try_from(i).ok())
        .map(|h| start + TimeDelta::hours(h))
        .collect()
}

/// 只保留最新时间点往前 `hours` 小时内的历史；`hours` 为 0 时不截取
pub fn trim_history(history: Vec<HistoricalPoint>, hours: u32) -> Vec<HistoricalPoint> {
    let Some(last) = history.last() else {
        return history;
    };
    if hours == 0 {
        return history;
    }
    let cutoff = last.timestamp - TimeDelta::hours(i64::from(hours));
    history
        .into_iter()
        .filter(|p| p.timestamp >= cutoff)
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    let count = u32::try_from(values.len()).ok().filter(|n| *n > 0)?;
    Some(values.iter().sum::<f64>() / f64::from(count))
}

/// # Summary
/// 把预测点汇总为均值与上下界。
///
/// # Logic
/// 1. 已汇总的点原样返回。
/// 2. 均值为样本算术平均。
/// 3. 下界与上界分别取排序后下标 `(n-1)*5/100` 与 `(n-1)*95/100` 的样本。
/// 4. 成交量预测（若有）取均值。
///
/// # Returns
/// 汇总结果；没有任何样本的点返回 None。
pub fn summarize(point: &PredictionPoint) -> Option<PredictionSummary> {
    let sampled = match point {
        PredictionPoint::Summary(summary) => return Some(summary.clone()),
        PredictionPoint::Samples(sampled) => sampled,
    };

    let mut sorted = sampled.close_predictions.clone();
    sorted.sort_by(f64::total_cmp);
    let last = sorted.len().checked_sub(1)?;

    Some(PredictionSummary {
        timestamp: sampled.timestamp.clone(),
        mean_prediction: mean(&sorted)?,
        prediction_lower: *sorted.get(last * 5 / 100)?,
        prediction_upper: *sorted.get(last * 95 / 100)?,
        volume_prediction: sampled.volume_predictions.as_deref().and_then(mean),
    })
}

/// # Summary
/// 汇总整条预测序列。
///
/// # Logic
/// 1. 无样本的行被丢弃。
/// 2. 时间戳无法解析的行按行号重新锚定到 `anchor + i` 小时。
pub fn summarize_predictions(
    points: &[SampledPrediction],
    anchor: DateTime<Utc>,
) -> Vec<PredictionSummary> {
    let fallback = generate_prediction_timestamps(anchor, points.len());

    points
        .iter()
        .zip(fallback)
        .filter_map(|(sampled, fallback_ts)| {
            let mut summary = summarize(&PredictionPoint::from(sampled.clone()))?;
            if parse_utc(&summary.timestamp).is_none() {
                summary.timestamp = format_timestamp(fallback_ts);
            }
            Some(summary)
        })
        .collect()
}

/// 历史点在前、预测点在后的简单拼接
pub fn merge_timeline(
    history: &[HistoricalPoint],
    predictions: &[PredictionSummary],
) -> Vec<ChartPoint> {
    let historical = history.iter().map(|p| ChartPoint {
        timestamp: format_timestamp(p.timestamp),
        open: Some(p.open),
        high: Some(p.high),
        low: Some(p.low),
        close: Some(p.close),
        volume: Some(p.volume),
        mean_prediction: None,
        prediction_upper: None,
        prediction_lower: None,
        is_forecast: false,
    });
    let forecast = predictions.iter().map(|p| ChartPoint {
        timestamp: p.timestamp.clone(),
        open: None,
        high: None,
        low: None,
        close: None,
        volume: None,
        mean_prediction: Some(p.mean_prediction),
        prediction_upper: Some(p.prediction_upper),
        prediction_lower: Some(p.prediction_lower),
        is_forecast: true,
    });
    historical.chain(forecast).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn bar(ts: DateTime<Utc>, close: f64) -> HistoricalPoint {
        HistoricalPoint {
            timestamp: ts,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    fn sampled(ts: &str, samples: Vec<f64>) -> SampledPrediction {
        SampledPrediction {
            timestamp: ts.to_string(),
            close_predictions: samples,
            volume_predictions: None,
        }
    }

    #[test]
    fn test_forecast_start_is_next_whole_hour() {
        let history = vec![bar(at(4, 0), 1.0), bar(at(5, 47), 2.0)];
        assert_eq!(forecast_start_time(&history).unwrap(), at(6, 0));

        let on_the_hour = vec![bar(at(5, 0), 1.0)];
        assert_eq!(forecast_start_time(&on_the_hour).unwrap(), at(6, 0));
    }

    #[test]
    fn test_forecast_start_requires_history() {
        assert_eq!(forecast_start_time(&[]), Err(ChartError::EmptyHistory));
    }

    #[test]
    fn test_generate_prediction_timestamps() {
        let ts = generate_prediction_timestamps(at(6, 0), 3);
        assert_eq!(ts, vec![at(6, 0), at(7, 0), at(8, 0)]);
        assert!(generate_prediction_timestamps(at(6, 0), 0).is_empty());
    }

    #[test]
    fn test_summarize_samples() {
        let samples: Vec<f64> = (1..=21).map(f64::from).rev().collect();
        let mut point = sampled("2024-01-01T06:00:00Z", samples);
        point.volume_predictions = Some(vec![10.0, 30.0]);

        let summary = summarize(&PredictionPoint::from(point)).unwrap();
        assert_eq!(summary.mean_prediction, 11.0);
        assert_eq!(summary.prediction_lower, 2.0);
        assert_eq!(summary.prediction_upper, 20.0);
        assert_eq!(summary.volume_prediction, Some(20.0));
    }

    #[test]
    fn test_summarize_single_sample_and_passthrough() {
        let single = summarize(&PredictionPoint::from(sampled("t", vec![120.0]))).unwrap();
        assert_eq!(single.mean_prediction, 120.0);
        assert_eq!(single.prediction_lower, 120.0);
        assert_eq!(single.prediction_upper, 120.0);

        let already = PredictionSummary {
            timestamp: "2024-01-01T06:00:00Z".to_string(),
            mean_prediction: 1.0,
            prediction_upper: 2.0,
            prediction_lower: 0.5,
            volume_prediction: None,
        };
        assert_eq!(
            summarize(&PredictionPoint::from(already.clone())),
            Some(already)
        );
        assert_eq!(summarize(&PredictionPoint::from(sampled("t", vec![]))), None);
    }

    #[test]
    fn test_unparseable_timestamps_are_reanchored() {
        let points = vec![
            sampled("2024-01-01T06:00:00Z", vec![1.0]),
            sampled("not-a-time", vec![2.0]),
            sampled("2024-01-01T08:00:00Z", vec![]),
            sampled("", vec![3.0]),
        ];
        let summaries = summarize_predictions(&points, at(6, 0));

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].timestamp, "2024-01-01T06:00:00Z");
        assert_eq!(summaries[1].timestamp, "2024-01-01T07:00:00Z");
        assert_eq!(summaries[2].timestamp, "2024-01-01T09:00:00Z");
    }

    #[test]
    fn test_trim_history_window() {
        let history: Vec<HistoricalPoint> =
            (0..10).map(|h| bar(at(h, 0), f64::from(h))).collect();
        let trimmed = trim_history(history.clone(), 3);
        assert_eq!(trimmed.len(), 4);
        assert_eq!(trimmed[0].timestamp, at(6, 0));
        assert_eq!(trim_history(history, 0).len(), 10);
    }

    #[test]
    fn test_merge_puts_history_first() {
        let history = vec![bar(at(4, 0), 1.0), bar(at(5, 0), 2.0)];
        let predictions =
            summarize_predictions(&[sampled("2024-01-01T06:00:00Z", vec![3.0])], at(6, 0));
        let timeline = merge_timeline(&history, &predictions);

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[0].timestamp, "2024-01-01T04:00:00Z");
        assert!(!timeline[1].is_forecast);
        assert_eq!(timeline[1].close, Some(2.0));
        assert!(timeline[2].is_forecast);
        assert_eq!(timeline[2].mean_prediction, Some(3.0));
        assert_eq!(timeline[2].close, None);
    }
}
