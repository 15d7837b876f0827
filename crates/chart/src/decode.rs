//! Parquet 历史 K 线解码。

use arrow::array::{Array, ArrayRef, Float64Array, TimestampMillisecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pricecast_core::chart::error::ChartError;
use pricecast_core::dataset::entity::HistoricalPoint;
use tracing::debug;

/// 时间戳列的候选名称，按优先级排列
const TIMESTAMP_COLUMNS: [&str; 6] = [
    "timestamp",
    "time",
    "datetime",
    "date",
    "open_time",
    "__index_level_0__",
];

fn decode_err(e: impl std::fmt::Display) -> ChartError {
    ChartError::Decode(e.to_string())
}

/// 按名称（不区分大小写）查找列
fn find_column(batch: &RecordBatch, name: &str) -> Option<ArrayRef> {
    let schema = batch.schema();
    schema
        .fields()
        .iter()
        .position(|f| f.name().eq_ignore_ascii_case(name))
        .map(|index| batch.column(index).clone())
}

fn timestamp_column(batch: &RecordBatch) -> Result<TimestampMillisecondArray, ChartError> {
    let column = TIMESTAMP_COLUMNS
        .iter()
        .find_map(|name| find_column(batch, name))
        .ok_or_else(|| ChartError::Decode("no timestamp column".to_string()))?;

    let casted = cast(
        &column,
        &DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
    )
    .map_err(decode_err)?;
    casted
        .as_any()
        .downcast_ref::<TimestampMillisecondArray>()
        .cloned()
        .ok_or_else(|| ChartError::Decode("invalid timestamp column".to_string()))
}

/// 数值列统一转换为 f64；缺失的列返回 None
fn float_column(batch: &RecordBatch, name: &str) -> Result<Option<Float64Array>, ChartError> {
    let Some(column) = find_column(batch, name) else {
        return Ok(None);
    };
    let casted = cast(&column, &DataType::Float64).map_err(decode_err)?;
    casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .map(Some)
        .ok_or_else(|| ChartError::Decode(format!("invalid {} column", name)))
}

/// 取第 `i` 行的值，空值或缺列时为 0
fn value_or_zero(column: Option<&Float64Array>, i: usize) -> f64 {
    match column {
        Some(values) if values.is_valid(i) => values.value(i),
        _ => 0.0,
    }
}

/// # Summary
/// 将 Parquet 二进制内容解码为按时间升序排列的 K 线序列。
///
/// # Logic
/// 1. 时间戳列取 `timestamp`、`time`、`datetime`、`date`、`open_time`、
///    `__index_level_0__` 中第一个存在的列，统一转换为毫秒级 UTC 时间戳。
/// 2. OHLCV 列名不区分大小写，统一转换为 f64；`close` 列必须存在。
/// 3. 时间戳或收盘价为空的行被跳过，其余空值按 0 处理。
/// 4. 结果按时间戳升序排序。
///
/// # Arguments
/// * `data`: Parquet 文件的完整内容。
///
/// # Returns
/// K 线序列；内容无法解析时返回 `ChartError::Decode`。
pub fn decode_historical(data: Bytes) -> Result<Vec<HistoricalPoint>, ChartError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)
        .map_err(decode_err)?
        .build()
        .map_err(decode_err)?;

    let mut points = Vec::new();
    for batch in reader {
        let batch = batch.map_err(decode_err)?;

        let timestamps = timestamp_column(&batch)?;
        let close = float_column(&batch, "close")?
            .ok_or_else(|| ChartError::Decode("no close column".to_string()))?;
        let open = float_column(&batch, "open")?;
        let high = float_column(&batch, "high")?;
        let low = float_column(&batch, "low")?;
        let volume = float_column(&batch, "volume")?;

        for i in 0..batch.num_rows() {
            if timestamps.is_null(i) || close.is_null(i) {
                continue;
            }
            let Some(timestamp) = DateTime::from_timestamp_millis(timestamps.value(i)) else {
                continue;
            };
            points.push(HistoricalPoint {
                timestamp,
                open: value_or_zero(open.as_ref(), i),
                high: value_or_zero(high.as_ref(), i),
                low: value_or_zero(low.as_ref(), i),
                close: close.value(i),
                volume: value_or_zero(volume.as_ref(), i),
            });
        }
    }

    points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    debug!("Decoded {} historical points", points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray, TimestampMicrosecondArray};
    use arrow::datatypes::{Field, Schema};
    use chrono::{TimeZone, Utc};
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    fn write_parquet(batch: RecordBatch) -> Bytes {
        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        Bytes::from(buf)
    }

    fn hour_ms(h: i64) -> i64 {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp_millis() + h * 3_600_000
    }

    #[test]
    fn test_decodes_and_sorts_ohlcv() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
                false,
            ),
            Field::new("open", DataType::Float64, true),
            Field::new("high", DataType::Float64, true),
            Field::new("low", DataType::Float64, true),
            Field::new("close", DataType::Float64, true),
            Field::new("volume", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(
                    TimestampMillisecondArray::from(vec![hour_ms(2), hour_ms(0), hour_ms(1)])
                        .with_timezone("UTC"),
                ),
                Arc::new(Float64Array::from(vec![3.0, 1.0, 2.0])),
                Arc::new(Float64Array::from(vec![3.5, 1.5, 2.5])),
                Arc::new(Float64Array::from(vec![2.5, 0.5, 1.5])),
                Arc::new(Float64Array::from(vec![3.2, 1.2, 2.2])),
                Arc::new(Float64Array::from(vec![Some(30.0), None, Some(20.0)])),
            ],
        )
        .unwrap();

        let points = decode_historical(write_parquet(batch)).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(
            points[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(points[0].close, 1.2);
        assert_eq!(points[0].volume, 0.0);
        assert_eq!(points[2].open, 3.0);
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_alternate_names_and_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(
                "__index_level_0__",
                DataType::Timestamp(TimeUnit::Microsecond, None),
                true,
            ),
            Field::new("Close", DataType::Int64, true),
            Field::new("Volume", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(TimestampMicrosecondArray::from(vec![
                    Some(hour_ms(0) * 1000),
                    None,
                    Some(hour_ms(1) * 1000),
                ])),
                Arc::new(Int64Array::from(vec![Some(100), Some(101), None])),
                Arc::new(Int64Array::from(vec![7, 8, 9])),
            ],
        )
        .unwrap();

        let points = decode_historical(write_parquet(batch)).unwrap();
        // 第二行缺时间戳，第三行缺收盘价
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 100.0);
        assert_eq!(points[0].volume, 7.0);
        assert_eq!(points[0].open, 0.0);
    }

    #[test]
    fn test_missing_columns_are_decode_errors() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("symbol", DataType::Utf8, false),
            Field::new("close", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["btc"])),
                Arc::new(Float64Array::from(vec![1.0])),
            ],
        )
        .unwrap();
        assert!(matches!(
            decode_historical(write_parquet(batch)),
            Err(ChartError::Decode(_))
        ));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            decode_historical(Bytes::from_static(b"not a parquet file")),
            Err(ChartError::Decode(_))
        ));
    }
}
