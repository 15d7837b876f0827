//! 预测样本 CSV 解析。
//!
//! 格式：首行为表头（只用于占位），其后每行一个预测时间点，
//! 第 0 列为时间戳，第 1..N 列为各采样路径的预测值。

use pricecast_core::dataset::entity::SampledPrediction;
use std::collections::HashMap;
use tracing::warn;

/// 单行解析结果：原始行号、列数、时间戳原文与可解析的样本值
struct SampleRow {
    line: usize,
    fields: usize,
    timestamp: String,
    values: Vec<f64>,
}

/// # Summary
/// 把 CSV 文本拆成样本行。
///
/// # Logic
/// 1. 去掉首尾空白后逐行读取，第 0 行为表头被跳过；允许各行列数不一致。
/// 2. 每行保留其原始行号，空行与短行同样占用行号。
/// 3. 非数值（或非有限值）单元格从该行样本中剔除，而不是拒绝整行。
fn read_rows(text: &str) -> Vec<SampleRow> {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(csv::Trim::All);

    let mut rows = Vec::new();
    for (line, raw) in text.trim().lines().enumerate().skip(1) {
        let record = match builder.from_reader(raw.as_bytes()).records().next() {
            Some(Ok(record)) => record,
            Some(Err(e)) => {
                warn!("Skipping unreadable prediction row {}: {}", line, e);
                continue;
            }
            None => csv::StringRecord::new(),
        };

        let timestamp = record.get(0).unwrap_or_default().to_string();
        let values = record
            .iter()
            .skip(1)
            .filter_map(|cell| cell.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();
        rows.push(SampleRow {
            line,
            fields: record.len(),
            timestamp,
            values,
        });
    }
    rows
}

/// # Summary
/// 解析收盘价预测 CSV，并按行号拼接可选的成交量预测 CSV。
///
/// # Logic
/// 1. 分别解析两份 CSV；收盘价中少于 2 列的行被丢弃。
/// 2. 成交量按原始行号（而非时间戳）对齐，被丢弃的收盘价行同样占用行号；
///    行数不一致时，超出较短序列的行没有成交量预测。
/// 3. 没有任何数值的成交量行视为无成交量预测。
///
/// # Arguments
/// * `close_csv`: 收盘价预测 CSV 原文。
/// * `volume_csv`: 可选的成交量预测 CSV 原文。
///
/// # Returns
/// 按 CSV 顺序排列的样本预测点。
pub fn parse_prediction_csv(close_csv: &str, volume_csv: Option<&str>) -> Vec<SampledPrediction> {
    let mut volume_by_line: HashMap<usize, Vec<f64>> = volume_csv
        .map(read_rows)
        .unwrap_or_default()
        .into_iter()
        .map(|row| (row.line, row.values))
        .collect();

    read_rows(close_csv)
        .into_iter()
        .filter(|row| row.fields >= 2)
        .map(|row| SampledPrediction {
            volume_predictions: volume_by_line
                .remove(&row.line)
                .filter(|values| !values.is_empty()),
            timestamp: row.timestamp,
            close_predictions: row.values,
        })
        .collect()
}
