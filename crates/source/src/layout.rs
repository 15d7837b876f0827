//! 各后端的对象路径约定。远端路径需与上游生产者逐字节保持一致。

use pricecast_core::common::{DatasetKey, DatasetType};
use pricecast_core::source::entity::PayloadFormat;

/// 远端对象存储中的对象路径（不含前缀）
pub fn remote_object_path(key: &DatasetKey) -> String {
    let symbol = key.symbol();
    match key.dataset() {
        DatasetType::Dashboard => format!("records/latest_{}.json", symbol),
        DatasetType::Historical => format!("data/{}_cache.parquet", symbol),
        DatasetType::Prediction => format!("predictions_raw/latest_{}_close.csv", symbol),
        DatasetType::PredictionVolume => format!("predictions_raw/latest_{}_volume.csv", symbol),
    }
}

/// 本地数据根目录下的相对路径
pub fn local_relative_path(key: &DatasetKey) -> String {
    let symbol = key.symbol();
    match key.dataset() {
        DatasetType::Dashboard => format!("records/latest_{}.json", symbol),
        DatasetType::Historical => format!("data/{}_cache.parquet", symbol),
        DatasetType::Prediction => format!("predictions_raw/latest/{}_latest_close.csv", symbol),
        DatasetType::PredictionVolume => {
            format!("predictions_raw/latest/{}_latest_volume.csv", symbol)
        }
    }
}

/// 静态资源目录下的相对路径，只有看板存在静态兜底文件
pub fn static_asset_path(dataset: DatasetType) -> Option<&'static str> {
    match dataset {
        DatasetType::Dashboard => Some("data/dashboard.json"),
        _ => None,
    }
}

pub fn payload_format(dataset: DatasetType) -> PayloadFormat {
    match dataset {
        DatasetType::Dashboard => PayloadFormat::Json,
        DatasetType::Historical => PayloadFormat::Parquet,
        DatasetType::Prediction | DatasetType::PredictionVolume => PayloadFormat::Csv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_paths_are_bit_exact() {
        let key = DatasetKey::new("BTC", DatasetType::Dashboard);
        assert_eq!(remote_object_path(&key), "records/latest_btc.json");
        assert_eq!(
            remote_object_path(&key.with_dataset(DatasetType::Historical)),
            "data/btc_cache.parquet"
        );
        assert_eq!(
            remote_object_path(&key.with_dataset(DatasetType::Prediction)),
            "predictions_raw/latest_btc_close.csv"
        );
        assert_eq!(
            remote_object_path(&key.with_dataset(DatasetType::PredictionVolume)),
            "predictions_raw/latest_btc_volume.csv"
        );
    }

    #[test]
    fn test_local_prediction_paths() {
        let key = DatasetKey::new("eth", DatasetType::Prediction);
        assert_eq!(
            local_relative_path(&key),
            "predictions_raw/latest/eth_latest_close.csv"
        );
        assert_eq!(static_asset_path(DatasetType::Prediction), None);
        assert_eq!(payload_format(DatasetType::Historical), PayloadFormat::Parquet);
    }
}
