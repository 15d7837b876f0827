use async_trait::async_trait;
use pricecast_core::common::DatasetKey;
use pricecast_core::source::entity::{ResolvedPayload, SourceTag};
use pricecast_core::source::error::SourceError;
use pricecast_core::source::port::SourceStrategy;
use std::path::PathBuf;

use crate::layout::{payload_format, static_asset_path};

/// # Summary
/// 随前端一同发布的静态资源兜底。
///
/// # Invariants
/// - 静态文件不区分标的，所有标的读取同一份 `data/dashboard.json`。
/// - 没有静态文件约定的数据集直接返回 `NotConfigured`。
pub struct StaticAssetStore {
    dir: PathBuf,
}

impl StaticAssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SourceStrategy for StaticAssetStore {
    fn tag(&self) -> SourceTag {
        SourceTag::Static
    }

    async fn fetch(&self, key: &DatasetKey) -> Result<ResolvedPayload, SourceError> {
        let relative = static_asset_path(key.dataset()).ok_or(SourceError::NotConfigured)?;
        let path = self.dir.join(relative);
        let body = tokio::fs::read(&path)
            .await
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", path.display(), e)))?;

        Ok(ResolvedPayload::new(
            body,
            SourceTag::Static,
            payload_format(key.dataset()),
        ))
    }
}
