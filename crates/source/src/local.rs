use async_trait::async_trait;
use pricecast_core::common::{DatasetKey, is_path_safe_symbol};
use pricecast_core::source::entity::{ResolvedPayload, SourceTag};
use pricecast_core::source::error::SourceError;
use pricecast_core::source::port::SourceStrategy;
use std::path::{Path, PathBuf};

use crate::layout::{local_relative_path, payload_format};

/// # Summary
/// 本地数据目录获取策略，目录结构与远端 bucket 基本一致。
///
/// # Invariants
/// - 只读；不包含路径分隔符或 `..` 的标的代码才会被拼接进路径。
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 数据集键对应的本地文件路径
    pub fn path_for(&self, key: &DatasetKey) -> PathBuf {
        self.root.join(local_relative_path(key))
    }
}

#[async_trait]
impl SourceStrategy for LocalFileStore {
    fn tag(&self) -> SourceTag {
        SourceTag::Local
    }

    async fn fetch(&self, key: &DatasetKey) -> Result<ResolvedPayload, SourceError> {
        if !is_path_safe_symbol(key.symbol()) {
            return Err(SourceError::Unavailable(format!(
                "refusing unsafe symbol {:?}",
                key.symbol()
            )));
        }

        let path = self.path_for(key);
        let body = tokio::fs::read(&path)
            .await
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", path.display(), e)))?;

        Ok(ResolvedPayload::new(
            body,
            SourceTag::Local,
            payload_format(key.dataset()),
        ))
    }
}
