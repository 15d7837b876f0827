use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::source::error::SourceError;

/// # Summary
/// 数据来源标记，随每个响应一并返回。
///
/// # Invariants
/// - `Remote` / `Local` / `Static` 为权威数据；`Mock` 为合成数据，前端必须区分展示。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Remote,
    Local,
    Static,
    Mock,
}

impl SourceTag {
    /// 是否为权威数据（非合成）
    pub fn is_authoritative(&self) -> bool {
        !matches!(self, SourceTag::Mock)
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTag::Remote => write!(f, "remote"),
            SourceTag::Local => write!(f, "local"),
            SourceTag::Static => write!(f, "static"),
            SourceTag::Mock => write!(f, "mock"),
        }
    }
}

/// 载荷格式。`Parquet` 即历史数据使用的二进制列式格式，原样透传。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    Json,
    Csv,
    Parquet,
}

impl std::fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadFormat::Json => write!(f, "json"),
            PayloadFormat::Csv => write!(f, "csv"),
            PayloadFormat::Parquet => write!(f, "parquet"),
        }
    }
}

/// # Summary
/// 一次解析成功的数据载荷。
///
/// # Invariants
/// - 每个请求新建，除可选的显式缓存外不跨请求保存。
/// - `body` 使用 `Bytes`，克隆只增加引用计数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPayload {
    pub body: Bytes,
    pub source: SourceTag,
    pub format: PayloadFormat,
}

impl ResolvedPayload {
    pub fn new(body: impl Into<Bytes>, source: SourceTag, format: PayloadFormat) -> Self {
        Self {
            body: body.into(),
            source,
            format,
        }
    }

    /// 以 UTF-8 文本视图读取载荷，非法编码视为上游数据损坏。
    pub fn text(&self) -> Result<&str, SourceError> {
        std::str::from_utf8(&self.body)
            .map_err(|e| SourceError::Malformed(format!("payload is not valid UTF-8: {}", e)))
    }
}
