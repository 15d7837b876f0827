use thiserror::Error;

use crate::source::entity::SourceTag;

/// # Summary
/// 缓存域错误枚举。
///
/// # Invariants
/// - 缓存错误永远不影响解析结果，调用方记录日志后按未命中处理。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    // 合成数据不得入缓存
    #[error("Refusing to cache {0} payload")]
    NotAuthoritative(SourceTag),
}
