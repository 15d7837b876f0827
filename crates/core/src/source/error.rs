use std::time::Duration;
use thiserror::Error;

use crate::common::DatasetKey;
use crate::source::entity::SourceTag;

/// # Summary
/// 单次后端尝试的失败原因。
///
/// # Invariants
/// - 全部属于可恢复错误：解析器吸收后继续尝试下一个策略，绝不向上抛出。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    // 网络或文件系统错误
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    // 远端返回非 2xx 状态码
    #[error("HTTP status {0}")]
    Status(u16),
    // 超过单次尝试的超时时间
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
    // 获取成功但内容无法解析，按不可用处理
    #[error("Malformed upstream payload: {0}")]
    Malformed(String),
    // 策略未配置（如缺少远端前缀），直接跳过
    #[error("Backend not configured")]
    NotConfigured,
}

/// 策略链中一次失败尝试的记录，用于日志与最终错误信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub source: SourceTag,
    pub error: SourceError,
}

impl std::fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// # Summary
/// 解析器级错误。
///
/// # Invariants
/// - 仅在策略链耗尽且未配置合成兜底时出现。
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("All backends exhausted for {key} ({} attempts)", .attempts.len())]
    Exhausted {
        key: DatasetKey,
        attempts: Vec<FailedAttempt>,
    },
}
