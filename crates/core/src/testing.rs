//! 测试替身，仅在 `test-utils` feature 下导出。

use crate::common::DatasetKey;
use crate::source::entity::{PayloadFormat, ResolvedPayload, SourceTag};
use crate::source::error::SourceError;
use crate::source::port::SourceStrategy;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// # Summary
/// 返回预设结果的策略桩，记录调用次数，可选人为延迟。
pub struct StubStrategy {
    tag: SourceTag,
    result: Result<ResolvedPayload, SourceError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubStrategy {
    /// 总是成功返回给定内容
    pub fn ok(tag: SourceTag, body: impl Into<bytes::Bytes>, format: PayloadFormat) -> Self {
        Self {
            tag,
            result: Ok(ResolvedPayload::new(body, tag, format)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// 总是以给定错误失败
    pub fn failing(tag: SourceTag, error: SourceError) -> Self {
        Self {
            tag,
            result: Err(error),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// 每次调用前先等待 `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceStrategy for StubStrategy {
    fn tag(&self) -> SourceTag {
        self.tag
    }

    async fn fetch(&self, _key: &DatasetKey) -> Result<ResolvedPayload, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}
