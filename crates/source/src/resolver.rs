//! # 回退解析器
//!
//! 用单一的有序策略链取代按数据集复制的嵌套 try/catch：
//! 依次尝试每个策略，吸收一切失败，首个成功者胜出；
//! 若全部失败且链上挂载了合成兜底，则返回合成数据。

use pricecast_core::cache::error::CacheError;
use pricecast_core::cache::port::PayloadCache;
use pricecast_core::common::DatasetKey;
use pricecast_core::source::entity::{ResolvedPayload, SourceTag};
use pricecast_core::source::error::{FailedAttempt, ResolveError, SourceError};
use pricecast_core::source::port::{SourceStrategy, SyntheticSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// # Summary
/// 有序后端策略链，可选地以合成兜底收尾。
///
/// # Invariants
/// - 策略按插入顺序尝试。
/// - 挂载了兜底的链对具有合成形态的数据集（看板）是全函数。
#[derive(Clone, Default)]
pub struct BackendChain {
    strategies: Vec<Arc<dyn SourceStrategy>>,
    fallback: Option<Arc<dyn SyntheticSource>>,
}

impl BackendChain {
    pub fn new(strategies: Vec<Arc<dyn SourceStrategy>>) -> Self {
        Self {
            strategies,
            fallback: None,
        }
    }

    /// 追加一个策略到链尾（兜底之前）
    pub fn then(mut self, strategy: Arc<dyn SourceStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn SyntheticSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn strategies(&self) -> &[Arc<dyn SourceStrategy>] {
        &self.strategies
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// 链上各策略的来源标记，按尝试顺序
    pub fn tags(&self) -> Vec<SourceTag> {
        let mut tags: Vec<SourceTag> = self.strategies.iter().map(|s| s.tag()).collect();
        if self.fallback.is_some() {
            tags.push(SourceTag::Mock);
        }
        tags
    }
}

/// 解析并解码后的值及其来源
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: SourceTag,
}

/// # Summary
/// 通用回退解析器。
///
/// # Invariants
/// - 不持有请求级状态；同一输入在后端不变时产出相同来源标记。
/// - 单次尝试受 `timeout` 约束，超时按失败处理并继续下一个策略。
/// - 缓存（若有）只写入权威且解码成功的载荷。
#[derive(Clone)]
pub struct Resolver {
    timeout: Option<Duration>,
    cache: Option<Arc<dyn PayloadCache>>,
}

impl Resolver {
    /// 以单次尝试超时构造；零时长表示不设超时
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: (!timeout.is_zero()).then_some(timeout),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn PayloadCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// # Summary
    /// 依次尝试策略链，返回首个成功的原始载荷。
    ///
    /// # Returns
    /// 成功返回载荷；链耗尽且无兜底时返回 `ResolveError::Exhausted`。
    pub async fn resolve(
        &self,
        key: &DatasetKey,
        chain: &BackendChain,
    ) -> Result<ResolvedPayload, ResolveError> {
        self.resolve_with(key, chain, |payload| Ok(payload.clone()))
            .await
            .map(|resolved| resolved.value)
    }

    /// # Summary
    /// 依次尝试策略链，并在链内完成解码。
    ///
    /// # Logic
    /// 1. 若配置了缓存，先查缓存；命中且可解码则直接返回。
    /// 2. 按顺序执行每个策略，单次尝试受超时约束。
    /// 3. 获取失败或解码失败（上游数据损坏）都记录日志并继续下一个策略。
    /// 4. 首个成功者写入缓存（仅权威数据）后返回。
    /// 5. 全部失败时，若有兜底则解码合成载荷，否则返回耗尽错误。
    ///
    /// # Arguments
    /// * `key`: 数据集键。
    /// * `chain`: 有序策略链。
    /// * `decode`: 数据集专用解码函数。
    ///
    /// # Returns
    /// 解码后的值及来源标记，或 `ResolveError::Exhausted`（携带所有失败记录）。
    pub async fn resolve_with<T, F>(
        &self,
        key: &DatasetKey,
        chain: &BackendChain,
        decode: F,
    ) -> Result<Resolved<T>, ResolveError>
    where
        T: Send,
        F: Fn(&ResolvedPayload) -> Result<T, SourceError> + Send + Sync,
    {
        if let Some(hit) = self.lookup_cache(key, &decode).await {
            return Ok(hit);
        }

        let mut attempts = Vec::with_capacity(chain.strategies().len());

        for strategy in chain.strategies() {
            let tag = strategy.tag();
            let outcome = self
                .fetch_once(strategy.as_ref(), key)
                .await
                .and_then(|payload| decode(&payload).map(|value| (value, payload)));

            match outcome {
                Ok((value, payload)) => {
                    debug!("Resolved {} from {} backend", key, tag);
                    self.store_cache(key, payload).await;
                    return Ok(Resolved { value, source: tag });
                }
                Err(SourceError::NotConfigured) => {
                    debug!("Skipping unconfigured {} backend for {}", tag, key);
                    attempts.push(FailedAttempt {
                        source: tag,
                        error: SourceError::NotConfigured,
                    });
                }
                Err(error) => {
                    warn!("{} backend failed for {}: {}", tag, key, error);
                    attempts.push(FailedAttempt { source: tag, error });
                }
            }
        }

        if let Some(payload) = chain.fallback.as_ref().and_then(|f| f.synthesize(key)) {
            match decode(&payload) {
                Ok(value) => {
                    info!(
                        "All {} backends failed for {}, serving synthetic data",
                        attempts.len(),
                        key
                    );
                    return Ok(Resolved {
                        value,
                        source: payload.source,
                    });
                }
                Err(error) => {
                    warn!("Synthetic fallback could not be decoded for {}: {}", key, error);
                    attempts.push(FailedAttempt {
                        source: payload.source,
                        error,
                    });
                }
            }
        }

        warn!("No backend could serve {}", key);
        Err(ResolveError::Exhausted {
            key: key.clone(),
            attempts,
        })
    }

    async fn fetch_once(
        &self,
        strategy: &dyn SourceStrategy,
        key: &DatasetKey,
    ) -> Result<ResolvedPayload, SourceError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, strategy.fetch(key))
                .await
                .unwrap_or(Err(SourceError::Timeout(limit))),
            None => strategy.fetch(key).await,
        }
    }

    async fn lookup_cache<T, F>(&self, key: &DatasetKey, decode: &F) -> Option<Resolved<T>>
    where
        F: Fn(&ResolvedPayload) -> Result<T, SourceError>,
    {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(Some(payload)) => match decode(&payload) {
                Ok(value) => {
                    debug!("Cache hit for {}", key);
                    Some(Resolved {
                        value,
                        source: payload.source,
                    })
                }
                Err(error) => {
                    warn!("Dropping undecodable cache entry for {}: {}", key, error);
                    if let Err(e) = cache.invalidate(key).await {
                        warn!("Cache invalidate failed for {}: {}", key, e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Cache lookup failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn store_cache(&self, key: &DatasetKey, payload: ResolvedPayload) {
        let Some(cache) = &self.cache else {
            return;
        };
        match cache.put(key, payload).await {
            Ok(()) => {}
            Err(CacheError::NotAuthoritative(tag)) => {
                debug!("Not caching {} payload for {}", tag, key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_core::common::DatasetType;
    use pricecast_core::source::entity::PayloadFormat;
    use pricecast_core::testing::StubStrategy;

    fn key() -> DatasetKey {
        DatasetKey::new("btc", DatasetType::Prediction)
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let remote = Arc::new(StubStrategy::ok(SourceTag::Remote, "r", PayloadFormat::Csv));
        let local = Arc::new(StubStrategy::ok(SourceTag::Local, "l", PayloadFormat::Csv));
        let chain = BackendChain::new(vec![remote.clone(), local.clone()]);

        let payload = Resolver::new(Duration::from_secs(1))
            .resolve(&key(), &chain)
            .await
            .unwrap();
        assert_eq!(payload.source, SourceTag::Remote);
        assert_eq!(&payload.body[..], b"r");
        assert_eq!(remote.calls(), 1);
        assert_eq!(local.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_remote_falls_through_to_local() {
        let local_only = BackendChain::new(vec![Arc::new(StubStrategy::ok(
            SourceTag::Local,
            "local-body",
            PayloadFormat::Csv,
        ))]);
        let with_failing_remote = BackendChain::new(vec![
            Arc::new(StubStrategy::failing(SourceTag::Remote, SourceError::Status(503))),
            Arc::new(StubStrategy::ok(SourceTag::Local, "local-body", PayloadFormat::Csv)),
        ]);

        let resolver = Resolver::new(Duration::from_secs(1));
        let expected = resolver.resolve(&key(), &local_only).await.unwrap();
        let actual = resolver.resolve(&key(), &with_failing_remote).await.unwrap();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_exhausted_chain_reports_every_attempt() {
        let chain = BackendChain::new(vec![
            Arc::new(StubStrategy::failing(SourceTag::Remote, SourceError::NotConfigured)),
            Arc::new(StubStrategy::failing(
                SourceTag::Local,
                SourceError::Unavailable("missing".into()),
            )),
        ]);

        let err = Resolver::new(Duration::from_secs(1))
            .resolve(&key(), &chain)
            .await
            .unwrap_err();
        let ResolveError::Exhausted { key: failed_key, attempts } = err;
        assert_eq!(failed_key, key());
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].source, SourceTag::Remote);
        assert_eq!(attempts[1].error, SourceError::Unavailable("missing".into()));
    }

    #[tokio::test]
    async fn test_decode_failure_moves_to_next_backend() {
        let chain = BackendChain::new(vec![
            Arc::new(StubStrategy::ok(SourceTag::Remote, "not-a-number", PayloadFormat::Csv)),
            Arc::new(StubStrategy::ok(SourceTag::Local, "42", PayloadFormat::Csv)),
        ]);

        let resolved = Resolver::new(Duration::from_secs(1))
            .resolve_with(&key(), &chain, |payload| {
                payload
                    .text()?
                    .parse::<i32>()
                    .map_err(|e| SourceError::Malformed(e.to_string()))
            })
            .await
            .unwrap();
        assert_eq!(resolved.value, 42);
        assert_eq!(resolved.source, SourceTag::Local);
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let chain = BackendChain::new(vec![
            Arc::new(
                StubStrategy::ok(SourceTag::Remote, "late", PayloadFormat::Csv)
                    .with_delay(Duration::from_millis(500)),
            ),
            Arc::new(StubStrategy::ok(SourceTag::Local, "on-time", PayloadFormat::Csv)),
        ]);

        let payload = Resolver::new(Duration::from_millis(50))
            .resolve(&key(), &chain)
            .await
            .unwrap();
        assert_eq!(payload.source, SourceTag::Local);
    }

    #[tokio::test]
    async fn test_repeated_resolution_is_stable() {
        let chain = BackendChain::new(vec![
            Arc::new(StubStrategy::failing(SourceTag::Remote, SourceError::Status(404))),
            Arc::new(StubStrategy::ok(SourceTag::Local, "x", PayloadFormat::Csv)),
        ]);
        let resolver = Resolver::new(Duration::from_secs(1));

        let first = resolver.resolve(&key(), &chain).await.unwrap();
        let second = resolver.resolve(&key(), &chain).await.unwrap();
        assert_eq!(first.source, second.source);
    }

    #[test]
    fn test_chain_tags_include_fallback() {
        struct Nothing;
        impl SyntheticSource for Nothing {
            fn synthesize(&self, key: &DatasetKey) -> Option<ResolvedPayload> {
                Some(ResolvedPayload::new(key.to_string(), SourceTag::Mock, PayloadFormat::Json))
            }
        }

        let chain = BackendChain::default()
            .then(Arc::new(StubStrategy::ok(SourceTag::Static, "", PayloadFormat::Json)))
            .with_fallback(Arc::new(Nothing));
        assert!(chain.has_fallback());
        assert_eq!(chain.tags(), vec![SourceTag::Static, SourceTag::Mock]);
    }
}
