use chrono::{Duration as ChronoDuration, Utc};
use pricecast_cache::mem::MemPayloadCache;
use pricecast_core::common::time::FakeClockProvider;
use pricecast_core::common::{DatasetKey, DatasetType};
use pricecast_core::source::entity::SourceTag;
use pricecast_core::source::error::SourceError;
use pricecast_core::testing::StubStrategy;
use pricecast_source::local::LocalFileStore;
use pricecast_source::mock::MockSource;
use pricecast_source::resolver::{BackendChain, Resolver};
use pricecast_source::static_asset::StaticAssetStore;
use std::sync::Arc;
use std::time::Duration;

fn dashboard_chain(root: &std::path::Path) -> BackendChain {
    let clock = Arc::new(FakeClockProvider::new(Utc::now()));
    BackendChain::new(vec![
        Arc::new(StubStrategy::failing(SourceTag::Remote, SourceError::NotConfigured)),
        Arc::new(LocalFileStore::new(root.join("local"))),
        Arc::new(StaticAssetStore::new(root.join("public"))),
    ])
    .with_fallback(Arc::new(MockSource::new(clock)))
}

#[tokio::test]
async fn test_dashboard_chain_prefers_local_then_static_then_mock() {
    let tmp = tempfile::tempdir().unwrap();
    let chain = dashboard_chain(tmp.path());
    let resolver = Resolver::new(Duration::from_secs(1));
    let key = DatasetKey::new("btc", DatasetType::Dashboard);

    // 什么都没有：合成兜底
    let payload = resolver.resolve(&key, &chain).await.unwrap();
    assert_eq!(payload.source, SourceTag::Mock);

    // 静态文件存在
    std::fs::create_dir_all(tmp.path().join("public/data")).unwrap();
    std::fs::write(tmp.path().join("public/data/dashboard.json"), b"{}").unwrap();
    let payload = resolver.resolve(&key, &chain).await.unwrap();
    assert_eq!(payload.source, SourceTag::Static);

    // 本地记录存在
    std::fs::create_dir_all(tmp.path().join("local/records")).unwrap();
    std::fs::write(tmp.path().join("local/records/latest_btc.json"), b"{}").unwrap();
    let payload = resolver.resolve(&key, &chain).await.unwrap();
    assert_eq!(payload.source, SourceTag::Local);
}

#[tokio::test]
async fn test_unsafe_symbol_lands_on_fallback() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(tmp.path().join("local/records")).unwrap();
    let chain = dashboard_chain(tmp.path());

    let payload = Resolver::new(Duration::from_secs(1))
        .resolve(&DatasetKey::new("../../etc", DatasetType::Dashboard), &chain)
        .await
        .unwrap();
    assert_eq!(payload.source, SourceTag::Mock);
}

#[tokio::test]
async fn test_cache_skips_mock_and_serves_authoritative_hits() {
    let clock = Arc::new(FakeClockProvider::new(Utc::now()));
    let cache = Arc::new(MemPayloadCache::new(ChronoDuration::seconds(30), clock.clone()));
    let resolver = Resolver::new(Duration::from_secs(1)).with_cache(cache.clone());

    let mock_only = BackendChain::default().with_fallback(Arc::new(MockSource::new(clock.clone())));
    let key = DatasetKey::new("btc", DatasetType::Dashboard);
    resolver.resolve(&key, &mock_only).await.unwrap();
    assert!(cache.is_empty());

    let remote = Arc::new(StubStrategy::ok(
        SourceTag::Remote,
        "{}",
        pricecast_core::source::entity::PayloadFormat::Json,
    ));
    let chain = BackendChain::new(vec![remote.clone()]);
    resolver.resolve(&key, &chain).await.unwrap();
    resolver.resolve(&key, &chain).await.unwrap();
    assert_eq!(remote.calls(), 1);

    // 过期后重新回源
    clock.advance(ChronoDuration::seconds(31));
    let payload = resolver.resolve(&key, &chain).await.unwrap();
    assert_eq!(payload.source, SourceTag::Remote);
    assert_eq!(remote.calls(), 2);
}

#[tokio::test]
async fn test_mock_tagged_strategy_is_never_cached() {
    let clock = Arc::new(FakeClockProvider::new(Utc::now()));
    let cache = Arc::new(MemPayloadCache::new(ChronoDuration::seconds(30), clock));
    let resolver = Resolver::new(Duration::from_secs(1)).with_cache(cache.clone());

    let synthetic = Arc::new(StubStrategy::ok(
        SourceTag::Mock,
        "{}",
        pricecast_core::source::entity::PayloadFormat::Json,
    ));
    let chain = BackendChain::new(vec![synthetic.clone()]);
    let key = DatasetKey::new("btc", DatasetType::Dashboard);

    resolver.resolve(&key, &chain).await.unwrap();
    resolver.resolve(&key, &chain).await.unwrap();
    assert_eq!(synthetic.calls(), 2);
    assert!(cache.is_empty());
}
