use async_trait::async_trait;
use pricecast_core::common::{DatasetKey, is_path_safe_symbol};
use pricecast_core::source::entity::{ResolvedPayload, SourceTag};
use pricecast_core::source::error::SourceError;
use pricecast_core::source::port::SourceStrategy;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::layout::{payload_format, remote_object_path};

/// # Summary
/// 远端对象存储（公开读的 bucket 前缀）获取策略。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 未配置前缀时每次获取都返回 `SourceError::NotConfigured`。
#[derive(Clone)]
pub struct RemoteObjectStore {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 去除尾部斜杠的公开访问前缀
    base_url: Option<String>,
}

impl RemoteObjectStore {
    /// # Summary
    /// 创建一个新的 RemoteObjectStore 实例。
    ///
    /// # Logic
    /// 1. 确保进程级 TLS 加密后端已安装。
    /// 2. 规范化前缀：去除空白与尾部斜杠，空串视为未配置。
    /// 3. 以给定超时初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `base_url`: 对象存储公开前缀，可为空。
    /// * `timeout`: 传输层超时。
    ///
    /// # Returns
    /// 成功返回实例，客户端构建失败返回 `SourceError::Unavailable`。
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Result<Self, SourceError> {
        ensure_crypto_provider();

        let base_url = base_url
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// 拼接完整对象 URL，未配置时返回 None
    pub fn object_url(&self, key: &DatasetKey) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}/{}", base, remote_object_path(key)))
    }
}

#[async_trait]
impl SourceStrategy for RemoteObjectStore {
    fn tag(&self) -> SourceTag {
        SourceTag::Remote
    }

    /// # Summary
    /// 从对象存储读取原始对象。
    ///
    /// # Logic
    /// 1. 按路径约定拼出对象 URL；含路径分隔符或 `..` 的标的直接拒绝。
    /// 2. 携带 `Cache-Control: no-cache` 发起 GET，绕过中间缓存。
    /// 3. 非 2xx 视为失败，成功则整体读取响应体。
    async fn fetch(&self, key: &DatasetKey) -> Result<ResolvedPayload, SourceError> {
        let url = self.object_url(key).ok_or(SourceError::NotConfigured)?;
        if !is_path_safe_symbol(key.symbol()) {
            return Err(SourceError::Unavailable(format!(
                "refusing unsafe symbol {:?}",
                key.symbol()
            )));
        }
        debug!("Fetching remote object {}", url);

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status().as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        Ok(ResolvedPayload::new(
            body,
            SourceTag::Remote,
            payload_format(key.dataset()),
        ))
    }
}

/// 安装 ring 作为 rustls 的进程级加密后端；已安装时静默跳过。
pub fn ensure_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none()
        && rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
    {
        debug!("rustls crypto provider was installed concurrently");
    }
}
