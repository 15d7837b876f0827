//! 日志初始化：控制台输出，可选按天滚动的文件输出。

use pricecast_core::config::LogConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// 日志文件名前缀
const LOG_FILE_PREFIX: &str = "pricecast.log";

/// # Summary
/// 安装全局 tracing 订阅器。
///
/// # Logic
/// 1. 过滤规则优先读取 `RUST_LOG`，否则使用 `log.filter`。
/// 2. 始终输出到控制台。
/// 3. 配置了 `log.dir` 时额外写入按天滚动的文件（非阻塞写入）。
///
/// # Returns
/// 文件输出的后台写入守卫；调用方必须持有到进程退出，否则尾部日志会丢失。
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    match config.dir.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            registry.try_init()?;
            Ok(None)
        }
    }
}
