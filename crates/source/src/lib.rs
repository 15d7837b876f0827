//! # `pricecast-source` - 数据后端与回退解析器
//!
//! 提供四类获取策略（远端对象存储、本地文件、静态资源、合成兜底），
//! 以及按顺序尝试策略链的通用 `Resolver`。

pub mod layout;
pub mod local;
pub mod mock;
pub mod remote;
pub mod resolver;
pub mod static_asset;
