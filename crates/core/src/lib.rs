//! # `pricecast-core` - 领域核心
//!
//! 定义行情看板的实体、错误与端口 (Port)，不包含任何 IO 实现。
//! 具体的数据源、数据集适配器、聚合服务分别位于独立 crate 中，
//! 通过本 crate 的 trait 以 `Arc<dyn Trait>` 的方式注入。

pub mod common;
pub mod config;

pub mod source {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod dataset {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod chart {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod cache {
    pub mod error;
    pub mod port;
}

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
