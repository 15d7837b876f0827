//! # `pricecast-dataset` - 数据集适配器
//!
//! 每个适配器持有一条后端策略链，经 `Resolver` 解析后把原始载荷
//! 规范化为领域实体，并实现 `pricecast-core` 中对应的端口。

pub mod builder;
pub mod samples;
pub mod dashboard;
pub mod historical;
pub mod prediction;
