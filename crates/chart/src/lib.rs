//! # `pricecast-chart` - 图表聚合服务
//!
//! 并发获取看板、历史、预测三个数据集，解码历史 K 线，
//! 计算预测起点，并把历史点与汇总后的预测点拼接成一条时间线。

pub mod decode;
pub mod service;
pub mod timeline;
