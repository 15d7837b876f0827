//! # `pricecast-api` - HTTP API 层
//!
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 解析查询参数中的标的代码（缺失时使用配置的默认标的）
//! - 调用注入的数据集端口与图表聚合端口
//! - 将领域错误映射为 HTTP 状态码与 JSON 响应体

pub mod types;
pub mod error;
pub mod routes;
pub mod server;
