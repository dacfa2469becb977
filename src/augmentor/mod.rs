//! # 图片增强模块（augmentor）
//!
//! ## 设计思路
//!
//! 该模块将“解码 → 画布留白 → 光度变换 → 几何变换 → 中心提取 → 编码”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：工厂函数 `create_augmentor`（薄封装）
//! - `handler`：`Augmentor` 编排整条处理流水线 + 阶段耗时日志
//! - `codec`：解码、像素限制、编码与压平
//! - `pipeline`：同步核心流程（只处理内存栅格）
//! - `sampler`：按配置抽取随机参数
//! - `canvas` / `geometric` / `photometric` / `extract`：各阶段变换
//! - `resize`：统一的缩放与中心裁剪
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! create_augmentor(config)
//!    ↓
//! service.rs（返回可复用的增强函数）
//!    ↓
//! handler.rs（spawn_blocking + 阶段耗时日志）
//!    ├─ codec.rs（解码 + 像素限制）
//!    ├─ pipeline.rs（canvas → photometric → geometric → extract）
//!    └─ codec.rs（编码 + 压平）
//!    ↓
//! 返回 Result<Vec<u8>, AugmentError>
//! ```
//!
//! ## 分层职责建议
//!
//! - 配置字段与默认值变更优先改 `config.rs`
//! - 采样策略（范围、上下限）变更优先改 `sampler.rs`
//! - 阶段顺序变更优先改 `pipeline.rs` 与 `geometric::apply`
//! - 输出格式 / 通道处理变更优先改 `codec.rs`

mod canvas;
mod codec;
mod config;
mod error;
mod extract;
mod geometric;
mod handler;
mod photometric;
mod pipeline;
mod resize;
mod sampler;
mod service;
mod source;

pub use config::{AugmentConfig, BackgroundColor, OutputFormat, QualityProfile};
pub use error::AugmentError;
pub use handler::{Augmentor, RngSource};
pub use pipeline::{augment_image, transform};
pub use sampler::{SampledParameters, ZoomPlan};
pub use service::{AugmentFuture, create_augmentor, into_fn};
pub use source::AugmentReport;
