//! # 图片增强工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 调用方（训练数据准备 / CLI）              │
//! │                                                          │
//! │   create_augmentor(config) ──► Fn(Vec<u8>) -> Future     │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Result<Vec<u8>, AugmentError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            augmentor                             │
//! │                                                          │
//! │  ┌─ config ───── AugmentConfig（范围 / 背景色 / 输出）     │
//! │  ├─ sampler ──── 每次调用的随机参数                       │
//! │  ├─ canvas ───── 四周留白的工作画布                       │
//! │  ├─ photometric  模糊·锐化·亮度·饱和度·对比度            │
//! │  ├─ geometric ── 错切 → 旋转 → 平移 → 缩放               │
//! │  ├─ extract ──── 中心提取 + 拉伸回原尺寸                  │
//! │  └─ codec ────── 解码 / 编码 / 压平                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`augmentor`] | 增强流水线、配置、工厂函数 |
//! | [`error`] | 命令行层统一错误类型 `AppError` |

pub mod augmentor;
pub mod error;

pub use augmentor::{
    AugmentConfig, AugmentError, AugmentFuture, AugmentReport, Augmentor, BackgroundColor,
    OutputFormat, QualityProfile, RngSource, SampledParameters, ZoomPlan, augment_image,
    create_augmentor, into_fn, transform,
};
