//! # 中间数据模型
//!
//! - `DecodedImage` 表示已解码、统一为 RGBA 的输入图像及其原始元信息
//! - `AugmentReport` 表示单次增强的阶段耗时与采样结果（用于日志与诊断）

use std::time::Duration;

use image::{ImageFormat, RgbaImage};

use super::sampler::SampledParameters;

/// 解码阶段输出。
pub struct DecodedImage {
    /// RGBA 像素。
    pub pixels: RgbaImage,
    /// 输入的编码格式，`OutputFormat::Original` 时沿用。
    pub format: ImageFormat,
    /// 输入是否带 alpha 通道。
    pub has_alpha: bool,
}

impl DecodedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// 单次增强的诊断信息。
#[derive(Debug, Clone)]
pub struct AugmentReport {
    pub params: SampledParameters,
    pub decode: Duration,
    pub transform: Duration,
    pub encode: Duration,
    pub total: Duration,
}
