//! # 参数采样模块
//!
//! ## 设计思路
//!
//! 每次调用时按配置范围为每个已启用效果抽取一个具体随机值，结果只在本次调用内有效。
//! 采样是纯函数：只依赖范围和调用方传入的随机源，方便测试时注入固定种子。
//!
//! ## 采样策略
//!
//! - 对称效果（错切、旋转、亮度、饱和度、对比度、平移）：`[-range, +range]` 均匀分布
//! - 模糊 sigma：`[0.3, min(range * 10, 1000)]`
//! - 锐化 sigma：`[1e-6, min(range * 999999, 10)]`
//! - 缩放：`[-range, +range]`，负数表示缩小，缩小除数不小于 1
//! - 平移：X / Y 独立采样、取整，幅度不超过该轴画布尺寸
//!
//! 范围为 0 的效果不采样，保证“关闭”在观测上就是无操作。

use rand::Rng;

use super::AugmentConfig;

pub const BLUR_SIGMA_MIN: f32 = 0.3;
pub const BLUR_SIGMA_MAX: f32 = 1000.0;
const BLUR_RANGE_SCALE: f64 = 10.0;

pub const SHARPEN_SIGMA_MIN: f32 = 1e-6;
pub const SHARPEN_SIGMA_MAX: f32 = 10.0;
const SHARPEN_RANGE_SCALE: f64 = 999_999.0;

/// `[-range, +range]` 均匀采样。
///
/// 以 `range * U[-1, 1]` 计算，避免极大范围下区间宽度溢出。
pub fn sample_symmetric<R: Rng + ?Sized>(range: f64, rng: &mut R) -> f64 {
    range * rng.random_range(-1.0..=1.0)
}

/// 模糊 sigma，下限优先（`range * 10 < 0.3` 时固定为 0.3）。
pub fn sample_blur_sigma<R: Rng + ?Sized>(range: f64, rng: &mut R) -> f32 {
    let upper = (range * BLUR_RANGE_SCALE).min(BLUR_SIGMA_MAX as f64);
    let raw = rng.random_range(0.0..=1.0) * range * BLUR_RANGE_SCALE;
    (raw.min(upper) as f32).max(BLUR_SIGMA_MIN)
}

pub fn sample_sharpen_sigma<R: Rng + ?Sized>(range: f64, rng: &mut R) -> f32 {
    let upper = (range * SHARPEN_RANGE_SCALE).min(SHARPEN_SIGMA_MAX as f64);
    let raw = rng.random_range(0.0..=1.0) * range * SHARPEN_RANGE_SCALE;
    (raw.min(upper) as f32).max(SHARPEN_SIGMA_MIN)
}

/// 平移偏移量：取整后按画布尺寸截断。
pub fn sample_offset<R: Rng + ?Sized>(range: f64, limit: u32, rng: &mut R) -> i64 {
    let limit = limit as i64;
    let raw = sample_symmetric(range, rng).round();
    (raw.clamp(-(limit as f64), limit as f64)) as i64
}

/// 缩放计划。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomPlan {
    /// 放大：画布整体乘以 `scale`（`scale >= 1`）。
    In { scale: f64 },
    /// 缩小：画布整体除以 `divisor`（`divisor >= 1`），再用背景色补回画布尺寸。
    Out { divisor: f64 },
}

impl ZoomPlan {
    pub fn from_factor(factor: f64) -> Self {
        if factor >= 0.0 {
            Self::In { scale: 1.0 + factor }
        } else {
            Self::Out { divisor: (1.0 + factor.abs()).max(1.0) }
        }
    }

    pub fn sample<R: Rng + ?Sized>(range: f64, rng: &mut R) -> Self {
        Self::from_factor(sample_symmetric(range, rng))
    }
}

/// 单次调用内的全部随机参数。
///
/// `None` 表示对应效果未启用，流水线会整段跳过。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledParameters {
    /// `(sx, sy)`，对应矩阵 `[[1, sx], [sy, 1]]`。
    pub shear: Option<(f64, f64)>,
    /// 旋转角度（度）。
    pub rotation: Option<f64>,
    /// `(dx, dy)` 像素偏移。
    pub transpose: Option<(i64, i64)>,
    pub zoom: Option<ZoomPlan>,
    pub blur: Option<f32>,
    pub sharpen: Option<f32>,
    pub brightness: Option<f64>,
    pub saturation: Option<f64>,
    pub contrast: Option<f64>,
}

impl SampledParameters {
    /// 按配置抽取本次调用的参数。
    ///
    /// `canvas` 为工作画布尺寸，用于限制平移幅度。
    pub fn draw<R: Rng + ?Sized>(config: &AugmentConfig, canvas: (u32, u32), rng: &mut R) -> Self {
        let enabled = |range: f64| range > 0.0;

        Self {
            shear: enabled(config.shear_range).then(|| {
                (
                    sample_symmetric(config.shear_range, rng),
                    sample_symmetric(config.shear_range, rng),
                )
            }),
            rotation: enabled(config.rotation_range)
                .then(|| sample_symmetric(config.rotation_range, rng)),
            transpose: enabled(config.transpose_range).then(|| {
                (
                    sample_offset(config.transpose_range, canvas.0, rng),
                    sample_offset(config.transpose_range, canvas.1, rng),
                )
            }),
            zoom: enabled(config.zoom_range).then(|| ZoomPlan::sample(config.zoom_range, rng)),
            blur: enabled(config.blur_range).then(|| sample_blur_sigma(config.blur_range, rng)),
            sharpen: enabled(config.sharpen_range)
                .then(|| sample_sharpen_sigma(config.sharpen_range, rng)),
            brightness: enabled(config.brightness_range)
                .then(|| sample_symmetric(config.brightness_range, rng)),
            saturation: enabled(config.saturation_range)
                .then(|| sample_symmetric(config.saturation_range, rng)),
            contrast: enabled(config.contrast_range)
                .then(|| sample_symmetric(config.contrast_range, rng)),
        }
    }

    pub fn has_geometric(&self) -> bool {
        self.shear.is_some() || self.rotation.is_some() || self.transpose.is_some() || self.zoom.is_some()
    }
}
