//! # 几何变换模块
//!
//! ## 设计思路
//!
//! 固定顺序：错切 → 旋转 → 平移 → 缩放。每一步都以“当前画布尺寸”的图像为输入，
//! 并在结束时回到同一画布尺寸，因此步骤之间可以任意组合而不会改变画布的有效尺寸。
//!
//! ## 实现思路
//!
//! - 错切 / 旋转：线性变换会把画布的外接矩形撑大。先按 cover 语义（等比缩放到两轴都覆盖画布）
//!   缩放外接矩形，再居中裁回画布尺寸。两步与变换本身合成为一个投影矩阵，只做一次重采样。
//! - 平移：截取 + 背景填充，纯整数像素搬移，不做插值。
//! - 缩放：放大时先裁中心区域再放大（与“放大后居中裁剪”等价，内存占用与画布相同）；
//!   缩小时整体缩小后用背景色补回画布尺寸，内容保持居中。
//!
//! 未启用的步骤整段跳过，不以零参数调用，避免无意义的重采样损失。

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp};

use super::resize::{center_crop, resize_exact};
use super::sampler::{SampledParameters, ZoomPlan};
use super::AugmentError;

const SINGULAR_EPSILON: f64 = 1e-6;

/// 按固定顺序执行所有已启用的几何变换。
pub fn apply(
    mut canvas: RgbaImage,
    params: &SampledParameters,
    background: Rgba<u8>,
    interpolation: Interpolation,
    filter: FilterType,
) -> Result<RgbaImage, AugmentError> {
    let size = canvas.dimensions();

    if let Some((sx, sy)) = params.shear {
        canvas = shear(&canvas, sx, sy, background, interpolation)?;
        ensure_size("shear", &canvas, size)?;
    }

    if let Some(degrees) = params.rotation {
        canvas = rotate(&canvas, degrees, background, interpolation)?;
        ensure_size("rotate", &canvas, size)?;
    }

    if let Some((dx, dy)) = params.transpose {
        canvas = transpose(&canvas, dx, dy, background);
        ensure_size("transpose", &canvas, size)?;
    }

    if let Some(plan) = params.zoom {
        canvas = zoom(canvas, plan, background, filter)?;
        ensure_size("zoom", &canvas, size)?;
    }

    Ok(canvas)
}

fn ensure_size(stage: &str, canvas: &RgbaImage, expected: (u32, u32)) -> Result<(), AugmentError> {
    if canvas.dimensions() != expected {
        return Err(AugmentError::TransformFailure(format!(
            "{} 阶段输出尺寸异常：{:?}（期望 {:?}）",
            stage,
            canvas.dimensions(),
            expected
        )));
    }
    Ok(())
}

/// 错切：矩阵 `[[1, sx], [sy, 1]]`。
pub fn shear(
    canvas: &RgbaImage,
    sx: f64,
    sy: f64,
    background: Rgba<u8>,
    interpolation: Interpolation,
) -> Result<RgbaImage, AugmentError> {
    let determinant = 1.0 - sx * sy;
    if determinant.abs() < SINGULAR_EPSILON {
        return Err(AugmentError::TransformFailure(format!(
            "错切矩阵不可逆：sx={:.4} sy={:.4}",
            sx, sy
        )));
    }

    log::debug!("↗️ 错切：sx={:.4} sy={:.4}", sx, sy);
    warp_cover(canvas, [1.0, sx, sy, 1.0], background, interpolation)
}

/// 旋转：绕画布中心旋转 `degrees` 度（正值在屏幕上为顺时针）。
pub fn rotate(
    canvas: &RgbaImage,
    degrees: f64,
    background: Rgba<u8>,
    interpolation: Interpolation,
) -> Result<RgbaImage, AugmentError> {
    let (sin, cos) = degrees.to_radians().sin_cos();

    log::debug!("🔄 旋转：{:.3}°", degrees);
    warp_cover(canvas, [cos, -sin, sin, cos], background, interpolation)
}

/// 对画布施加线性变换，并按 cover 语义缩放 + 居中裁剪回原画布尺寸。
///
/// `linear` 为行优先的 2x2 矩阵 `[a, b, c, d]`，即 `x' = a*x + b*y`，`y' = c*x + d*y`。
fn warp_cover(
    canvas: &RgbaImage,
    linear: [f64; 4],
    background: Rgba<u8>,
    interpolation: Interpolation,
) -> Result<RgbaImage, AugmentError> {
    let (width, height) = canvas.dimensions();
    let (w, h) = (width as f64, height as f64);
    let [a, b, c, d] = linear;

    let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];
    let mapped = corners.map(|(x, y)| (a * x + b * y, c * x + d * y));

    let min_x = mapped.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = mapped.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = mapped.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = mapped.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let bounds_width = max_x - min_x;
    let bounds_height = max_y - min_y;
    if !(bounds_width.is_finite() && bounds_height.is_finite())
        || bounds_width <= 0.0
        || bounds_height <= 0.0
    {
        return Err(AugmentError::TransformFailure(format!(
            "变换外接矩形无效：{:.2}x{:.2}",
            bounds_width, bounds_height
        )));
    }

    // cover：等比缩放到两轴都不小于画布，再居中裁剪
    let scale = (w / bounds_width).max(h / bounds_height);
    let offset_x = (bounds_width * scale - w) / 2.0;
    let offset_y = (bounds_height * scale - h) / 2.0;

    let matrix = [
        (scale * a) as f32,
        (scale * b) as f32,
        (-scale * min_x - offset_x) as f32,
        (scale * c) as f32,
        (scale * d) as f32,
        (-scale * min_y - offset_y) as f32,
        0.0,
        0.0,
        1.0,
    ];

    let projection = Projection::from_matrix(matrix)
        .ok_or_else(|| AugmentError::TransformFailure("投影矩阵不可逆".to_string()))?;

    Ok(warp(canvas, &projection, interpolation, background))
}

/// 平移：正 `dx` 内容左移、右侧补背景；负 `dx` 内容右移、左侧补背景。`dy` 同理。
///
/// 幅度超过画布时整幅为背景色。
pub fn transpose(canvas: &RgbaImage, dx: i64, dy: i64, background: Rgba<u8>) -> RgbaImage {
    let (width, height) = canvas.dimensions();
    let mut shifted = ImageBuffer::from_pixel(width, height, background);

    let (w, h) = (width as i64, height as i64);
    let dx = dx.clamp(-w, w);
    let dy = dy.clamp(-h, h);
    let kept_width = (w - dx.abs()) as u32;
    let kept_height = (h - dy.abs()) as u32;

    log::debug!("↔️ 平移：dx={} dy={}", dx, dy);

    if kept_width == 0 || kept_height == 0 {
        return shifted;
    }

    let source_x = dx.max(0) as u32;
    let source_y = dy.max(0) as u32;
    let kept = imageops::crop_imm(canvas, source_x, source_y, kept_width, kept_height).to_image();
    imageops::replace(&mut shifted, &kept, (-dx).max(0), (-dy).max(0));

    shifted
}

/// 缩放整块画布并回到原画布尺寸。
pub fn zoom(
    canvas: RgbaImage,
    plan: ZoomPlan,
    background: Rgba<u8>,
    filter: FilterType,
) -> Result<RgbaImage, AugmentError> {
    let (width, height) = canvas.dimensions();

    match plan {
        ZoomPlan::In { scale } => {
            if scale <= 1.0 {
                return Ok(canvas);
            }
            let crop_width = scaled_side(width, scale);
            let crop_height = scaled_side(height, scale);

            log::debug!(
                "🔍 放大：x{:.3}（截取中心 {}x{}）",
                scale,
                crop_width,
                crop_height
            );

            let region = center_crop(&canvas, crop_width, crop_height);
            resize_exact(region, width, height, filter)
        }
        ZoomPlan::Out { divisor } => {
            let divisor = divisor.max(1.0);
            if divisor == 1.0 {
                return Ok(canvas);
            }
            let shrunk_width = scaled_side(width, divisor);
            let shrunk_height = scaled_side(height, divisor);

            log::debug!(
                "🔍 缩小：/{:.3}（{}x{} -> {}x{}）",
                divisor,
                width,
                height,
                shrunk_width,
                shrunk_height
            );

            let shrunk = resize_exact(canvas, shrunk_width, shrunk_height, filter)?;
            let mut padded = ImageBuffer::from_pixel(width, height, background);
            imageops::replace(
                &mut padded,
                &shrunk,
                ((width - shrunk_width) / 2) as i64,
                ((height - shrunk_height) / 2) as i64,
            );
            Ok(padded)
        }
    }
}

/// `side / factor` 取整，结果落在 `[1, side]`。
fn scaled_side(side: u32, factor: f64) -> u32 {
    ((side as f64 / factor).round() as u32).clamp(1, side.max(1))
}
