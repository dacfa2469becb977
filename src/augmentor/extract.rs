//! # 最终提取模块
//!
//! 从变换后的画布中心截取原图大小的区域，再拉伸缩放到原图尺寸。
//! 无论启用了哪些效果，输出尺寸始终等于输入尺寸。

use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::resize::resize_exact;
use super::AugmentError;

/// 中心区域左上角：`floor(canvas/2) - floor(original/2)`，不小于 0。
pub fn center_origin(canvas: (u32, u32), original: (u32, u32)) -> (u32, u32) {
    let left = (canvas.0 / 2).saturating_sub(original.0 / 2);
    let top = (canvas.1 / 2).saturating_sub(original.1 / 2);
    (left, top)
}

/// 截取中心区域并拉伸到 `width x height`。
pub fn extract(
    canvas: &RgbaImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RgbaImage, AugmentError> {
    if width == 0 || height == 0 {
        return Err(AugmentError::InvalidImage(format!("原图尺寸为 0：{}x{}", width, height)));
    }

    let (canvas_width, canvas_height) = canvas.dimensions();
    let (left, top) = center_origin((canvas_width, canvas_height), (width, height));
    if left >= canvas_width || top >= canvas_height {
        return Err(AugmentError::TransformFailure(format!(
            "提取区域越界：origin=({}, {}) canvas={}x{}",
            left, top, canvas_width, canvas_height
        )));
    }

    let region_width = width.min(canvas_width - left);
    let region_height = height.min(canvas_height - top);
    let region = imageops::crop_imm(canvas, left, top, region_width, region_height).to_image();

    if region.dimensions() != (width, height) {
        log::debug!(
            "📐 提取区域 {}x{} 与原图 {}x{} 不一致，拉伸缩放",
            region_width,
            region_height,
            width,
            height
        );
    }

    resize_exact(region, width, height, filter)
}
