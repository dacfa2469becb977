//! # 缩放模块
//!
//! ## 设计思路
//!
//! 所有缩放统一走 `fast_image_resize`（SIMD 卷积），失败时回退到
//! `image::imageops::resize`，保证缩放本身永远不会让整条流水线失败。
//!
//! 提供两种语义：
//! - `resize_exact`：拉伸到目标尺寸（各轴独立，不保持比例）
//! - `center_crop`：从中心截取目标尺寸

use fast_image_resize as fr;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, RgbaImage};

use super::AugmentError;

/// 拉伸缩放到 `width x height`，尺寸相同时直接返回。
pub fn resize_exact(
    image: RgbaImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RgbaImage, AugmentError> {
    if width == 0 || height == 0 {
        return Err(AugmentError::TransformFailure(format!(
            "缩放目标尺寸无效：{}x{}",
            width, height
        )));
    }

    if image.dimensions() == (width, height) {
        return Ok(image);
    }

    match resize_with_fast_image_resize(&image, width, height, filter) {
        Ok(resized) => Ok(resized),
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}",
                err
            );
            Ok(imageops::resize(&image, width, height, filter))
        }
    }
}

/// 从中心截取 `width x height` 区域；目标大于原图时按原图尺寸截断。
pub fn center_crop(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_width, src_height) = image.dimensions();
    let width = width.min(src_width);
    let height = height.min(src_height);
    let left = (src_width - width) / 2;
    let top = (src_height - height) / 2;

    imageops::crop_imm(image, left, top, width, height).to_image()
}

fn resize_with_fast_image_resize(
    image: &RgbaImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, AugmentError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| AugmentError::TransformFailure(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let algorithm = match filter {
        FilterType::Nearest => fr::ResizeAlg::Nearest,
        other => fr::ResizeAlg::Convolution(to_fast_filter(other)),
    };
    let options = fr::ResizeOptions::new().resize_alg(algorithm);

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| AugmentError::TransformFailure(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| AugmentError::TransformFailure("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}
