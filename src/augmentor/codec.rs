//! # 编解码模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像”与“图像 → 字节”集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素上限快速拒绝，宽高为 0 直接判为无效图片
//! 3. 完整解码，记录是否带 alpha
//! 4. 编码时按需压平到背景色，保持输入的通道语义（有 alpha 输出 RGBA，否则 RGB）
//! 5. 指定格式编码失败时回退 PNG

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, RgbImage, RgbaImage};

use super::source::DecodedImage;
use super::{AugmentConfig, AugmentError, BackgroundColor};

/// 解码输入字节。
pub fn decode(bytes: &[u8], config: &AugmentConfig) -> Result<DecodedImage, AugmentError> {
    if bytes.is_empty() {
        return Err(AugmentError::InvalidImage("输入字节为空".to_string()));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| AugmentError::InvalidImage(format!("不支持的图片格式：{}", e)))?;

    let (header_width, header_height) = inspect_dimensions(bytes)?;
    validate_dimensions(config, header_width, header_height)?;

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AugmentError::InvalidImage(format!("图片解码失败：{}", e)))?;

    let (width, height) = (decoded.width(), decoded.height());
    validate_dimensions(config, width, height)?;

    let has_alpha = decoded.color().has_alpha();

    log::debug!(
        "🖼️ 解码完成 - 格式: {:?} 尺寸: {}x{} 颜色: {:?}",
        format,
        width,
        height,
        decoded.color()
    );

    Ok(DecodedImage {
        pixels: decoded.to_rgba8(),
        format,
        has_alpha,
    })
}

/// 仅通过内存中的图片头信息读取宽高。
///
/// 用于在完整解码前做像素限制检查。
fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), AugmentError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AugmentError::InvalidImage(format!("无法识别图片格式：{}", e)))?
        .into_dimensions()
        .map_err(|e| AugmentError::InvalidImage(format!("无法读取图片尺寸：{}", e)))
}

fn validate_dimensions(config: &AugmentConfig, width: u32, height: u32) -> Result<(), AugmentError> {
    if width == 0 || height == 0 {
        return Err(AugmentError::InvalidImage(format!("图片尺寸为 0：{}x{}", width, height)));
    }

    let pixels = width as u64 * height as u64;
    if pixels > config.max_decoded_pixels {
        return Err(AugmentError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}

/// 编码输出图像。
///
/// `flatten` 为真或目标格式为 JPEG 时压平到背景色；否则按 `has_alpha` 决定输出 RGBA / RGB。
pub fn encode(
    image: RgbaImage,
    has_alpha: bool,
    format: ImageFormat,
    config: &AugmentConfig,
) -> Result<Vec<u8>, AugmentError> {
    let flatten = config.flatten || format == ImageFormat::Jpeg;

    let output = if flatten {
        DynamicImage::ImageRgb8(flatten_onto(&image, config.background_color))
    } else if has_alpha {
        DynamicImage::ImageRgba8(image)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8())
    };

    match write(&output, format) {
        Ok(bytes) => Ok(bytes),
        Err(err) if format != ImageFormat::Png => {
            log::warn!("⚠️ {:?} 编码失败，回退为 PNG：{}", format, err);
            write(&output, ImageFormat::Png)
        }
        Err(err) => Err(err),
    }
}

fn write(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, AugmentError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .map_err(|e| AugmentError::Encode(format!("{:?} 编码失败：{}", format, e)))?;
    Ok(cursor.into_inner())
}

/// 按 alpha 将图像混合到背景色上，输出不透明 RGB。
pub fn flatten_onto(image: &RgbaImage, background: BackgroundColor) -> RgbImage {
    let backdrop = [background.r as f32, background.g as f32, background.b as f32];

    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let blend = |channel: u8, back: f32| {
            (channel as f32 * alpha + back * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8
        };
        image::Rgb([blend(r, backdrop[0]), blend(g, backdrop[1]), blend(b, backdrop[2])])
    })
}
