//! # 工作画布模块
//!
//! 将原图放入一块四周留白的大画布，给旋转 / 错切 / 平移留出余量，避免边缘像素被裁掉。
//! 画布尺寸为 `(w + 2p) x (h + 2p)`，其中 `p = max(w, h)`，原图位于 `(p, p)`。

use image::{ImageBuffer, RgbaImage, imageops};

use super::{AugmentError, BackgroundColor};

/// 工作画布，附带最终提取时需要还原的原图尺寸。
#[derive(Debug, Clone)]
pub struct WorkingCanvas {
    pub image: RgbaImage,
    pub source_width: u32,
    pub source_height: u32,
}

/// 计算给定原图尺寸下的留白与画布尺寸，溢出时返回错误。
pub fn canvas_dimensions(width: u32, height: u32) -> Result<(u32, u32, u32), AugmentError> {
    let padding = width.max(height);
    let grow = |side: u32| {
        padding
            .checked_mul(2)
            .and_then(|double| double.checked_add(side))
            .ok_or_else(|| AugmentError::ResourceLimit(format!("工作画布尺寸溢出：{}x{}", width, height)))
    };

    Ok((padding, grow(width)?, grow(height)?))
}

/// 生成工作画布：背景色填充，原图按像素原样复制（不与背景混合）。
pub fn expand(source: &RgbaImage, background: BackgroundColor) -> Result<WorkingCanvas, AugmentError> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(AugmentError::InvalidImage(format!("图片尺寸为 0：{}x{}", width, height)));
    }

    let (padding, canvas_width, canvas_height) = canvas_dimensions(width, height)?;

    let mut image = ImageBuffer::from_pixel(canvas_width, canvas_height, background.to_rgba());
    imageops::replace(&mut image, source, padding as i64, padding as i64);

    log::debug!(
        "🧱 工作画布：原图 {}x{} -> 画布 {}x{}（padding={}）",
        width,
        height,
        canvas_width,
        canvas_height,
        padding
    );

    Ok(WorkingCanvas {
        image,
        source_width: width,
        source_height: height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn canvas_is_padded_by_longest_side() {
        let source = ImageBuffer::from_pixel(50, 80, Rgba([10, 20, 30, 255]));
        let canvas = expand(&source, BackgroundColor::WHITE).expect("expand should succeed");

        assert_eq!(canvas.image.dimensions(), (50 + 160, 80 + 160));
        assert_eq!((canvas.source_width, canvas.source_height), (50, 80));
    }

    #[test]
    fn source_is_copied_exactly_including_alpha() {
        let source = ImageBuffer::from_fn(4, 3, |x, y| Rgba([x as u8, y as u8, 7, (x * 60) as u8]));
        let canvas = expand(&source, BackgroundColor::BLACK).expect("expand should succeed");
        let p = 4;

        for (x, y, pixel) in source.enumerate_pixels() {
            assert_eq!(canvas.image.get_pixel(x + p, y + p), pixel);
        }
    }

    #[test]
    fn uncovered_area_is_exact_background() {
        let background = BackgroundColor::new(1, 2, 3, 0.5).unwrap();
        let source = ImageBuffer::from_pixel(6, 6, Rgba([200, 200, 200, 255]));
        let canvas = expand(&source, background).expect("expand should succeed");
        let p = 6;

        for (x, y, pixel) in canvas.image.enumerate_pixels() {
            let inside = (p..p + 6).contains(&x) && (p..p + 6).contains(&y);
            if !inside {
                assert_eq!(*pixel, background.to_rgba());
            }
        }
    }

    #[test]
    fn zero_sized_source_is_rejected() {
        let source: RgbaImage = ImageBuffer::new(0, 10);
        assert!(matches!(
            expand(&source, BackgroundColor::WHITE),
            Err(AugmentError::InvalidImage(_))
        ));
    }
}
