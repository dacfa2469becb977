//! # 光度变换模块
//!
//! 模糊、锐化、亮度、饱和度、对比度。逐像素或卷积操作，不改变画布尺寸，
//! 与几何变换之间没有顺序依赖。
//!
//! 亮度 / 饱和度 / 对比度使用 `1 + d` 作为乘性调制系数（小于 0 时截为 0），
//! alpha 通道保持不变。
//!
//! 锐化为 unsharp mask：`原图 + (原图 - 模糊)`，模糊核与模糊阶段共用
//! `gaussian_blur_f32`，极小 sigma 时退化为恒等而不会破坏像素。

use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

use super::sampler::SampledParameters;

const CONTRAST_PIVOT: f32 = 128.0;

/// 依次执行所有已启用的光度变换：模糊 → 锐化 → 亮度 → 饱和度 → 对比度。
pub fn apply(mut canvas: RgbaImage, params: &SampledParameters) -> RgbaImage {
    if let Some(sigma) = params.blur {
        log::debug!("🌫️ 模糊：sigma={:.3}", sigma);
        canvas = blur(&canvas, sigma);
    }

    if let Some(sigma) = params.sharpen {
        log::debug!("🔪 锐化：sigma={:.6}", sigma);
        canvas = unsharp_mask(&canvas, sigma);
    }

    if let Some(delta) = params.brightness {
        log::debug!("☀️ 亮度：{:+.3}", delta);
        modulate_brightness(&mut canvas, modulation(delta));
    }

    if let Some(delta) = params.saturation {
        log::debug!("🎨 饱和度：{:+.3}", delta);
        modulate_saturation(&mut canvas, modulation(delta));
    }

    if let Some(delta) = params.contrast {
        log::debug!("🌗 对比度：{:+.3}", delta);
        modulate_contrast(&mut canvas, modulation(delta));
    }

    canvas
}

/// 高斯模糊。完全不透明的输入，输出 alpha 恒为 255。
pub fn blur(image: &RgbaImage, sigma: f32) -> RgbaImage {
    let opaque = image.pixels().all(|p| p[3] == u8::MAX);
    let mut blurred = gaussian_blur_f32(image, sigma);
    if opaque {
        for pixel in blurred.pixels_mut() {
            pixel[3] = u8::MAX;
        }
    }
    blurred
}

/// 只作用于 RGB 通道的 unsharp mask。
pub fn unsharp_mask(image: &RgbaImage, sigma: f32) -> RgbaImage {
    let blurred = gaussian_blur_f32(image, sigma);
    let mut sharpened = image.clone();
    for (pixel, soft) in sharpened.pixels_mut().zip(blurred.pixels()) {
        for (channel, low) in pixel.0.iter_mut().zip(soft.0).take(3) {
            let value = *channel as f32;
            *channel = to_channel(value + (value - low as f32));
        }
    }
    sharpened
}

/// `1 + d`，截为非负。
fn modulation(delta: f64) -> f32 {
    (1.0 + delta).max(0.0) as f32
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

pub fn modulate_brightness(image: &mut RgbaImage, factor: f32) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = to_channel(*channel as f32 * factor);
        }
    }
}

/// 以 Rec.601 亮度为轴拉伸 / 收缩色度。
pub fn modulate_saturation(image: &mut RgbaImage, factor: f32) {
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        for channel in pixel.0.iter_mut().take(3) {
            *channel = to_channel(luma + (*channel as f32 - luma) * factor);
        }
    }
}

pub fn modulate_contrast(image: &mut RgbaImage, factor: f32) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = to_channel((*channel as f32 - CONTRAST_PIVOT) * factor + CONTRAST_PIVOT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augmentor::sampler::{SHARPEN_SIGMA_MAX, SHARPEN_SIGMA_MIN};
    use image::{ImageBuffer, Rgba};

    fn checkerboard(size: u32) -> RgbaImage {
        ImageBuffer::from_fn(size, size, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn no_params_leaves_image_untouched() {
        let image = checkerboard(16);
        assert_eq!(apply(image.clone(), &SampledParameters::default()), image);
    }

    #[test]
    fn blur_softens_hard_edges() {
        let image = checkerboard(32);
        let params = SampledParameters { blur: Some(1.0), ..SampledParameters::default() };
        let blurred = apply(image.clone(), &params);

        assert_eq!(blurred.dimensions(), image.dimensions());
        let intermediate = blurred.pixels().filter(|p| p[0] > 10 && p[0] < 245).count();
        assert!(intermediate > 0, "blur should produce intermediate tones");
    }

    fn gradient(size: u32) -> RgbaImage {
        ImageBuffer::from_fn(size, size, |x, y| Rgba([(x * 8) as u8, (y * 8) as u8, 50, 255]))
    }

    fn max_channel_diff(a: &RgbaImage, b: &RgbaImage) -> u8 {
        a.pixels()
            .zip(b.pixels())
            .flat_map(|(p, q)| p.0.into_iter().zip(q.0).map(|(x, y)| x.abs_diff(y)))
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn sharpen_at_minimum_sigma_is_near_identity() {
        let image = gradient(30);
        for sigma in [SHARPEN_SIGMA_MIN, 0.05] {
            let params = SampledParameters { sharpen: Some(sigma), ..SampledParameters::default() };
            let sharpened = apply(image.clone(), &params);
            assert!(
                max_channel_diff(&sharpened, &image) <= 1,
                "sigma {} changed a smooth gradient",
                sigma
            );
        }
    }

    #[test]
    fn sharpen_raises_edge_contrast() {
        let image: RgbaImage = ImageBuffer::from_fn(64, 8, |x, _| {
            if x < 32 { Rgba([100, 100, 100, 255]) } else { Rgba([160, 160, 160, 255]) }
        });

        for sigma in [1.0, 4.0, SHARPEN_SIGMA_MAX] {
            let params = SampledParameters { sharpen: Some(sigma), ..SampledParameters::default() };
            let sharpened = apply(image.clone(), &params);

            assert_eq!(sharpened.dimensions(), (64, 8));
            assert!(sharpened.get_pixel(31, 4)[0] < 100, "sigma {}: dark side should darken", sigma);
            assert!(sharpened.get_pixel(32, 4)[0] > 160, "sigma {}: light side should brighten", sigma);
            assert_eq!(sharpened.get_pixel(31, 4)[3], 255);
        }
    }

    #[test]
    fn blur_keeps_opaque_canvas_opaque() {
        let image = gradient(20);
        let params = SampledParameters { blur: Some(9.7), ..SampledParameters::default() };
        let blurred = apply(image, &params);
        assert!(blurred.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn brightness_scales_rgb_but_not_alpha() {
        let mut image = ImageBuffer::from_pixel(2, 2, Rgba([100, 50, 200, 77]));
        modulate_brightness(&mut image, 1.5);
        assert_eq!(*image.get_pixel(0, 0), Rgba([150, 75, 255, 77]));
    }

    #[test]
    fn zero_saturation_produces_gray() {
        let mut image = ImageBuffer::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        modulate_saturation(&mut image, 0.0);
        let [r, g, b, a] = image.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn contrast_pivots_around_mid_gray() {
        let mut image = ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 { Rgba([100, 100, 100, 255]) } else { Rgba([128, 128, 128, 255]) }
        });
        modulate_contrast(&mut image, 2.0);
        assert_eq!(*image.get_pixel(0, 0), Rgba([72, 72, 72, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn negative_modulation_clamps_to_zero() {
        assert_eq!(modulation(-3.0), 0.0);
        assert_eq!(modulation(0.25), 1.25);
    }
}
