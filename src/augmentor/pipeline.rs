//! # 增强流水线模块
//!
//! ## 设计思路
//!
//! 同步、线性的核心流程，只处理内存中的一份栅格，不涉及编解码与线程：
//!
//! ```text
//! 原图 RGBA
//!    ↓ canvas.rs（四周留白的工作画布）
//!    ↓ sampler.rs（按配置抽取本次参数）
//!    ↓ photometric.rs（模糊 / 锐化 / 亮度 / 饱和度 / 对比度）
//!    ↓ geometric.rs（错切 → 旋转 → 平移 → 缩放）
//!    ↓ extract.rs（中心截取 + 拉伸回原尺寸）
//! 输出 RGBA（尺寸与原图一致）
//! ```
//!
//! 随机源由调用方注入，测试时可传入固定种子的 `StdRng`。

use image::{DynamicImage, RgbaImage};
use rand::Rng;

use super::sampler::SampledParameters;
use super::{AugmentConfig, AugmentError, canvas, extract, geometric, photometric};

/// 对一张 RGBA 图像执行完整的增强流程，返回结果与本次采样参数。
pub fn transform<R: Rng + ?Sized>(
    source: &RgbaImage,
    config: &AugmentConfig,
    rng: &mut R,
) -> Result<(RgbaImage, SampledParameters), AugmentError> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(AugmentError::InvalidImage(format!("图片尺寸为 0：{}x{}", width, height)));
    }

    let (_, canvas_width, canvas_height) = canvas::canvas_dimensions(width, height)?;
    let canvas_pixels = canvas_width as u64 * canvas_height as u64;
    if canvas_pixels > config.max_canvas_pixels {
        return Err(AugmentError::ResourceLimit(format!(
            "工作画布过大：{}x{}（限制：{} 像素）",
            canvas_width, canvas_height, config.max_canvas_pixels
        )));
    }

    let params = SampledParameters::draw(config, (canvas_width, canvas_height), rng);
    log::debug!("🎲 本次采样参数：{:?}", params);

    if params == SampledParameters::default() {
        // 画布留白后再取回中心区域与原图逐像素相同，直接复制
        return Ok((source.clone(), params));
    }

    let canvas::WorkingCanvas { image, source_width, source_height } =
        canvas::expand(source, config.background_color)?;
    let background = config.background_color.to_rgba();
    let filter = config.profile.resize_filter();

    let image = photometric::apply(image, &params);
    let image = geometric::apply(
        image,
        &params,
        background,
        config.profile.interpolation(),
        filter,
    )?;

    let output = extract::extract(&image, source_width, source_height, filter)?;
    Ok((output, params))
}

/// `transform` 的 `DynamicImage` 版本，保持输入是否带 alpha 的通道语义。
///
/// # 示例
/// ```rust
/// use image::{DynamicImage, RgbImage};
/// use image_augmentor::{AugmentConfig, augment_image};
/// use rand::SeedableRng;
///
/// let config = AugmentConfig { rotation_range: 15.0, ..AugmentConfig::default() };
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let input = DynamicImage::ImageRgb8(RgbImage::new(32, 24));
///
/// let output = augment_image(&input, &config, &mut rng)?;
/// assert_eq!((output.width(), output.height()), (32, 24));
/// # Ok::<(), image_augmentor::AugmentError>(())
/// ```
pub fn augment_image<R: Rng + ?Sized>(
    source: &DynamicImage,
    config: &AugmentConfig,
    rng: &mut R,
) -> Result<DynamicImage, AugmentError> {
    config.validate()?;
    let (output, _) = transform(&source.to_rgba8(), config, rng)?;

    Ok(if source.color().has_alpha() {
        DynamicImage::ImageRgba8(output)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(output).to_rgb8())
    })
}
