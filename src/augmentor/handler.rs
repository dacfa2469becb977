//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `Augmentor` 只负责流程编排，持有只读配置快照（`Arc<AugmentConfig>`）。
//! 处理链路固定为：
//! 1. 解码输入字节
//! 2. 执行增强流水线（同一份内存栅格贯穿所有阶段）
//! 3. 按配置编码输出，只编码一次
//!
//! ## 实现思路
//!
//! - 配置在构建时校验一次，之后不可变，多次调用之间没有共享可变状态。
//! - 每次调用独立创建随机源；`RngSource::Seeded` 让测试得到可复现结果。
//! - 异步入口把整条阻塞流水线放到 `spawn_blocking`，不阻塞 async 运行时；
//!   调用方丢弃 future 只会丢弃本次结果，不影响其它调用。
//! - 记录 `decode/transform/encode/total` 阶段耗时，便于性能诊断。

use std::sync::Arc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::source::AugmentReport;
use super::{AugmentConfig, AugmentError, codec, pipeline};

/// 每次调用的随机源策略。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RngSource {
    /// 每次调用从操作系统熵源取种子。
    #[default]
    Entropy,
    /// 每次调用都使用同一个种子，结果可复现。
    Seeded(u64),
}

/// 图片增强器。
///
/// 克隆成本很低（只克隆 `Arc`），可在多个任务间共享并发调用。
#[derive(Debug, Clone)]
pub struct Augmentor {
    config: Arc<AugmentConfig>,
    rng_source: RngSource,
}

impl Augmentor {
    /// 根据配置创建增强器，配置非法时返回 `InvalidConfiguration`。
    ///
    /// # 示例
    /// ```rust
    /// use image_augmentor::{AugmentConfig, Augmentor};
    ///
    /// let augmentor = Augmentor::new(AugmentConfig { rotation_range: 30.0, ..AugmentConfig::default() })?;
    /// assert_eq!(augmentor.config().rotation_range, 30.0);
    /// # Ok::<(), image_augmentor::AugmentError>(())
    /// ```
    pub fn new(config: AugmentConfig) -> Result<Self, AugmentError> {
        Self::with_rng_source(config, RngSource::Entropy)
    }

    /// 指定随机源创建增强器。
    pub fn with_rng_source(config: AugmentConfig, rng_source: RngSource) -> Result<Self, AugmentError> {
        config.validate()?;

        log::debug!(
            "⚙️ 增强器已创建（profile={} output={:?} flatten={} identity={} rng={:?}）",
            config.profile.as_str(),
            config.output_format,
            config.flatten,
            config.is_identity(),
            rng_source
        );

        Ok(Self {
            config: Arc::new(config),
            rng_source,
        })
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    fn make_rng(&self) -> StdRng {
        match self.rng_source {
            RngSource::Entropy => StdRng::from_os_rng(),
            RngSource::Seeded(seed) => StdRng::seed_from_u64(seed),
        }
    }

    /// 异步入口：在阻塞线程中执行完整增强流程。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use image_augmentor::{AugmentConfig, Augmentor};
    ///
    /// # async fn demo(bytes: Vec<u8>) -> Result<(), image_augmentor::AugmentError> {
    /// let augmentor = Augmentor::new(AugmentConfig::default())?;
    /// let _augmented = augmentor.augment(bytes).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn augment(&self, bytes: Vec<u8>) -> Result<Vec<u8>, AugmentError> {
        let augmentor = self.clone();

        tokio::task::spawn_blocking(move || augmentor.augment_blocking(&bytes))
            .await
            .map_err(|e| AugmentError::Task(format!("线程执行失败：{}", e)))?
    }

    /// 同步入口：解码 → 增强 → 编码。
    pub fn augment_blocking(&self, bytes: &[u8]) -> Result<Vec<u8>, AugmentError> {
        self.augment_with_report(bytes).map(|(output, _)| output)
    }

    /// 同步入口，同时返回阶段耗时与采样参数。
    pub fn augment_with_report(&self, bytes: &[u8]) -> Result<(Vec<u8>, AugmentReport), AugmentError> {
        let config = self.config.as_ref();
        let total_start = Instant::now();

        let decode_start = Instant::now();
        let decoded = codec::decode(bytes, config)?;
        let decode_elapsed = decode_start.elapsed();
        let (width, height) = decoded.dimensions();

        let transform_start = Instant::now();
        let mut rng = self.make_rng();
        let (pixels, params) = pipeline::transform(&decoded.pixels, config, &mut rng)?;
        let transform_elapsed = transform_start.elapsed();

        let encode_start = Instant::now();
        let format = config.output_format.resolve(Some(decoded.format));
        let output = codec::encode(pixels, decoded.has_alpha, format, config)?;
        let encode_elapsed = encode_start.elapsed();

        let total_elapsed = total_start.elapsed();
        log::info!(
            "✅ 图片增强完成 - {}x{} {:?} -> {:?} decode={}ms transform={}ms encode={}ms total={}ms",
            width,
            height,
            decoded.format,
            format,
            decode_elapsed.as_millis(),
            transform_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            total_elapsed.as_millis()
        );

        Ok((
            output,
            AugmentReport {
                params,
                decode: decode_elapsed,
                transform: transform_elapsed,
                encode: encode_elapsed,
                total: total_elapsed,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augmentor::OutputFormat;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
    use std::io::Cursor;

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x % 255) as u8;
            let g = (y % 255) as u8;
            let b = ((x + y) % 255) as u8;
            Rgb([r, g, b])
        });

        let dyn_img = DynamicImage::ImageRgb8(img);
        let mut cursor = Cursor::new(Vec::new());
        dyn_img
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        let config = AugmentConfig { sharpen_range: -2.0, ..AugmentConfig::default() };
        assert!(matches!(Augmentor::new(config), Err(AugmentError::InvalidConfiguration(_))));
    }

    #[test]
    fn identity_round_trip_is_pixel_exact() {
        let augmentor = Augmentor::new(AugmentConfig::default()).expect("augmentor init failed");
        let png = create_png_bytes(37, 21);

        let output = augmentor.augment_blocking(&png).expect("augment should succeed");

        let before = image::load_from_memory(&png).unwrap().to_rgb8();
        let after = image::load_from_memory(&output).unwrap();
        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
        assert!(!after.color().has_alpha());
        assert_eq!(after.to_rgb8(), before);
    }

    #[test]
    fn invalid_bytes_surface_invalid_image() {
        let augmentor = Augmentor::new(AugmentConfig::default()).expect("augmentor init failed");
        assert!(matches!(
            augmentor.augment_blocking(b"\x89PNG broken"),
            Err(AugmentError::InvalidImage(_))
        ));
    }

    #[test]
    fn output_format_option_is_honoured() {
        let config = AugmentConfig {
            rotation_range: 10.0,
            output_format: OutputFormat::Jpeg,
            ..AugmentConfig::default()
        };
        let augmentor = Augmentor::new(config).expect("augmentor init failed");

        let output = augmentor.augment_blocking(&create_png_bytes(30, 20)).unwrap();
        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (30, 20));
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let config = AugmentConfig {
            rotation_range: 25.0,
            zoom_range: 0.4,
            transpose_range: 6.0,
            ..AugmentConfig::default()
        };
        let augmentor = Augmentor::with_rng_source(config, RngSource::Seeded(11)).unwrap();
        let png = create_png_bytes(20, 20);

        let (first, first_report) = augmentor.augment_with_report(&png).unwrap();
        let (second, second_report) = augmentor.augment_with_report(&png).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_report.params, second_report.params);
        assert!(first_report.total >= first_report.transform);
    }

    #[test]
    fn rgba_input_keeps_alpha_channel() {
        let img = ImageBuffer::from_pixel(12, 12, Rgba([10, 20, 30, 100]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();

        let config = AugmentConfig { shear_range: 0.2, ..AugmentConfig::default() };
        let augmentor = Augmentor::new(config).unwrap();
        let output = augmentor.augment_blocking(&cursor.into_inner()).unwrap();

        assert!(image::load_from_memory(&output).unwrap().color().has_alpha());
    }

    #[tokio::test]
    async fn async_entry_matches_blocking_entry() {
        let augmentor = Augmentor::with_rng_source(
            AugmentConfig { brightness_range: 0.5, ..AugmentConfig::default() },
            RngSource::Seeded(3),
        )
        .unwrap();
        let png = create_png_bytes(16, 16);

        let from_async = augmentor.augment(png.clone()).await.unwrap();
        let from_blocking = augmentor.augment_blocking(&png).unwrap();
        assert_eq!(from_async, from_blocking);
    }

    #[test]
    #[ignore = "perf measurement, run manually"]
    fn perf_augment_multiple_sizes() {
        let config = AugmentConfig {
            rotation_range: 20.0,
            shear_range: 0.1,
            zoom_range: 0.2,
            blur_range: 0.2,
            ..AugmentConfig::default()
        };
        let augmentor = Augmentor::new(config).expect("augmentor init failed");

        for (width, height) in [(256, 256), (640, 480), (1024, 768)] {
            let png = create_png_bytes(width, height);
            let (output, report) = augmentor.augment_with_report(&png).expect("augment should succeed");

            println!(
                "[perf] augment {}x{} input={}KB output={}KB decode={}ms transform={}ms encode={}ms",
                width,
                height,
                png.len() / 1024,
                output.len() / 1024,
                report.decode.as_millis(),
                report.transform.as_millis(),
                report.encode.as_millis()
            );
        }
    }
}
