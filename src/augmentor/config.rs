//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `AugmentConfig`，保证每次增强的行为可观测、可调整、可测试。
//! 各效果的范围字段为 0 即表示关闭；质量档位（quality / balanced / speed）作为高层语义，
//! 映射到底层的缩放滤镜与插值方式。
//!
//! ## 实现思路
//!
//! - `Default` 提供“全部关闭 + 白色背景”的恒等配置。
//! - 通过 `serde` 以 camelCase 字段名从 JSON 读取，缺省字段取默认值。
//! - `validate` 在构建增强器时执行一次，之后配置只读共享。
//! - `BackgroundColor` 支持 `#rrggbb` / `rgba(...)` / 颜色名 / JSON 对象多种写法。

use std::fmt;

use image::imageops::FilterType;
use image::{ImageFormat, Rgba};
use imageproc::geometric_transformations::Interpolation;
use serde::{Deserialize, Serialize};

use super::AugmentError;

/// 背景色：RGB 取值 0~255，alpha 取值 0.0~1.0。
///
/// 用于填充几何变换暴露出的区域（旋转角落、错切斜边、缩小后的外圈、平移空出的边）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BackgroundColorRepr", into = "String")]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl BackgroundColor {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, alpha: 1.0 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, alpha: 1.0 };
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, alpha: 0.0 };

    /// 创建背景色并校验 alpha。
    pub fn new(r: u8, g: u8, b: u8, alpha: f32) -> Result<Self, AugmentError> {
        let color = Self { r, g, b, alpha };
        color.validate()?;
        Ok(color)
    }

    pub fn validate(&self) -> Result<(), AugmentError> {
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(AugmentError::InvalidConfiguration(format!(
                "背景色 alpha 必须在 0~1 之间：{}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// 转换为 8 位 RGBA 像素。
    pub fn to_rgba(&self) -> Rgba<u8> {
        let alpha = (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([self.r, self.g, self.b, alpha])
    }

    /// 解析背景色字符串。
    ///
    /// 支持：`#rgb`、`#rrggbb`、`#rrggbbaa`、`rgb(r,g,b)`、`rgba(r,g,b,a)`、
    /// `white` / `black` / `transparent`。
    ///
    /// # 示例
    /// ```rust
    /// use image_augmentor::BackgroundColor;
    ///
    /// let color = BackgroundColor::parse("rgba(10, 20, 30, 0.5)")?;
    /// assert_eq!((color.r, color.g, color.b), (10, 20, 30));
    /// # Ok::<(), image_augmentor::AugmentError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self, AugmentError> {
        let normalized = text.trim().to_lowercase();
        let malformed = || AugmentError::InvalidConfiguration(format!("无法解析背景色：{}", text));

        match normalized.as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            "transparent" => return Ok(Self::TRANSPARENT),
            _ => {}
        }

        if let Some(hex) = normalized.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(malformed);
        }

        let (body, expect_alpha) = if let Some(rest) = normalized.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = normalized.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(malformed());
        };
        let body = body.strip_suffix(')').ok_or_else(malformed)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();

        let expected_parts = if expect_alpha { 4 } else { 3 };
        if parts.len() != expected_parts {
            return Err(malformed());
        }

        let channel = |part: &str| part.parse::<u8>().map_err(|_| malformed());
        let alpha = if expect_alpha {
            parts[3].parse::<f32>().map_err(|_| malformed())?
        } else {
            1.0
        };

        Self::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;

        let (r, g, b, a) = match digits.as_slice() {
            [r, g, b] => (r * 17, g * 17, b * 17, 255),
            [r1, r2, g1, g2, b1, b2] => (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255),
            [r1, r2, g1, g2, b1, b2, a1, a2] => {
                (r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2)
            }
            _ => return None,
        };

        Some(Self { r, g, b, alpha: a as f32 / 255.0 })
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.alpha)
    }
}

impl From<BackgroundColor> for String {
    fn from(color: BackgroundColor) -> Self {
        color.to_string()
    }
}

/// 背景色在 JSON 中的两种写法。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BackgroundColorRepr {
    Text(String),
    Channels {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque_alpha")]
        alpha: f32,
    },
}

fn opaque_alpha() -> f32 {
    1.0
}

impl TryFrom<BackgroundColorRepr> for BackgroundColor {
    type Error = AugmentError;

    fn try_from(repr: BackgroundColorRepr) -> Result<Self, Self::Error> {
        match repr {
            BackgroundColorRepr::Text(text) => Self::parse(&text),
            BackgroundColorRepr::Channels { r, g, b, alpha } => Self::new(r, g, b, alpha),
        }
    }
}

/// 增强质量档位（面向使用者语义）。
///
/// - `Quality`：尽量保真
/// - `Balanced`：质量与速度平衡
/// - `Speed`：优先处理速度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityProfile {
    Quality,
    #[default]
    Balanced,
    Speed,
}

impl QualityProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use image_augmentor::QualityProfile;
    ///
    /// let p = QualityProfile::from_str("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), image_augmentor::AugmentError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(profile: &str) -> Result<Self, AugmentError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(AugmentError::InvalidConfiguration(format!(
                "未知质量档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    /// 缩放阶段使用的滤镜。
    pub fn resize_filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::Lanczos3,
            Self::Balanced => FilterType::Triangle,
            Self::Speed => FilterType::Nearest,
        }
    }

    /// 仿射 / 旋转阶段使用的插值方式。
    pub fn interpolation(self) -> Interpolation {
        match self {
            Self::Quality => Interpolation::Bicubic,
            Self::Balanced => Interpolation::Bilinear,
            Self::Speed => Interpolation::Nearest,
        }
    }
}

/// 输出编码格式。
///
/// `Original` 按输入格式重新编码；`image` 无法编码该格式时回退为 PNG。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Original,
    Png,
    Jpeg,
    WebP,
    Bmp,
    Tiff,
}

impl OutputFormat {
    /// 结合输入格式得出最终编码格式。
    pub fn resolve(self, input: Option<ImageFormat>) -> ImageFormat {
        match self {
            Self::Original => match input {
                Some(format) if format.writing_enabled() && Self::is_encodable(format) => format,
                Some(format) => {
                    log::warn!("⚠️ 输入格式 {:?} 不支持重新编码，回退为 PNG", format);
                    ImageFormat::Png
                }
                None => ImageFormat::Png,
            },
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::WebP => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
        }
    }

    fn is_encodable(format: ImageFormat) -> bool {
        matches!(
            format,
            ImageFormat::Png
                | ImageFormat::Jpeg
                | ImageFormat::WebP
                | ImageFormat::Bmp
                | ImageFormat::Tiff
                | ImageFormat::Gif
                | ImageFormat::Pnm
                | ImageFormat::Tga
                | ImageFormat::Qoi
        )
    }
}

/// 图片增强配置。
///
/// 每个 `*_range` 字段为 0 时对应效果完全跳过（不采样、不执行）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AugmentConfig {
    /// 错切系数范围，采样区间 `[-r, r]`。
    pub shear_range: f64,
    /// 旋转角度范围（度），采样区间 `[-r, r]`。
    pub rotation_range: f64,
    /// 模糊范围，sigma 限制在 `[0.3, min(r * 10, 1000)]`。
    pub blur_range: f64,
    /// 缩放范围，采样区间 `[-r, r]`，负数表示缩小。
    pub zoom_range: f64,
    /// 锐化范围，sigma 限制在 `[1e-6, min(r * 999999, 10)]`。
    pub sharpen_range: f64,
    pub brightness_range: f64,
    pub saturation_range: f64,
    pub contrast_range: f64,
    /// 平移范围（像素），X / Y 独立采样。
    pub transpose_range: f64,
    pub background_color: BackgroundColor,
    pub output_format: OutputFormat,
    /// 是否将结果压平到背景色上（去除 alpha）。JPEG 输出总是压平。
    pub flatten: bool,
    pub profile: QualityProfile,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 工作画布的像素上限，画布边长为原图的 `1 + 2 * max(w, h) / side` 倍。
    pub max_canvas_pixels: u64,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            shear_range: 0.0,
            rotation_range: 0.0,
            blur_range: 0.0,
            zoom_range: 0.0,
            sharpen_range: 0.0,
            brightness_range: 0.0,
            saturation_range: 0.0,
            contrast_range: 0.0,
            transpose_range: 0.0,
            background_color: BackgroundColor::default(),
            output_format: OutputFormat::default(),
            flatten: false,
            profile: QualityProfile::default(),
            max_decoded_pixels: 40_000_000,
            max_canvas_pixels: 200_000_000,
        }
    }
}

impl AugmentConfig {
    /// 从 JSON 文本读取配置并校验。
    ///
    /// # 示例
    /// ```rust
    /// use image_augmentor::AugmentConfig;
    ///
    /// let config = AugmentConfig::from_json(r##"{ "rotationRange": 30, "backgroundColor": "#000" }"##)?;
    /// assert_eq!(config.rotation_range, 30.0);
    /// # Ok::<(), image_augmentor::AugmentError>(())
    /// ```
    pub fn from_json(text: &str) -> Result<Self, AugmentError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| AugmentError::InvalidConfiguration(format!("配置 JSON 解析失败：{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 所有范围字段及其名称，供校验与日志使用。
    pub fn ranges(&self) -> [(&'static str, f64); 9] {
        [
            ("shearRange", self.shear_range),
            ("rotationRange", self.rotation_range),
            ("blurRange", self.blur_range),
            ("zoomRange", self.zoom_range),
            ("sharpenRange", self.sharpen_range),
            ("brightnessRange", self.brightness_range),
            ("saturationRange", self.saturation_range),
            ("contrastRange", self.contrast_range),
            ("transposeRange", self.transpose_range),
        ]
    }

    /// 校验配置。
    ///
    /// 范围必须为有限非负数；资源上限必须大于 0。
    pub fn validate(&self) -> Result<(), AugmentError> {
        for (name, value) in self.ranges() {
            if !value.is_finite() {
                return Err(AugmentError::InvalidConfiguration(format!(
                    "{} 必须是有限数值：{}",
                    name, value
                )));
            }
            if value < 0.0 {
                return Err(AugmentError::InvalidConfiguration(format!(
                    "{} 不能为负数：{}",
                    name, value
                )));
            }
        }

        self.background_color.validate()?;

        if self.max_decoded_pixels == 0 || self.max_canvas_pixels == 0 {
            return Err(AugmentError::InvalidConfiguration(
                "maxDecodedPixels / maxCanvasPixels 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 是否所有效果都处于关闭状态。
    pub fn is_identity(&self) -> bool {
        self.ranges().iter().all(|(_, value)| *value == 0.0)
    }
}
