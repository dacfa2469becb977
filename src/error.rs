//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 命令行入口需要同时处理文件读写、配置 JSON 与增强流水线三类错误，
//! 这里定义 `AppError` 统一承载，并为每类错误提供稳定错误码。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `AugmentError` / `std::io::Error` / `serde_json::Error` 提供 `From` 转换，无需手动 map。

use crate::augmentor::AugmentError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 增强流水线错误（解码 / 变换 / 编码）
    #[error("{0}")]
    Augment(#[from] AugmentError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件解析失败
    #[error("配置文件解析失败: {0}")]
    Config(#[from] serde_json::Error),

    /// 命令行参数错误
    #[error("参数错误: {0}")]
    Usage(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Augment(error) => error.code(),
            Self::Io(_) => "io",
            Self::Config(_) => "invalid_configuration",
            Self::Usage(_) => "usage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn augment_errors_keep_their_code() {
        let error: AppError = AugmentError::InvalidImage("坏图".into()).into();
        assert_eq!(error.code(), "invalid_image");
        assert!(error.to_string().contains("坏图"));
    }

    #[test]
    fn json_errors_map_to_configuration() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: AppError = json_error.into();
        assert_eq!(error.code(), "invalid_configuration");
    }
}
