//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载增强链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 未启用的效果（范围为 0）属于正常跳过，永远不会产生错误。

/// 图片增强统一错误类型。
///
/// 所有错误都会作为异步结果的 `Err` 返回给调用方，不做静默吞掉，也不重试。
#[derive(Debug, thiserror::Error)]
pub enum AugmentError {
    /// 输入字节无法解码，或宽高为 0。
    #[error("图片无效：{0}")]
    InvalidImage(String),

    /// 范围为负数 / 非有限值，或背景色格式错误。
    #[error("配置无效：{0}")]
    InvalidConfiguration(String),

    /// 几何或光度变换执行失败（例如裁剪区域越界、仿射矩阵奇异）。
    #[error("变换失败：{0}")]
    TransformFailure(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("编码错误：{0}")]
    Encode(String),

    /// 阻塞线程执行失败（panic 或被取消）。
    #[error("任务执行失败：{0}")]
    Task(String),
}

impl AugmentError {
    /// 稳定的错误码，供命令行输出与日志检索。
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidImage(_) => "invalid_image",
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::TransformFailure(_) => "transform_failure",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Encode(_) => "encode_failure",
            Self::Task(_) => "task_failure",
        }
    }
}
