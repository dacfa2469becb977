//! # 工厂入口
//!
//! ## 设计思路
//!
//! 对外暴露 `create_augmentor`：传入配置，返回一个可重复调用的函数
//! `Fn(Vec<u8>) -> AugmentFuture`。函数内部只捕获不可变配置，调用之间无状态。
//!
//! 每次调用返回独立的 future，可以并发 await，也可以单独丢弃（取消）而不影响其它调用。

use std::future::Future;
use std::pin::Pin;

use super::{AugmentConfig, AugmentError, Augmentor};

/// 单次增强调用的异步结果。
pub type AugmentFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>, AugmentError>> + Send>>;

/// 根据配置创建增强函数。
///
/// # 示例
/// ```rust,no_run
/// use image_augmentor::{AugmentConfig, create_augmentor};
///
/// # async fn demo(bytes: Vec<u8>) -> Result<(), image_augmentor::AugmentError> {
/// let augment = create_augmentor(AugmentConfig { rotation_range: 30.0, ..AugmentConfig::default() })?;
/// let first = augment(bytes.clone()).await?;
/// let second = augment(bytes).await?;
/// # let _ = (first, second);
/// # Ok(())
/// # }
/// ```
pub fn create_augmentor(
    config: AugmentConfig,
) -> Result<impl Fn(Vec<u8>) -> AugmentFuture + Clone + Send + Sync + 'static, AugmentError> {
    let augmentor = Augmentor::new(config)?;
    Ok(into_fn(augmentor))
}

/// 将已有的 `Augmentor` 包装为增强函数。
pub fn into_fn(augmentor: Augmentor) -> impl Fn(Vec<u8>) -> AugmentFuture + Clone + Send + Sync + 'static {
    move |bytes: Vec<u8>| {
        let augmentor = augmentor.clone();
        Box::pin(async move { augmentor.augment(bytes).await }) as AugmentFuture
    }
}
