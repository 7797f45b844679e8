//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `ConvertError` 枚举，区分两类失败：
//! - 配置错误：尺寸无法整除块大小、调色板为空等前置条件不满足；
//! - 输入错误：图片不可读或无法解码（由 `ImageError` 上转而来）。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 任一错误都会终止整次转换，不写出部分结果。

use crate::image_handler::ImageError;

/// 转换流程统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// 前置条件不满足（块大小、调色板大小、栅格尺寸等）
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 源图片不可读或无法解码
    #[error("{0}")]
    Input(#[from] ImageError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),
}
