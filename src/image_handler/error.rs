//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载“读取 → 解码 → 缩放 → 抖动”链路中的所有错误来源。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。

/// 图片加载统一错误类型。
///
/// 该类型会在转换层被上转为 `ConvertError::Input`，最终由命令行输出。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}
