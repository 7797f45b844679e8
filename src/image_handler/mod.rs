//! # 图片加载模块（image_handler）
//!
//! ## 设计思路
//!
//! 该模块将“文件读取校验 → 解码 → 灰度缩放 → 抖动二值化”
//! 按职责拆分为多个子模块，对外只交付一个 `Raster`。
//!
//! - `handler`：编排整条加载流水线
//! - `loader`：负责文件读取与签名校验
//! - `pipeline`：负责解码、像素限制、缩放、抖动
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! converter.rs
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（读取 + 体积/签名校验）
//!    └─ pipeline.rs（解码 + 像素限制 + 缩放 + 抖动）
//!    ↓
//! Raster（0/1 栅格）
//! ```

mod config;
mod error;
mod handler;
mod loader;
mod pipeline;
mod source;

pub use config::{ImageConfig, ResizeFilter};
pub use error::ImageError;
pub use handler::ImageHandler;
pub use source::Raster;
