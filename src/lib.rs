//! # BIGIMG 转换工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs  命令行参数 (clap) + 设置文件 + 日志初始化       │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ ConvertConfig
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  converter ── Converter（阶段编排 + 耗时日志）            │
//! │       │                                                  │
//! │       ├─ image_handler   读取 · 解码 · 缩放 · 抖动 → Raster│
//! │       ├─ tiles                                           │
//! │       │   ├─ partition   Raster → 块向量                  │
//! │       │   ├─ cluster     Clusterer / KMeans               │
//! │       │   ├─ palette     块向量 → N 个字符                │
//! │       │   ├─ assign      块 → 最近字符索引                │
//! │       │   ├─ hex         字符位图 → 十六进制              │
//! │       │   └─ rle         索引网格 → 行对齐 RLE 记录       │
//! │       ├─ bigimg          DATA 记录 + 行号 + 写文件        │
//! │       └─ preview         字符近似预览图                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `ConvertError` |
//! | [`config`] | 转换参数 `ConvertConfig` 与前置条件校验 |
//! | [`settings`] | JSON 设置文件覆盖项 |
//! | [`image_handler`] | 图片文件 → 二值栅格 |
//! | [`tiles`] | 分块、聚类、分配、编码核心算法 |
//! | [`bigimg`] | BIGIMG 记录格式与 BASIC 清单输出 |
//! | [`preview`] | 预览图渲染 |
//! | [`converter`] | 整条流水线编排 |

pub mod bigimg;
pub mod config;
pub mod converter;
pub mod error;
pub mod image_handler;
pub mod preview;
pub mod settings;
pub mod tiles;

pub use config::ConvertConfig;
pub use converter::{Conversion, Converter};
pub use error::ConvertError;
