//! # 图片加载配置模块
//!
//! ## 设计思路
//!
//! 将读取与解码阶段的“可调策略”集中到 `ImageConfig`，与分块/聚类参数分开。
//! 缩放滤镜以稳定字符串名对外（配置文件与命令行），内部映射到 `image` 的
//! `FilterType`。
//!
//! ## 实现思路
//!
//! - `Default` 提供适合单张图片转换的上限。
//! - `ResizeFilter` 负责滤镜名解析与反向输出，风格与性能档位解析保持一致。

use image::imageops::FilterType;

use super::ImageError;

/// 图片加载配置。
///
/// 字段覆盖了文件读取、解码限制与缩放三个阶段。
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 缩放到目标分辨率时使用的滤镜。
    pub resize_filter: ResizeFilter,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: ResizeFilter::Lanczos3,
        }
    }
}

/// 缩放滤镜（面向配置文件与命令行的稳定名称）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    /// 从外部字符串解析滤镜名。
    ///
    /// # 示例
    /// ```rust
    /// use bigimg_converter::image_handler::ResizeFilter;
    ///
    /// let f = ResizeFilter::from_str("Lanczos3")?;
    /// assert_eq!(f.as_str(), "lanczos3");
    /// # Ok::<(), bigimg_converter::image_handler::ImageError>(())
    /// ```
    pub fn from_str(name: &str) -> Result<Self, ImageError> {
        match name.trim().to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" => Ok(Self::Triangle),
            "catmull-rom" | "catmullrom" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            other => Err(ImageError::InvalidFormat(format!(
                "未知缩放滤镜：{}（可选：nearest / triangle / catmull-rom / gaussian / lanczos3）",
                other
            ))),
        }
    }

    /// 将滤镜输出为稳定字符串，供日志与配置回写。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Triangle => "triangle",
            Self::CatmullRom => "catmull-rom",
            Self::Gaussian => "gaussian",
            Self::Lanczos3 => "lanczos3",
        }
    }

    pub(crate) fn to_image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
