//! # 加载编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责“读取 → 解码 → 栅格化”两个阶段的编排，
//! 分块、聚类与编码由 `tiles` 模块负责，两边只通过 `Raster` 交互。
//!
//! ## 实现思路
//!
//! - 配置在构造时固定，单次转换内不会变化。
//! - 记录 `load/decode/total` 阶段耗时，便于性能诊断。

use std::path::Path;
use std::time::Instant;

use super::source::Raster;
use super::{ImageConfig, ImageError};

/// 图片加载器。
pub struct ImageHandler {
    pub(super) config: ImageConfig,
}

impl ImageHandler {
    /// 根据配置创建加载器。
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// 处理主入口：读取图片并输出 `target_width × target_height` 的二值栅格。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use bigimg_converter::image_handler::{ImageConfig, ImageHandler};
    ///
    /// let handler = ImageHandler::new(ImageConfig::default());
    /// let raster = handler.load_raster("photo.png".as_ref(), 256, 192)?;
    /// assert_eq!(raster.width(), 256);
    /// # Ok::<(), bigimg_converter::image_handler::ImageError>(())
    /// ```
    pub fn load_raster(
        &self,
        path: &Path,
        target_width: u32,
        target_height: u32,
    ) -> Result<Raster, ImageError> {
        let config = &self.config;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = self.load_from_file(path, config)?;
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let raster = self.decode_to_raster(raw, config, target_width, target_height)?;
        let decode_elapsed = decode_start.elapsed();

        log::info!(
            "✅ 图片加载完成 - load={}ms decode={}ms total={}ms",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    use std::time::Instant;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let v = ((x + y) % 255) as u8;
            Rgba([v, v, v, 255])
        });
        DynamicImage::ImageRgba8(img)
            .save_with_format(path, ImageFormat::Png)
            .expect("failed to write test image");
    }

    #[test]
    fn perf_load_raster_multiple_sizes() {
        let handler = ImageHandler::new(ImageConfig::default());
        let cases = [(320, 200), (1024, 768), (1920, 1080)];

        for (width, height) in cases {
            let path = std::env::temp_dir().join(format!(
                "bigimg-handler-{}-{}x{}.png",
                std::process::id(),
                width,
                height
            ));
            write_png(&path, width, height);

            let start = Instant::now();
            let raster = handler
                .load_raster(&path, 256, 192)
                .expect("load pipeline should succeed");
            let elapsed = start.elapsed();
            let _ = std::fs::remove_file(&path);

            println!(
                "[perf] load {}x{} -> {}x{} elapsed={}ms",
                width,
                height,
                raster.width(),
                raster.height(),
                elapsed.as_millis()
            );

            assert_eq!(raster.width(), 256);
            assert_eq!(raster.height(), 192);
        }
    }
}
