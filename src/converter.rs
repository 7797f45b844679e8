//! # 转换编排模块
//!
//! ## 设计思路
//!
//! `Converter` 只负责流程编排，每个阶段的算法都在 `tiles` 中。
//! 处理链路固定为：
//! 1. 加载并栅格化图片（`image_handler`）
//! 2. 分块
//! 3. 聚类得到调色板
//! 4. 为每块分配最近字符
//! 5. 十六进制编码 + 行对齐 RLE 打包，拼成记录
//!
//! ## 实现思路
//!
//! - 配置在构造时校验一次，之后整次转换使用同一份。
//! - 聚类器通过 `Clusterer` 注入，默认 `KMeans`。
//! - 记录 `partition/cluster/assign/encode/total` 阶段耗时，便于性能诊断。

use std::path::Path;
use std::time::Instant;

use image::GrayImage;

use crate::bigimg;
use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::image_handler::{ImageHandler, Raster};
use crate::preview;
use crate::tiles::{
    Clusterer, EncodedLine, IndexGrid, KMeans, Palette, RunLengthRowPacker, TilePaletteBuilder,
    assign_tiles, partition_blocks,
};

/// 一次转换的完整结果。
#[derive(Debug, Clone)]
pub struct Conversion {
    pub file_name: String,
    pub palette: Palette,
    pub grid: IndexGrid,
    pub lines: Vec<EncodedLine>,
    /// 不含行号的记录序列。
    pub records: Vec<String>,
}

impl Conversion {
    pub fn numbered_records(&self, start_line: u32) -> Result<Vec<String>, ConvertError> {
        bigimg::number_records(&self.records, start_line)
    }

    pub fn write_listing(&self, path: &Path, start_line: u32) -> Result<(), ConvertError> {
        bigimg::write_listing(path, &self.records, start_line)
    }

    pub fn render_preview(&self) -> Result<GrayImage, ConvertError> {
        preview::render_preview(&self.palette, &self.grid)
    }
}

/// 转换器。
pub struct Converter {
    config: ConvertConfig,
    clusterer: Box<dyn Clusterer>,
}

impl Converter {
    /// 使用默认 k-means 聚类器。
    ///
    /// # 示例
    /// ```rust
    /// use bigimg_converter::{ConvertConfig, Converter};
    /// use bigimg_converter::image_handler::Raster;
    ///
    /// let config = ConvertConfig { palette_size: 1, ..ConvertConfig::default() };
    /// let converter = Converter::new(config)?;
    /// let conversion = converter.convert_raster(&Raster::filled(16, 16, 0), "blank.png")?;
    /// assert_eq!(conversion.records.len(), 4);
    /// # Ok::<(), bigimg_converter::ConvertError>(())
    /// ```
    pub fn new(config: ConvertConfig) -> Result<Self, ConvertError> {
        let clusterer = Box::new(KMeans::from_config(&config));
        Self::with_clusterer(config, clusterer)
    }

    pub fn with_clusterer(
        config: ConvertConfig,
        clusterer: Box<dyn Clusterer>,
    ) -> Result<Self, ConvertError> {
        config.validate()?;
        Ok(Self { config, clusterer })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// 处理主入口：读取图片文件并转换。
    pub fn convert_file(&self, path: &Path) -> Result<Conversion, ConvertError> {
        let (width, height) = self.config.target_dimensions()?;
        let handler = ImageHandler::new(self.config.image.clone());
        let raster = handler.load_raster(path, width, height)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.convert_raster(&raster, &file_name)
    }

    /// 对已栅格化的图片执行分块、聚类、分配与编码。
    pub fn convert_raster(&self, raster: &Raster, file_name: &str) -> Result<Conversion, ConvertError> {
        let config = &self.config;
        let total_start = Instant::now();

        let partition_start = Instant::now();
        let blocks = partition_blocks(raster, config.block_size)?;
        let partition_elapsed = partition_start.elapsed();

        let cluster_start = Instant::now();
        let palette = TilePaletteBuilder::new(self.clusterer.as_ref()).build(&blocks, config.palette_size)?;
        let cluster_elapsed = cluster_start.elapsed();

        let assign_start = Instant::now();
        let grid = assign_tiles(&blocks, &palette)?;
        let assign_elapsed = assign_start.elapsed();

        let encode_start = Instant::now();
        let lines = RunLengthRowPacker::from_config(config).pack(&grid);
        let records = bigimg::build_records(file_name, &palette, &lines);
        let encode_elapsed = encode_start.elapsed();

        log::info!(
            "✅ 转换完成 - 文件: {} 块网格: {}x{} 字符: {}（实际使用 {}） RLE 记录: {} 总记录: {}",
            file_name,
            grid.w_blocks,
            grid.h_blocks,
            palette.len(),
            grid.distinct_count(),
            lines.len(),
            records.len()
        );
        log::info!(
            "⏱️ partition={}ms cluster={}ms assign={}ms encode={}ms total={}ms",
            partition_elapsed.as_millis(),
            cluster_elapsed.as_millis(),
            assign_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(Conversion {
            file_name: file_name.to_string(),
            palette,
            grid,
            lines,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_tile_config() -> ConvertConfig {
        ConvertConfig {
            palette_size: 1,
            ..ConvertConfig::default()
        }
    }

    #[test]
    fn sixteen_square_single_tile_example() {
        let converter = Converter::new(single_tile_config()).unwrap();
        let conversion = converter
            .convert_raster(&Raster::filled(16, 16, 1), "test.png")
            .unwrap();

        assert_eq!(conversion.grid.indices, vec![0, 0, 0, 0]);
        assert_eq!(
            conversion.records,
            vec![
                r#"DATA "BIGIMG", 1, "test.png""#,
                r#"DATA "FFFFFFFFFFFFFFFF""#,
                "DATA 128,2",
                "DATA 128,2",
            ]
        );
    }

    #[test]
    fn numbered_records_follow_start_line() {
        let converter = Converter::new(single_tile_config()).unwrap();
        let conversion = converter
            .convert_raster(&Raster::filled(16, 8, 0), "x.png")
            .unwrap();

        let numbered = conversion.numbered_records(100).unwrap();
        assert_eq!(numbered[0], r#"100 DATA "BIGIMG", 1, "x.png""#);
        assert_eq!(numbered[2], "102 DATA 128,2");
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = ConvertConfig {
            block_size: 0,
            ..ConvertConfig::default()
        };
        assert!(matches!(
            Converter::new(config),
            Err(ConvertError::Configuration(_))
        ));
    }

    #[test]
    fn non_divisible_raster_aborts_without_records() {
        let converter = Converter::new(single_tile_config()).unwrap();
        let result = converter.convert_raster(&Raster::filled(12, 16, 0), "odd.png");
        assert!(matches!(result, Err(ConvertError::Configuration(_))));
    }

    #[test]
    fn palette_larger_than_distinct_blocks_still_has_n_entries() {
        let config = ConvertConfig {
            palette_size: 8,
            ..ConvertConfig::default()
        };
        let converter = Converter::new(config).unwrap();

        let mut raster = Raster::filled(32, 16, 0);
        for y in 0..8 {
            for x in 0..8 {
                raster.set(y, x, 1);
            }
        }

        let conversion = converter.convert_raster(&raster, "two.png").unwrap();
        assert_eq!(conversion.palette.len(), 8);
        assert!(conversion.grid.indices.iter().all(|&i| i < 8));
        assert_eq!(conversion.records.len(), 1 + 8 + conversion.lines.len());
    }
}
