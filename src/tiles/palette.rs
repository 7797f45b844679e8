//! # 调色板模块
//!
//! ## 设计思路
//!
//! 调色板是“代表性字符位图”的有序集合，条目索引稠密地覆盖 `0..N`。
//! 构建过程只依赖 `Clusterer`，与具体聚类算法解耦；
//! 每个条目同时保存实数中心与阈值 0.5 二值化后的位图，创建后不再修改。

use super::cluster::Clusterer;
use super::hex::encode_tile_hex;
use super::partition::BlockSet;
use crate::error::ConvertError;

/// 调色板条目。
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    index: usize,
    block_size: usize,
    centroid: Vec<f32>,
    bitmap: Vec<u8>,
}

impl PaletteEntry {
    /// 由聚类中心构造条目，`> 0.5` 的分量记为 1。
    pub fn new(index: usize, centroid: Vec<f32>, block_size: usize) -> Self {
        let bitmap = centroid.iter().map(|&v| u8::from(v > 0.5)).collect();
        Self {
            index,
            block_size,
            centroid,
            bitmap,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn centroid(&self) -> &[f32] {
        &self.centroid
    }

    /// 二值化位图，行优先，长度 `block_size²`。
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// 每行一个 2 位大写十六进制组，自上而下拼接。
    pub fn to_hex(&self) -> String {
        encode_tile_hex(&self.bitmap, self.block_size)
    }
}

/// 有序调色板。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn from_entries(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// 按中心顺序编号 `0..N`。
    pub fn from_centroids(centroids: Vec<Vec<f32>>, block_size: usize) -> Self {
        let entries = centroids
            .into_iter()
            .enumerate()
            .map(|(index, centroid)| PaletteEntry::new(index, centroid, block_size))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    pub fn centroids(&self) -> Vec<Vec<f32>> {
        self.entries.iter().map(|e| e.centroid.clone()).collect()
    }
}

/// 调色板构建器。
pub struct TilePaletteBuilder<'a> {
    clusterer: &'a dyn Clusterer,
}

impl<'a> TilePaletteBuilder<'a> {
    pub fn new(clusterer: &'a dyn Clusterer) -> Self {
        Self { clusterer }
    }

    /// 对全部块聚类，得到恰好 `palette_size` 个条目。
    pub fn build(&self, blocks: &BlockSet, palette_size: usize) -> Result<Palette, ConvertError> {
        if palette_size == 0 {
            return Err(ConvertError::Configuration(
                "palette_size 必须大于 0".to_string(),
            ));
        }

        let centroids = self.clusterer.fit(&blocks.vectors, palette_size)?;
        if centroids.len() != palette_size {
            return Err(ConvertError::Configuration(format!(
                "聚类返回 {} 个中心，期望 {}",
                centroids.len(),
                palette_size
            )));
        }

        let expected_len = blocks.block_size * blocks.block_size;
        if centroids.iter().any(|c| c.len() != expected_len) {
            return Err(ConvertError::Configuration(format!(
                "聚类中心长度与块大小 {} 不一致",
                blocks.block_size
            )));
        }

        Ok(Palette::from_centroids(centroids, blocks.block_size))
    }
}
