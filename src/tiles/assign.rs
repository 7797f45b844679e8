//! # 分配模块
//!
//! 把每个块映射到平方欧氏距离最小的调色板条目，生成块网格上的索引表。
//! 距离相等时取索引最小者（按调色板顺序遇到的第一个最小值）。

use super::palette::Palette;
use super::partition::BlockSet;
use crate::error::ConvertError;

/// 块网格上的调色板索引，行优先。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGrid {
    pub h_blocks: usize,
    pub w_blocks: usize,
    pub indices: Vec<usize>,
}

impl IndexGrid {
    pub fn new(h_blocks: usize, w_blocks: usize, indices: Vec<usize>) -> Result<Self, ConvertError> {
        if indices.len() != h_blocks * w_blocks {
            return Err(ConvertError::Configuration(format!(
                "索引数量 {} 与块网格 {}x{} 不一致",
                indices.len(),
                h_blocks,
                w_blocks
            )));
        }
        Ok(Self {
            h_blocks,
            w_blocks,
            indices,
        })
    }

    pub fn get(&self, block_row: usize, block_col: usize) -> usize {
        self.indices[block_row * self.w_blocks + block_col]
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// 实际被引用到的不同调色板条目数量。
    pub fn distinct_count(&self) -> usize {
        let mut seen: Vec<usize> = self.indices.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}

#[inline]
pub(crate) fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// 最近中心的 `(索引, 平方距离)`；严格小于才替换，保证平局取最小索引。
///
/// `centroids` 为空时返回 `(0, f32::INFINITY)`，由调用方负责提前拒绝空调色板。
#[inline]
pub(crate) fn nearest_centroid(point: &[f32], centroids: &[Vec<f32>]) -> (usize, f32) {
    let mut best = (0, f32::INFINITY);
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best.1 {
            best = (index, distance);
        }
    }
    best
}

/// 为每个块选择最近的调色板条目。
pub fn assign_tiles(blocks: &BlockSet, palette: &Palette) -> Result<IndexGrid, ConvertError> {
    if palette.is_empty() {
        return Err(ConvertError::Configuration(
            "调色板为空，无法分配块".to_string(),
        ));
    }

    let centroids = palette.centroids();
    let indices = blocks
        .vectors
        .iter()
        .map(|block| nearest_centroid(block, &centroids).0)
        .collect();

    IndexGrid::new(blocks.h_blocks, blocks.w_blocks, indices)
}
