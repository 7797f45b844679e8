//! # 分块模块
//!
//! 将二值栅格切成 `block_size × block_size` 的方块，按行优先
//! （从上到下、从左到右）输出，每块展平为长度 `block_size²` 的 `f32` 向量。

use crate::error::ConvertError;
use crate::image_handler::Raster;

/// 分块结果：展平后的块向量与块网格形状。
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSet {
    pub block_size: usize,
    /// 块网格行数。
    pub h_blocks: usize,
    /// 块网格列数。
    pub w_blocks: usize,
    /// 行优先排列的块向量，第 `r * w_blocks + c` 项对应 `(r, c)` 块。
    pub vectors: Vec<Vec<f32>>,
}

impl BlockSet {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// `(block_row, block_col)` 处的块向量。
    pub fn block(&self, block_row: usize, block_col: usize) -> &[f32] {
        &self.vectors[block_row * self.w_blocks + block_col]
    }
}

/// 按块大小切分栅格。
///
/// 栅格宽高必须能被 `block_size` 整除，否则返回配置错误。
pub fn partition_blocks(raster: &Raster, block_size: usize) -> Result<BlockSet, ConvertError> {
    if block_size == 0 {
        return Err(ConvertError::Configuration("block_size 不能为 0".to_string()));
    }

    let (height, width) = (raster.height(), raster.width());
    if height % block_size != 0 || width % block_size != 0 {
        return Err(ConvertError::Configuration(format!(
            "栅格尺寸 {}x{} 不能被块大小 {} 整除",
            width, height, block_size
        )));
    }

    let h_blocks = height / block_size;
    let w_blocks = width / block_size;
    let mut vectors = Vec::with_capacity(h_blocks * w_blocks);

    for by in 0..h_blocks {
        for bx in 0..w_blocks {
            let mut block = Vec::with_capacity(block_size * block_size);
            for y in by * block_size..(by + 1) * block_size {
                for x in bx * block_size..(bx + 1) * block_size {
                    block.push(f32::from(raster.get(y, x)));
                }
            }
            vectors.push(block);
        }
    }

    Ok(BlockSet {
        block_size,
        h_blocks,
        w_blocks,
        vectors,
    })
}
