//! # 中间数据模型
//!
//! ## 设计思路
//!
//! 将“已加载字节”和“分块前的二值栅格”解耦：
//! - `RawImageData` 表示已读取但未解码的字节
//! - `Raster` 表示缩放并抖动后的 0/1 像素网格，是分块阶段的唯一输入

use crate::error::ConvertError;

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: String,
}

/// 二值栅格：`height` 行 × `width` 列，像素取值只有 0 与 1。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// 由行优先排列的像素构造栅格。
    ///
    /// 非零像素一律视为 1。
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self, ConvertError> {
        let expected = width.checked_mul(height).ok_or_else(|| {
            ConvertError::Configuration(format!("栅格尺寸溢出：{}x{}", width, height))
        })?;
        if pixels.len() != expected {
            return Err(ConvertError::Configuration(format!(
                "栅格像素数量不匹配：期望 {}，实际 {}",
                expected,
                pixels.len()
            )));
        }

        let pixels = pixels.into_iter().map(|p| u8::from(p != 0)).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// 全部为同一取值的栅格。
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![u8::from(value != 0); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 读取 `(row, col)` 处像素。越界访问会 panic，调用方负责保证坐标合法。
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.pixels[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.pixels[row * self.width + col] = u8::from(value != 0);
    }

    /// 取值为 1 的像素数量。
    pub fn count_ones(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == 1).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_non_zero_pixels() {
        let raster = Raster::new(2, 1, vec![0, 255]).unwrap();
        assert_eq!(raster.get(0, 0), 0);
        assert_eq!(raster.get(0, 1), 1);
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let result = Raster::new(3, 3, vec![0; 8]);
        assert!(matches!(result, Err(ConvertError::Configuration(_))));
    }
}
