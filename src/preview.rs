//! 预览渲染
//!
//! 把每个块替换成其调色板字符的二值位图，得到与目标屏幕同尺寸的灰度图，
//! 用于肉眼检查字符集对原图的近似程度。

use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::ConvertError;
use crate::image_handler::ImageError;
use crate::tiles::{IndexGrid, Palette};

/// 渲染预览：位图 1 → 255，0 → 0。
pub fn render_preview(palette: &Palette, grid: &IndexGrid) -> Result<GrayImage, ConvertError> {
    let block_size = palette.entries().first().map_or(0, |e| e.block_size());
    let width = u32::try_from(grid.w_blocks * block_size)
        .map_err(|_| ConvertError::Configuration("预览宽度溢出".to_string()))?;
    let height = u32::try_from(grid.h_blocks * block_size)
        .map_err(|_| ConvertError::Configuration("预览高度溢出".to_string()))?;

    let mut out = GrayImage::new(width, height);
    for by in 0..grid.h_blocks {
        for bx in 0..grid.w_blocks {
            let index = grid.get(by, bx);
            let entry = palette.get(index).ok_or_else(|| {
                ConvertError::Configuration(format!("索引 {} 超出调色板范围", index))
            })?;

            for (i, &bit) in entry.bitmap().iter().enumerate() {
                let x = (bx * block_size + i % block_size) as u32;
                let y = (by * block_size + i / block_size) as u32;
                out.put_pixel(x, y, Luma([bit * 255]));
            }
        }
    }

    Ok(out)
}

/// 保存预览图，格式由扩展名决定。
pub fn save_preview(image: &GrayImage, path: &Path) -> Result<(), ConvertError> {
    image
        .save(path)
        .map_err(|e| ImageError::FileSystem(format!("保存预览图失败：{}", e)))?;
    log::info!("🖼️ 已保存预览图 - 路径: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::PaletteEntry;

    #[test]
    fn preview_places_tiles_on_grid() {
        let palette = Palette::from_entries(vec![
            PaletteEntry::new(0, vec![0.0; 4], 2),
            PaletteEntry::new(1, vec![1.0, 0.0, 0.0, 1.0], 2),
        ]);
        let grid = IndexGrid::new(1, 2, vec![0, 1]).unwrap();

        let img = render_preview(&palette, &grid).unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(2, 0).0, [255]);
        assert_eq!(img.get_pixel(3, 0).0, [0]);
        assert_eq!(img.get_pixel(3, 1).0, [255]);
    }

    #[test]
    fn preview_rejects_out_of_range_index() {
        let palette = Palette::from_entries(vec![PaletteEntry::new(0, vec![0.0; 4], 2)]);
        let grid = IndexGrid::new(1, 1, vec![3]).unwrap();
        assert!(render_preview(&palette, &grid).is_err());
    }
}
