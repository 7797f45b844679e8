//! # 解码与变换流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像 → 灰度 → 目标分辨率 → 二值栅格”的过程集中管理，
//! 并在完整解码前做尺寸检查，降低异常输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素与内存上限快速拒绝
//! 3. 完整解码并转为 8 位灰度
//! 4. 精确缩放到 `cols·block × rows·block`（优先 fast_image_resize）
//! 5. Floyd–Steinberg 抖动为黑白，白色记 1、黑色记 0

use fast_image_resize as fr;
use image::imageops::{self, BiLevel};
use image::{GenericImageView, GrayImage};
use std::io::Cursor;

use super::source::{Raster, RawImageData};
use super::{ImageConfig, ImageError, ImageHandler, ResizeFilter};

impl ImageHandler {
    /// 将原始字节解码为目标分辨率的二值栅格。
    pub(crate) fn decode_to_raster(
        &self,
        raw: RawImageData,
        config: &ImageConfig,
        target_width: u32,
        target_height: u32,
    ) -> Result<Raster, ImageError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        self.validate_pixel_limits(config, header_width, header_height)?;
        self.validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        let (raw_width, raw_height) = decoded.dimensions();
        self.validate_pixel_limits(config, raw_width, raw_height)?;

        let gray = decoded.to_luma8();
        let mut resized = self.resize_to_target(gray, target_width, target_height, config.resize_filter)?;

        imageops::dither(&mut resized, &BiLevel);

        let pixels: Vec<u8> = resized.into_raw().into_iter().map(|p| u8::from(p > 127)).collect();
        let raster = Raster::new(target_width as usize, target_height as usize, pixels)
            .map_err(|e| ImageError::Decode(format!("抖动后像素数据长度异常：{}", e)))?;

        log::info!(
            "✅ 图片解码成功 - 来源: {} 原始尺寸: {}x{} 栅格尺寸: {}x{} 白色像素: {}",
            raw.source_hint,
            raw_width,
            raw_height,
            target_width,
            target_height,
            raster.count_ones()
        );

        Ok(raster)
    }

    /// 仅通过内存中的图片头信息读取宽高。
    ///
    /// 用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let cursor = Cursor::new(bytes);
        let reader = image::ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        &self,
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels == 0 {
            return Err(ImageError::Decode("图片尺寸为空".to_string()));
        }

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        &self,
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    /// 精确缩放到目标分辨率（不保持宽高比）。
    fn resize_to_target(
        &self,
        gray: GrayImage,
        target_width: u32,
        target_height: u32,
        filter: ResizeFilter,
    ) -> Result<GrayImage, ImageError> {
        if gray.dimensions() == (target_width, target_height) {
            return Ok(gray);
        }

        log::debug!(
            "🧩 缩放到目标分辨率：{}x{} -> {}x{}（filter={}）",
            gray.width(),
            gray.height(),
            target_width,
            target_height,
            filter.as_str()
        );

        match Self::resize_with_fast_image_resize(&gray, target_width, target_height, filter) {
            Ok(resized) => Ok(resized),
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}",
                    err
                );
                Ok(imageops::resize(
                    &gray,
                    target_width,
                    target_height,
                    filter.to_image_filter(),
                ))
            }
        }
    }

    fn resize_with_fast_image_resize(
        gray: &GrayImage,
        target_width: u32,
        target_height: u32,
        filter: ResizeFilter,
    ) -> Result<GrayImage, ImageError> {
        let (src_width, src_height) = gray.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            gray.as_raw().clone(),
            fr::PixelType::U8,
        )
        .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(Self::to_fast_filter(filter)));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

        GrayImage::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
    }

    fn to_fast_filter(filter: ResizeFilter) -> fr::FilterType {
        match filter {
            ResizeFilter::Nearest => fr::FilterType::Box,
            ResizeFilter::Triangle => fr::FilterType::Bilinear,
            ResizeFilter::CatmullRom => fr::FilterType::CatmullRom,
            ResizeFilter::Gaussian => fr::FilterType::Mitchell,
            ResizeFilter::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}
