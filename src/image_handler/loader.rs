//! # 文件加载模块
//!
//! ## 设计思路
//!
//! 只负责“路径 → 原始字节”，在进入解码前完成体积与文件签名校验，
//! 让不可读或非图片输入尽早失败，不进入后续分块与聚类。

use std::path::Path;

use super::source::RawImageData;
use super::{ImageConfig, ImageError, ImageHandler};

impl ImageHandler {
    /// 读取本地图片文件。
    pub(super) fn load_from_file(
        &self,
        path: &Path,
        config: &ImageConfig,
    ) -> Result<RawImageData, ImageError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

        if !path.exists() {
            return Err(ImageError::FileSystem(format!(
                "文件不存在：{}",
                path.display()
            )));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if !metadata.is_file() {
            return Err(ImageError::FileSystem(format!(
                "不是普通文件：{}",
                path.display()
            )));
        }

        if metadata.len() > config.max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取图片文件：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        Ok(RawImageData {
            bytes,
            source_hint: path.display().to_string(),
        })
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    pub(super) fn validate_image_signature(bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| ImageError::InvalidFormat("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ImageError::InvalidFormat(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bigimg-loader-{}-{}", std::process::id(), name))
    }

    #[test]
    fn load_from_file_rejects_missing_file() {
        let handler = ImageHandler::new(ImageConfig::default());
        let config = ImageConfig::default();
        let result = handler.load_from_file(Path::new("/definitely/not/here.png"), &config);
        assert!(matches!(result, Err(ImageError::FileSystem(_))));
    }

    #[test]
    fn load_from_file_rejects_non_image_payload() {
        let path = temp_path("not-image.png");
        std::fs::write(&path, b"10 PRINT \"HELLO\"\n20 GOTO 10\n").expect("write temp file failed");

        let handler = ImageHandler::new(ImageConfig::default());
        let result = handler.load_from_file(&path, &ImageConfig::default());
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn load_from_file_rejects_oversized_file() {
        let path = temp_path("big.bin");
        std::fs::write(&path, vec![0u8; 4096]).expect("write temp file failed");

        let config = ImageConfig {
            max_file_size: 1024,
            ..ImageConfig::default()
        };
        let handler = ImageHandler::new(config.clone());
        let result = handler.load_from_file(&path, &config);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn signature_check_accepts_png_header() {
        let png_header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
        assert!(ImageHandler::validate_image_signature(&png_header).is_ok());
    }

    #[test]
    fn signature_check_rejects_empty_input() {
        let result = ImageHandler::validate_image_signature(&[]);
        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }
}
