//! 转换设置文件（JSON）
//!
//! 设置文件中的每个字段都是可选覆盖项，未出现的字段保持默认值；
//! 命令行参数在其之后应用，优先级最高。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::image_handler::ResizeFilter;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_base: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restarts: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_cols: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
}

/// 读取并解析设置文件。
pub fn load_settings_from_path(path: &Path) -> Result<ConvertSettings, ConvertError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str::<ConvertSettings>(&content).map_err(|e| {
        ConvertError::Configuration(format!("解析设置文件 '{}' 失败: {}", path.display(), e))
    })
}

impl ConvertSettings {
    /// 由完整配置生成设置快照（所有字段均填充）。
    pub fn from_config(config: &ConvertConfig) -> Self {
        Self {
            block_size: Some(config.block_size),
            palette_size: Some(config.palette_size),
            code_base: Some(config.code_base),
            max_line_len: Some(config.max_line_len),
            seed: Some(config.seed),
            restarts: Some(config.restarts),
            max_iterations: Some(config.max_iterations),
            tolerance: Some(config.tolerance),
            screen_cols: Some(config.screen_cols),
            screen_rows: Some(config.screen_rows),
            resize_filter: Some(config.image.resize_filter.as_str().to_string()),
            max_file_size: Some(config.image.max_file_size),
        }
    }

    /// 将覆盖项写入配置。
    pub fn apply_to(&self, config: &mut ConvertConfig) -> Result<(), ConvertError> {
        if let Some(v) = self.block_size {
            config.block_size = v;
        }
        if let Some(v) = self.palette_size {
            config.palette_size = v;
        }
        if let Some(v) = self.code_base {
            config.code_base = v;
        }
        if let Some(v) = self.max_line_len {
            config.max_line_len = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.restarts {
            config.restarts = v;
        }
        if let Some(v) = self.max_iterations {
            config.max_iterations = v;
        }
        if let Some(v) = self.tolerance {
            config.tolerance = v;
        }
        if let Some(v) = self.screen_cols {
            config.screen_cols = v;
        }
        if let Some(v) = self.screen_rows {
            config.screen_rows = v;
        }
        if let Some(ref name) = self.resize_filter {
            config.image.resize_filter = ResizeFilter::from_str(name)
                .map_err(|e| ConvertError::Configuration(e.to_string()))?;
        }
        if let Some(v) = self.max_file_size {
            config.image.max_file_size = v;
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, ConvertError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConvertError::Configuration(format!("序列化设置失败: {}", e)))
    }
}
