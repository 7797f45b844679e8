//! # 转换配置模块
//!
//! ## 设计思路
//!
//! 将分块、聚类、编码三个阶段的所有参数集中到 `ConvertConfig`，
//! 通过参数显式传入流水线，不使用任何模块级可变状态。
//!
//! ## 实现思路
//!
//! - `Default` 对应 32×24 块、8×8 像素、32 个字符的标准屏幕。
//! - `validate` 在流水线启动前一次性检查所有前置条件。
//! - 派生量（目标分辨率）由方法计算，避免字段间不一致。

use crate::error::ConvertError;
use crate::image_handler::ImageConfig;

/// 单字节能容纳的最大行宽（十六进制编码每行 2 位）。
pub const MAX_BLOCK_SIZE: usize = 8;

/// 转换配置。
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// 块边长（像素）。
    pub block_size: usize,
    /// 调色板大小（生成的字符数 N）。
    pub palette_size: usize,
    /// 调色板索引输出时的基准码值。
    pub code_base: u32,
    /// 单条 RLE 记录负载的最大字符数。
    pub max_line_len: usize,
    /// 聚类随机种子。
    pub seed: u64,
    /// 聚类重启次数（取惯性最小的一次）。
    pub restarts: usize,
    /// 单次聚类的最大迭代次数。
    pub max_iterations: usize,
    /// 相对收敛阈值（乘以特征方差均值）。
    pub tolerance: f64,
    /// 屏幕宽度（块）。
    pub screen_cols: usize,
    /// 屏幕高度（块）。
    pub screen_rows: usize,
    /// 图片加载阶段配置。
    pub image: ImageConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            block_size: 8,
            palette_size: 32,
            code_base: 0x80,
            max_line_len: 76,
            seed: 0,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
            screen_cols: 32,
            screen_rows: 24,
            image: ImageConfig::default(),
        }
    }
}

impl ConvertConfig {
    /// 校验所有前置条件。
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(ConvertError::Configuration(format!(
                "block_size 必须在 1~{} 之间（当前：{}）",
                MAX_BLOCK_SIZE, self.block_size
            )));
        }
        if self.palette_size == 0 {
            return Err(ConvertError::Configuration(
                "palette_size 必须大于 0".to_string(),
            ));
        }
        if u64::from(self.code_base) + self.palette_size as u64 - 1 > u64::from(u32::MAX) {
            return Err(ConvertError::Configuration(format!(
                "code_base {} + palette_size {} 超出码值范围",
                self.code_base, self.palette_size
            )));
        }
        if self.max_line_len == 0 {
            return Err(ConvertError::Configuration(
                "max_line_len 必须大于 0".to_string(),
            ));
        }
        if self.restarts == 0 {
            return Err(ConvertError::Configuration("restarts 必须大于 0".to_string()));
        }
        if self.max_iterations == 0 {
            return Err(ConvertError::Configuration(
                "max_iterations 必须大于 0".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConvertError::Configuration(format!(
                "tolerance 必须是非负有限数（当前：{}）",
                self.tolerance
            )));
        }
        if self.screen_cols == 0 || self.screen_rows == 0 {
            return Err(ConvertError::Configuration(format!(
                "屏幕尺寸不能为 0（当前：{}x{} 块）",
                self.screen_cols, self.screen_rows
            )));
        }
        self.target_dimensions()?;

        Ok(())
    }

    /// 目标分辨率 `(width, height)`（像素）。
    pub fn target_dimensions(&self) -> Result<(u32, u32), ConvertError> {
        let width = self
            .screen_cols
            .checked_mul(self.block_size)
            .and_then(|w| u32::try_from(w).ok());
        let height = self
            .screen_rows
            .checked_mul(self.block_size)
            .and_then(|h| u32::try_from(h).ok());

        match (width, height) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(ConvertError::Configuration(format!(
                "目标分辨率溢出：{}x{} 块 × {} 像素",
                self.screen_cols, self.screen_rows, self.block_size
            ))),
        }
    }
}
