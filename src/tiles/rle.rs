//! # 行对齐 RLE 模块
//!
//! ## 设计思路
//!
//! 索引网格按行优先展平为码值（索引 + 基准码），分三步输出：
//! 1. 对整条序列做游程编码（此时游程可以跨行）；
//! 2. 在每 `w_blocks` 列处重新切分游程，保证每行计数之和恰为 `w_blocks`；
//! 3. 每行内把 `code,count` 条目用 `,` 贪心拼入行，超过长度上限就换行。
//!
//! 行与行之间绝不合并，即使上一行末尾与下一行开头码值相同。
//! 回放端按行渲染，需要这种对齐。

use std::fmt;

use super::assign::IndexGrid;
use crate::config::ConvertConfig;

/// 单个游程。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub code: u32,
    pub count: usize,
}

impl Run {
    pub fn new(code: u32, count: usize) -> Self {
        Self { code, count }
    }

    fn entry(&self) -> String {
        format!("{},{}", self.code, self.count)
    }
}

/// 一条 RLE 记录的负载（不含 `DATA ` 前缀）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLine(String);

impl EncodedLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EncodedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 对整条码值序列做最大游程编码。
pub fn run_length_encode(codes: &[u32]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for &code in codes {
        match runs.last_mut() {
            Some(run) if run.code == code => run.count += 1,
            _ => runs.push(Run::new(code, 1)),
        }
    }
    runs
}

/// 按行宽切分游程，返回每行的游程列表。
///
/// 游程总长不是行宽整数倍时，最后一个不满行也会输出。
pub fn align_runs_to_rows(runs: &[Run], row_width: usize) -> Vec<Vec<Run>> {
    if row_width == 0 {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut current_row = Vec::new();
    let mut cols = 0;

    for run in runs {
        let mut remaining = run.count;
        while remaining > 0 {
            let used = remaining.min(row_width - cols);
            current_row.push(Run::new(run.code, used));
            cols += used;
            remaining -= used;

            if cols == row_width {
                rows.push(std::mem::take(&mut current_row));
                cols = 0;
            }
        }
    }

    if !current_row.is_empty() {
        rows.push(current_row);
    }

    rows
}

/// 把一行的游程贪心打包成若干条记录，每条负载不超过 `max_line_len`。
///
/// 单个条目本身超长时独占一行（不会输出空行）。
pub fn pack_row_lines(row: &[Run], max_line_len: usize) -> Vec<EncodedLine> {
    let mut lines = Vec::new();
    let mut buffer = String::new();

    for run in row {
        let entry = run.entry();
        let added = entry.len() + usize::from(!buffer.is_empty());

        if !buffer.is_empty() && buffer.len() + added > max_line_len {
            lines.push(EncodedLine(std::mem::take(&mut buffer)));
        }

        if !buffer.is_empty() {
            buffer.push(',');
        }
        buffer.push_str(&entry);
    }

    if !buffer.is_empty() {
        lines.push(EncodedLine(buffer));
    }

    lines
}

/// 行对齐 RLE 打包器。
#[derive(Debug, Clone)]
pub struct RunLengthRowPacker {
    pub code_base: u32,
    pub max_line_len: usize,
}

impl RunLengthRowPacker {
    pub fn new(code_base: u32, max_line_len: usize) -> Self {
        Self {
            code_base,
            max_line_len,
        }
    }

    pub fn from_config(config: &ConvertConfig) -> Self {
        Self::new(config.code_base, config.max_line_len)
    }

    /// 行优先展平并加上基准码。
    pub fn codes(&self, grid: &IndexGrid) -> Vec<u32> {
        grid.indices
            .iter()
            .map(|&index| self.code_base + index as u32)
            .collect()
    }

    /// 行对齐后的游程。
    pub fn rows(&self, grid: &IndexGrid) -> Vec<Vec<Run>> {
        let runs = run_length_encode(&self.codes(grid));
        align_runs_to_rows(&runs, grid.w_blocks)
    }

    /// 完整打包：每行至少一条记录，行之间不共享记录。
    pub fn pack(&self, grid: &IndexGrid) -> Vec<EncodedLine> {
        let rows = self.rows(grid);
        let lines: Vec<EncodedLine> = rows
            .iter()
            .flat_map(|row| pack_row_lines(row, self.max_line_len))
            .collect();

        log::debug!(
            "📦 RLE 打包完成 - rows={} runs={} lines={}",
            rows.len(),
            rows.iter().map(Vec::len).sum::<usize>(),
            lines.len()
        );

        lines
    }
}
