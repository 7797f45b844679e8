//! BIGIMG 记录输出模块
//!
//! # 设计思路
//!
//! 记录分三段：头部、N 条字符位图、若干条 RLE 记录。
//! 行号属于宿主 BASIC 环境，只在写文件时加上。
//!
//! # 实现思路
//!
//! - 整个清单先在内存中拼好，再一次性写入，失败时不会留下半个文件。
//! - 行号溢出视为配置错误。

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::tiles::{EncodedLine, Palette};

/// 头部记录：`DATA "BIGIMG", <N>, "<文件名>"`。
pub fn header_record(palette_size: usize, file_name: &str) -> String {
    format!("DATA \"BIGIMG\", {}, \"{}\"", palette_size, file_name)
}

/// 拼出完整记录序列（不含行号）。
pub fn build_records(file_name: &str, palette: &Palette, lines: &[EncodedLine]) -> Vec<String> {
    let mut records = Vec::with_capacity(1 + palette.len() + lines.len());
    records.push(header_record(palette.len(), file_name));
    records.extend(
        palette
            .entries()
            .iter()
            .map(|entry| format!("DATA \"{}\"", entry.to_hex())),
    );
    records.extend(lines.iter().map(|line| format!("DATA {}", line)));
    records
}

/// 为每条记录加上从 `start_line` 起逐条递增的行号。
pub fn number_records(records: &[String], start_line: u32) -> Result<Vec<String>, ConvertError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let number = u32::try_from(i)
                .ok()
                .and_then(|offset| start_line.checked_add(offset))
                .ok_or_else(|| {
                    ConvertError::Configuration(format!(
                        "行号溢出：起始 {} 之后第 {} 条记录",
                        start_line, i
                    ))
                })?;
            Ok(format!("{} {}", number, record))
        })
        .collect()
}

/// 写出带行号的 BASIC 清单，每条记录一行。
pub fn write_listing(path: &Path, records: &[String], start_line: u32) -> Result<(), ConvertError> {
    let numbered = number_records(records, start_line)?;
    let mut content = String::with_capacity(numbered.iter().map(|l| l.len() + 1).sum());
    for line in &numbered {
        content.push_str(line);
        content.push('\n');
    }

    fs::write(path, content)?;
    log::info!(
        "💾 已写出 BASIC 清单 - 路径: {} 记录数: {} 行号: {}~{}",
        path.display(),
        numbered.len(),
        start_line,
        start_line as u64 + numbered.len().saturating_sub(1) as u64
    );
    Ok(())
}

/// 默认输出路径：把输入文件扩展名换成 `.bas`。
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("bas")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::PaletteEntry;

    #[test]
    fn header_matches_loader_format() {
        assert_eq!(header_record(32, "cat.png"), r#"DATA "BIGIMG", 32, "cat.png""#);
    }

    #[test]
    fn records_are_header_palette_then_runs() {
        let palette = Palette::from_entries(vec![
            PaletteEntry::new(0, vec![0.0; 64], 8),
            PaletteEntry::new(1, vec![1.0; 64], 8),
        ]);
        let lines = crate::tiles::pack_row_lines(&[crate::tiles::Run::new(128, 2)], 76);

        let records = build_records("a.png", &palette, &lines);
        assert_eq!(
            records,
            vec![
                r#"DATA "BIGIMG", 2, "a.png""#.to_string(),
                r#"DATA "0000000000000000""#.to_string(),
                r#"DATA "FFFFFFFFFFFFFFFF""#.to_string(),
                "DATA 128,2".to_string(),
            ]
        );
    }

    #[test]
    fn numbering_starts_at_caller_line() {
        let records = vec!["DATA 1".to_string(), "DATA 2".to_string()];
        let numbered = number_records(&records, 1000).unwrap();
        assert_eq!(numbered, vec!["1000 DATA 1", "1001 DATA 2"]);
    }

    #[test]
    fn numbering_overflow_is_rejected() {
        let records = vec!["DATA 1".to_string(), "DATA 2".to_string()];
        assert!(number_records(&records, u32::MAX).is_err());
    }

    #[test]
    fn default_output_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("art/photo.final.png")),
            PathBuf::from("art/photo.final.bas")
        );
    }

    #[test]
    fn write_listing_terminates_every_line() {
        let path = std::env::temp_dir().join(format!("bigimg-listing-{}.bas", std::process::id()));
        write_listing(&path, &["DATA 1".to_string(), "DATA 2".to_string()], 10).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(content, "10 DATA 1\n11 DATA 2\n");
    }
}
