//! # BIGIMG 转换工具 — 命令行入口
//!
//! 本文件仅负责参数解析、配置合并与日志初始化。
//! 配置优先级：默认值 < `--config` 设置文件 < 命令行参数。

use std::path::PathBuf;
use std::process::ExitCode;

use bigimg_converter::bigimg::default_output_path;
use bigimg_converter::preview::save_preview;
use bigimg_converter::settings::{ConvertSettings, load_settings_from_path};
use bigimg_converter::{ConvertConfig, ConvertError, Converter};
use clap::Parser;

/// 把位图转换为复古 BASIC 加载器使用的 BIGIMG DATA 清单
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 源图片路径
    image: PathBuf,
    /// BASIC 起始行号
    start_line: u32,
    /// 字符数（调色板大小，默认 32）
    num_chars: Option<usize>,
    /// 块边长（像素，1~8）
    #[arg(long)]
    block_size: Option<usize>,
    /// 调色板基准码值（十进制或 0x 十六进制，默认 0x80）
    #[arg(long, value_parser = parse_code)]
    code_base: Option<u32>,
    /// RLE 记录负载最大字符数
    #[arg(long)]
    max_line_len: Option<usize>,
    /// 聚类随机种子
    #[arg(long)]
    seed: Option<u64>,
    /// 聚类重启次数
    #[arg(long)]
    restarts: Option<usize>,
    /// 单次聚类最大迭代次数
    #[arg(long)]
    max_iterations: Option<usize>,
    /// 屏幕宽度（块）
    #[arg(long)]
    cols: Option<usize>,
    /// 屏幕高度（块）
    #[arg(long)]
    rows: Option<usize>,
    /// 缩放滤镜：nearest / triangle / catmull-rom / gaussian / lanczos3
    #[arg(long)]
    filter: Option<String>,
    /// JSON 设置文件
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// 输出清单路径（默认与源图片同名，扩展名 .bas）
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// 额外保存字符近似预览图
    #[arg(long)]
    preview: Option<PathBuf>,
    /// 打印最终生效的设置（JSON）后退出
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn overrides(&self) -> ConvertSettings {
        ConvertSettings {
            block_size: self.block_size,
            palette_size: self.num_chars,
            code_base: self.code_base,
            max_line_len: self.max_line_len,
            seed: self.seed,
            restarts: self.restarts,
            max_iterations: self.max_iterations,
            screen_cols: self.cols,
            screen_rows: self.rows,
            resize_filter: self.filter.clone(),
            ..ConvertSettings::default()
        }
    }
}

fn parse_code(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse::<u32>(),
    };
    parsed.map_err(|e| format!("无效码值 '{}': {}", value, e))
}

fn run(args: &Args) -> Result<(), ConvertError> {
    let mut config = ConvertConfig::default();
    if let Some(ref path) = args.config {
        load_settings_from_path(path)?.apply_to(&mut config)?;
        log::info!("⚙️ 已加载设置文件 - 路径: {}", path.display());
    }
    args.overrides().apply_to(&mut config)?;

    if args.print_config {
        config.validate()?;
        println!("{}", ConvertSettings::from_config(&config).to_json_pretty()?);
        return Ok(());
    }

    let converter = Converter::new(config)?;
    let conversion = converter.convert_file(&args.image)?;

    if let Some(ref preview_path) = args.preview {
        save_preview(&conversion.render_preview()?, preview_path)?;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image));
    conversion.write_listing(&output, args.start_line)?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("错误: {err}");
            ExitCode::FAILURE
        }
    }
}
