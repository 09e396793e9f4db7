//! # 命令行层
//!
//! ## 设计思路
//!
//! 命令行层仅做参数接收、配置合并与结果输出，不承载业务逻辑。
//! 实际处理交由 `DiffHandler` 与 `manifest::filter`，保持入口薄、稳定、易测试。
//!
//! ## 退出码约定
//!
//! | 情况 | 退出码 |
//! |------|--------|
//! | 成功 | 0 |
//! | 任一阶段失败 | 255（即 -1） |
//! | 参数不合法（clap 用法错误） | 2 |

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::AppError;
use crate::image_diff::{DiffConfig, DiffHandler, Derivation};
use crate::manifest;

/// 流程失败时的进程退出码（-1 截断为 8 位）。
pub const EXIT_FAILURE: u8 = 255;

/// 逐像素图片差异比对工具。
#[derive(Debug, Parser)]
#[command(name = "delta-image", version, about)]
pub struct Cli {
    /// JSON 配置文件路径（缺省字段使用默认值）。
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 比对两张图片，输出差异图、清单并归档源图。
    #[command(alias = "Diff")]
    Diff {
        /// 输出目录（不存在时自动创建）。
        output_dir: PathBuf,
        /// 第一张图片。
        first_image: PathBuf,
        /// 第二张图片。
        second_image: PathBuf,
        /// 四通道输入时同样比对 alpha 通道。
        #[arg(long)]
        keep_alpha: bool,
        /// 指定派生产物（可重复），覆盖配置中的列表。
        #[arg(long = "derivation", value_name = "NAME", value_parser = parse_derivation)]
        derivations: Vec<Derivation>,
    },

    /// 从已有清单中筛选关键字，并复制引用的图片产物。
    #[command(alias = "Filter")]
    Filter {
        /// 含 `diff.json` 的输入目录。
        input_dir: PathBuf,
        /// 输出目录（写入 `filtered.json`）。
        output_dir: PathBuf,
        /// 需要保留的清单键。
        #[arg(required = true, num_args = 1..)]
        keywords: Vec<String>,
    },
}

fn parse_derivation(value: &str) -> Result<Derivation, String> {
    Derivation::parse(value).map_err(|e| e.to_string())
}

/// 读取配置文件（如有）并叠加命令行覆盖项。
fn resolve_config(
    config_path: Option<&PathBuf>,
    keep_alpha: bool,
    derivations: Vec<Derivation>,
) -> Result<DiffConfig, AppError> {
    let mut config = match config_path {
        Some(path) => DiffConfig::load_from_path(path)?,
        None => DiffConfig::default(),
    };

    if keep_alpha {
        config.strip_alpha = false;
    }
    if !derivations.is_empty() {
        config.derivations = derivations;
    }

    Ok(config)
}

/// 执行解析后的命令。
pub fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Diff {
            output_dir,
            first_image,
            second_image,
            keep_alpha,
            derivations,
        } => {
            let config = resolve_config(cli.config.as_ref(), keep_alpha, derivations)?;
            let handler = DiffHandler::new(config)?;
            let summary = handler.differentiate(&output_dir, &first_image, &second_image)?;

            println!(
                "matchPercent={:.4} averageDelta={:.4} manifest={}",
                summary.match_percent,
                summary.average_delta,
                summary.manifest_path.display()
            );
        }
        Command::Filter {
            input_dir,
            output_dir,
            keywords,
        } => {
            let summary = manifest::filter(&input_dir, &output_dir, &keywords)?;

            println!(
                "kept={} skipped={} manifest={}",
                summary.kept_keys.len(),
                summary.skipped_keys.len(),
                summary.manifest_path.display()
            );
        }
    }

    Ok(())
}
