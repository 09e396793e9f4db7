//! # 图片差异比对工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与退出码映射。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::process::ExitCode;

use clap::Parser;
use delta_image::cli::{self, Cli, EXIT_FAILURE};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 参数不合法时 clap 自行输出用法并以 2 退出
    let cli = Cli::parse();

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 执行失败 [{}]: {}", err.code(), err);
            eprintln!("error ({}): {}", err.stage(), err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
