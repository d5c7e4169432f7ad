//! # riper-tools - RIPER 计算辅助工具箱
//!
//! 将结构正交化与 RT-TDDFT 输入生成两个小工具统一成单一可执行文件。
//!
//! ## 子命令
//! - `info` - 展示 CIF 结构
//! - `orthogonalize` (`ortho`) - 构建正交超胞，导出 CIF / HTML / CSV / JSON
//! - `rttddft` - 生成 `$fields` 与 `$rttddft` 输入块
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (CIF 解析与写出)
//!   │     ├── ortho/     (正交性判断、超胞搜索、流程)
//!   │     ├── render/    (表格、查看器、报告)
//!   │     ├── rttddft/   (RT-TDDFT 输入块)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod ortho;
mod parsers;
mod render;
mod rttddft;
mod utils;

use clap::Parser;
use cli::Cli;
use env_logger::Env;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
