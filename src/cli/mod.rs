//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `info`: 读取 CIF 并展示结构
//! - `orthogonalize` (`ortho`): 构建正交超胞并导出
//! - `rttddft`: 生成 RT-TDDFT 输入块
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: info, orthogonalize, rttddft

pub mod info;
pub mod orthogonalize;
pub mod rttddft;

use clap::{Parser, Subcommand};

/// riper-tools - RIPER 计算辅助工具箱
#[derive(Parser)]
#[command(name = "riper-tools")]
#[command(version)]
#[command(about = "Structure orthogonalization and RT-TDDFT input tools for RIPER", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Show the structure summary of a CIF file
    Info(info::InfoArgs),

    /// Build an orthogonal supercell from a CIF file
    #[command(visible_alias = "ortho")]
    Orthogonalize(orthogonalize::OrthogonalizeArgs),

    /// Generate the $fields and $rttddft blocks for a RIPER control file
    Rttddft(rttddft::RtTddftArgs),
}
