//! # info 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use crate::render::CoordinateKind;
use clap::Args;
use std::path::PathBuf;

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input CIF file ('-' reads from stdin)
    pub input: PathBuf,

    /// Coordinate system for the atom table
    #[arg(long, value_enum, default_value_t = CoordinateKind::Cartesian)]
    pub coords: CoordinateKind,

    /// Write a standalone 3D viewer (HTML) to this path
    #[arg(long)]
    pub view: Option<PathBuf>,

    /// Spin the structure in the 3D viewer
    #[arg(long, default_value_t = false)]
    pub spin: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
