//! # orthogonalize 子命令 CLI 定义
//!
//! 检查输入晶胞是否正交，若否则搜索正交超胞并导出。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/orthogonalize.rs`

use crate::ortho::{DEFAULT_MAX_REPETITIONS, DEFAULT_STRAIN_TOLERANCE};
use crate::render::CoordinateKind;
use clap::Args;
use std::path::PathBuf;

/// orthogonalize 子命令参数
#[derive(Args, Debug)]
pub struct OrthogonalizeArgs {
    /// Input CIF file ('-' reads from stdin)
    pub input: PathBuf,

    /// Maximum number of repetitions along each lattice vector
    #[arg(
        short = 'n',
        long,
        env = "RIPER_MAX_REPETITIONS",
        default_value_t = DEFAULT_MAX_REPETITIONS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_repetitions: u32,

    /// Largest accepted strain component when straightening the supercell
    #[arg(long, default_value_t = DEFAULT_STRAIN_TOLERANCE)]
    pub strain_tolerance: f64,

    /// Coordinate system for the atom table
    #[arg(long, value_enum, default_value_t = CoordinateKind::Cartesian)]
    pub coords: CoordinateKind,

    /// Write the orthogonal structure as CIF
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a standalone 3D viewer (HTML) of the orthogonal structure
    #[arg(long)]
    pub view: Option<PathBuf>,

    /// Write a standalone 3D viewer (HTML) of the input structure
    #[arg(long)]
    pub view_input: Option<PathBuf>,

    /// Spin the structure in the 3D viewer
    #[arg(long, default_value_t = false)]
    pub spin: bool,

    /// Write the atom coordinate table as CSV
    #[arg(long)]
    pub coords_csv: Option<PathBuf>,

    /// Write a machine-readable JSON report
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
