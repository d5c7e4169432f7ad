//! # rttddft 子命令 CLI 定义
//!
//! 数值参数以字符串接收，由 `commands/rttddft.rs` 校验后原样写入输出。
//! 负数与超出常规范围的值同样接受，不做物理上的取值检查。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rttddft.rs`

use crate::models::{FieldKind, MagnusOrder, ScfMode};
use crate::rttddft::defaults;
use clap::Args;
use std::path::PathBuf;

/// rttddft 子命令参数
#[derive(Args, Debug)]
pub struct RtTddftArgs {
    /// Type of the external electric field (default: static)
    #[arg(long, value_enum)]
    pub field: Option<FieldKind>,

    // ─────────────────────────────────────────────────────────────
    // 电场
    // ─────────────────────────────────────────────────────────────
    /// Field amplitude along x (a.u.)
    #[arg(long, default_value = defaults::AMPLITUDE, allow_hyphen_values = true)]
    pub ex: String,

    /// Field amplitude along y (a.u.)
    #[arg(long, default_value = defaults::AMPLITUDE, allow_hyphen_values = true)]
    pub ey: String,

    /// Field amplitude along z (a.u.)
    #[arg(long, default_value = defaults::AMPLITUDE, allow_hyphen_values = true)]
    pub ez: String,

    /// Peak position of the Gaussian pulse (a.u.)
    #[arg(long, default_value = defaults::TZERO, allow_hyphen_values = true)]
    pub tzero: String,

    /// Peak width of the Gaussian pulse (a.u.)
    #[arg(long, default_value = defaults::WIDTH, allow_hyphen_values = true)]
    pub width: String,

    /// Laser frequency (a.u.)
    #[arg(long, default_value = defaults::OMEGA, allow_hyphen_values = true)]
    pub omega: String,

    /// Laser FWHM (a.u.)
    #[arg(long, default_value = defaults::SIGMA, allow_hyphen_values = true)]
    pub sigma: String,

    /// Laser phase along x (radians)
    #[arg(long, default_value = defaults::PHASE, allow_hyphen_values = true)]
    pub phase_x: String,

    /// Laser phase along y (radians)
    #[arg(long, default_value = defaults::PHASE, allow_hyphen_values = true)]
    pub phase_y: String,

    /// Laser phase along z (radians)
    #[arg(long, default_value = defaults::PHASE, allow_hyphen_values = true)]
    pub phase_z: String,

    // ─────────────────────────────────────────────────────────────
    // 时间演化
    // ─────────────────────────────────────────────────────────────
    /// Magnus expansion order
    #[arg(long, value_enum, default_value_t = MagnusOrder::Second)]
    pub magnus: MagnusOrder,

    /// Self-consistent propagation
    #[arg(long, value_enum, default_value_t = ScfMode::Off)]
    pub scf: ScfMode,

    /// Maximum number of SCF cycles
    #[arg(long, default_value_t = defaults::ITERLIM, allow_hyphen_values = true)]
    pub iterlim: i64,

    /// Evolution time (a.u.)
    #[arg(long, default_value = defaults::TIME, allow_hyphen_values = true)]
    pub time: String,

    /// Time step (a.u.)
    #[arg(long, default_value = defaults::TSTEP, allow_hyphen_values = true)]
    pub tstep: String,

    /// Print every N steps
    #[arg(long, default_value_t = defaults::PRINT_STEP, allow_hyphen_values = true)]
    pub print_step: i64,

    /// Damping factor
    #[arg(long, default_value = defaults::DAMPING, allow_hyphen_values = true)]
    pub damping: String,

    /// Lower bound of the spectrum energy window (a.u.)
    #[arg(long, default_value = defaults::MIN_ENERGY, allow_hyphen_values = true)]
    pub min_energy: String,

    /// Upper bound of the spectrum energy window (a.u.)
    #[arg(long, default_value = defaults::MAX_ENERGY, allow_hyphen_values = true)]
    pub max_energy: String,

    /// Energy step of the spectrum (a.u.)
    #[arg(long, default_value = defaults::ENERGY_STEP, allow_hyphen_values = true)]
    pub energy_step: String,

    // ─────────────────────────────────────────────────────────────
    // 后处理输出
    // ─────────────────────────────────────────────────────────────
    /// Do not print the energy (rtenrgy) at each time step
    #[arg(long, default_value_t = false)]
    pub no_print_energy: bool,

    /// Do not print the dipole moment (rtdipo) at each time step
    #[arg(long, default_value_t = false)]
    pub no_print_dipole: bool,

    /// Do not print the density at each time step
    #[arg(long, default_value_t = false)]
    pub no_print_density: bool,

    /// Calculate the absorption spectrum into rtspec (Gaussian field only)
    #[arg(long, default_value_t = false)]
    pub absorption_spectrum: bool,

    // ─────────────────────────────────────────────────────────────
    // 参数文件与输出
    // ─────────────────────────────────────────────────────────────
    /// Load all parameters from a JSON file (other parameter flags are ignored)
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Save the effective parameters as JSON
    #[arg(long)]
    pub save_params: Option<PathBuf>,

    /// Write the generated blocks to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
