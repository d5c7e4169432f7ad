//! # RT-TDDFT 参数默认值
//!
//! 与交互式表单中的预填值一致，同时作为 CLI 参数的默认值。
//!
//! ## 依赖关系
//! - 被 `cli/rttddft.rs`、`rttddft/generator.rs` 的测试使用
//! - 使用 `models/rttddft.rs`

use crate::error::Result;
use crate::models::{
    FieldKind, FieldParameters, Literal, MagnusOrder, OutputFlags, ScfMode, SimulationParameters,
    Xyz,
};

// 电场 (a.u.)
pub const AMPLITUDE: &str = "2.0E-5";
pub const TZERO: &str = "3.0";
pub const WIDTH: &str = "0.2";
/// 1.24 eV
pub const OMEGA: &str = "0.04556916";
pub const SIGMA: &str = "1379.0";
pub const PHASE: &str = "0.0";

// 时间演化
pub const ITERLIM: i64 = 15;
pub const TIME: &str = "1000.0";
pub const TSTEP: &str = "0.1";
pub const PRINT_STEP: i64 = 1;
pub const DAMPING: &str = "0.004";
pub const MIN_ENERGY: &str = "0.15";
pub const MAX_ENERGY: &str = "0.625";
pub const ENERGY_STEP: &str = "0.005";

fn xyz(field: &str, value: &str) -> Result<Xyz> {
    Ok(Xyz {
        x: Literal::parse(&format!("{}_x", field), value)?,
        y: Literal::parse(&format!("{}_y", field), value)?,
        z: Literal::parse(&format!("{}_z", field), value)?,
    })
}

/// 指定电场类型的默认参数
pub fn field(kind: FieldKind) -> Result<FieldParameters> {
    let amplitude = xyz("amplitude", AMPLITUDE)?;
    Ok(match kind {
        FieldKind::Static => FieldParameters::Static { amplitude },
        FieldKind::Gaussian => FieldParameters::Gaussian {
            amplitude,
            tzero: Literal::parse("tzero", TZERO)?,
            width: Literal::parse("width", WIDTH)?,
        },
        FieldKind::Laser => FieldParameters::Laser {
            amplitude,
            phase: xyz("phase", PHASE)?,
            omega: Literal::parse("omega", OMEGA)?,
            sigma: Literal::parse("sigma", SIGMA)?,
        },
    })
}

/// 默认时间演化参数
pub fn simulation() -> Result<SimulationParameters> {
    Ok(SimulationParameters {
        magnus: MagnusOrder::Second,
        scf: ScfMode::Off,
        iterlim: ITERLIM,
        time: Literal::parse("time", TIME)?,
        tstep: Literal::parse("tstep", TSTEP)?,
        print_step: PRINT_STEP,
        damping: Literal::parse("damping", DAMPING)?,
        min_energy: Literal::parse("min_energy", MIN_ENERGY)?,
        max_energy: Literal::parse("max_energy", MAX_ENERGY)?,
        energy_step: Literal::parse("energy_step", ENERGY_STEP)?,
        output: OutputFlags::default(),
    })
}
