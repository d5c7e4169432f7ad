//! # rttddft 命令实现
//!
//! ## 功能
//! - 从命令行参数或 JSON 参数文件构建输入参数
//! - 生成 `$fields` 与 `$rttddft` 文本块并打印
//! - 可选写入文件、保存参数 JSON
//!
//! ## 依赖关系
//! - 使用 `cli/rttddft.rs` 定义的参数
//! - 使用 `models/rttddft.rs`, `rttddft/`
//! - 使用 `utils/output.rs`, `utils/files.rs`

use crate::cli::rttddft::RtTddftArgs;
use crate::error::{Result, RiperError};
use crate::models::{
    FieldKind, FieldParameters, Literal, OutputFlags, RtTddftInput, SimulationParameters, Xyz,
};
use crate::rttddft::{expected_outputs, generate};
use crate::utils::{files, output};

use log::debug;
use std::path::Path;

/// 执行 rttddft 命令
pub fn execute(args: RtTddftArgs) -> Result<()> {
    for path in [&args.output, &args.save_params].into_iter().flatten() {
        files::check_output_path(path, args.overwrite)?;
    }

    let input = match args.params {
        Some(ref path) => load_params(path)?,
        None => input_from_args(&args)?,
    };
    debug!("Effective RT-TDDFT input: {:?}", input);

    let kind = input.field.kind();
    let blocks = generate(&input.field, &input.simulation);

    output::print_header(&format!("{} field: add the following to the control file", kind));
    println!("{}", blocks.field_block);
    println!("{}", blocks.sim_block);
    println!();

    let sim = &input.simulation;
    if sim.tstep.value() > 0.0 && sim.time.value() > 0.0 {
        output::print_info(&format!(
            "Propagation: {:.0} steps of {} a.u.",
            (sim.time.value() / sim.tstep.value()).ceil(),
            sim.tstep
        ));
    }

    let flags = &sim.output;
    if flags.absorption_spectrum && kind != FieldKind::Gaussian {
        output::print_warning("Absorption spectrum (rtspec) is only available for a Gaussian field");
    }
    for item in expected_outputs(kind, flags) {
        output::print_info(&format!("Expected output: {}", item));
    }

    if let Some(ref path) = args.output {
        files::write_text(path, &blocks.combined())?;
        output::print_export("RT-TDDFT blocks", &path.display().to_string());
    }

    if let Some(ref path) = args.save_params {
        files::write_text(path, &serde_json::to_string_pretty(&input)?)?;
        output::print_export("Parameters", &path.display().to_string());
    }

    Ok(())
}

/// 读取 JSON 参数文件
fn load_params(path: &Path) -> Result<RtTddftInput> {
    if !path.exists() {
        return Err(RiperError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| RiperError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| RiperError::ParseError {
        format: "json".to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// 由命令行参数构建输入，数值在此处校验
fn input_from_args(args: &RtTddftArgs) -> Result<RtTddftInput> {
    let amplitude = Xyz {
        x: Literal::parse("ex", &args.ex)?,
        y: Literal::parse("ey", &args.ey)?,
        z: Literal::parse("ez", &args.ez)?,
    };

    let field = match args.field.unwrap_or(FieldKind::Static) {
        FieldKind::Static => FieldParameters::Static { amplitude },
        FieldKind::Gaussian => FieldParameters::Gaussian {
            amplitude,
            tzero: Literal::parse("tzero", &args.tzero)?,
            width: Literal::parse("width", &args.width)?,
        },
        FieldKind::Laser => FieldParameters::Laser {
            amplitude,
            phase: Xyz {
                x: Literal::parse("phase-x", &args.phase_x)?,
                y: Literal::parse("phase-y", &args.phase_y)?,
                z: Literal::parse("phase-z", &args.phase_z)?,
            },
            omega: Literal::parse("omega", &args.omega)?,
            sigma: Literal::parse("sigma", &args.sigma)?,
        },
    };

    let simulation = SimulationParameters {
        magnus: args.magnus,
        scf: args.scf,
        iterlim: args.iterlim,
        time: Literal::parse("time", &args.time)?,
        tstep: Literal::parse("tstep", &args.tstep)?,
        print_step: args.print_step,
        damping: Literal::parse("damping", &args.damping)?,
        min_energy: Literal::parse("min-energy", &args.min_energy)?,
        max_energy: Literal::parse("max-energy", &args.max_energy)?,
        energy_step: Literal::parse("energy-step", &args.energy_step)?,
        output: OutputFlags {
            print_energy: !args.no_print_energy,
            print_dipole: !args.no_print_dipole,
            print_density: !args.no_print_density,
            absorption_spectrum: args.absorption_spectrum,
        },
    };

    Ok(RtTddftInput { field, simulation })
}
