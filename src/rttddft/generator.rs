//! # RT-TDDFT 输入块生成
//!
//! 把电场参数和时间演化参数映射为两段文本：
//! `$fields` / `$electric field` 块与 `$rttddft` 块，供追加到 `control` 文件。
//! 所有数值按用户输入的原文写出，不做重新格式化。
//!
//! ## 依赖关系
//! - 被 `commands/rttddft.rs` 使用
//! - 使用 `models/rttddft.rs`

use crate::models::{FieldKind, FieldParameters, OutputFlags, SimulationParameters, Xyz};

/// 生成的两个文本块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtTddftBlocks {
    pub field_block: String,
    pub sim_block: String,
}

impl RtTddftBlocks {
    /// 两块拼接后的完整片段（以换行结尾）
    pub fn combined(&self) -> String {
        format!("{}\n{}\n", self.field_block, self.sim_block)
    }
}

/// 生成两个文本块
pub fn generate(field: &FieldParameters, sim: &SimulationParameters) -> RtTddftBlocks {
    RtTddftBlocks {
        field_block: field_block(field),
        sim_block: sim_block(sim),
    }
}

fn xyz_keys(name: &str, v: &Xyz) -> String {
    format!("  {} x={}  y={}  z={}", name, v.x, v.y, v.z)
}

/// `$fields` 块（无结尾换行）
pub fn field_block(field: &FieldParameters) -> String {
    let mut block = String::from("$fields\n  electric on\n$electric field\n");
    block.push_str(&xyz_keys("amplitude", field.amplitude()));

    match field {
        FieldParameters::Static { .. } => block.push_str("\n  static"),
        FieldParameters::Gaussian { tzero, width, .. } => {
            block.push_str(&format!("\n  gaussian  tzero={}  width={}", tzero, width));
        }
        FieldParameters::Laser {
            phase, omega, sigma, ..
        } => {
            block.push('\n');
            block.push_str(&xyz_keys("phase", phase));
            block.push_str(&format!("\n  laser  omega={}  sigma={}", omega, sigma));
        }
    }

    block
}

/// `$rttddft` 块（无结尾换行）
pub fn sim_block(sim: &SimulationParameters) -> String {
    let lines = [
        "$rttddft".to_string(),
        format!("magnus {}", sim.magnus),
        format!("scf {}", sim.scf),
        format!("iterlim {}", sim.iterlim),
        format!("time {}d0", sim.time),
        format!("tstep {}d0", sim.tstep),
        format!("print step {}", sim.print_step),
        format!("damping {}d0", sim.damping),
        format!("min energy = {}d0", sim.min_energy),
        format!("max energy = {}d0", sim.max_energy),
        format!("energy step {}d0", sim.energy_step),
    ];
    lines.join("\n")
}

/// 根据输出选项列出计算将产生的输出
///
/// 吸收谱只对 Gaussian 电场有效，其他电场类型下忽略该选项。
pub fn expected_outputs(kind: FieldKind, flags: &OutputFlags) -> Vec<&'static str> {
    let mut outputs = Vec::new();
    if flags.print_energy {
        outputs.push("rtenrgy (energy at each time step)");
    }
    if flags.print_dipole {
        outputs.push("rtdipo (dipole moment at each time step)");
    }
    if flags.print_density {
        outputs.push("density at each time step");
    }
    if flags.absorption_spectrum && kind == FieldKind::Gaussian {
        outputs.push("rtspec (absorption spectrum)");
    }
    outputs
}
