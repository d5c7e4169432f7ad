//! # RT-TDDFT 输入参数数据模型
//!
//! 电场参数（按电场类型区分的标签联合）与时间演化参数。
//! 所有浮点字段都是 [`Literal`]：保留用户输入的原始文本，
//! 同时在构造时校验其为合法数字。
//!
//! ## 依赖关系
//! - 被 `cli/rttddft.rs`、`rttddft/` 使用
//! - 使用 `serde` 读写 JSON 参数文件

use crate::error::{Result, RiperError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────
// 数值字面量
// ─────────────────────────────────────────────────────────────

/// 经过校验的数值字面量
///
/// 输出时原样使用 `text`，因此 `2.0E-5` 不会被改写成 `0.00002`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LiteralRepr", into = "String")]
pub struct Literal {
    text: String,
    value: f64,
}

impl Literal {
    /// 解析并校验字面量，`field` 仅用于错误信息
    pub fn parse(field: &str, text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let invalid = || RiperError::InvalidNumber {
            field: field.to_string(),
            value: text.to_string(),
        };

        // Fortran 风格的 d 指数 (1.0d-5) 也接受
        let normalized = trimmed.replace(['d', 'D'], "e");
        let value: f64 = normalized.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }

        Ok(Literal {
            text: trimmed.to_string(),
            value,
        })
    }

    /// 原始文本
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 数值
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl FromStr for Literal {
    type Err = RiperError;

    fn from_str(s: &str) -> Result<Self> {
        Literal::parse("value", s)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<Literal> for String {
    fn from(lit: Literal) -> Self {
        lit.text
    }
}

/// JSON 中既可以写字符串 "2.0E-5"，也可以写数字 2e-5
#[derive(Deserialize)]
#[serde(untagged)]
enum LiteralRepr {
    Text(String),
    Number(serde_json::Number),
}

impl TryFrom<LiteralRepr> for Literal {
    type Error = RiperError;

    fn try_from(repr: LiteralRepr) -> Result<Self> {
        match repr {
            LiteralRepr::Text(s) => Literal::parse("value", &s),
            LiteralRepr::Number(n) => Literal::parse("value", &n.to_string()),
        }
    }
}

/// 三个笛卡尔分量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: Literal,
    pub y: Literal,
    pub z: Literal,
}

// ─────────────────────────────────────────────────────────────
// 电场参数
// ─────────────────────────────────────────────────────────────

/// 电场类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Static (step) field
    Static,
    /// Gaussian pulse
    Gaussian,
    /// Laser pulse
    Laser,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Static => write!(f, "Static"),
            FieldKind::Gaussian => write!(f, "Gaussian"),
            FieldKind::Laser => write!(f, "Laser"),
        }
    }
}

/// 电场参数：振幅总是需要，其余字段取决于电场类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldParameters {
    Static {
        amplitude: Xyz,
    },
    Gaussian {
        amplitude: Xyz,
        tzero: Literal,
        width: Literal,
    },
    Laser {
        amplitude: Xyz,
        phase: Xyz,
        omega: Literal,
        sigma: Literal,
    },
}

impl FieldParameters {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldParameters::Static { .. } => FieldKind::Static,
            FieldParameters::Gaussian { .. } => FieldKind::Gaussian,
            FieldParameters::Laser { .. } => FieldKind::Laser,
        }
    }

    pub fn amplitude(&self) -> &Xyz {
        match self {
            FieldParameters::Static { amplitude }
            | FieldParameters::Gaussian { amplitude, .. }
            | FieldParameters::Laser { amplitude, .. } => amplitude,
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 时间演化参数
// ─────────────────────────────────────────────────────────────

/// Magnus 展开阶数（只允许 2 或 4）
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MagnusOrder {
    /// Second order
    #[value(name = "2")]
    Second,
    /// Fourth order
    #[value(name = "4")]
    Fourth,
}

impl TryFrom<u8> for MagnusOrder {
    type Error = String;

    fn try_from(order: u8) -> std::result::Result<Self, Self::Error> {
        match order {
            2 => Ok(MagnusOrder::Second),
            4 => Ok(MagnusOrder::Fourth),
            other => Err(format!("magnus order must be 2 or 4, got {}", other)),
        }
    }
}

impl From<MagnusOrder> for u8 {
    fn from(order: MagnusOrder) -> Self {
        match order {
            MagnusOrder::Second => 2,
            MagnusOrder::Fourth => 4,
        }
    }
}

impl fmt::Display for MagnusOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// SCF 开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScfMode {
    On,
    Off,
}

impl fmt::Display for ScfMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScfMode::On => write!(f, "on"),
            ScfMode::Off => write!(f, "off"),
        }
    }
}

/// 后处理输出选项
///
/// 这些开关不改变生成的文本块，仅用于提示将会得到哪些输出文件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFlags {
    /// 每步输出能量 (`rtenrgy`)
    pub print_energy: bool,
    /// 每步输出偶极矩 (`rtdipo`)
    pub print_dipole: bool,
    /// 每步输出密度（占用较多磁盘）
    pub print_density: bool,
    /// 计算吸收谱并保存到 `rtspec`（仅 Gaussian 电场）
    pub absorption_spectrum: bool,
}

impl Default for OutputFlags {
    fn default() -> Self {
        OutputFlags {
            print_energy: true,
            print_dipole: true,
            print_density: true,
            absorption_spectrum: false,
        }
    }
}

/// RT-TDDFT 时间演化参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub magnus: MagnusOrder,
    pub scf: ScfMode,
    /// 最大 SCF 循环数
    pub iterlim: i64,
    /// 总演化时间 (a.u.)
    pub time: Literal,
    /// 时间步长 (a.u.)
    pub tstep: Literal,
    pub print_step: i64,
    pub damping: Literal,
    pub min_energy: Literal,
    pub max_energy: Literal,
    pub energy_step: Literal,
    #[serde(default)]
    pub output: OutputFlags,
}

/// 完整的 RT-TDDFT 输入（JSON 参数文件的顶层结构）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtTddftInput {
    pub field: FieldParameters,
    pub simulation: SimulationParameters,
}
