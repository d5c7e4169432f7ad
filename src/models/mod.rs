//! # 数据模型模块
//!
//! 定义晶体结构与 RT-TDDFT 输入参数的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`ortho/`、`render/`、`rttddft/` 和 `commands/` 使用
//! - 子模块: structure, rttddft, elements

pub mod elements;
pub mod rttddft;
pub mod structure;

pub use rttddft::{
    FieldKind, FieldParameters, Literal, MagnusOrder, OutputFlags, RtTddftInput, ScfMode,
    SimulationParameters, Xyz,
};
pub use structure::{Atom, Crystal, Lattice};
