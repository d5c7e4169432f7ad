//! # RT-TDDFT 输入生成
//!
//! - `defaults`: 参数默认值
//! - `generator`: 参数 → `$fields` 与 `$rttddft` 文本块
//!
//! ## 依赖关系
//! - 被 `cli/rttddft.rs`、`commands/rttddft.rs` 使用
//! - 使用 `models/rttddft.rs`

pub mod defaults;
pub mod generator;

pub use generator::{expected_outputs, generate, RtTddftBlocks};
