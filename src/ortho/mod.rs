//! # 晶胞正交化
//!
//! - `checker`: 判断晶格是否正交
//! - `transformer`: 有界整数搜索构建正交超胞，并给出应变
//! - `workflow`: 单次正交化请求的流程编排
//!
//! ## 依赖关系
//! - 被 `commands/orthogonalize.rs` 使用
//! - 使用 `models/`、`parsers/`

pub mod checker;
pub mod transformer;
pub mod workflow;

pub use checker::{is_orthogonal, max_off_diagonal_dot};
pub use transformer::{
    CellTransformer, LatticeSearch, Transformation, DEFAULT_MAX_REPETITIONS,
    DEFAULT_STRAIN_TOLERANCE,
};
pub use workflow::{OrthoOutcome, OrthoRequest};
