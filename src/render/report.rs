//! # 正交化结果报告
//!
//! 把 [`OrthoOutcome`] 整理成可序列化的报告，用于 `--json` 导出。
//!
//! ## 依赖关系
//! - 被 `commands/orthogonalize.rs` 使用
//! - 使用 `ortho/workflow.rs`、`serde_json`

use crate::error::Result;
use crate::models::Crystal;
use crate::ortho::OrthoOutcome;
use crate::utils::files;

use serde::Serialize;
use std::path::Path;

/// 晶格参数 (Å, °)
#[derive(Debug, Clone, Serialize)]
pub struct LatticeSummary {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub volume: f64,
}

impl LatticeSummary {
    fn of(crystal: &Crystal) -> Self {
        let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();
        LatticeSummary {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            volume: crystal.lattice.volume(),
        }
    }
}

/// 变换细节
#[derive(Debug, Clone, Serialize)]
pub struct TransformationSummary {
    pub matrix: [[i32; 3]; 3],
    pub multiplier: usize,
    pub strain: [[f64; 3]; 3],
    pub max_strain: f64,
    pub strain_norm: f64,
    pub max_angle_deviation_deg: f64,
    pub formula: String,
    pub num_atoms: usize,
    pub lattice: LatticeSummary,
}

/// 完整报告
#[derive(Debug, Clone, Serialize)]
pub struct OrthoReport {
    pub name: String,
    pub formula: String,
    pub num_atoms: usize,
    pub lattice: LatticeSummary,
    /// already_orthogonal / transformed / not_found
    pub outcome: &'static str,
    pub max_repetitions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation: Option<TransformationSummary>,
}

impl OrthoReport {
    pub fn new(input: &Crystal, outcome: &OrthoOutcome, max_repetitions: u32) -> Self {
        let (label, transformation) = match outcome {
            OrthoOutcome::AlreadyOrthogonal => ("already_orthogonal", None),
            OrthoOutcome::NotFound { .. } => ("not_found", None),
            OrthoOutcome::Transformed(t) => (
                "transformed",
                Some(TransformationSummary {
                    matrix: t.matrix,
                    multiplier: t.multiplier,
                    strain: t.strain,
                    max_strain: t.max_strain(),
                    strain_norm: t.strain_norm(),
                    max_angle_deviation_deg: t.max_angle_deviation,
                    formula: t.structure.formula(),
                    num_atoms: t.structure.num_atoms(),
                    lattice: LatticeSummary::of(&t.structure),
                }),
            ),
        };

        OrthoReport {
            name: input.name.clone(),
            formula: input.formula(),
            num_atoms: input.num_atoms(),
            lattice: LatticeSummary::of(input),
            outcome: label,
            max_repetitions,
            transformation,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        files::write_text(path, &self.to_json()?)
    }
}
