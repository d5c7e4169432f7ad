//! # 正交化请求流程
//!
//! 一次正交化请求的状态流转：
//!
//! ```text
//! Idle ──parse──▶ Parsed ──orthogonalize──▶ AlreadyOrthogonal
//!                                        ├─▶ Transformed
//!                                        └─▶ NotFound
//! ```
//!
//! 解析失败直接返回错误；"已正交"与"未找到"是正常结果而非错误。
//! 请求本身在 `orthogonalize` 中不被修改，对同一请求重复执行得到相同结果。
//!
//! ## 依赖关系
//! - 被 `commands/orthogonalize.rs` 使用
//! - 使用 `parsers/cif.rs`、`ortho/checker.rs`、`ortho/transformer.rs`

use super::checker::is_orthogonal;
use super::transformer::{CellTransformer, Transformation};
use crate::error::Result;
use crate::models::Crystal;
use crate::parsers::parse_cif_content;

use log::{debug, info};

/// 已解析的正交化请求
#[derive(Debug, Clone)]
pub struct OrthoRequest {
    crystal: Crystal,
}

/// 正交化结果
#[derive(Debug, Clone)]
pub enum OrthoOutcome {
    /// 输入晶胞已经正交，未调用变换
    AlreadyOrthogonal,
    /// 找到了正交超胞
    Transformed(Transformation),
    /// 在重复次数上限内未找到
    NotFound { max_repetitions: u32 },
}

impl OrthoRequest {
    /// 从 CIF 文本创建请求
    pub fn parse(text: &str, name: &str) -> Result<Self> {
        let crystal = parse_cif_content(text, name)?;
        debug!(
            "Parsed '{}': {} atoms, formula {}",
            crystal.name,
            crystal.num_atoms(),
            crystal.formula()
        );
        Ok(OrthoRequest { crystal })
    }

    pub fn crystal(&self) -> &Crystal {
        &self.crystal
    }

    /// 执行正交化
    pub fn orthogonalize(
        &self,
        transformer: &dyn CellTransformer,
        max_repetitions: u32,
    ) -> Result<OrthoOutcome> {
        if is_orthogonal(&self.crystal.lattice) {
            info!("Lattice of '{}' is already orthogonal", self.crystal.name);
            return Ok(OrthoOutcome::AlreadyOrthogonal);
        }

        match transformer.transform(&self.crystal, max_repetitions)? {
            Some(t) => Ok(OrthoOutcome::Transformed(t)),
            None => {
                info!(
                    "No orthogonal supercell of '{}' within {} repetitions",
                    self.crystal.name, max_repetitions
                );
                Ok(OrthoOutcome::NotFound { max_repetitions })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RiperError;
    use crate::models::{Atom, Lattice};
    use std::cell::Cell;

    const CUBIC_CIF: &str = "\
data_NaCl
_cell_length_a 5.64
_cell_length_b 5.64
_cell_length_c 5.64
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Na1 0.0 0.0 0.0
Cl1 0.5 0.5 0.5
";

    const HEX_CIF: &str = "\
data_graphite
_cell_length_a 2.46
_cell_length_b 2.46
_cell_length_c 6.70
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 120
loop_
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
C 0.0 0.0 0.25
C 0.333333 0.666667 0.25
";

    /// 记录调用次数并返回预设结果的变换器
    struct FakeTransformer {
        calls: Cell<usize>,
        result: Option<Transformation>,
    }

    impl FakeTransformer {
        fn returning(result: Option<Transformation>) -> Self {
            FakeTransformer {
                calls: Cell::new(0),
                result,
            }
        }
    }

    impl CellTransformer for FakeTransformer {
        fn transform(&self, _crystal: &Crystal, _max: u32) -> Result<Option<Transformation>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.result.clone())
        }
    }

    struct FailingTransformer;

    impl CellTransformer for FailingTransformer {
        fn transform(&self, _crystal: &Crystal, _max: u32) -> Result<Option<Transformation>> {
            Err(RiperError::InvalidArgument("boom".to_string()))
        }
    }

    fn dummy_transformation() -> Transformation {
        let lattice = Lattice::from_parameters(2.46, 4.26, 6.70, 90.0, 90.0, 90.0);
        Transformation {
            structure: Crystal::new("dummy", lattice, vec![Atom::new("C", [0.0, 0.0, 0.0])]),
            matrix: [[1, 0, 0], [1, 2, 0], [0, 0, 1]],
            multiplier: 2,
            strain: [[0.0; 3]; 3],
            max_angle_deviation: 0.0,
        }
    }

    #[test]
    fn test_orthogonal_input_skips_transformer() {
        let request = OrthoRequest::parse(CUBIC_CIF, "input").unwrap();
        let fake = FakeTransformer::returning(Some(dummy_transformation()));

        let outcome = request.orthogonalize(&fake, 5).unwrap();
        assert!(matches!(outcome, OrthoOutcome::AlreadyOrthogonal));
        assert_eq!(fake.calls.get(), 0);
    }

    #[test]
    fn test_none_maps_to_not_found() {
        let request = OrthoRequest::parse(HEX_CIF, "input").unwrap();
        let fake = FakeTransformer::returning(None);

        let outcome = request.orthogonalize(&fake, 3).unwrap();
        match outcome {
            OrthoOutcome::NotFound { max_repetitions } => assert_eq!(max_repetitions, 3),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(fake.calls.get(), 1);
    }

    #[test]
    fn test_some_maps_to_transformed() {
        let request = OrthoRequest::parse(HEX_CIF, "input").unwrap();
        let fake = FakeTransformer::returning(Some(dummy_transformation()));

        let outcome = request.orthogonalize(&fake, 5).unwrap();
        match outcome {
            OrthoOutcome::Transformed(t) => assert_eq!(t.multiplier, 2),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_transformer_error_propagates() {
        let request = OrthoRequest::parse(HEX_CIF, "input").unwrap();
        let err = request.orthogonalize(&FailingTransformer, 5).unwrap_err();
        assert!(matches!(err, RiperError::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_failure_aborts() {
        let err = OrthoRequest::parse("data_empty\n_cell_length_a 3.0\n", "input").unwrap_err();
        assert!(matches!(err, RiperError::ParseError { .. }));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let request = OrthoRequest::parse(HEX_CIF, "input").unwrap();
        let search = crate::ortho::LatticeSearch::default();

        let first = request.orthogonalize(&search, 5).unwrap();
        let second = request.orthogonalize(&search, 5).unwrap();

        match (first, second) {
            (OrthoOutcome::Transformed(a), OrthoOutcome::Transformed(b)) => {
                assert_eq!(a.matrix, b.matrix);
                assert_eq!(a.structure, b.structure);
            }
            other => panic!("unexpected outcomes: {:?}", other),
        }
        assert_eq!(request.crystal().num_atoms(), 2);
    }
}
