//! # 正交性判定
//!
//! 三个晶格向量两两点积的绝对值都小于容差时，晶胞视为正交。
//! 真实结构的晶格参数来自浮点数，不会严格为零，所以使用绝对容差。
//!
//! ## 依赖关系
//! - 被 `ortho/workflow.rs`、`ortho/transformer.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::Lattice;

/// 点积容差 (Å²)，决定"已正交"短路分支
pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-6;

/// 使用默认容差判断晶格是否正交
pub fn is_orthogonal(lattice: &Lattice) -> bool {
    is_orthogonal_with(lattice, ORTHOGONALITY_TOLERANCE)
}

/// 使用指定容差判断晶格是否正交
pub fn is_orthogonal_with(lattice: &Lattice, tolerance: f64) -> bool {
    max_off_diagonal_dot(lattice) < tolerance
}

/// 不同晶格向量之间点积绝对值的最大值
pub fn max_off_diagonal_dot(lattice: &Lattice) -> f64 {
    [(0, 1), (0, 2), (1, 2)]
        .iter()
        .map(|&(i, j)| lattice.dot(i, j).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_is_orthogonal() {
        let lattice = Lattice::from_vectors([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(is_orthogonal(&lattice));
    }

    #[test]
    fn test_orthorhombic_from_parameters_is_orthogonal() {
        let lattice = Lattice::from_parameters(3.1, 7.4, 12.9, 90.0, 90.0, 90.0);
        assert!(is_orthogonal(&lattice));
    }

    #[test]
    fn test_rotated_orthogonal_cell() {
        // 不要求与坐标轴对齐
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let lattice = Lattice::from_vectors([[s, s, 0.0], [-s, s, 0.0], [0.0, 0.0, 2.0]]);
        assert!(is_orthogonal(&lattice));
    }

    #[test]
    fn test_hexagonal_is_not_orthogonal() {
        let lattice = Lattice::from_parameters(2.46, 2.46, 6.7, 90.0, 90.0, 120.0);
        assert!(!is_orthogonal(&lattice));
    }

    #[test]
    fn test_monoclinic_is_not_orthogonal() {
        let lattice = Lattice::from_parameters(5.0, 6.0, 7.0, 90.0, 100.0, 90.0);
        assert!(!is_orthogonal(&lattice));
        assert!(max_off_diagonal_dot(&lattice) > 1.0);
    }

    #[test]
    fn test_perturbation_below_tolerance_is_stable() {
        let base = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let delta = ORTHOGONALITY_TOLERANCE * 0.5;

        let mut perturbed = base;
        perturbed[1][0] = delta;
        assert!(is_orthogonal(&Lattice::from_vectors(perturbed)));

        let mut perturbed = base;
        perturbed[2][1] = -delta;
        assert!(is_orthogonal(&Lattice::from_vectors(perturbed)));
    }

    #[test]
    fn test_perturbation_above_tolerance_flips() {
        let mut m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        m[1][0] = ORTHOGONALITY_TOLERANCE * 10.0;
        assert!(!is_orthogonal(&Lattice::from_vectors(m)));
        assert!(is_orthogonal_with(&Lattice::from_vectors(m), 1e-3));
    }

    #[test]
    fn test_deterministic() {
        let lattice = Lattice::from_parameters(4.0, 4.0, 4.0, 60.0, 60.0, 60.0);
        let first = is_orthogonal(&lattice);
        for _ in 0..10 {
            assert_eq!(is_orthogonal(&lattice), first);
        }
    }
}
