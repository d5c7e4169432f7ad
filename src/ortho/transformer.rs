//! # 正交超胞搜索
//!
//! 在 `[-N, N]³` 的整数组合中，为每个笛卡尔坐标轴寻找与之夹角最小的晶格向量
//! `v = n₁a + n₂b + n₃c`，三者组成整数变换矩阵 P（行向量），得到超胞 `P·L`。
//! 随后把超胞"拉直"成对角晶胞 `T = diag(|v₁|, |v₂|, |v₃|)`，原子保持分数坐标不变，
//! 并用 Green-Lagrange 应变张量 `E = ½(F·Fᵀ − I)`（`F = (P·L)⁻¹·T`）衡量这一步引入的畸变。
//! 应变超过容差时视为"未找到"，而不是返回一个被悄悄扭曲的结构。
//!
//! 搜索通过 [`CellTransformer`] trait 注入，流程编排可以在测试中替换为假实现。
//!
//! ## 依赖关系
//! - 被 `ortho/workflow.rs`、`commands/orthogonalize.rs` 使用
//! - 使用 `models/structure.rs`、`nalgebra`

use crate::error::{Result, RiperError};
use crate::models::{Atom, Crystal, Lattice};

use log::debug;
use nalgebra::{Matrix3, RowVector3, Vector3};
use serde::Serialize;

/// 默认的最大重复次数
pub const DEFAULT_MAX_REPETITIONS: u32 = 5;

/// 默认允许的最大应变分量
pub const DEFAULT_STRAIN_TOLERANCE: f64 = 0.01;

/// 角度比较容差 (rad)，在此范围内视为并列，取较短的向量
const ANGLE_TIE: f64 = 1e-9;

/// 超胞原子归属判定的分数坐标容差
const WRAP_EPS: f64 = 1e-8;

/// 正交化变换结果
#[derive(Debug, Clone, Serialize)]
pub struct Transformation {
    /// 正交化后的结构
    pub structure: Crystal,
    /// 整数变换矩阵 P，第 i 行是新晶格向量 i 在原晶格基下的系数
    pub matrix: [[i32; 3]; 3],
    /// 超胞倍数 |det P|
    pub multiplier: usize,
    /// Green-Lagrange 应变张量
    pub strain: [[f64; 3]; 3],
    /// 所选向量与坐标轴的最大夹角（度）
    pub max_angle_deviation: f64,
}

impl Transformation {
    /// 应变分量绝对值的最大值
    pub fn max_strain(&self) -> f64 {
        max_abs(&self.strain)
    }

    /// 应变张量的 Frobenius 范数
    pub fn strain_norm(&self) -> f64 {
        self.strain
            .iter()
            .flat_map(|row| row.iter())
            .map(|v| v * v)
            .sum::<f64>()
            .sqrt()
    }
}

/// 晶胞变换能力
///
/// `Ok(None)` 表示在重复次数上限内不存在正交超胞；
/// `Err` 只用于非法输入（奇异晶格、上限为 0 等）。
pub trait CellTransformer {
    fn transform(&self, crystal: &Crystal, max_repetitions: u32) -> Result<Option<Transformation>>;
}

/// 基于整数组合穷举的正交超胞搜索
#[derive(Debug, Clone)]
pub struct LatticeSearch {
    /// 允许的最大应变分量
    pub strain_tolerance: f64,
}

impl Default for LatticeSearch {
    fn default() -> Self {
        LatticeSearch {
            strain_tolerance: DEFAULT_STRAIN_TOLERANCE,
        }
    }
}

impl LatticeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strain_tolerance(mut self, tolerance: f64) -> Self {
        self.strain_tolerance = tolerance;
        self
    }
}

/// 某一坐标轴方向上的候选晶格向量
#[derive(Debug, Clone, Copy)]
struct Candidate {
    coeffs: [i32; 3],
    vector: Vector3<f64>,
    /// 与坐标轴的夹角 (rad)
    angle: f64,
    length: f64,
}

impl Candidate {
    fn is_better_than(&self, other: &Candidate) -> bool {
        if self.angle < other.angle - ANGLE_TIE {
            return true;
        }
        (self.angle - other.angle).abs() <= ANGLE_TIE && self.length < other.length - 1e-12
    }
}

/// 为坐标轴 `axis` 寻找夹角最小的晶格向量（只考虑正方向）
fn best_axis_vector(rows: &Matrix3<f64>, axis: usize, n: i32) -> Option<Candidate> {
    let a: Vector3<f64> = rows.row(0).transpose();
    let b: Vector3<f64> = rows.row(1).transpose();
    let c: Vector3<f64> = rows.row(2).transpose();

    let mut best: Option<Candidate> = None;

    for i in -n..=n {
        for j in -n..=n {
            for k in -n..=n {
                if i == 0 && j == 0 && k == 0 {
                    continue;
                }
                let v = a * i as f64 + b * j as f64 + c * k as f64;
                let along = v[axis];
                if along <= 1e-12 {
                    continue;
                }
                let perp = (0..3)
                    .filter(|&d| d != axis)
                    .map(|d| v[d] * v[d])
                    .sum::<f64>()
                    .sqrt();
                let candidate = Candidate {
                    coeffs: [i, j, k],
                    vector: v,
                    angle: perp.atan2(along),
                    length: v.norm(),
                };
                match best {
                    Some(ref current) if !candidate.is_better_than(current) => {}
                    _ => best = Some(candidate),
                }
            }
        }
    }

    best
}

fn int_det(m: &[[i32; 3]; 3]) -> i64 {
    let m = m.map(|row| row.map(i64::from));
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn max_abs(m: &[[f64; 3]; 3]) -> f64 {
    m.iter()
        .flat_map(|row| row.iter())
        .map(|v| v.abs())
        .fold(0.0, f64::max)
}

/// 把分数坐标折回 [0, 1)
fn wrap_unit(v: f64) -> f64 {
    let w = v.rem_euclid(1.0);
    if w >= 1.0 - WRAP_EPS {
        0.0
    } else {
        w
    }
}

/// 按整数矩阵 P 构建超胞原子，返回新晶胞下的分数坐标
///
/// 平移在外层、原子在内层循环；结果个数必须等于 |det P| × 原子数。
fn build_supercell_atoms(atoms: &[Atom], p: &[[i32; 3]; 3], multiplier: usize) -> Result<Vec<Atom>> {
    let p_mat = Matrix3::from_fn(|r, c| p[r][c] as f64);
    let p_inv = p_mat
        .try_inverse()
        .ok_or_else(|| RiperError::SupercellError("transformation matrix is singular".to_string()))?;

    // 新晶胞的 8 个顶点在旧分数坐标下的包围盒
    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for corner in 0..8 {
        let k = RowVector3::new(
            (corner & 1) as f64,
            ((corner >> 1) & 1) as f64,
            ((corner >> 2) & 1) as f64,
        );
        let old = k * p_mat;
        for d in 0..3 {
            lo[d] = lo[d].min(old[d]);
            hi[d] = hi[d].max(old[d]);
        }
    }
    let range = |d: usize| (lo[d].floor() as i32 - 1)..=(hi[d].ceil() as i32 + 1);

    let mut new_atoms = Vec::with_capacity(atoms.len() * multiplier);
    for tx in range(0) {
        for ty in range(1) {
            for tz in range(2) {
                for atom in atoms {
                    let f = RowVector3::new(
                        wrap_unit(atom.position[0]) + tx as f64,
                        wrap_unit(atom.position[1]) + ty as f64,
                        wrap_unit(atom.position[2]) + tz as f64,
                    );
                    let g = f * p_inv;
                    if g.iter().all(|&x| x >= -WRAP_EPS && x < 1.0 - WRAP_EPS) {
                        new_atoms.push(Atom::new(
                            atom.element.clone(),
                            [wrap_unit(g[0]), wrap_unit(g[1]), wrap_unit(g[2])],
                        ));
                    }
                }
            }
        }
    }

    let expected = atoms.len() * multiplier;
    if new_atoms.len() != expected {
        return Err(RiperError::SupercellError(format!(
            "expected {} atoms in the supercell, generated {}",
            expected,
            new_atoms.len()
        )));
    }

    Ok(new_atoms)
}

impl CellTransformer for LatticeSearch {
    fn transform(&self, crystal: &Crystal, max_repetitions: u32) -> Result<Option<Transformation>> {
        if max_repetitions == 0 {
            return Err(RiperError::InvalidArgument(
                "max_repetitions must be a positive integer".to_string(),
            ));
        }
        if crystal.lattice.is_singular() {
            return Err(RiperError::SingularLattice {
                volume: crystal.lattice.volume(),
            });
        }

        let n = i32::try_from(max_repetitions).map_err(|_| {
            RiperError::InvalidArgument(format!("max_repetitions {} is too large", max_repetitions))
        })?;
        let rows = crystal.lattice.to_matrix3();

        let mut picks = Vec::with_capacity(3);
        for axis in 0..3 {
            let Some(candidate) = best_axis_vector(&rows, axis, n) else {
                debug!("No lattice vector with positive projection on axis {}", axis);
                return Ok(None);
            };
            debug!(
                "Axis {}: coefficients {:?}, angle {:.3e} deg, length {:.4} Å",
                axis,
                candidate.coeffs,
                candidate.angle.to_degrees(),
                candidate.length
            );
            picks.push(candidate);
        }

        let matrix = [picks[0].coeffs, picks[1].coeffs, picks[2].coeffs];
        let det = int_det(&matrix);
        if det == 0 {
            debug!("Selected vectors {:?} are linearly dependent", matrix);
            return Ok(None);
        }
        let multiplier = det.unsigned_abs() as usize;

        // 实际超胞 C = P·L 与理想正交晶胞 T
        let achieved = Matrix3::from_rows(&[
            picks[0].vector.transpose(),
            picks[1].vector.transpose(),
            picks[2].vector.transpose(),
        ]);
        let target = Matrix3::from_diagonal(&Vector3::new(
            picks[0].length,
            picks[1].length,
            picks[2].length,
        ));

        let achieved_inv = achieved
            .try_inverse()
            .ok_or_else(|| RiperError::SupercellError("supercell lattice is singular".to_string()))?;
        let deformation = achieved_inv * target;
        let green = (deformation * deformation.transpose() - Matrix3::identity()) * 0.5;

        let mut strain = [[0.0; 3]; 3];
        for (r, row) in strain.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = green[(r, c)];
            }
        }
        let max_strain = max_abs(&strain);
        debug!("Transformation {:?}, |det| = {}, max strain {:.3e}", matrix, multiplier, max_strain);

        if max_strain > self.strain_tolerance {
            debug!(
                "Max strain {:.3e} exceeds tolerance {:.3e}",
                max_strain, self.strain_tolerance
            );
            return Ok(None);
        }

        let atoms = build_supercell_atoms(&crystal.atoms, &matrix, multiplier)?;
        let lattice = Lattice::from_matrix3(&target);

        let mut structure = Crystal::new(crystal.name.clone(), lattice, atoms);
        structure.source_format = crystal.source_format.clone();

        let max_angle_deviation = picks
            .iter()
            .map(|c| c.angle.to_degrees())
            .fold(0.0, f64::max);

        Ok(Some(Transformation {
            structure,
            matrix,
            multiplier,
            strain,
            max_angle_deviation,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ortho::checker::is_orthogonal;
    use approx::assert_abs_diff_eq;

    fn graphene() -> Crystal {
        let lattice = Lattice::from_parameters(2.46, 2.46, 10.0, 90.0, 90.0, 120.0);
        let atoms = vec![
            Atom::new("C", [0.0, 0.0, 0.5]),
            Atom::new("C", [1.0 / 3.0, 2.0 / 3.0, 0.5]),
        ];
        Crystal::new("graphene", lattice, atoms)
    }

    fn monoclinic() -> Crystal {
        let lattice = Lattice::from_parameters(5.0, 6.0, 7.0, 90.0, 100.0, 90.0);
        let atoms = vec![
            Atom::new("Zr", [0.1, 0.2, 0.3]),
            Atom::new("O", [0.6, 0.7, 0.8]),
        ];
        Crystal::new("monoclinic", lattice, atoms)
    }

    #[test]
    fn test_hexagonal_becomes_rectangular() {
        let crystal = graphene();
        let t = LatticeSearch::new()
            .transform(&crystal, DEFAULT_MAX_REPETITIONS)
            .unwrap()
            .expect("hexagonal cell has an orthogonal supercell");

        assert_eq!(t.matrix, [[1, 0, 0], [1, 2, 0], [0, 0, 1]]);
        assert_eq!(t.multiplier, 2);
        assert_eq!(t.structure.atoms.len(), 4);
        assert!(is_orthogonal(&t.structure.lattice));
        assert!(t.max_strain() < 1e-12);
        assert!(t.max_angle_deviation < 1e-9);

        let (a, b, c, alpha, beta, gamma) = t.structure.lattice.parameters();
        assert_abs_diff_eq!(a, 2.46, epsilon = 1e-9);
        assert_abs_diff_eq!(b, 2.46 * 3.0_f64.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(c, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(alpha, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(beta, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(gamma, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_supercell_atoms_are_lattice_images() {
        let crystal = graphene();
        let t = LatticeSearch::new().transform(&crystal, 5).unwrap().unwrap();

        for atom in &t.structure.atoms {
            assert!(atom.position.iter().all(|&x| (0.0..1.0).contains(&x)));

            // 无应变时，新结构中的每个原子都对应原结构中某个原子的周期像
            let cart = t.structure.lattice.frac_to_cart(atom.position);
            let old = crystal.lattice.cart_to_frac(cart).unwrap();
            let matched = crystal.atoms.iter().any(|orig| {
                orig.element == atom.element
                    && (0..3).all(|d| {
                        let diff = (old[d] - orig.position[d]).rem_euclid(1.0);
                        diff.min(1.0 - diff) < 1e-9
                    })
            });
            assert!(matched, "atom at {:?} is not an image of the input", atom.position);
        }
    }

    #[test]
    fn test_hexagonal_not_found_with_small_bound() {
        let crystal = graphene();
        let result = LatticeSearch::new().transform(&crystal, 1).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_monoclinic_approximate_with_reported_strain() {
        let crystal = monoclinic();
        let t = LatticeSearch::new()
            .transform(&crystal, DEFAULT_MAX_REPETITIONS)
            .unwrap()
            .expect("an approximate orthogonal cell is within tolerance");

        assert_eq!(t.matrix, [[1, 0, 0], [0, 1, 0], [1, 0, 4]]);
        assert_eq!(t.multiplier, 4);
        assert_eq!(t.structure.atoms.len(), 8);
        assert!(is_orthogonal(&t.structure.lattice));

        let max = t.max_strain();
        assert!(max > 1e-4 && max < DEFAULT_STRAIN_TOLERANCE, "max strain {}", max);
        assert!(t.strain_norm() >= max);
        assert!(t.max_angle_deviation > 0.1 && t.max_angle_deviation < 1.0);

        // 应变张量对称
        for r in 0..3 {
            for c in 0..3 {
                assert_abs_diff_eq!(t.strain[r][c], t.strain[c][r], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_strain_tolerance_rejects_distortion() {
        let crystal = monoclinic();
        let result = LatticeSearch::new()
            .with_strain_tolerance(1e-4)
            .transform(&crystal, DEFAULT_MAX_REPETITIONS)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_orthogonal_input_maps_to_identity() {
        let lattice = Lattice::from_parameters(3.0, 4.0, 5.0, 90.0, 90.0, 90.0);
        let crystal = Crystal::new("ortho", lattice, vec![Atom::new("Au", [0.25, 0.5, 0.75])]);
        let t = LatticeSearch::new().transform(&crystal, 3).unwrap().unwrap();

        assert_eq!(t.matrix, [[1, 0, 0], [0, 1, 0], [0, 0, 1]]);
        assert_eq!(t.multiplier, 1);
        assert_eq!(t.structure.atoms.len(), 1);
        assert_abs_diff_eq!(t.structure.atoms[0].position[1], 0.5, epsilon = 1e-12);
        assert!(t.max_strain() < 1e-15);
    }

    #[test]
    fn test_zero_repetitions_is_rejected() {
        let err = LatticeSearch::new().transform(&graphene(), 0).unwrap_err();
        assert!(matches!(err, RiperError::InvalidArgument(_)));
    }

    #[test]
    fn test_singular_lattice_is_rejected() {
        let lattice = Lattice::from_vectors([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let crystal = Crystal::new("flat", lattice, vec![Atom::new("H", [0.0, 0.0, 0.0])]);
        let err = LatticeSearch::new().transform(&crystal, 5).unwrap_err();
        assert!(matches!(err, RiperError::SingularLattice { .. }));
    }

    #[test]
    fn test_int_det() {
        assert_eq!(int_det(&[[1, 0, 0], [1, 2, 0], [0, 0, 1]]), 2);
        assert_eq!(int_det(&[[1, 2, 3], [2, 4, 6], [0, 0, 1]]), 0);
        assert_eq!(int_det(&[[0, 1, 0], [1, 0, 0], [0, 0, 1]]), -1);
    }
}
