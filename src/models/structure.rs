//! # 晶体结构数据模型
//!
//! 统一的晶体结构表示：晶格 + 原子（分数坐标）。
//! 笛卡尔坐标总是通过晶格矩阵按需导出，保证两种表示一致。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`ortho/`、`render/` 使用
//! - 使用 `nalgebra` 做 3x3 矩阵运算

use nalgebra::{Matrix3, RowVector3};
use serde::{Deserialize, Serialize};
use super::elements::formula_order;
use std::collections::HashMap;

/// 奇异晶格判定阈值 (Å³)
pub const MIN_CELL_VOLUME: f64 = 1e-8;

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度。a 沿 x 轴，b 位于 xy 平面。
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        // 不可能的角度组合会让根号下为负，此时得到 NaN 体积，由调用方检查
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();
        let c_vec = [c1, c2, c3];

        let mut lattice = Lattice {
            matrix: [a_vec, b_vec, c_vec],
        };
        lattice.snap_to_zero(1e-12);
        lattice
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 从 nalgebra 矩阵（行 = 晶格向量）创建
    pub fn from_matrix3(m: &Matrix3<f64>) -> Self {
        let mut matrix = [[0.0; 3]; 3];
        for (i, row) in matrix.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = m[(i, j)];
            }
        }
        Self::from_vectors(matrix)
    }

    /// 转换为 nalgebra 矩阵（行 = 晶格向量）
    pub fn to_matrix3(&self) -> Matrix3<f64> {
        let m = self.matrix;
        Matrix3::from_rows(&[
            RowVector3::new(m[0][0], m[0][1], m[0][2]),
            RowVector3::new(m[1][0], m[1][1], m[1][2]),
            RowVector3::new(m[2][0], m[2][1], m[2][2]),
        ])
    }

    /// 将绝对值小于 `eps` 的矩阵元置零（消除三角函数带来的 1e-16 级噪声）
    fn snap_to_zero(&mut self, eps: f64) {
        for row in self.matrix.iter_mut() {
            for v in row.iter_mut() {
                if v.abs() < eps * (1.0 + v.abs()) {
                    *v = 0.0;
                }
            }
        }
    }

    /// 晶格向量长度 (a, b, c)
    pub fn lengths(&self) -> [f64; 3] {
        let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        [
            norm(self.matrix[0]),
            norm(self.matrix[1]),
            norm(self.matrix[2]),
        ]
    }

    /// 第 i 与第 j 个晶格向量的点积
    pub fn dot(&self, i: usize, j: usize) -> f64 {
        self.matrix[i]
            .iter()
            .zip(self.matrix[j].iter())
            .map(|(x, y)| x * y)
            .sum()
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a, b, c] = self.lengths();

        let angle = |dot: f64, l1: f64, l2: f64| (dot / (l1 * l2)).clamp(-1.0, 1.0).acos().to_degrees();

        let alpha = angle(self.dot(1, 2), b, c);
        let beta = angle(self.dot(0, 2), a, c);
        let gamma = angle(self.dot(0, 1), a, b);

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（带符号，右手系为正）
    pub fn volume(&self) -> f64 {
        self.to_matrix3().determinant()
    }

    /// 晶格是否奇异（体积为零或非有限值）
    pub fn is_singular(&self) -> bool {
        let v = self.volume();
        !v.is_finite() || v.abs() < MIN_CELL_VOLUME
    }

    /// 分数坐标转笛卡尔坐标：r = f · L
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let r = RowVector3::new(frac[0], frac[1], frac[2]) * self.to_matrix3();
        [r[0], r[1], r[2]]
    }

    /// 笛卡尔坐标转分数坐标：f = r · L⁻¹，晶格奇异时返回 None
    pub fn cart_to_frac(&self, cart: [f64; 3]) -> Option<[f64; 3]> {
        let inv = self.to_matrix3().try_inverse()?;
        let f = RowVector3::new(cart[0], cart[1], cart[2]) * inv;
        Some([f[0], f[1], f[2]])
    }
}

/// 原子信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],

    /// 可选：原子标签（CIF 中的 `_atom_site_label`）
    pub label: Option<String>,
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 晶体结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 原子列表
    pub atoms: Vec<Atom>,

    /// 空间群（仅用于显示）
    pub space_group: Option<String>,

    /// 来源文件格式
    pub source_format: Option<String>,
}

impl Crystal {
    pub fn new(name: impl Into<String>, lattice: Lattice, atoms: Vec<Atom>) -> Self {
        Crystal {
            name: name.into(),
            lattice,
            atoms,
            space_group: None,
            source_format: None,
        }
    }

    /// 各元素计数，按化学式书写顺序（电负性从小到大）排列
    fn element_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }
        let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| formula_order(a.0, b.0));
        counts
    }

    fn format_counts<'a>(counts: impl Iterator<Item = (&'a str, usize)>) -> String {
        counts
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 约化化学式（各元素计数除以最大公约数），如 Na4Cl4 -> NaCl
    pub fn formula(&self) -> String {
        let counts = self.element_counts();
        let divisor = counts.iter().map(|&(_, n)| n).fold(0, gcd).max(1);
        Self::format_counts(counts.into_iter().map(|(el, n)| (el, n / divisor)))
    }

    /// 完整化学式（不约化），如 Na4Cl4
    pub fn full_formula(&self) -> String {
        Self::format_counts(self.element_counts().into_iter())
    }

    /// 所有原子的笛卡尔坐标
    pub fn cartesian_positions(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|a| self.lattice.frac_to_cart(a.position))
            .collect()
    }

    /// 原子个数
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
