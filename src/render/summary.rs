//! # 结构摘要输出
//!
//! 终端中展示结构：化学式、晶格参数表、晶格向量表和原子坐标表，
//! 以及把坐标表导出为 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/info.rs`、`commands/orthogonalize.rs` 使用
//! - 使用 `tabled` 打印表格，`csv` 写入文件

use crate::error::{Result, RiperError};
use crate::models::Crystal;
use crate::utils::{files, output};

use clap::ValueEnum;
use std::io::Write;
use std::path::Path;
use tabled::{Table, Tabled};

/// 坐标表使用的坐标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CoordinateKind {
    /// Cartesian coordinates in Å
    Cartesian,
    /// Fractional coordinates
    Fractional,
}

impl std::fmt::Display for CoordinateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateKind::Cartesian => write!(f, "cartesian"),
            CoordinateKind::Fractional => write!(f, "fractional"),
        }
    }
}

/// 坐标表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRow {
    /// 从 1 开始的原子序号
    pub index: usize,
    pub element: String,
    pub position: [f64; 3],
}

/// 按原子顺序生成坐标行
pub fn coordinate_rows(crystal: &Crystal, kind: CoordinateKind) -> Vec<CoordinateRow> {
    let positions: Vec<[f64; 3]> = match kind {
        CoordinateKind::Fractional => crystal.atoms.iter().map(|a| a.position).collect(),
        CoordinateKind::Cartesian => crystal.cartesian_positions(),
    };

    crystal
        .atoms
        .iter()
        .zip(positions)
        .enumerate()
        .map(|(i, (atom, position))| CoordinateRow {
            index: i + 1,
            element: atom.element.clone(),
            position,
        })
        .collect()
}

#[derive(Tabled)]
struct ParameterRow {
    #[tabled(rename = "a (Å)")]
    a: String,
    #[tabled(rename = "b (Å)")]
    b: String,
    #[tabled(rename = "c (Å)")]
    c: String,
    #[tabled(rename = "α (°)")]
    alpha: String,
    #[tabled(rename = "β (°)")]
    beta: String,
    #[tabled(rename = "γ (°)")]
    gamma: String,
    #[tabled(rename = "V (Å³)")]
    volume: String,
}

#[derive(Tabled)]
struct VectorRow {
    #[tabled(rename = "Vector")]
    name: &'static str,
    #[tabled(rename = "x (Å)")]
    x: String,
    #[tabled(rename = "y (Å)")]
    y: String,
    #[tabled(rename = "z (Å)")]
    z: String,
}

#[derive(Tabled)]
struct AtomRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "x")]
    x: String,
    #[tabled(rename = "y")]
    y: String,
    #[tabled(rename = "z")]
    z: String,
}

/// 打印结构摘要
pub fn print_structure_info(crystal: &Crystal, kind: CoordinateKind) {
    output::print_header(&format!("Structure: {}", crystal.name));

    output::print_info(&format!(
        "Formula: {} ({} atoms, {})",
        crystal.formula(),
        crystal.num_atoms(),
        crystal.full_formula()
    ));
    if let Some(ref sg) = crystal.space_group {
        output::print_info(&format!("Space group: {}", sg));
    }

    let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();
    let params = [ParameterRow {
        a: format!("{:.4}", a),
        b: format!("{:.4}", b),
        c: format!("{:.4}", c),
        alpha: format!("{:.3}", alpha),
        beta: format!("{:.3}", beta),
        gamma: format!("{:.3}", gamma),
        volume: format!("{:.3}", crystal.lattice.volume()),
    }];
    println!("\n{}", Table::new(&params));

    let vectors: Vec<VectorRow> = ["a", "b", "c"]
        .into_iter()
        .zip(crystal.lattice.matrix.iter())
        .map(|(name, v)| VectorRow {
            name,
            x: format!("{:.6}", v[0]),
            y: format!("{:.6}", v[1]),
            z: format!("{:.6}", v[2]),
        })
        .collect();
    println!("\n{}", Table::new(&vectors));

    let rows: Vec<AtomRow> = coordinate_rows(crystal, kind)
        .into_iter()
        .map(|r| AtomRow {
            index: r.index,
            element: r.element,
            x: format!("{:.6}", r.position[0]),
            y: format!("{:.6}", r.position[1]),
            z: format!("{:.6}", r.position[2]),
        })
        .collect();

    println!("\nAtom coordinates ({}):", kind);
    println!("{}", Table::new(&rows));
}

/// 写入坐标 CSV 到任意 writer
pub fn write_coordinates_csv<W: Write>(writer: W, rows: &[CoordinateRow], kind: CoordinateKind) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header = match kind {
        CoordinateKind::Cartesian => ["index", "element", "x_angstrom", "y_angstrom", "z_angstrom"],
        CoordinateKind::Fractional => ["index", "element", "frac_x", "frac_y", "frac_z"],
    };
    wtr.write_record(header)?;

    for row in rows {
        wtr.write_record([
            row.index.to_string(),
            row.element.clone(),
            format!("{:.8}", row.position[0]),
            format!("{:.8}", row.position[1]),
            format!("{:.8}", row.position[2]),
        ])?;
    }

    wtr.flush().map_err(|e| RiperError::Other(format!("Failed to flush CSV output: {}", e)))?;
    Ok(())
}

/// 导出坐标表为 CSV 文件
pub fn save_coordinates_csv(crystal: &Crystal, kind: CoordinateKind, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    write_coordinates_csv(&mut buf, &coordinate_rows(crystal, kind), kind)?;
    let text = String::from_utf8(buf)
        .map_err(|e| RiperError::Other(format!("CSV output is not valid UTF-8: {}", e)))?;
    files::write_text(path, &text)
}
