//! # CIF 格式解析器
//!
//! 解析晶体学信息文件 (Crystallographic Information File)。
//!
//! ## 支持的内容
//! ```text
//! data_NAME
//! _cell_length_a    3.0(1)         # 允许标准不确定度
//! _cell_angle_gamma 120
//! loop_
//! _symmetry_equiv_pos_as_xyz       # 可选：对称操作
//! 'x, y, z'
//! '-y, x-y, z'
//! loop_
//! _atom_site_label
//! _atom_site_type_symbol           # 可选：缺省时从 label 推断元素
//! _atom_site_fract_x               # 或 _atom_site_Cartn_x
//! _atom_site_fract_y
//! _atom_site_fract_z
//! Fe1 Fe 0.0 0.0 0.0
//! ```
//!
//! 只读取第一个 `data_` 块；`;` 开头的多行文本字段会被整体跳过。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`、`ortho/workflow.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{Result, RiperError};
use crate::models::{Atom, Crystal, Lattice};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// 对称展开时判定重复原子的分数坐标阈值
const DUPLICATE_TOLERANCE: f64 = 1e-3;

/// 读取 CIF 文本，路径为 `-` 时从标准输入读取
///
/// 返回 `(文本, 默认结构名)`，默认名取自文件名。
pub fn read_cif_text(path: &Path) -> Result<(String, String)> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| RiperError::FileReadError {
                path: "<stdin>".to_string(),
                source: e,
            })?;
        return Ok((buf, "stdin".to_string()));
    }

    if !path.exists() {
        return Err(RiperError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| RiperError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("structure")
        .to_string();

    Ok((content, name))
}

/// 从字符串内容解析 CIF 格式
pub fn parse_cif_content(content: &str, default_name: &str) -> Result<Crystal> {
    let err = |reason: String| RiperError::ParseError {
        format: "cif".to_string(),
        path: default_name.to_string(),
        reason,
    };

    let tokens = tokenize(content).map_err(&err)?;
    let block = read_first_block(&tokens).map_err(&err)?;

    let name = block
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default_name.to_string());

    let lattice = read_lattice(&block).map_err(&err)?;
    let atoms = read_atoms(&block, &lattice).map_err(&err)?;

    let mut crystal = Crystal::new(name, lattice, atoms);
    crystal.space_group = block
        .value("_symmetry_space_group_name_h-m")
        .or_else(|| block.value("_space_group_name_h-m_alt"))
        .map(|s| s.to_string());
    crystal.source_format = Some("cif".to_string());

    Ok(crystal)
}

// ─────────────────────────────────────────────────────────────
// 词法分析
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    /// 引号或多行文本中的值永远不会被当作标签/关键字
    quoted: bool,
}

impl Token {
    fn bare(text: &str) -> Self {
        Token {
            text: text.to_string(),
            quoted: false,
        }
    }

    fn is_tag(&self) -> bool {
        !self.quoted && self.text.starts_with('_')
    }

    fn is_keyword(&self, kw: &str) -> bool {
        !self.quoted
            && self
                .text
                .get(..kw.len())
                .map_or(false, |prefix| prefix.eq_ignore_ascii_case(kw))
    }

    fn ends_values(&self) -> bool {
        self.is_tag()
            || self.is_keyword("loop_")
            || self.is_keyword("data_")
            || self.is_keyword("save_")
            || self.is_keyword("global_")
    }
}

fn tokenize(content: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut lines = content.lines().enumerate();

    while let Some((line_no, line)) = lines.next() {
        // 多行文本字段：以 ';' 开头，直到下一个以 ';' 开头的行
        if let Some(first) = line.strip_prefix(';') {
            let mut text = first.to_string();
            let mut closed = false;
            for (_, inner) in lines.by_ref() {
                if inner.starts_with(';') {
                    closed = true;
                    break;
                }
                text.push('\n');
                text.push_str(inner);
            }
            if !closed {
                return Err(format!(
                    "Unterminated text field starting at line {}",
                    line_no + 1
                ));
            }
            tokens.push(Token { text, quoted: true });
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                i += 1;
                continue;
            }
            if c == '#' {
                break;
            }
            if c == '\'' || c == '"' {
                // 引号只有在后面跟空白或行尾时才结束
                let quote = c;
                let start = i + 1;
                let mut j = start;
                loop {
                    if j >= chars.len() {
                        return Err(format!("Unterminated quoted value at line {}", line_no + 1));
                    }
                    if chars[j] == quote && (j + 1 == chars.len() || chars[j + 1].is_whitespace()) {
                        break;
                    }
                    j += 1;
                }
                tokens.push(Token {
                    text: chars[start..j].iter().collect(),
                    quoted: true,
                });
                i = j + 1;
                continue;
            }
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            tokens.push(Token::bare(&word));
        }
    }

    Ok(tokens)
}

// ─────────────────────────────────────────────────────────────
// 数据块
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct CifLoop {
    /// 小写标签名
    tags: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CifLoop {
    fn column(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    fn has(&self, tag: &str) -> bool {
        self.column(tag).is_some()
    }
}

#[derive(Debug, Default)]
struct CifBlock {
    name: Option<String>,
    /// 单值条目，键为小写标签名
    items: HashMap<String, String>,
    loops: Vec<CifLoop>,
}

impl CifBlock {
    fn value(&self, tag: &str) -> Option<&str> {
        self.items.get(tag).map(|s| s.as_str())
    }

    fn find_loop(&self, any_of: &[&str]) -> Option<&CifLoop> {
        self.loops
            .iter()
            .find(|l| any_of.iter().any(|tag| l.has(tag)))
    }
}

fn read_first_block(tokens: &[Token]) -> std::result::Result<CifBlock, String> {
    let mut block = CifBlock::default();
    let mut seen_data = false;
    let mut i = 0;

    while i < tokens.len() {
        let tok = &tokens[i];

        if tok.is_keyword("data_") {
            if seen_data {
                // 只读取第一个数据块
                break;
            }
            seen_data = true;
            block.name = Some(tok.text[5..].to_string());
            i += 1;
        } else if tok.is_keyword("loop_") {
            i += 1;
            let mut lp = CifLoop::default();
            while i < tokens.len() && tokens[i].is_tag() {
                lp.tags.push(tokens[i].text.to_lowercase());
                i += 1;
            }
            if lp.tags.is_empty() {
                return Err("loop_ without any tags".to_string());
            }
            let mut values = Vec::new();
            while i < tokens.len() && !tokens[i].ends_values() {
                values.push(tokens[i].text.clone());
                i += 1;
            }
            if values.len() % lp.tags.len() != 0 {
                return Err(format!(
                    "loop with {} tags has {} values (not a multiple)",
                    lp.tags.len(),
                    values.len()
                ));
            }
            lp.rows = values
                .chunks(lp.tags.len())
                .map(|row| row.to_vec())
                .collect();
            block.loops.push(lp);
        } else if tok.is_tag() {
            let tag = tok.text.to_lowercase();
            match tokens.get(i + 1) {
                Some(value) if !value.ends_values() => {
                    block.items.insert(tag, value.text.clone());
                    i += 2;
                }
                _ => return Err(format!("Tag '{}' has no value", tok.text)),
            }
        } else {
            // save_/global_ 或游离值：忽略
            i += 1;
        }
    }

    if !seen_data && block.items.is_empty() && block.loops.is_empty() {
        return Err("No CIF data found".to_string());
    }

    Ok(block)
}

// ─────────────────────────────────────────────────────────────
// 数值与晶格
// ─────────────────────────────────────────────────────────────

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)(?:\(\d+\))?$")
            .expect("number pattern is valid")
    })
}

/// 解析 CIF 数值，允许 `1.234(5)` 形式的标准不确定度
fn parse_cif_number(field: &str, raw: &str) -> std::result::Result<f64, String> {
    number_regex()
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| format!("Malformed numeric value '{}' for {}", raw, field))
}

fn read_lattice(block: &CifBlock) -> std::result::Result<Lattice, String> {
    let length = |tag: &str| -> std::result::Result<f64, String> {
        let raw = block
            .value(tag)
            .ok_or_else(|| format!("Missing mandatory cell parameter {}", tag))?;
        parse_cif_number(tag, raw)
    };
    let angle = |tag: &str| -> std::result::Result<f64, String> {
        match block.value(tag) {
            Some(raw) => parse_cif_number(tag, raw),
            None => Ok(90.0),
        }
    };

    let a = length("_cell_length_a")?;
    let b = length("_cell_length_b")?;
    let c = length("_cell_length_c")?;
    let alpha = angle("_cell_angle_alpha")?;
    let beta = angle("_cell_angle_beta")?;
    let gamma = angle("_cell_angle_gamma")?;

    if a <= 0.0 || b <= 0.0 || c <= 0.0 {
        return Err(format!("Non-positive cell length ({}, {}, {})", a, b, c));
    }

    let lattice = Lattice::from_parameters(a, b, c, alpha, beta, gamma);
    if lattice.is_singular() {
        return Err(format!(
            "Degenerate cell: a={} b={} c={} alpha={} beta={} gamma={}",
            a, b, c, alpha, beta, gamma
        ));
    }

    Ok(lattice)
}

// ─────────────────────────────────────────────────────────────
// 原子位置
// ─────────────────────────────────────────────────────────────

const FRACT_TAGS: [&str; 3] = ["_atom_site_fract_x", "_atom_site_fract_y", "_atom_site_fract_z"];
const CARTN_TAGS: [&str; 3] = ["_atom_site_cartn_x", "_atom_site_cartn_y", "_atom_site_cartn_z"];

fn read_atoms(block: &CifBlock, lattice: &Lattice) -> std::result::Result<Vec<Atom>, String> {
    let atom_loop = block
        .find_loop(&[FRACT_TAGS[0], CARTN_TAGS[0]])
        .ok_or_else(|| "Missing atom site loop (_atom_site_fract_* or _atom_site_Cartn_*)".to_string())?;

    let (coord_tags, is_cartesian) = if atom_loop.has(FRACT_TAGS[0]) {
        (FRACT_TAGS, false)
    } else {
        (CARTN_TAGS, true)
    };

    let coord_cols = coord_tags
        .iter()
        .map(|tag| {
            atom_loop
                .column(tag)
                .ok_or_else(|| format!("Atom site loop is missing {}", tag))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let label_col = atom_loop.column("_atom_site_label");
    let symbol_col = atom_loop.column("_atom_site_type_symbol");
    if label_col.is_none() && symbol_col.is_none() {
        return Err("Atom site loop has neither _atom_site_label nor _atom_site_type_symbol".to_string());
    }

    if atom_loop.rows.is_empty() {
        return Err("Atom site loop contains no atoms".to_string());
    }

    let mut base_atoms = Vec::with_capacity(atom_loop.rows.len());
    for row in &atom_loop.rows {
        let mut p = [0.0; 3];
        for (k, &col) in coord_cols.iter().enumerate() {
            p[k] = parse_cif_number(coord_tags[k], &row[col])?;
        }

        let position = if is_cartesian {
            lattice
                .cart_to_frac(p)
                .ok_or_else(|| "Cannot convert Cartesian positions: singular lattice".to_string())?
        } else {
            p
        };

        let label = label_col.map(|c| row[c].clone());
        let species_source = symbol_col
            .map(|c| row[c].as_str())
            .or(label.as_deref())
            .unwrap_or_default();
        let element = element_from_symbol(species_source)
            .ok_or_else(|| format!("Cannot determine element from '{}'", species_source))?;

        let mut atom = Atom::new(element, position);
        if let Some(label) = label {
            atom = atom.with_label(label);
        }
        base_atoms.push(atom);
    }

    let operations = read_symmetry_operations(block)?;
    if operations.is_empty() {
        return Ok(base_atoms);
    }

    Ok(expand_symmetry(&base_atoms, &operations))
}

/// 从 `Fe1`、`O2-`、`Ca2+` 等写法中取出元素符号
fn element_from_symbol(raw: &str) -> Option<String> {
    let mut chars = raw.chars().skip_while(|c| !c.is_ascii_alphabetic());
    let first = chars.next()?.to_ascii_uppercase();
    let mut symbol = first.to_string();
    if let Some(second) = chars.next() {
        if second.is_ascii_lowercase() {
            symbol.push(second);
        }
    }
    Some(symbol)
}

// ─────────────────────────────────────────────────────────────
// 对称操作
// ─────────────────────────────────────────────────────────────

/// 对称操作：f' = R·f + t
#[derive(Debug, Clone, PartialEq)]
struct SymOp {
    rotation: [[f64; 3]; 3],
    translation: [f64; 3],
}

impl SymOp {
    fn apply(&self, p: [f64; 3]) -> [f64; 3] {
        let mut out = self.translation;
        for (i, o) in out.iter_mut().enumerate() {
            for (j, pj) in p.iter().enumerate() {
                *o += self.rotation[i][j] * pj;
            }
        }
        out
    }

    fn is_identity(&self) -> bool {
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        self.rotation == identity && self.translation.iter().all(|t| t.rem_euclid(1.0) == 0.0)
    }
}

fn read_symmetry_operations(block: &CifBlock) -> std::result::Result<Vec<SymOp>, String> {
    const SYMOP_TAGS: [&str; 2] = [
        "_symmetry_equiv_pos_as_xyz",
        "_space_group_symop_operation_xyz",
    ];

    let Some(lp) = block.find_loop(&SYMOP_TAGS) else {
        return Ok(Vec::new());
    };
    let col = SYMOP_TAGS
        .iter()
        .find_map(|tag| lp.column(tag))
        .ok_or_else(|| "Symmetry loop without operation column".to_string())?;

    let ops = lp
        .rows
        .iter()
        .map(|row| parse_symop(&row[col]))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // 只有恒等操作时无需展开
    if ops.iter().all(SymOp::is_identity) {
        return Ok(Vec::new());
    }
    Ok(ops)
}

/// 解析 `-x+1/2, y, z-y` 形式的对称操作
fn parse_symop(op: &str) -> std::result::Result<SymOp, String> {
    let parts: Vec<&str> = op.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("Malformed symmetry operation '{}'", op));
    }

    let mut rotation = [[0.0; 3]; 3];
    let mut translation = [0.0; 3];

    for (row, expr) in parts.iter().enumerate() {
        let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(format!("Malformed symmetry operation '{}'", op));
        }

        // 按 +/- 切分为若干项，保留符号
        let mut terms = Vec::new();
        let mut current = String::new();
        for c in compact.chars() {
            if (c == '+' || c == '-') && !current.is_empty() {
                terms.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        terms.push(current);

        for term in terms {
            let (sign, body) = match term.strip_prefix('-') {
                Some(rest) => (-1.0, rest),
                None => (1.0, term.strip_prefix('+').unwrap_or(&term)),
            };
            let body = body.to_ascii_lowercase();
            match body.as_str() {
                "x" => rotation[row][0] += sign,
                "y" => rotation[row][1] += sign,
                "z" => rotation[row][2] += sign,
                _ => {
                    let value = if let Some((num, den)) = body.split_once('/') {
                        let num: f64 = num.parse().map_err(|_| format!("Bad term '{}' in '{}'", term, op))?;
                        let den: f64 = den.parse().map_err(|_| format!("Bad term '{}' in '{}'", term, op))?;
                        if den == 0.0 {
                            return Err(format!("Division by zero in '{}'", op));
                        }
                        num / den
                    } else {
                        body.parse::<f64>()
                            .map_err(|_| format!("Bad term '{}' in '{}'", term, op))?
                    };
                    translation[row] += sign * value;
                }
            }
        }
    }

    Ok(SymOp {
        rotation,
        translation,
    })
}

fn wrap_unit(v: f64) -> f64 {
    let w = v.rem_euclid(1.0);
    // rem_euclid(-1e-17) 会得到 1.0
    if w >= 1.0 - 1e-12 {
        0.0
    } else {
        w
    }
}

fn is_periodic_duplicate(a: [f64; 3], b: [f64; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| {
        let d = (x - y).abs();
        d.min(1.0 - d) < DUPLICATE_TOLERANCE
    })
}

fn expand_symmetry(base_atoms: &[Atom], operations: &[SymOp]) -> Vec<Atom> {
    let mut expanded: Vec<Atom> = Vec::new();

    for atom in base_atoms {
        for op in operations {
            let p = op.apply(atom.position);
            let wrapped = [wrap_unit(p[0]), wrap_unit(p[1]), wrap_unit(p[2])];

            let duplicate = expanded
                .iter()
                .any(|e| e.element == atom.element && is_periodic_duplicate(e.position, wrapped));
            if !duplicate {
                let mut new_atom = atom.clone();
                new_atom.position = wrapped;
                expanded.push(new_atom);
            }
        }
    }

    expanded
}

// ─────────────────────────────────────────────────────────────
// 写出
// ─────────────────────────────────────────────────────────────

/// 将 Crystal 转换为 P1 CIF 字符串
pub fn to_cif_string(crystal: &Crystal) -> String {
    let (a, b, c, alpha, beta, gamma) = crystal.lattice.parameters();

    let block_name: String = crystal
        .name
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect();

    let mut result = String::new();
    result.push_str(&format!("data_{}\n", block_name));
    result.push_str("_symmetry_space_group_name_H-M    'P 1'\n");
    result.push_str("_symmetry_Int_Tables_number       1\n");
    result.push_str(&format!("_chemical_formula_sum    '{}'\n\n", crystal.full_formula()));

    result.push_str(&format!("_cell_length_a    {:.10}\n", a));
    result.push_str(&format!("_cell_length_b    {:.10}\n", b));
    result.push_str(&format!("_cell_length_c    {:.10}\n", c));
    result.push_str(&format!("_cell_angle_alpha {:.10}\n", alpha));
    result.push_str(&format!("_cell_angle_beta  {:.10}\n", beta));
    result.push_str(&format!("_cell_angle_gamma {:.10}\n", gamma));
    result.push_str(&format!("_cell_volume      {:.6}\n\n", crystal.lattice.volume().abs()));

    result.push_str("loop_\n");
    result.push_str("_symmetry_equiv_pos_site_id\n");
    result.push_str("_symmetry_equiv_pos_as_xyz\n");
    result.push_str("1 'x, y, z'\n\n");

    result.push_str("loop_\n");
    result.push_str("_atom_site_label\n");
    result.push_str("_atom_site_type_symbol\n");
    result.push_str("_atom_site_fract_x\n");
    result.push_str("_atom_site_fract_y\n");
    result.push_str("_atom_site_fract_z\n");
    result.push_str("_atom_site_occupancy\n");

    for (i, atom) in crystal.atoms.iter().enumerate() {
        let label = atom
            .label
            .clone()
            .unwrap_or_else(|| format!("{}{}", atom.element, i + 1));
        result.push_str(&format!(
            "{} {} {:.10} {:.10} {:.10} 1.0\n",
            label, atom.element, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const NACL_CIF: &str = r#"
# rock salt, conventional cell
data_NaCl
_symmetry_space_group_name_H-M 'P 1'
_cell_length_a 5.64
_cell_length_b 5.64
_cell_length_c 5.64
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 90
loop_
_atom_site_label
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Na1 Na 0.0 0.0 0.0
Na2 Na 0.5 0.5 0.0
Na3 Na 0.5 0.0 0.5
Na4 Na 0.0 0.5 0.5
Cl1 Cl 0.5 0.0 0.0
Cl2 Cl 0.0 0.5 0.0
Cl3 Cl 0.0 0.0 0.5
Cl4 Cl 0.5 0.5 0.5
"#;

    #[test]
    fn test_parse_basic_cif() {
        let crystal = parse_cif_content(NACL_CIF, "fallback").unwrap();
        assert_eq!(crystal.name, "NaCl");
        assert_eq!(crystal.atoms.len(), 8);
        assert_eq!(crystal.formula(), "NaCl");
        assert_eq!(crystal.space_group.as_deref(), Some("P 1"));
        assert_eq!(crystal.atoms[4].label.as_deref(), Some("Cl1"));

        let (a, _, _, alpha, _, _) = crystal.lattice.parameters();
        assert_abs_diff_eq!(a, 5.64, epsilon = 1e-9);
        assert_abs_diff_eq!(alpha, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cif_round_trip() {
        let content = r#"data_graphite
_cell_length_a 2.464
_cell_length_b 2.464
_cell_length_c 6.711
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 120
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
C1 0.0 0.0 0.25
C2 0.0 0.0 0.75
C3 0.333333333 0.666666667 0.25
C4 0.666666667 0.333333333 0.75
"#;
        let first = parse_cif_content(content, "x").unwrap();
        let written = to_cif_string(&first);
        let second = parse_cif_content(&written, "x").unwrap();

        assert_eq!(second.name, first.name);
        assert_eq!(second.atoms.len(), first.atoms.len());

        let p1 = first.lattice.parameters();
        let p2 = second.lattice.parameters();
        assert_abs_diff_eq!(p1.0, p2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p1.2, p2.2, epsilon = 1e-6);
        assert_abs_diff_eq!(p1.5, p2.5, epsilon = 1e-6);

        for (x, y) in first.atoms.iter().zip(second.atoms.iter()) {
            assert_eq!(x.element, y.element);
            assert_eq!(x.label, y.label);
            for k in 0..3 {
                assert_abs_diff_eq!(x.position[k], y.position[k], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_species_from_label_and_uncertainty() {
        let content = r#"data_rutile
_cell_length_a 4.5937(2)
_cell_length_b 4.5937(2)
_cell_length_c 2.9587(1)
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Ti1 0 0 0
O2- 0.3053(3) 0.3053(3) 0
"#;
        let crystal = parse_cif_content(content, "x").unwrap();
        assert_eq!(crystal.atoms[0].element, "Ti");
        assert_eq!(crystal.atoms[1].element, "O");
        assert_abs_diff_eq!(crystal.atoms[1].position[0], 0.3053, epsilon = 1e-12);

        // 未给出角度时默认为 90°
        let (a, _, c, alpha, beta, gamma) = crystal.lattice.parameters();
        assert_abs_diff_eq!(a, 4.5937, epsilon = 1e-9);
        assert_abs_diff_eq!(c, 2.9587, epsilon = 1e-9);
        assert_abs_diff_eq!(alpha, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(beta, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(gamma, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_symmetry_expansion() {
        // bcc Fe: I-centering 生成第二个原子
        let content = r#"data_Fe
_cell_length_a 2.87
_cell_length_b 2.87
_cell_length_c 2.87
loop_
_symmetry_equiv_pos_as_xyz
'x, y, z'
'x+1/2, y+1/2, z+1/2'
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Fe1 0 0 0
"#;
        let crystal = parse_cif_content(content, "x").unwrap();
        assert_eq!(crystal.atoms.len(), 2);
        assert_eq!(crystal.atoms[1].position, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_symmetry_duplicates_merged() {
        let content = r#"data_dup
_cell_length_a 3
_cell_length_b 3
_cell_length_c 3
loop_
_space_group_symop_operation_xyz
x,y,z
-x,-y,-z
loop_
_atom_site_type_symbol
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Cu 0.5 0.5 0.5
Cu 0.25 0 0
"#;
        let crystal = parse_cif_content(content, "x").unwrap();
        // (0.5,0.5,0.5) 的反演像与自身重合；(0.25,0,0) 生成 (0.75,0,0)
        assert_eq!(crystal.atoms.len(), 3);
        assert!(crystal
            .atoms
            .iter()
            .any(|a| (a.position[0] - 0.75).abs() < 1e-12));
    }

    #[test]
    fn test_cartesian_positions() {
        let content = r#"data_cart
_cell_length_a 4
_cell_length_b 5
_cell_length_c 8
loop_
_atom_site_label
_atom_site_Cartn_x
_atom_site_Cartn_y
_atom_site_Cartn_z
H1 2.0 2.5 2.0
"#;
        let crystal = parse_cif_content(content, "x").unwrap();
        let p = crystal.atoms[0].position;
        assert_abs_diff_eq!(p[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p[2], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_text_fields_and_quotes_are_skipped() {
        let content = r#"data_text
_publ_section_title
;
A title spanning
_several_ lines with loop_ inside
;
_chemical_name_common 'it''s quoted'
_cell_length_a 3
_cell_length_b 3
_cell_length_c 3
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Si1 0 0 0
"#;
        let crystal = parse_cif_content(content, "x").unwrap();
        assert_eq!(crystal.atoms.len(), 1);
        assert_eq!(crystal.atoms[0].element, "Si");
    }

    #[test]
    fn test_missing_cell_is_parse_error() {
        let content = r#"data_bad
_cell_length_a 3
_cell_length_b 3
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Si1 0 0 0
"#;
        let err = parse_cif_content(content, "bad").unwrap_err();
        match err {
            RiperError::ParseError { format, reason, .. } => {
                assert_eq!(format, "cif");
                assert!(reason.contains("_cell_length_c"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_atom_loop_is_parse_error() {
        let content = "data_bad\n_cell_length_a 3\n_cell_length_b 3\n_cell_length_c 3\n";
        let err = parse_cif_content(content, "bad").unwrap_err();
        assert!(matches!(err, RiperError::ParseError { ref reason, .. } if reason.contains("atom site loop")));
    }

    #[test]
    fn test_malformed_number_is_parse_error() {
        let content = r#"data_bad
_cell_length_a 3.x
_cell_length_b 3
_cell_length_c 3
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Si1 0 0 0
"#;
        assert!(matches!(
            parse_cif_content(content, "bad"),
            Err(RiperError::ParseError { .. })
        ));

        let content = content.replace("3.x", "3").replace("Si1 0 0 0", "Si1 0 ? 0");
        assert!(matches!(
            parse_cif_content(&content, "bad"),
            Err(RiperError::ParseError { .. })
        ));
    }

    #[test]
    fn test_degenerate_cell_is_parse_error() {
        let content = r#"data_flat
_cell_length_a 3
_cell_length_b 3
_cell_length_c 3
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 180
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Si1 0 0 0
"#;
        assert!(matches!(
            parse_cif_content(content, "flat"),
            Err(RiperError::ParseError { .. })
        ));
    }

    #[test]
    fn test_ragged_loop_is_parse_error() {
        let content = r#"data_ragged
_cell_length_a 3
_cell_length_b 3
_cell_length_c 3
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Si1 0 0
"#;
        assert!(matches!(
            parse_cif_content(content, "ragged"),
            Err(RiperError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_symop() {
        let op = parse_symop("-y+1/2, x-y, z+0.25").unwrap();
        assert_eq!(op.rotation, [[0.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(op.translation, [0.5, 0.0, 0.25]);
        assert!(parse_symop("x, y").is_err());
        assert!(parse_symop("x, y, q").is_err());
    }

    #[test]
    fn test_element_from_symbol() {
        assert_eq!(element_from_symbol("Fe1").as_deref(), Some("Fe"));
        assert_eq!(element_from_symbol("O2-").as_deref(), Some("O"));
        assert_eq!(element_from_symbol("Ca2+").as_deref(), Some("Ca"));
        assert_eq!(element_from_symbol("123"), None);
    }

    #[test]
    fn test_formula_follows_electronegativity_after_symmetry() {
        let content = r#"data_TiO
_cell_length_a 3.0
_cell_length_b 3.0
_cell_length_c 4.0
_cell_angle_alpha 90
_cell_angle_beta 90
_cell_angle_gamma 120
loop_
_symmetry_equiv_pos_as_xyz
'x, y, z'
'-y, x-y, z'
'-x+y, -x, z'
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Ti1 0.0 0.0 0.0
O1 0.333333 0.666667 0.5
"#;
        let crystal = parse_cif_content(content, "x").unwrap();
        assert_eq!(crystal.atoms.len(), 2);
        assert_eq!(crystal.formula(), "TiO");
        assert_eq!(crystal.full_formula(), "TiO");
    }
}
