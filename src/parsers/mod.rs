//! # 解析器模块
//!
//! 提供结构文件的解析与写出。
//!
//! ## 依赖关系
//! - 被 `commands/`、`ortho/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: cif

pub mod cif;

use crate::error::{Result, RiperError};
use crate::models::Crystal;
use std::path::Path;

pub use cif::{parse_cif_content, to_cif_string};

/// 读取结构文件文本；`-` 表示从标准输入读取 CIF 文本
///
/// 返回 `(文本, 默认结构名)`。
pub fn read_structure_text(path: &Path) -> Result<(String, String)> {
    if path.as_os_str() == "-" {
        return cif::read_cif_text(path);
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        // 无扩展名或 .txt 的文件按 CIF 文本处理（例如从网页复制保存的内容）
        "cif" | "txt" | "" => cif::read_cif_text(path),
        other => Err(RiperError::InvalidArgument(format!(
            "Unsupported structure format '.{}' for {} (expected a CIF file)",
            other,
            path.display()
        ))),
    }
}

/// 读取并解析结构文件
pub fn parse_structure_file(path: &Path) -> Result<Crystal> {
    let (content, name) = read_structure_text(path)?;
    parse_cif_content(&content, &name)
}
