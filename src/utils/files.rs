//! # 输出文件工具
//!
//! 所有导出都写到用户指定的路径；已存在的文件只有在 `--overwrite` 时才会被替换。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用

use crate::error::{Result, RiperError};
use std::fs;
use std::path::Path;

/// 检查输出路径是否可写
pub fn check_output_path(path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(RiperError::OutputExists {
            path: path.display().to_string(),
        });
    }
    ensure_parent_dir(path)
}

/// 创建缺失的父目录
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| RiperError::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// 写入文本文件（所有导出的唯一写盘入口）
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, content).map_err(|e| RiperError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}
