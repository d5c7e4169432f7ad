//! # 工具函数模块
//!
//! 提供美化输出、进度提示、输出文件检查等工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, progress, files

pub mod files;
pub mod output;
pub mod progress;
