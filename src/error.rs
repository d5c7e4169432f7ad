//! # 统一错误处理模块
//!
//! 定义 riper-tools 的所有错误类型，使用 `thiserror` 派生。
//!
//! 注意：“晶胞已正交”和“未找到正交超胞”不是错误，
//! 它们是 `ortho::OrthoOutcome` 的正常结果分支。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// riper-tools 统一错误类型
#[derive(Error, Debug)]
pub enum RiperError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Output file already exists: {path} (use --overwrite to replace it)")]
    OutputExists { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} input: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid number for '{field}': '{value}'")]
    InvalidNumber { field: String, value: String },

    // ─────────────────────────────────────────────────────────────
    // 晶胞变换错误
    // ─────────────────────────────────────────────────────────────
    #[error("Lattice is singular (cell volume {volume:.3e})")]
    SingularLattice { volume: f64 },

    #[error("Supercell construction failed: {0}")]
    SupercellError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 序列化错误
    // ─────────────────────────────────────────────────────────────
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, RiperError>;
