//! # 结构展示与导出
//!
//! - `summary`: 终端表格与坐标 CSV
//! - `viewer`: 3Dmol.js HTML 查看器
//! - `report`: 正交化结果 JSON 报告
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`、`parsers/`、`ortho/`

pub mod report;
pub mod summary;
pub mod viewer;

pub use report::OrthoReport;
pub use summary::{print_structure_info, save_coordinates_csv, CoordinateKind};
pub use viewer::{save_viewer_html, ViewerOptions};
