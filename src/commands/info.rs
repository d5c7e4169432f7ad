//! # info 命令实现
//!
//! 读取 CIF，打印结构摘要，可选写出 3D 查看器。
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的参数
//! - 使用 `parsers/`, `render/`, `ortho/checker.rs`
//! - 使用 `utils/output.rs`, `utils/files.rs`

use crate::cli::info::InfoArgs;
use crate::error::Result;
use crate::ortho::{is_orthogonal, max_off_diagonal_dot};
use crate::parsers;
use crate::render::{self, ViewerOptions};
use crate::utils::{files, output};

/// 执行 info 命令
pub fn execute(args: InfoArgs) -> Result<()> {
    if let Some(ref path) = args.view {
        files::check_output_path(path, args.overwrite)?;
    }

    let crystal = parsers::parse_structure_file(&args.input)?;
    render::print_structure_info(&crystal, args.coords);

    println!();
    if is_orthogonal(&crystal.lattice) {
        output::print_info("Lattice is orthogonal");
    } else {
        output::print_info(&format!(
            "Lattice is not orthogonal (largest |a_i·a_j| = {:.4} Å²)",
            max_off_diagonal_dot(&crystal.lattice)
        ));
    }

    if let Some(ref path) = args.view {
        let options = ViewerOptions {
            spin: args.spin,
            ..Default::default()
        };
        render::save_viewer_html(&crystal, &options, path)?;
        output::print_export("3D viewer", &path.display().to_string());
    }

    Ok(())
}
