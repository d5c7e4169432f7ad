//! # orthogonalize 命令实现
//!
//! ## 功能
//! - 读取 CIF 并展示输入结构
//! - 已正交则直接结束；否则搜索正交超胞
//! - 打印变换矩阵与应变，展示新结构
//! - 按需导出 CIF、3D 查看器（输入与结果）、坐标 CSV、JSON 报告
//!
//! ## 依赖关系
//! - 使用 `cli/orthogonalize.rs` 定义的参数
//! - 使用 `parsers/`, `ortho/`, `render/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/files.rs`

use crate::cli::orthogonalize::OrthogonalizeArgs;
use crate::error::{Result, RiperError};
use crate::models::Crystal;
use crate::ortho::{LatticeSearch, OrthoOutcome, OrthoRequest, Transformation};
use crate::parsers::{self, to_cif_string};
use crate::render::{self, OrthoReport, ViewerOptions};
use crate::utils::{files, output, progress};

use tabled::{Table, Tabled};

/// 执行 orthogonalize 命令
pub fn execute(args: OrthogonalizeArgs) -> Result<()> {
    if !(args.strain_tolerance.is_finite() && args.strain_tolerance >= 0.0) {
        return Err(RiperError::InvalidArgument(format!(
            "strain tolerance must be a non-negative number, got {}",
            args.strain_tolerance
        )));
    }

    // 先检查所有输出路径，避免计算完成后才失败
    for path in [
        &args.output,
        &args.view,
        &args.view_input,
        &args.coords_csv,
        &args.json,
    ]
    .into_iter()
        .flatten()
    {
        files::check_output_path(path, args.overwrite)?;
    }

    let (text, name) = parsers::read_structure_text(&args.input)?;
    let request = OrthoRequest::parse(&text, &name)?;
    render::print_structure_info(request.crystal(), args.coords);

    if let Some(ref path) = args.view_input {
        render::save_viewer_html(request.crystal(), &viewer_options(&args), path)?;
        output::print_export("3D viewer (input)", &path.display().to_string());
    }

    let search = LatticeSearch::new().with_strain_tolerance(args.strain_tolerance);
    let spinner = progress::create_spinner(&format!(
        "Searching for an orthogonal supercell (max {} repetitions)...",
        args.max_repetitions
    ));
    let outcome = request.orthogonalize(&search, args.max_repetitions);
    spinner.finish_and_clear();
    let outcome = outcome?;

    println!();
    let result = match &outcome {
        OrthoOutcome::AlreadyOrthogonal => {
            output::print_success("The lattice is already orthogonal, no transformation needed");
            Some(request.crystal())
        }
        OrthoOutcome::NotFound { max_repetitions } => {
            output::print_warning(&format!(
                "No orthogonal supercell found within {} repetitions (strain tolerance {}). \
                 Try a larger --max-repetitions.",
                max_repetitions, args.strain_tolerance
            ));
            None
        }
        OrthoOutcome::Transformed(t) => {
            print_transformation(t);
            render::print_structure_info(&t.structure, args.coords);
            Some(&t.structure)
        }
    };

    if let Some(crystal) = result {
        export_structure(crystal, &args)?;
    }

    if let Some(ref path) = args.json {
        OrthoReport::new(request.crystal(), &outcome, args.max_repetitions).save(path)?;
        output::print_export("JSON report", &path.display().to_string());
    }

    output::print_done(&format!("Finished '{}'", request.crystal().name));
    Ok(())
}

/// 打印变换矩阵与应变张量
fn print_transformation(t: &Transformation) {
    #[derive(Tabled)]
    struct MatrixRow {
        #[tabled(rename = "")]
        name: &'static str,
        #[tabled(rename = "P (a)")]
        pa: String,
        #[tabled(rename = "P (b)")]
        pb: String,
        #[tabled(rename = "P (c)")]
        pc: String,
        #[tabled(rename = "ε (x)")]
        ex: String,
        #[tabled(rename = "ε (y)")]
        ey: String,
        #[tabled(rename = "ε (z)")]
        ez: String,
    }

    output::print_header("Orthogonal Supercell Found");

    let rows: Vec<MatrixRow> = ["a'", "b'", "c'"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| MatrixRow {
            name,
            pa: t.matrix[i][0].to_string(),
            pb: t.matrix[i][1].to_string(),
            pc: t.matrix[i][2].to_string(),
            ex: format!("{:.3e}", t.strain[i][0]),
            ey: format!("{:.3e}", t.strain[i][1]),
            ez: format!("{:.3e}", t.strain[i][2]),
        })
        .collect();
    println!("{}", Table::new(&rows));

    output::print_info(&format!(
        "Supercell multiplier |det P| = {} ({} atoms)",
        t.multiplier,
        t.structure.num_atoms()
    ));
    output::print_info(&format!(
        "Max strain component {:.3e}, strain norm {:.3e}",
        t.max_strain(),
        t.strain_norm()
    ));
    output::print_info(&format!(
        "Max angle between new lattice vectors and axes: {:.4}°",
        t.max_angle_deviation
    ));
    output::print_separator();
}

fn viewer_options(args: &OrthogonalizeArgs) -> ViewerOptions {
    ViewerOptions {
        spin: args.spin,
        ..Default::default()
    }
}

/// 导出结构相关文件
fn export_structure(crystal: &Crystal, args: &OrthogonalizeArgs) -> Result<()> {
    if let Some(ref path) = args.output {
        files::write_text(path, &to_cif_string(crystal))?;
        output::print_export("CIF", &path.display().to_string());
    }

    if let Some(ref path) = args.view {
        render::save_viewer_html(crystal, &viewer_options(args), path)?;
        output::print_export("3D viewer", &path.display().to_string());
    }

    if let Some(ref path) = args.coords_csv {
        render::save_coordinates_csv(crystal, args.coords, path)?;
        output::print_export("Coordinates CSV", &path.display().to_string());
    }

    Ok(())
}
