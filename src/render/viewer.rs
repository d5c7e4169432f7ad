//! # 3D 结构查看器
//!
//! 生成独立的 HTML 页面：内嵌 P1 CIF 文本，由 3Dmol.js 渲染
//! 球棍模型（Jmol 配色）和晶胞边框，可选自动旋转。
//!
//! ## 依赖关系
//! - 被 `commands/info.rs`、`commands/orthogonalize.rs` 使用
//! - 使用 `parsers/cif.rs` 生成 CIF，`serde_json` 转义字符串
//! - 使用 `utils/files.rs` 写文件

use crate::error::Result;
use crate::models::Crystal;
use crate::parsers::to_cif_string;
use crate::utils::files;

use std::path::Path;

const THREEDMOL_URL: &str = "https://3Dmol.org/build/3Dmol-min.js";

/// 查看器选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerOptions {
    pub spin: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        ViewerOptions {
            spin: false,
            width: 500,
            height: 400,
        }
    }
}

/// 生成 HTML 页面
pub fn to_viewer_html(crystal: &Crystal, options: &ViewerOptions) -> Result<String> {
    let cif = to_cif_string(crystal);
    // JSON 字符串即合法的 JS 字符串字面量；再拆开 "</" 以免提前结束 <script>
    let cif_literal = serde_json::to_string(&cif)?.replace("</", "<\\/");
    let title = html_escape(&crystal.name);

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{url}"></script>
</head>
<body>
<h3>{title} ({formula})</h3>
<div id="viewer" style="width: {width}px; height: {height}px; position: relative;"></div>
<script>
  const cif = {cif_literal};
  const viewer = $3Dmol.createViewer(document.getElementById("viewer"), {{backgroundColor: "white"}});
  viewer.addModel(cif, "cif");
  viewer.setStyle({{}}, {{sphere: {{colorscheme: "Jmol", scale: 0.3}}, stick: {{colorscheme: "Jmol", radius: 0.2}}}});
  viewer.addUnitCell();
  viewer.zoomTo();
  viewer.spin({spin});
  viewer.render();
</script>
</body>
</html>
"#,
        title = title,
        url = THREEDMOL_URL,
        formula = html_escape(&crystal.formula()),
        width = options.width,
        height = options.height,
        cif_literal = cif_literal,
        spin = options.spin,
    ))
}

/// 写入 HTML 文件
pub fn save_viewer_html(crystal: &Crystal, options: &ViewerOptions, path: &Path) -> Result<()> {
    files::write_text(path, &to_viewer_html(crystal, options)?)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
