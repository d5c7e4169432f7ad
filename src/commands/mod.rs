//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `ortho/`, `render/`, `rttddft/`, `utils/`
//! - 子模块: info, orthogonalize, rttddft

pub mod info;
pub mod orthogonalize;
pub mod rttddft;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Info(args) => info::execute(args),
        Commands::Orthogonalize(args) => orthogonalize::execute(args),
        Commands::Rttddft(args) => rttddft::execute(args),
    }
}
