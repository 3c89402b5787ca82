pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod errors;
pub mod loader;
pub mod render;
pub mod style;
pub mod svg;

#[cfg(feature = "cli")]
use floorplan_config::AppConfig;
#[cfg(feature = "cli")]
use tracing::info;

#[cfg(feature = "cli")]
use errors::FrontendError;

/// 运行命令行前端：加载、分析、打印报告并按需导出。
#[cfg(feature = "cli")]
pub fn run_cli(config: &AppConfig, options: &cli::CliOptions) -> Result<(), FrontendError> {
    info!(
        input = ?options.input,
        svg = ?options.svg_output,
        json = ?options.json_output,
        "启动 CLI 前端"
    );
    cli::run(config, options)
}
