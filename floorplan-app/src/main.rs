use std::path::PathBuf;

use floorplan_config::{AppConfig, ConfigError};
use floorplan_frontend::cli::CliOptions;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const USAGE: &str = "用法：floorplan [--config PATH] [--input PATH] [--svg PATH] [--json PATH] [--width N --height N]";

fn main() {
    let mut args = std::env::args().skip(1);
    let mut config_override: Option<PathBuf> = None;
    let mut options = CliOptions::default();
    let mut width: Option<f64> = None;
    let mut height: Option<f64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_override = Some(PathBuf::from(required_value(&mut args, "--config"))),
            "--input" => options.input = Some(PathBuf::from(required_value(&mut args, "--input"))),
            "--svg" => options.svg_output = Some(PathBuf::from(required_value(&mut args, "--svg"))),
            "--json" => options.json_output = Some(PathBuf::from(required_value(&mut args, "--json"))),
            "--width" => width = Some(numeric_value(&mut args, "--width")),
            "--height" => height = Some(numeric_value(&mut args, "--height")),
            "--help" | "-h" => {
                println!("{USAGE}");
                return;
            }
            other => {
                eprintln!("未知参数：{other}");
                eprintln!("{USAGE}");
                std::process::exit(1);
            }
        }
    }

    // 日志级别来自配置，配置回退的告警只能在订阅器就绪后补记。
    let (config, fallback) = load_configuration(config_override);
    init_logging(&config);
    if let Some(err) = fallback {
        report_fallback(&err);
    }
    info!("启动楼层结构分析工具");

    if width.is_some() || height.is_some() {
        options.canvas_size = Some((
            width.unwrap_or(config.render.canvas_width),
            height.unwrap_or(config.render.canvas_height),
        ));
    }

    if let Err(err) = floorplan_frontend::run_cli(&config, &options) {
        error!(error = %err, "楼层结构分析失败");
        std::process::exit(1);
    }
}

fn required_value(args: &mut impl Iterator<Item = String>, flag: &str) -> String {
    match args.next() {
        Some(value) => value,
        None => {
            eprintln!("`{flag}` 需要提供参数值");
            std::process::exit(1);
        }
    }
}

fn numeric_value(args: &mut impl Iterator<Item = String>, flag: &str) -> f64 {
    let raw = required_value(args, flag);
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => {
            eprintln!("`{flag}` 需要正数，收到：{raw}");
            std::process::exit(1);
        }
    }
}

/// 加载失败时回退到默认配置，并把失败原因交回调用方延后记录。
fn load_configuration(override_path: Option<PathBuf>) -> (AppConfig, Option<ConfigError>) {
    let loaded = match override_path {
        Some(path) => AppConfig::from_file(&path),
        None => AppConfig::discover(),
    };
    match loaded {
        Ok(cfg) => (cfg, None),
        Err(err) => (AppConfig::default(), Some(err)),
    }
}

fn report_fallback(err: &ConfigError) {
    match err {
        ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
            warn!(path = %path.display(), error = %err, "加载配置失败，使用内建默认值");
        }
        ConfigError::Context { .. } => {
            warn!(error = %err, "加载配置失败，使用内建默认值");
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
