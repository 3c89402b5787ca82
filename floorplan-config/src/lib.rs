use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub layers: LayerConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `FLOORPLAN_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("FLOORPLAN_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 图层角色表。名称大小写不敏感；`window_layers` 默认包含历史别名 `WINDOW`。
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    #[serde(default = "LayerConfig::default_wall_layers")]
    pub wall_layers: Vec<String>,
    #[serde(default = "LayerConfig::default_door_layers")]
    pub door_layers: Vec<String>,
    #[serde(default = "LayerConfig::default_window_layers")]
    pub window_layers: Vec<String>,
    /// 无明确角色、但其中的线段按墙体处理的图层。
    #[serde(default = "LayerConfig::default_default_layers")]
    pub default_layers: Vec<String>,
}

impl LayerConfig {
    fn default_wall_layers() -> Vec<String> {
        vec!["WALLS".to_string(), "WALL".to_string()]
    }

    fn default_door_layers() -> Vec<String> {
        vec!["DOORS".to_string(), "DOOR".to_string()]
    }

    fn default_window_layers() -> Vec<String> {
        vec!["WINDOWS".to_string(), "WINDOW".to_string()]
    }

    fn default_default_layers() -> Vec<String> {
        vec!["0".to_string(), String::new()]
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            wall_layers: Self::default_wall_layers(),
            door_layers: Self::default_door_layers(),
            window_layers: Self::default_window_layers(),
            default_layers: Self::default_default_layers(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "DetectionConfig::default_grid_cell_size")]
    pub grid_cell_size: f64,
    #[serde(default = "DetectionConfig::default_wall_tolerance")]
    pub wall_tolerance: f64,
    /// 三角布局判定的角度容差（度）。
    #[serde(default = "DetectionConfig::default_triangle_angle_tolerance")]
    pub triangle_angle_tolerance: f64,
    #[serde(default = "DetectionConfig::default_door_width")]
    pub default_door_width: f64,
    #[serde(default = "DetectionConfig::default_wall_thickness")]
    pub default_wall_thickness: f64,
    #[serde(default = "DetectionConfig::default_bounds_width")]
    pub default_bounds_width: f64,
    #[serde(default = "DetectionConfig::default_bounds_height")]
    pub default_bounds_height: f64,
}

impl DetectionConfig {
    fn default_grid_cell_size() -> f64 {
        50.0
    }

    fn default_wall_tolerance() -> f64 {
        5.0
    }

    fn default_triangle_angle_tolerance() -> f64 {
        15.0
    }

    fn default_door_width() -> f64 {
        30.0
    }

    fn default_wall_thickness() -> f64 {
        10.0
    }

    fn default_bounds_width() -> f64 {
        300.0
    }

    fn default_bounds_height() -> f64 {
        200.0
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: Self::default_grid_cell_size(),
            wall_tolerance: Self::default_wall_tolerance(),
            triangle_angle_tolerance: Self::default_triangle_angle_tolerance(),
            default_door_width: Self::default_door_width(),
            default_wall_thickness: Self::default_wall_thickness(),
            default_bounds_width: Self::default_bounds_width(),
            default_bounds_height: Self::default_bounds_height(),
        }
    }
}

/// 渲染配置。颜色使用 `#rrggbb` 或 `#rrggbbaa` 字符串，覆盖表的键为图层类别或房间类型。
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_canvas_width")]
    pub canvas_width: f64,
    #[serde(default = "RenderConfig::default_canvas_height")]
    pub canvas_height: f64,
    #[serde(default = "RenderConfig::default_max_scale")]
    pub max_scale: f64,
    #[serde(default = "RenderConfig::default_highlight_color")]
    pub highlight_color: String,
    #[serde(default)]
    pub layer_colors: BTreeMap<String, String>,
    #[serde(default)]
    pub room_colors: BTreeMap<String, String>,
}

impl RenderConfig {
    fn default_canvas_width() -> f64 {
        800.0
    }

    fn default_canvas_height() -> f64 {
        600.0
    }

    fn default_max_scale() -> f64 {
        10.0
    }

    fn default_highlight_color() -> String {
        "#ff9800".to_string()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: Self::default_canvas_width(),
            canvas_height: Self::default_canvas_height(),
            max_scale: Self::default_max_scale(),
            highlight_color: Self::default_highlight_color(),
            layer_colors: BTreeMap::new(),
            room_colors: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}
