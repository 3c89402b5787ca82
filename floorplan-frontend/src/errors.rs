use std::path::PathBuf;

use floorplan_engine::errors::EngineError;
use floorplan_io::IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("颜色 `{value}`（{key}）无法解析，应为 #rrggbb 或 #rrggbbaa")]
    InvalidColor { key: String, value: String },
    #[error("未知的样式键 `{0}`")]
    UnknownStyleKey(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("写出 SVG {path:?} 失败: {source}")]
    WriteSvg {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
