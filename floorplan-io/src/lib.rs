use std::fs;
use std::path::{Path, PathBuf};

use floorplan_core::entity::{
    Arc, BlockReference, Circle, Dimension, Ellipse, Entity, Line, Polyline, Spline, Text,
    UnknownEntity,
};
use floorplan_core::floor::FloorStructure;
use floorplan_core::geometry::{Point2, Vector2};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// DWG 文件头以 `AC10xx` / `AC1xxx` 版本号开头。
const DWG_MAGIC: &[u8] = b"AC1";
const DEFAULT_LAYER: &str = "0";

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse entity payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid entity payload: {0}")]
    InvalidDocument(String),
}

/// 上游 CAD 实体提供方的抽象：给定文件，产出规范化实体列表。
pub trait EntitySource {
    fn load(&self, path: &Path) -> Result<Vec<Entity>, IoError>;
}

/// 读取 `{ "entities": [...] }` 形式的 JSON 载荷。
///
/// 单个实体缺少必要几何字段时跳过并记录警告，不会让整份载荷失败。
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonEntityFacade;

impl JsonEntityFacade {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_str(&self, source: &str) -> Result<Vec<Entity>, IoError> {
        let payload: RawPayload = serde_json::from_str(source)?;
        let total = payload.entities.len();
        let entities: Vec<Entity> = payload
            .entities
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| convert_entry(index, value))
            .collect();
        debug!(total, loaded = entities.len(), "实体载荷解析完成");
        Ok(entities)
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<Entity>, IoError> {
        if bytes.starts_with(DWG_MAGIC) {
            return Err(IoError::UnsupportedFormat(
                "二进制 DWG 需先由外部解析器转换为实体载荷".to_string(),
            ));
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|err| IoError::InvalidDocument(format!("载荷不是合法的 UTF-8: {err}")))?;
        self.parse_str(text)
    }
}

impl EntitySource for JsonEntityFacade {
    fn load(&self, path: &Path) -> Result<Vec<Entity>, IoError> {
        let data = fs::read(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_bytes(&data)
    }
}

/// 将楼层结构写出为 JSON，供下游（如三维构建）读取房间范围与墙体。
pub fn save_floor_structure(floor: &FloorStructure, path: &Path) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(floor)?;
    fs::write(path, json).map_err(|source| IoError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// 单个条目先按通用 JSON 值读取，字段类型不符时只跳过该条目。
fn convert_entry(index: usize, value: Value) -> Option<Entity> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("?")
        .to_string();
    let raw = match serde_json::from_value::<RawEntity>(value) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(index, kind = %kind, error = %err, "实体字段类型无效，已跳过");
            return None;
        }
    };
    let converted = raw.into_entity();
    if converted.is_none() {
        warn!(index, kind = %kind, "实体缺少必要的几何字段，已跳过");
    }
    converted
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    entities: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Object { x: f64, y: f64 },
    Pair([f64; 2]),
}

impl From<RawPoint> for Point2 {
    fn from(point: RawPoint) -> Self {
        match point {
            RawPoint::Object { x, y } => Point2::new(x, y),
            RawPoint::Pair([x, y]) => Point2::new(x, y),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    layer: Option<String>,
    #[serde(default)]
    vertices: Vec<RawPoint>,
    center: Option<RawPoint>,
    radius: Option<f64>,
    position: Option<RawPoint>,
    #[serde(default)]
    control_points: Vec<RawPoint>,
    text: Option<String>,
    start_angle: Option<f64>,
    end_angle: Option<f64>,
    dimension_text: Option<String>,
    major_axis: Option<RawPoint>,
    axis_ratio: Option<f64>,
    #[serde(default)]
    closed: bool,
    width: Option<f64>,
    thickness: Option<f64>,
    rotation: Option<f64>,
    height: Option<f64>,
    name: Option<String>,
}

impl RawEntity {
    fn points(&self) -> Vec<Point2> {
        self.vertices.iter().copied().map(Point2::from).collect()
    }

    fn into_entity(self) -> Option<Entity> {
        let layer = self
            .layer
            .clone()
            .unwrap_or_else(|| DEFAULT_LAYER.to_string());
        let vertices = self.points();
        let entity = match self.kind.to_ascii_uppercase().as_str() {
            "LINE" => {
                let [start, end] = first_two(&vertices)?;
                Entity::Line(Line {
                    start,
                    end,
                    width: self.width,
                    thickness: self.thickness,
                    layer,
                })
            }
            "POLYLINE" | "LWPOLYLINE" => {
                if vertices.is_empty() {
                    return None;
                }
                Entity::Polyline(Polyline {
                    vertices,
                    is_closed: self.closed,
                    thickness: self.thickness,
                    layer,
                })
            }
            "CIRCLE" => Entity::Circle(Circle {
                center: self.center?.into(),
                radius: self.radius?,
                layer,
            }),
            "ARC" => Entity::Arc(Arc {
                center: self.center?.into(),
                radius: self.radius?,
                start_angle: self.start_angle.unwrap_or(0.0),
                end_angle: self.end_angle.unwrap_or(std::f64::consts::TAU),
                layer,
            }),
            "INSERT" => Entity::BlockReference(BlockReference {
                name: self.name.unwrap_or_default(),
                insert: self.position?.into(),
                rotation: self.rotation.unwrap_or(0.0),
                width: self.width,
                layer,
            }),
            "TEXT" | "MTEXT" => Entity::Text(Text {
                insert: self.position?.into(),
                content: self.text?,
                height: self.height.unwrap_or(0.0),
                rotation: self.rotation.unwrap_or(0.0),
                layer,
            }),
            "DIMENSION" => {
                let [start, end] = first_two(&vertices)?;
                Entity::Dimension(Dimension {
                    start,
                    end,
                    text_midpoint: self.position.map(Point2::from),
                    text: self.dimension_text.or(self.text),
                    layer,
                })
            }
            "ELLIPSE" => {
                let axis = Point2::from(self.major_axis?);
                Entity::Ellipse(Ellipse {
                    center: self.center?.into(),
                    major_axis: Vector2::new(axis.x(), axis.y()),
                    ratio: self.axis_ratio.unwrap_or(1.0),
                    start_parameter: self.start_angle.unwrap_or(0.0),
                    end_parameter: self.end_angle.unwrap_or(std::f64::consts::TAU),
                    layer,
                })
            }
            "SPLINE" => {
                if self.control_points.is_empty() {
                    return None;
                }
                Entity::Spline(Spline {
                    control_points: self.control_points.iter().copied().map(Point2::from).collect(),
                    is_closed: self.closed,
                    layer,
                })
            }
            _ => {
                if vertices.is_empty() {
                    return None;
                }
                Entity::Unknown(UnknownEntity {
                    kind: self.kind,
                    vertices,
                    layer,
                })
            }
        };
        Some(entity)
    }
}

fn first_two(points: &[Point2]) -> Option<[Point2; 2]> {
    match points {
        [start, end, ..] => Some([*start, *end]),
        _ => None,
    }
}
