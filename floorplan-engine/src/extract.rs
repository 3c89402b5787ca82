use floorplan_core::entity::Entity;
use floorplan_core::floor::{Door, Wall, Window};
use floorplan_core::geometry::{Point2, Vector2};
use tracing::debug;

pub const DEFAULT_DOOR_WIDTH: f64 = 30.0;
pub const DEFAULT_WALL_THICKNESS: f64 = 10.0;

/// 图层在提取阶段的语义角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    Wall,
    Door,
    Window,
    /// 默认图层（`0` 或未命名），其上的线段按墙体处理。
    Default,
    Other,
}

/// 图层名到语义角色的映射规则，名称比较不区分大小写。
#[derive(Debug, Clone)]
pub struct LayerRules {
    pub wall_layers: Vec<String>,
    pub door_layers: Vec<String>,
    pub window_layers: Vec<String>,
    pub default_layers: Vec<String>,
    pub default_door_width: f64,
    pub default_wall_thickness: f64,
}

impl Default for LayerRules {
    fn default() -> Self {
        Self {
            wall_layers: vec!["WALLS".to_string(), "WALL".to_string()],
            door_layers: vec!["DOORS".to_string(), "DOOR".to_string()],
            // `WINDOW` 为旧版图纸使用的别名。
            window_layers: vec!["WINDOWS".to_string(), "WINDOW".to_string()],
            default_layers: vec!["0".to_string(), String::new()],
            default_door_width: DEFAULT_DOOR_WIDTH,
            default_wall_thickness: DEFAULT_WALL_THICKNESS,
        }
    }
}

impl LayerRules {
    pub fn role(&self, layer: &str) -> LayerRole {
        let layer = layer.trim();
        let matches = |names: &[String]| names.iter().any(|name| name.eq_ignore_ascii_case(layer));
        if matches(&self.wall_layers) {
            LayerRole::Wall
        } else if matches(&self.door_layers) {
            LayerRole::Door
        } else if matches(&self.window_layers) {
            LayerRole::Window
        } else if matches(&self.default_layers) {
            LayerRole::Default
        } else {
            LayerRole::Other
        }
    }
}

/// 提取结果：墙、门、窗三类几何图元。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub walls: Vec<Wall>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
}

/// 将实体列表筛选为墙、门、窗。纯函数，未知图层与类型静默忽略。
pub fn extract(entities: &[Entity], rules: &LayerRules) -> Extraction {
    let mut extraction = Extraction::default();
    for entity in entities {
        let role = rules.role(entity.layer_name());
        match entity {
            // 块参照无论位于哪个图层都视为门。
            Entity::BlockReference(reference) => {
                extraction.doors.push(Door::new(
                    reference.insert,
                    reference.width.unwrap_or(rules.default_door_width),
                    reference.rotation,
                ));
            }
            Entity::Line(line) => match role {
                LayerRole::Wall | LayerRole::Default => {
                    let thickness = line.thickness.unwrap_or(rules.default_wall_thickness);
                    extraction
                        .walls
                        .push(Wall::new(line.start, line.end, thickness));
                }
                LayerRole::Door => {
                    extraction.doors.push(Door::new(
                        line.midpoint(),
                        line.width.unwrap_or_else(|| line.length()),
                        line.direction(),
                    ));
                }
                LayerRole::Window => {
                    extraction.windows.push(Window::new(
                        line.midpoint(),
                        line.width.unwrap_or_else(|| line.length()),
                        line.direction(),
                    ));
                }
                LayerRole::Other => {}
            },
            Entity::Polyline(polyline) => match role {
                LayerRole::Wall | LayerRole::Default => {
                    let thickness = polyline.thickness.unwrap_or(rules.default_wall_thickness);
                    extraction.walls.extend(
                        polyline
                            .segments()
                            .map(|(start, end)| Wall::new(start, end, thickness)),
                    );
                }
                LayerRole::Door => {
                    if let Some(door) = door_from_vertices(&polyline.vertices) {
                        extraction.doors.push(door);
                    }
                }
                _ => {}
            },
            Entity::Arc(arc) if role == LayerRole::Door => {
                extraction
                    .doors
                    .push(Door::new(arc.center, arc.radius.abs(), arc.start_angle));
            }
            Entity::Unknown(unknown) => match role {
                LayerRole::Wall | LayerRole::Default => {
                    extraction.walls.extend(unknown.vertices.windows(2).map(|pair| {
                        Wall::new(pair[0], pair[1], rules.default_wall_thickness)
                    }));
                }
                LayerRole::Door => {
                    if let Some(door) = door_from_vertices(&unknown.vertices) {
                        extraction.doors.push(door);
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    debug!(
        entities = entities.len(),
        walls = extraction.walls.len(),
        doors = extraction.doors.len(),
        windows = extraction.windows.len(),
        "实体提取完成"
    );
    extraction
}

fn door_from_vertices(vertices: &[Point2]) -> Option<Door> {
    let [start, end, ..] = vertices else {
        return None;
    };
    let span = Vector2::from_points(*start, *end);
    Some(Door::new(start.midpoint(*end), span.length(), span.angle()))
}
