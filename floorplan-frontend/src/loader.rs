use std::path::{Path, PathBuf};

use floorplan_config::AppConfig;
use floorplan_core::entity::{Dimension, Entity, Spline};
use floorplan_core::geometry::{Bounds2D, Point2};
use floorplan_engine::analyzer::{AnalyzerSettings, FloorAnalyzer};
use floorplan_engine::detect::DetectionParams;
use floorplan_engine::extract::LayerRules;
use floorplan_engine::projection::ViewSettings;
use floorplan_engine::scene::PlanScene;
use floorplan_io::{EntitySource, JsonEntityFacade};
use tracing::info;

use crate::errors::FrontendError;

/// 实体来源，便于前端呈现加载信息。
#[derive(Debug, Clone, PartialEq)]
pub enum PlanSource {
    Payload(PathBuf),
    Demo,
}

/// 加载后的场景、分析器与来源。
pub struct LoadedPlan {
    pub scene: PlanScene,
    pub analyzer: FloorAnalyzer,
    pub source: PlanSource,
}

/// 由配置生成分析参数。
pub fn analyzer_settings(config: &AppConfig) -> AnalyzerSettings {
    let detection = &config.detection;
    let layers = &config.layers;
    AnalyzerSettings {
        layers: LayerRules {
            wall_layers: layers.wall_layers.clone(),
            door_layers: layers.door_layers.clone(),
            window_layers: layers.window_layers.clone(),
            default_layers: layers.default_layers.clone(),
            default_door_width: detection.default_door_width,
            default_wall_thickness: detection.default_wall_thickness,
        },
        detection: DetectionParams {
            grid_cell_size: detection.grid_cell_size,
            wall_tolerance: detection.wall_tolerance,
            triangle_angle_tolerance: detection.triangle_angle_tolerance,
        },
        default_bounds: Bounds2D::from_extents(
            0.0,
            0.0,
            detection.default_bounds_width,
            detection.default_bounds_height,
        ),
    }
}

/// 由 `[render]` 配置生成视图参数（画布尺寸与放大上限）。
pub fn view_settings(config: &AppConfig) -> ViewSettings {
    ViewSettings {
        canvas_width: config.render.canvas_width,
        canvas_height: config.render.canvas_height,
        max_scale: config.render.max_scale,
    }
}

/// 读取实体载荷（或内置示例）并完成分析。
pub fn load_plan(config: &AppConfig, input: Option<&Path>) -> Result<LoadedPlan, FrontendError> {
    let analyzer = FloorAnalyzer::new(analyzer_settings(config))?;
    let mut scene = PlanScene::with_view(view_settings(config))?;

    let (entities, source) = match input {
        Some(path) => {
            let entities = JsonEntityFacade::new().load(path)?;
            info!(path = %path.display(), entities = entities.len(), "从实体载荷加载成功");
            (entities, PlanSource::Payload(path.to_path_buf()))
        }
        None => {
            info!("未指定输入，使用内置示例平面");
            (demo_entities(), PlanSource::Demo)
        }
    };
    scene.load_entities(&analyzer, entities);

    Ok(LoadedPlan {
        scene,
        analyzer,
        source,
    })
}

/// 内置示例：400×250 的两室户型，含隔墙、门、窗、家具、文字与标注。
pub fn demo_entities() -> Vec<Entity> {
    let p = Point2::new;
    let mut entities = vec![
        Entity::polyline(
            [p(0.0, 0.0), p(400.0, 0.0), p(400.0, 250.0), p(0.0, 250.0)],
            true,
            "WALLS",
        ),
        Entity::line(p(220.0, 0.0), p(220.0, 250.0), "WALLS"),
        Entity::line(p(0.0, 150.0), p(220.0, 150.0), "WALLS"),
        Entity::block_reference("DOOR", p(220.0, 60.0), "DOORS"),
        Entity::block_reference("DOOR", p(100.0, 150.0), "DOORS"),
        Entity::line(p(280.0, 250.0), p(360.0, 250.0), "WINDOWS"),
        Entity::line(p(40.0, 0.0), p(100.0, 0.0), "WINDOWS"),
        Entity::circle(p(310.0, 120.0), 20.0, "FURNITURE"),
        Entity::text(p(250.0, 200.0), "Living", 10.0, "TEXT"),
        Entity::text(p(60.0, 200.0), "Bedroom", 10.0, "TEXT"),
    ];
    entities.push(Entity::Dimension(Dimension {
        start: p(0.0, -20.0),
        end: p(400.0, -20.0),
        text_midpoint: None,
        text: None,
        layer: "DIMENSIONS".to_string(),
    }));
    entities.push(Entity::Spline(Spline {
        control_points: vec![p(240.0, 20.0), p(270.0, 50.0), p(300.0, 20.0), p(330.0, 50.0)],
        is_closed: false,
        layer: "FURNITURE".to_string(),
    }));
    entities
}
