use floorplan_core::entity::Entity;
use floorplan_core::floor::FloorStructure;
use floorplan_core::geometry::Bounds2D;
use tracing::info;

use crate::assemble::assemble;
use crate::bounds::{default_bounds, resolve_bounds};
use crate::detect::{DetectionParams, HeuristicRoomDetector, RoomDetectionStrategy, detect_rooms};
use crate::errors::EngineError;
use crate::extract::{LayerRules, extract};

/// 分析流程所需的全部参数。
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub layers: LayerRules,
    pub detection: DetectionParams,
    pub default_bounds: Bounds2D,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            layers: LayerRules::default(),
            detection: DetectionParams::default(),
            default_bounds: default_bounds(),
        }
    }
}

impl AnalyzerSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.detection.validate()?;
        if self.default_bounds.is_degenerate() {
            return Err(EngineError::InvalidParameter {
                name: "default_bounds",
                value: self.default_bounds.area(),
            });
        }
        for (name, value) in [
            ("default_door_width", self.layers.default_door_width),
            ("default_wall_thickness", self.layers.default_wall_thickness),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// 实体列表 → 楼层结构的完整流程：提取、范围、检测、分类、装配。
pub struct FloorAnalyzer {
    settings: AnalyzerSettings,
    strategy: Box<dyn RoomDetectionStrategy>,
}

impl FloorAnalyzer {
    pub fn new(settings: AnalyzerSettings) -> Result<Self, EngineError> {
        let strategy = HeuristicRoomDetector::from_params(&settings.detection);
        Self::with_strategy(settings, strategy)
    }

    /// 使用自定义检测策略（例如基于平面图面提取的实现）。
    pub fn with_strategy<S>(settings: AnalyzerSettings, strategy: S) -> Result<Self, EngineError>
    where
        S: RoomDetectionStrategy + 'static,
    {
        settings.validate()?;
        Ok(Self {
            settings,
            strategy: Box::new(strategy),
        })
    }

    #[inline]
    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    pub fn analyze(&self, entities: &[Entity]) -> FloorStructure {
        let extraction = extract(entities, &self.settings.layers);
        let bounds = resolve_bounds(entities, self.settings.default_bounds);
        let candidates = detect_rooms(self.strategy.as_ref(), &extraction.walls, &bounds);
        let floor = assemble(&candidates, extraction, bounds);
        info!(
            entities = entities.len(),
            rooms = floor.rooms.len(),
            walls = floor.walls.len(),
            doors = floor.doors.len(),
            windows = floor.windows.len(),
            strategy = self.strategy.name(),
            "楼层结构分析完成"
        );
        floor
    }
}

impl Default for FloorAnalyzer {
    fn default() -> Self {
        Self {
            settings: AnalyzerSettings::default(),
            strategy: Box::new(HeuristicRoomDetector::default()),
        }
    }
}
