pub mod analyzer;
pub mod assemble;
pub mod bounds;
pub mod classify;
pub mod detect;
pub mod extract;
pub mod projection;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("invalid analysis parameter `{name}`: {value}")]
        InvalidParameter { name: &'static str, value: f64 },
        #[error("room with id {0} not found")]
        RoomNotFound(String),
    }
}

pub mod scene {
    use floorplan_core::entity::Entity;
    use floorplan_core::floor::{FloorStructure, Room, RoomSummary};
    use floorplan_core::geometry::Point2;
    use tracing::debug;

    use crate::analyzer::FloorAnalyzer;
    use crate::errors::EngineError;
    use crate::projection::{Projection, ViewSettings};

    /// 渲染侧的运行时状态：当前实体、分析结果、视图参数、投影与悬停房间。
    ///
    /// 每次加载都会整体替换旧状态，不保留上一次的悬停结果。
    #[derive(Debug)]
    pub struct PlanScene {
        entities: Vec<Entity>,
        floor: Option<FloorStructure>,
        hovered: Option<String>,
        view: ViewSettings,
        projection: Option<Projection>,
    }

    impl PlanScene {
        pub fn new() -> Self {
            Self {
                entities: Vec::new(),
                floor: None,
                hovered: None,
                view: ViewSettings::default(),
                projection: None,
            }
        }

        /// 以给定视图参数创建场景；画布尺寸或放大上限非法时返回错误。
        pub fn with_view(view: ViewSettings) -> Result<Self, EngineError> {
            view.validate()?;
            Ok(Self {
                view,
                ..Self::new()
            })
        }

        /// 替换实体集合，重新分析并重置悬停状态。
        pub fn load_entities(&mut self, analyzer: &FloorAnalyzer, entities: Vec<Entity>) {
            let floor = analyzer.analyze(&entities);
            self.entities = entities;
            self.floor = Some(floor);
            self.hovered = None;
            self.refit();
            debug!(
                entities = self.entities.len(),
                rooms = self.floor.as_ref().map_or(0, |floor| floor.rooms.len()),
                "场景已重新加载"
            );
        }

        /// 清空场景（实体、分析结果、悬停状态）。
        pub fn clear(&mut self) {
            self.entities.clear();
            self.floor = None;
            self.hovered = None;
            self.projection = None;
        }

        /// 画布尺寸变化后重新适配投影。尺寸非法时保持原状态不变。
        pub fn resize(&mut self, width: f64, height: f64) -> Result<(), EngineError> {
            let view = ViewSettings {
                canvas_width: width,
                canvas_height: height,
                ..self.view
            };
            view.validate()?;
            self.view = view;
            self.refit();
            Ok(())
        }

        fn refit(&mut self) {
            self.projection = self.floor.as_ref().map(|floor| self.view.fit(&floor.bounds));
        }

        /// 根据指针像素坐标更新悬停房间，返回其摘要。
        pub fn hover_at(&mut self, pixel: Point2) -> Option<RoomSummary> {
            let summary = match (&self.floor, &self.projection) {
                (Some(floor), Some(projection)) => projection
                    .room_under_cursor(floor, pixel)
                    .map(Room::summary),
                _ => None,
            };
            self.hovered = summary.as_ref().map(|summary| summary.id.clone());
            summary
        }

        /// 直接指定悬停房间。若房间不存在则返回错误。
        pub fn set_hovered_room(&mut self, id: &str) -> Result<(), EngineError> {
            let exists = self
                .floor
                .as_ref()
                .is_some_and(|floor| floor.room(id).is_some());
            if !exists {
                return Err(EngineError::RoomNotFound(id.to_string()));
            }
            self.hovered = Some(id.to_string());
            Ok(())
        }

        pub fn hovered_room(&self) -> Option<&Room> {
            let id = self.hovered.as_deref()?;
            self.floor.as_ref()?.room(id)
        }

        #[inline]
        pub fn floor(&self) -> Option<&FloorStructure> {
            self.floor.as_ref()
        }

        #[inline]
        pub fn entities(&self) -> &[Entity] {
            &self.entities
        }

        #[inline]
        pub fn projection(&self) -> Option<Projection> {
            self.projection
        }

        #[inline]
        pub fn view(&self) -> ViewSettings {
            self.view
        }

        #[inline]
        pub fn canvas_size(&self) -> (f64, f64) {
            (self.view.canvas_width, self.view.canvas_height)
        }
    }

    impl Default for PlanScene {
        fn default() -> Self {
            Self::new()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn two_room_plan() -> Vec<Entity> {
            let corners = [
                Point2::new(0.0, 0.0),
                Point2::new(300.0, 0.0),
                Point2::new(300.0, 200.0),
                Point2::new(0.0, 200.0),
            ];
            let mut entities: Vec<Entity> = (0..4)
                .map(|i| Entity::line(corners[i], corners[(i + 1) % 4], "WALLS"))
                .collect();
            entities.push(Entity::line(
                Point2::new(150.0, 0.0),
                Point2::new(150.0, 200.0),
                "WALLS",
            ));
            entities
        }

        #[test]
        fn load_replaces_state_and_fits_projection() {
            let analyzer = FloorAnalyzer::default();
            let mut scene = PlanScene::new();
            assert!(scene.floor().is_none());
            assert!(scene.projection().is_none());

            scene.load_entities(&analyzer, two_room_plan());
            assert_eq!(scene.entities().len(), 5);
            let projection = scene.projection().expect("projection after load");
            assert!((projection.scale - 8.0 / 3.0).abs() < 1e-9);

            scene.set_hovered_room("room-0").expect("hover first room");
            scene.load_entities(&analyzer, Vec::new());
            assert!(scene.hovered_room().is_none());
            assert_eq!(scene.entities().len(), 0);
            assert_eq!(scene.floor().map(|floor| floor.rooms.len()), Some(1));
        }

        #[test]
        fn hover_tracks_room_under_cursor() {
            let analyzer = FloorAnalyzer::default();
            let mut scene = PlanScene::with_view(ViewSettings {
                canvas_width: 300.0,
                canvas_height: 200.0,
                ..ViewSettings::default()
            })
            .expect("valid view");
            scene.load_entities(&analyzer, two_room_plan());

            let summary = scene
                .hover_at(Point2::new(10.0, 10.0))
                .expect("corner cell is a room");
            assert_eq!(summary.id, "room-0");
            assert_eq!(scene.hovered_room().map(|room| room.id.as_str()), Some("room-0"));

            assert!(scene.hover_at(Point2::new(-50.0, -50.0)).is_none());
            assert!(scene.hovered_room().is_none());
        }

        #[test]
        fn zero_max_scale_is_rejected() {
            let view = ViewSettings {
                max_scale: 0.0,
                ..ViewSettings::default()
            };
            assert!(matches!(
                PlanScene::with_view(view),
                Err(EngineError::InvalidParameter { name: "max_scale", .. })
            ));
        }

        #[test]
        fn resize_refits_and_clear_resets() {
            let analyzer = FloorAnalyzer::default();
            let mut scene = PlanScene::new();
            scene.load_entities(&analyzer, two_room_plan());

            scene.resize(300.0, 200.0).expect("resize");
            let projection = scene.projection().expect("projection");
            assert!((projection.scale - 1.0).abs() < 1e-9);
            assert_eq!(scene.canvas_size(), (300.0, 200.0));

            assert!(matches!(
                scene.resize(0.0, 200.0),
                Err(EngineError::InvalidParameter { name: "canvas_width", .. })
            ));
            assert_eq!(scene.canvas_size(), (300.0, 200.0));
            assert_eq!(scene.projection(), Some(projection));

            let err = scene.set_hovered_room("room-99").unwrap_err();
            assert!(matches!(err, EngineError::RoomNotFound(_)));

            scene.clear();
            assert!(scene.floor().is_none());
            assert!(scene.projection().is_none());
            assert!(scene.hover_at(Point2::new(10.0, 10.0)).is_none());
        }
    }
}
