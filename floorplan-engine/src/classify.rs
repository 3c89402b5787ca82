use floorplan_core::floor::{Door, RoomType, Window};
use floorplan_core::geometry::Bounds2D;
use tracing::trace;

const BATHROOM_MAX_AREA: f64 = 500.0;
const BEDROOM_MAX_AREA: f64 = 1000.0;
const LIVING_MIN_AREA: f64 = 2000.0;
const LIVING_WINDOW_THRESHOLD: usize = 1;

/// 候选区域内的统计信息，门窗按位置点做闭区间包含判定。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionCensus {
    pub area: f64,
    pub doors: usize,
    pub windows: usize,
}

impl RegionCensus {
    pub fn survey(bounds: &Bounds2D, doors: &[Door], windows: &[Window]) -> Self {
        Self {
            area: bounds.area(),
            doors: doors
                .iter()
                .filter(|door| bounds.contains(door.position))
                .count(),
            windows: windows
                .iter()
                .filter(|window| bounds.contains(window.position))
                .count(),
        }
    }

    /// 按顺序匹配，首个命中的规则生效。
    pub fn classify(&self) -> RoomType {
        if self.area < BATHROOM_MAX_AREA {
            RoomType::Bathroom
        } else if self.area < BEDROOM_MAX_AREA {
            RoomType::Bedroom
        } else if self.windows > LIVING_WINDOW_THRESHOLD || self.area > LIVING_MIN_AREA {
            RoomType::Living
        } else {
            RoomType::Room
        }
    }
}

pub fn classify_region(bounds: &Bounds2D, doors: &[Door], windows: &[Window]) -> RoomType {
    let census = RegionCensus::survey(bounds, doors, windows);
    let room_type = census.classify();
    trace!(
        area = census.area,
        doors = census.doors,
        windows = census.windows,
        room_type = %room_type,
        "区域分类"
    );
    room_type
}
