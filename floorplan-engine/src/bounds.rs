use floorplan_core::entity::Entity;
use floorplan_core::geometry::Bounds2D;
use tracing::{debug, warn};

pub const DEFAULT_BOUNDS_WIDTH: f64 = 300.0;
pub const DEFAULT_BOUNDS_HEIGHT: f64 = 200.0;

/// 无实体或范围退化时使用的中性矩形。
#[inline]
pub fn default_bounds() -> Bounds2D {
    Bounds2D::from_extents(0.0, 0.0, DEFAULT_BOUNDS_WIDTH, DEFAULT_BOUNDS_HEIGHT)
}

/// 汇总所有实体的范围。没有任何可提取点时返回 `None`。
pub fn calculate_bounds(entities: &[Entity]) -> Option<Bounds2D> {
    let mut bounds = Bounds2D::empty();
    let mut has = false;
    for entity in entities {
        if let Some(entity_bounds) = entity.bounds() {
            bounds.include_bounds(&entity_bounds);
            has = true;
        }
    }
    if has { Some(bounds) } else { None }
}

/// 计算范围，并在结果缺失或退化时替换为 `fallback`。
pub fn resolve_bounds(entities: &[Entity], fallback: Bounds2D) -> Bounds2D {
    match calculate_bounds(entities) {
        Some(bounds) if !bounds.is_degenerate() => {
            debug!(
                min_x = bounds.min_x(),
                min_y = bounds.min_y(),
                max_x = bounds.max_x(),
                max_y = bounds.max_y(),
                "图纸范围"
            );
            bounds
        }
        Some(bounds) => {
            warn!(
                width = bounds.width(),
                height = bounds.height(),
                "图纸范围退化，使用默认范围"
            );
            fallback
        }
        None => {
            debug!(entities = entities.len(), "无可用实体，使用默认范围");
            fallback
        }
    }
}
