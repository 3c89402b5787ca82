//! 房间候选区域检测。
//!
//! 这里的检测是启发式的空间划分（三角布局近似或网格扫描），
//! 并非基于墙体图的多边形求解。检测策略以 trait 形式提供，
//! 分类与装配阶段只依赖候选矩形，可替换为更严格的实现。

use floorplan_core::floor::Wall;
use floorplan_core::geometry::{Bounds2D, Point2};
use tracing::{debug, trace, warn};

use crate::errors::EngineError;

pub const DEFAULT_GRID_CELL_SIZE: f64 = 50.0;
pub const DEFAULT_WALL_TOLERANCE: f64 = 5.0;
pub const DEFAULT_TRIANGLE_ANGLE_TOLERANCE: f64 = 15.0;
const MIN_GRID_DIVISIONS: usize = 2;
/// 单方向网格数上限，避免超大边界或过小格宽导致扫描爆炸。
pub const MAX_GRID_DIVISIONS: usize = 200;
const TRIANGULAR_MIN_WALLS: usize = 2;

/// 检测参数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    pub grid_cell_size: f64,
    pub wall_tolerance: f64,
    /// 三角布局判定的角度容差（度）。
    pub triangle_angle_tolerance: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            grid_cell_size: DEFAULT_GRID_CELL_SIZE,
            wall_tolerance: DEFAULT_WALL_TOLERANCE,
            triangle_angle_tolerance: DEFAULT_TRIANGLE_ANGLE_TOLERANCE,
        }
    }
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.grid_cell_size.is_finite() && self.grid_cell_size > 0.0) {
            return Err(EngineError::InvalidParameter {
                name: "grid_cell_size",
                value: self.grid_cell_size,
            });
        }
        if !(self.wall_tolerance.is_finite() && self.wall_tolerance >= 0.0) {
            return Err(EngineError::InvalidParameter {
                name: "wall_tolerance",
                value: self.wall_tolerance,
            });
        }
        if !(self.triangle_angle_tolerance.is_finite()
            && (0.0..=90.0).contains(&self.triangle_angle_tolerance))
        {
            return Err(EngineError::InvalidParameter {
                name: "triangle_angle_tolerance",
                value: self.triangle_angle_tolerance,
            });
        }
        Ok(())
    }
}

/// 带序号的候选区域，ID 按输出顺序分配（`room-0`, `room-1`, ...）。
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRegion {
    pub id: String,
    pub bounds: Bounds2D,
}

pub trait RoomDetectionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// 给出有序的候选房间矩形（尚未分类、未绑定实体）。
    fn detect_candidate_regions(&self, walls: &[Wall], bounds: &Bounds2D) -> Vec<Bounds2D>;
}

/// 执行检测策略；若无候选区域则回退为覆盖整个范围的单一房间。
pub fn detect_rooms(
    strategy: &dyn RoomDetectionStrategy,
    walls: &[Wall],
    bounds: &Bounds2D,
) -> Vec<CandidateRegion> {
    let mut regions = strategy.detect_candidate_regions(walls, bounds);
    if regions.is_empty() {
        debug!(strategy = strategy.name(), "未检测到候选区域，回退为单一房间");
        regions.push(*bounds);
    }
    debug!(
        strategy = strategy.name(),
        candidates = regions.len(),
        "房间候选区域检测完成"
    );
    regions
        .into_iter()
        .enumerate()
        .map(|(index, bounds)| CandidateRegion {
            id: format!("room-{index}"),
            bounds,
        })
        .collect()
}

/// 墙体方向角对 180° 取模后，落在 60° 或 120° 容差带内的墙体数达到 2 即判定为三角布局。
/// 零长度墙体没有方向，不参与计数。
pub fn is_triangular_layout(walls: &[Wall], tolerance_degrees: f64) -> bool {
    let diagonal = walls
        .iter()
        .filter(|wall| wall.length() > 0.0)
        .filter(|wall| {
            let angle = wall.angle().to_degrees().rem_euclid(180.0);
            (angle - 60.0).abs() <= tolerance_degrees || (angle - 120.0).abs() <= tolerance_degrees
        })
        .count();
    trace!(walls = walls.len(), diagonal, "三角布局判定");
    diagonal >= TRIANGULAR_MIN_WALLS
}

/// 固定拓扑的三分近似：以中心为界的左下、右下两个半区，加上顶部梯形区域的外接矩形。
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangularLayoutDetector;

impl RoomDetectionStrategy for TriangularLayoutDetector {
    fn name(&self) -> &'static str {
        "triangular"
    }

    fn detect_candidate_regions(&self, _walls: &[Wall], bounds: &Bounds2D) -> Vec<Bounds2D> {
        let center = bounds.center();
        let quarter = bounds.width() / 4.0;
        vec![
            Bounds2D::from_extents(bounds.min_x(), center.y(), center.x(), bounds.max_y()),
            Bounds2D::from_extents(center.x(), center.y(), bounds.max_x(), bounds.max_y()),
            Bounds2D::from_extents(
                bounds.min_x() + quarter,
                bounds.min_y(),
                bounds.max_x() - quarter,
                center.y(),
            ),
        ]
    }
}

/// 网格扫描：仅保留附近存在墙体端点的网格单元。
#[derive(Debug, Clone, Copy)]
pub struct GridScanDetector {
    pub cell_size: f64,
    pub tolerance: f64,
}

impl Default for GridScanDetector {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_GRID_CELL_SIZE,
            tolerance: DEFAULT_WALL_TOLERANCE,
        }
    }
}

impl GridScanDetector {
    pub fn new(cell_size: f64, tolerance: f64) -> Self {
        Self {
            cell_size,
            tolerance,
        }
    }

    /// 网格列数与行数，每个方向至少 2 格，至多 [`MAX_GRID_DIVISIONS`] 格。
    pub fn grid_dimensions(&self, bounds: &Bounds2D) -> (usize, usize) {
        let divisions = |extent: f64| {
            let count = (extent / self.cell_size).floor();
            if !count.is_finite() || count <= 0.0 {
                return MIN_GRID_DIVISIONS;
            }
            if count > MAX_GRID_DIVISIONS as f64 {
                warn!(
                    extent,
                    cell_size = self.cell_size,
                    cap = MAX_GRID_DIVISIONS,
                    "网格划分过细，已截断"
                );
                return MAX_GRID_DIVISIONS;
            }
            (count as usize).max(MIN_GRID_DIVISIONS)
        };
        (divisions(bounds.width()), divisions(bounds.height()))
    }

    fn has_enclosing_walls(&self, cell: &Bounds2D, walls: &[Wall]) -> bool {
        walls.iter().any(|wall| {
            wall.endpoints()
                .into_iter()
                .any(|point| cell.contains_with_tolerance(point, self.tolerance))
        })
    }

    fn on_perimeter(&self, wall: &Wall, bounds: &Bounds2D) -> bool {
        let near = |a: f64, b: f64| (a - b).abs() <= self.tolerance;
        let [start, end] = wall.endpoints();
        let shares = |coord: fn(Point2) -> f64, edge: f64| near(coord(start), edge) && near(coord(end), edge);
        shares(Point2::x, bounds.min_x())
            || shares(Point2::x, bounds.max_x())
            || shares(Point2::y, bounds.min_y())
            || shares(Point2::y, bounds.max_y())
    }
}

impl RoomDetectionStrategy for GridScanDetector {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn detect_candidate_regions(&self, walls: &[Wall], bounds: &Bounds2D) -> Vec<Bounds2D> {
        // 墙体全部位于外轮廓上时不存在内部隔断，整个范围即一个房间。
        if !walls.is_empty() && walls.iter().all(|wall| self.on_perimeter(wall, bounds)) {
            debug!(walls = walls.len(), "墙体均位于外轮廓，视为单一房间");
            return vec![*bounds];
        }

        let (cols, rows) = self.grid_dimensions(bounds);
        let cell_width = bounds.width() / cols as f64;
        let cell_height = bounds.height() / rows as f64;
        let edge = |origin: f64, step: f64, index: usize, count: usize, limit: f64| {
            if index == count {
                limit
            } else {
                origin + step * index as f64
            }
        };

        let mut regions = Vec::new();
        for row in 0..rows {
            let min_y = edge(bounds.min_y(), cell_height, row, rows, bounds.max_y());
            let max_y = edge(bounds.min_y(), cell_height, row + 1, rows, bounds.max_y());
            for col in 0..cols {
                let min_x = edge(bounds.min_x(), cell_width, col, cols, bounds.max_x());
                let max_x = edge(bounds.min_x(), cell_width, col + 1, cols, bounds.max_x());
                let cell = Bounds2D::from_extents(min_x, min_y, max_x, max_y);
                if self.has_enclosing_walls(&cell, walls) {
                    regions.push(cell);
                } else {
                    trace!(row, col, "网格单元附近无墙体，跳过");
                }
            }
        }
        debug!(cols, rows, kept = regions.len(), "网格扫描完成");
        regions
    }
}

/// 默认策略：按三角布局判定在两种检测方式之间选择。
#[derive(Debug, Clone, Copy)]
pub struct HeuristicRoomDetector {
    pub triangular: TriangularLayoutDetector,
    pub grid: GridScanDetector,
    pub angle_tolerance: f64,
}

impl Default for HeuristicRoomDetector {
    fn default() -> Self {
        Self::from_params(&DetectionParams::default())
    }
}

impl HeuristicRoomDetector {
    pub fn from_params(params: &DetectionParams) -> Self {
        Self {
            triangular: TriangularLayoutDetector,
            grid: GridScanDetector::new(params.grid_cell_size, params.wall_tolerance),
            angle_tolerance: params.triangle_angle_tolerance,
        }
    }
}

impl RoomDetectionStrategy for HeuristicRoomDetector {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn detect_candidate_regions(&self, walls: &[Wall], bounds: &Bounds2D) -> Vec<Bounds2D> {
        if is_triangular_layout(walls, self.angle_tolerance) {
            debug!("检测到三角布局");
            self.triangular.detect_candidate_regions(walls, bounds)
        } else {
            self.grid.detect_candidate_regions(walls, bounds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at_angle(degrees: f64, length: f64) -> Wall {
        let radians = degrees.to_radians();
        Wall::new(
            Point2::new(100.0, 100.0),
            Point2::new(100.0 + length * radians.cos(), 100.0 + length * radians.sin()),
            10.0,
        )
    }

    fn rectangle_walls(width: f64, height: f64) -> Vec<Wall> {
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, height),
            Point2::new(0.0, height),
        ];
        (0..4)
            .map(|i| Wall::new(corners[i], corners[(i + 1) % 4], 10.0))
            .collect()
    }

    #[test]
    fn triangular_layout_needs_two_diagonal_walls() {
        let walls = vec![
            wall_at_angle(58.0, 80.0),
            wall_at_angle(61.0, 80.0),
            wall_at_angle(121.0, 80.0),
        ];
        assert!(is_triangular_layout(&walls, 15.0));
        assert!(!is_triangular_layout(&walls[..1], 15.0));
        // 反向墙体（238° ≡ 58°）同样计入。
        assert!(is_triangular_layout(
            &[wall_at_angle(238.0, 50.0), wall_at_angle(300.0, 50.0)],
            15.0
        ));
        assert!(!is_triangular_layout(&rectangle_walls(300.0, 200.0), 15.0));

        let point = Point2::new(5.0, 5.0);
        let degenerate = [Wall::new(point, point, 10.0), Wall::new(point, point, 10.0)];
        assert!(!is_triangular_layout(&degenerate, 90.0));
    }

    #[test]
    fn triangular_branch_emits_three_regions_within_bounds() {
        let bounds = Bounds2D::from_extents(0.0, 0.0, 200.0, 160.0);
        let walls = vec![
            wall_at_angle(58.0, 80.0),
            wall_at_angle(61.0, 80.0),
            wall_at_angle(121.0, 80.0),
        ];
        let regions = detect_rooms(&HeuristicRoomDetector::default(), &walls, &bounds);
        assert_eq!(regions.len(), 3);
        assert!(regions.iter().all(|region| bounds.contains_bounds(&region.bounds)));
        assert_eq!(regions[0].bounds, Bounds2D::from_extents(0.0, 80.0, 100.0, 160.0));
        assert_eq!(regions[1].bounds, Bounds2D::from_extents(100.0, 80.0, 200.0, 160.0));
        assert_eq!(regions[2].bounds, Bounds2D::from_extents(50.0, 0.0, 150.0, 80.0));
    }

    #[test]
    fn grid_dimensions_have_minimum_of_two() {
        let grid = GridScanDetector::default();
        assert_eq!(grid.grid_dimensions(&Bounds2D::from_extents(0.0, 0.0, 300.0, 200.0)), (6, 4));
        assert_eq!(grid.grid_dimensions(&Bounds2D::from_extents(0.0, 0.0, 30.0, 15.0)), (2, 2));
        assert_eq!(grid.grid_dimensions(&Bounds2D::from_extents(0.0, 0.0, 149.0, 99.0)), (2, 2));
    }

    #[test]
    fn huge_bounds_are_capped() {
        let grid = GridScanDetector::default();
        let bounds = Bounds2D::from_extents(0.0, 0.0, 1.0e6, 120.0);
        assert_eq!(grid.grid_dimensions(&bounds), (MAX_GRID_DIVISIONS, 2));

        let fine = GridScanDetector::new(1.0e-9, DEFAULT_WALL_TOLERANCE);
        let (cols, rows) = fine.grid_dimensions(&Bounds2D::from_extents(0.0, 0.0, 10.0, 10.0));
        assert_eq!((cols, rows), (MAX_GRID_DIVISIONS, MAX_GRID_DIVISIONS));

        let mut walls = rectangle_walls(1.0e6, 120.0);
        walls.push(Wall::new(Point2::new(5.0e5, 0.0), Point2::new(5.0e5, 120.0), 10.0));
        let regions = grid.detect_candidate_regions(&walls, &bounds);
        assert!(!regions.is_empty());
        assert!(regions.len() <= MAX_GRID_DIVISIONS * 2);
    }

    #[test]
    fn perimeter_only_walls_form_single_region() {
        let bounds = Bounds2D::from_extents(0.0, 0.0, 300.0, 200.0);
        let regions = detect_rooms(&GridScanDetector::default(), &rectangle_walls(300.0, 200.0), &bounds);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].id, "room-0");
        assert_eq!(regions[0].bounds, bounds);
    }

    #[test]
    fn grid_cells_without_nearby_walls_are_dropped() {
        let bounds = Bounds2D::from_extents(0.0, 0.0, 200.0, 100.0);
        let mut walls = rectangle_walls(200.0, 100.0);
        // 竖向隔断，端点位于 (100, 0) 与 (100, 100)。
        walls.push(Wall::new(Point2::new(100.0, 0.0), Point2::new(100.0, 100.0), 10.0));
        let grid = GridScanDetector::default();
        let regions = grid.detect_candidate_regions(&walls, &bounds);

        // 4 列 × 2 行，每个单元都至少靠近一个角点或隔断端点。
        assert_eq!(regions.len(), 8);
        assert_eq!(regions[0], Bounds2D::from_extents(0.0, 0.0, 50.0, 50.0));
        assert_eq!(regions[1], Bounds2D::from_extents(50.0, 0.0, 100.0, 50.0));
        assert_eq!(regions[4], Bounds2D::from_extents(0.0, 50.0, 50.0, 100.0));

        // 宽幅范围中间的单元离所有端点都超过容差。
        let wide = Bounds2D::from_extents(0.0, 0.0, 400.0, 100.0);
        let mut walls = rectangle_walls(400.0, 100.0);
        walls.push(Wall::new(Point2::new(0.0, 50.0), Point2::new(40.0, 50.0), 10.0));
        let regions = grid.detect_candidate_regions(&walls, &wide);
        let isolated = Bounds2D::from_extents(150.0, 0.0, 200.0, 50.0);
        assert!(!regions.contains(&isolated));
        assert!(regions.contains(&Bounds2D::from_extents(0.0, 0.0, 50.0, 50.0)));
        assert!(regions.iter().all(|cell| wide.contains_bounds(cell)));
    }

    #[test]
    fn no_walls_fall_back_to_whole_bounds() {
        let bounds = Bounds2D::from_extents(0.0, 0.0, 300.0, 200.0);
        let regions = detect_rooms(&HeuristicRoomDetector::default(), &[], &bounds);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bounds, bounds);
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = DetectionParams {
            grid_cell_size: 0.0,
            ..DetectionParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(EngineError::InvalidParameter { name: "grid_cell_size", .. })
        ));
        assert!(DetectionParams::default().validate().is_ok());
    }
}
