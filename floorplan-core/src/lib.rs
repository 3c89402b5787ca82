pub mod geometry {
    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 二维点（图纸单位），内部以 `glam::DVec2` 表示。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn distance_to(self, other: Point2) -> f64 {
            self.0.distance(other.0)
        }

        #[inline]
        pub fn midpoint(self, other: Point2) -> Point2 {
            Self((self.0 + other.0) * 0.5)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    /// 二维向量。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_points(start: Point2, end: Point2) -> Self {
            Self(end.0 - start.0)
        }

        #[inline]
        pub fn length(self) -> f64 {
            self.0.length()
        }

        /// 与 X 轴正方向的夹角（弧度），等价于 `atan2(dy, dx)`。
        #[inline]
        pub fn angle(self) -> f64 {
            self.0.y.atan2(self.0.x)
        }
    }

    /// 轴对齐边界框。非空时满足 `min.x <= max.x` 且 `min.y <= max.y`。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        /// 以四个坐标构造，输入顺序颠倒时自动纠正。
        pub fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
            Self {
                min: Point2::new(min_x.min(max_x), min_y.min(max_y)),
                max: Point2::new(min_x.max(max_x), min_y.max(max_y)),
            }
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        #[inline]
        pub fn min_x(&self) -> f64 {
            self.min.x()
        }

        #[inline]
        pub fn min_y(&self) -> f64 {
            self.min.y()
        }

        #[inline]
        pub fn max_x(&self) -> f64 {
            self.max.x()
        }

        #[inline]
        pub fn max_y(&self) -> f64 {
            self.max.y()
        }

        #[inline]
        pub fn width(&self) -> f64 {
            self.max.x() - self.min.x()
        }

        #[inline]
        pub fn height(&self) -> f64 {
            self.max.y() - self.min.y()
        }

        #[inline]
        pub fn area(&self) -> f64 {
            self.width() * self.height()
        }

        /// 宽或高为零（或为空）时视为退化，下游比例计算无意义。
        #[inline]
        pub fn is_degenerate(&self) -> bool {
            self.is_empty() || self.width() <= 0.0 || self.height() <= 0.0
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            let min_vec = self.min.as_vec2().min(point.as_vec2());
            let max_vec = self.max.as_vec2().max(point.as_vec2());
            self.min = Point2::from_vec(min_vec);
            self.max = Point2::from_vec(max_vec);
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            let center = (self.min.as_vec2() + self.max.as_vec2()) * 0.5;
            Point2::from_vec(center)
        }

        /// 闭区间包含判定（边界上的点视为在内）。
        #[inline]
        pub fn contains(&self, point: Point2) -> bool {
            self.contains_with_tolerance(point, 0.0)
        }

        pub fn contains_with_tolerance(&self, point: Point2, tolerance: f64) -> bool {
            point.x() >= self.min.x() - tolerance
                && point.x() <= self.max.x() + tolerance
                && point.y() >= self.min.y() - tolerance
                && point.y() <= self.max.y() + tolerance
        }

        #[inline]
        pub fn contains_bounds(&self, other: &Bounds2D) -> bool {
            self.contains(other.min) && self.contains(other.max)
        }
    }

}

pub mod entity {
    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds2D, Point2, Vector2};

    /// CAD 实体提供方给出的规范化图元。实体创建后不再修改，引擎只读。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub enum Entity {
        Line(Line),
        Polyline(Polyline),
        Circle(Circle),
        Arc(Arc),
        BlockReference(BlockReference),
        Text(Text),
        Dimension(Dimension),
        Ellipse(Ellipse),
        Spline(Spline),
        /// 未识别类型，保留原始类型名与顶点，供通用多段线回退使用。
        Unknown(UnknownEntity),
    }

    impl Entity {
        #[inline]
        pub fn layer_name(&self) -> &str {
            match self {
                Entity::Line(line) => &line.layer,
                Entity::Polyline(polyline) => &polyline.layer,
                Entity::Circle(circle) => &circle.layer,
                Entity::Arc(arc) => &arc.layer,
                Entity::BlockReference(reference) => &reference.layer,
                Entity::Text(text) => &text.layer,
                Entity::Dimension(dimension) => &dimension.layer,
                Entity::Ellipse(ellipse) => &ellipse.layer,
                Entity::Spline(spline) => &spline.layer,
                Entity::Unknown(unknown) => &unknown.layer,
            }
        }

        /// 类型名称，便于日志输出。
        pub fn kind_name(&self) -> &str {
            match self {
                Entity::Line(_) => "LINE",
                Entity::Polyline(_) => "POLYLINE",
                Entity::Circle(_) => "CIRCLE",
                Entity::Arc(_) => "ARC",
                Entity::BlockReference(_) => "INSERT",
                Entity::Text(_) => "TEXT",
                Entity::Dimension(_) => "DIMENSION",
                Entity::Ellipse(_) => "ELLIPSE",
                Entity::Spline(_) => "SPLINE",
                Entity::Unknown(unknown) => &unknown.kind,
            }
        }

        /// 计算实体的范围。
        ///
        /// 线段/多段线取全部顶点，圆与圆弧取 `center ± radius` 形成的方框，
        /// 块参照退化为插入点，椭圆取长轴半径方框，样条取控制点，
        /// 带顶点的未知类型按多段线处理。文字与标注不参与范围计算。
        pub fn bounds(&self) -> Option<Bounds2D> {
            let mut bounds = Bounds2D::empty();
            match self {
                Entity::Line(line) => {
                    bounds.include_point(line.start);
                    bounds.include_point(line.end);
                }
                Entity::Polyline(polyline) => {
                    for vertex in &polyline.vertices {
                        bounds.include_point(*vertex);
                    }
                }
                Entity::Circle(circle) => {
                    include_square(&mut bounds, circle.center, circle.radius);
                }
                Entity::Arc(arc) => {
                    include_square(&mut bounds, arc.center, arc.radius);
                }
                Entity::BlockReference(reference) => {
                    bounds.include_point(reference.insert);
                }
                Entity::Ellipse(ellipse) => {
                    include_square(&mut bounds, ellipse.center, ellipse.major_axis.length());
                }
                Entity::Spline(spline) => {
                    for point in &spline.control_points {
                        bounds.include_point(*point);
                    }
                }
                Entity::Unknown(unknown) => {
                    for vertex in &unknown.vertices {
                        bounds.include_point(*vertex);
                    }
                }
                Entity::Text(_) | Entity::Dimension(_) => {}
            }
            if bounds.is_empty() { None } else { Some(bounds) }
        }

        pub fn line(start: Point2, end: Point2, layer: impl Into<String>) -> Self {
            Entity::Line(Line {
                start,
                end,
                width: None,
                thickness: None,
                layer: layer.into(),
            })
        }

        pub fn polyline<I>(vertices: I, is_closed: bool, layer: impl Into<String>) -> Self
        where
            I: IntoIterator<Item = Point2>,
        {
            Entity::Polyline(Polyline {
                vertices: vertices.into_iter().collect(),
                is_closed,
                thickness: None,
                layer: layer.into(),
            })
        }

        pub fn circle(center: Point2, radius: f64, layer: impl Into<String>) -> Self {
            Entity::Circle(Circle {
                center,
                radius,
                layer: layer.into(),
            })
        }

        pub fn block_reference(
            name: impl Into<String>,
            insert: Point2,
            layer: impl Into<String>,
        ) -> Self {
            Entity::BlockReference(BlockReference {
                name: name.into(),
                insert,
                rotation: 0.0,
                width: None,
                layer: layer.into(),
            })
        }

        pub fn text(
            insert: Point2,
            content: impl Into<String>,
            height: f64,
            layer: impl Into<String>,
        ) -> Self {
            Entity::Text(Text {
                insert,
                content: content.into(),
                height,
                rotation: 0.0,
                layer: layer.into(),
            })
        }
    }

    fn include_square(bounds: &mut Bounds2D, center: Point2, radius: f64) {
        let radius = radius.abs();
        bounds.include_point(Point2::new(center.x() - radius, center.y() - radius));
        bounds.include_point(Point2::new(center.x() + radius, center.y() + radius));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Line {
        pub start: Point2,
        pub end: Point2,
        /// 显式宽度属性（门窗图层上的线段可覆盖长度）。
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub thickness: Option<f64>,
        pub layer: String,
    }

    impl Line {
        #[inline]
        pub fn length(&self) -> f64 {
            self.start.distance_to(self.end)
        }

        #[inline]
        pub fn midpoint(&self) -> Point2 {
            self.start.midpoint(self.end)
        }

        #[inline]
        pub fn direction(&self) -> f64 {
            Vector2::from_points(self.start, self.end).angle()
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Polyline {
        pub vertices: Vec<Point2>,
        pub is_closed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub thickness: Option<f64>,
        pub layer: String,
    }

    impl Polyline {
        /// 依次返回相邻顶点构成的线段；闭合多段线额外包含首尾连接段。
        pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
            let closing = if self.is_closed && self.vertices.len() > 2 {
                self.vertices
                    .last()
                    .copied()
                    .zip(self.vertices.first().copied())
            } else {
                None
            };
            self.vertices
                .windows(2)
                .map(|pair| (pair[0], pair[1]))
                .chain(closing)
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Circle {
        pub center: Point2,
        pub radius: f64,
        pub layer: String,
    }

    /// 圆弧实体，角度以弧度储存，遵循数学正方向。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Arc {
        pub center: Point2,
        pub radius: f64,
        pub start_angle: f64,
        pub end_angle: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BlockReference {
        pub name: String,
        pub insert: Point2,
        pub rotation: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub width: Option<f64>,
        pub layer: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Text {
        pub insert: Point2,
        pub content: String,
        pub height: f64,
        pub rotation: f64,
        pub layer: String,
    }

    /// 线性标注：两个测量点，可选文字位置与覆盖文字。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Dimension {
        pub start: Point2,
        pub end: Point2,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text_midpoint: Option<Point2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: Option<String>,
        pub layer: String,
    }

    impl Dimension {
        /// 标注显示文字：优先使用覆盖文字，否则取测量长度。
        pub fn display_text(&self) -> String {
            match &self.text {
                Some(text) if !text.is_empty() => text.clone(),
                _ => format!("{:.0}", self.start.distance_to(self.end)),
            }
        }
    }

    /// 椭圆实体，记录主轴向量与参数范围（弧度）。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Ellipse {
        pub center: Point2,
        pub major_axis: Vector2,
        pub ratio: f64,
        pub start_parameter: f64,
        pub end_parameter: f64,
        pub layer: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Spline {
        pub control_points: Vec<Point2>,
        pub is_closed: bool,
        pub layer: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct UnknownEntity {
        pub kind: String,
        pub vertices: Vec<Point2>,
        pub layer: String,
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn bounds_follow_per_kind_rules() {
            let circle = Entity::circle(Point2::new(5.0, 5.0), 2.0, "0");
            let bounds = circle.bounds().expect("circle bounds");
            assert_eq!(bounds.min(), Point2::new(3.0, 3.0));
            assert_eq!(bounds.max(), Point2::new(7.0, 7.0));

            let insert = Entity::block_reference("DOOR", Point2::new(1.0, 2.0), "0");
            let bounds = insert.bounds().expect("insert bounds");
            assert_eq!(bounds.min(), bounds.max());

            let text = Entity::text(Point2::new(1.0, 1.0), "Kitchen", 2.5, "TEXT");
            assert!(text.bounds().is_none());

            let unknown = Entity::Unknown(UnknownEntity {
                kind: "MLINE".to_string(),
                vertices: vec![Point2::new(0.0, 0.0), Point2::new(4.0, -3.0)],
                layer: "0".to_string(),
            });
            let bounds = unknown.bounds().expect("unknown bounds");
            assert_eq!(bounds.min(), Point2::new(0.0, -3.0));
            assert_eq!(unknown.kind_name(), "MLINE");
        }

        #[test]
        fn closed_polyline_segments_wrap_around() {
            let square = Entity::polyline(
                [
                    Point2::new(0.0, 0.0),
                    Point2::new(10.0, 0.0),
                    Point2::new(10.0, 10.0),
                    Point2::new(0.0, 10.0),
                ],
                true,
                "WALLS",
            );
            let Entity::Polyline(polyline) = square else {
                panic!("expected polyline");
            };
            let segments: Vec<_> = polyline.segments().collect();
            assert_eq!(segments.len(), 4);
            assert_eq!(segments[3], (Point2::new(0.0, 10.0), Point2::new(0.0, 0.0)));
        }

        #[test]
        fn dimension_text_falls_back_to_measurement() {
            let dimension = Dimension {
                start: Point2::new(0.0, 0.0),
                end: Point2::new(300.0, 0.0),
                text_midpoint: None,
                text: None,
                layer: "DIMENSIONS".to_string(),
            };
            assert_eq!(dimension.display_text(), "300");
        }
    }
}

pub mod floor {
    use std::collections::BTreeSet;
    use std::fmt;

    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds2D, Point2, Vector2};

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Wall {
        pub start: Point2,
        pub end: Point2,
        pub thickness: f64,
    }

    impl Wall {
        #[inline]
        pub fn new(start: Point2, end: Point2, thickness: f64) -> Self {
            Self {
                start,
                end,
                thickness,
            }
        }

        #[inline]
        pub fn length(&self) -> f64 {
            self.start.distance_to(self.end)
        }

        /// 墙体方向角（弧度）。
        #[inline]
        pub fn angle(&self) -> f64 {
            Vector2::from_points(self.start, self.end).angle()
        }

        #[inline]
        pub fn endpoints(&self) -> [Point2; 2] {
            [self.start, self.end]
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Door {
        pub position: Point2,
        pub width: f64,
        /// 朝向（弧度）。
        pub direction: f64,
        /// 所属房间 ID，仅在装配后填充。
        #[serde(default)]
        pub room_ids: BTreeSet<String>,
    }

    impl Door {
        #[inline]
        pub fn new(position: Point2, width: f64, direction: f64) -> Self {
            Self {
                position,
                width,
                direction,
                room_ids: BTreeSet::new(),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Window {
        pub position: Point2,
        pub width: f64,
        pub direction: f64,
    }

    impl Window {
        #[inline]
        pub fn new(position: Point2, width: f64, direction: f64) -> Self {
            Self {
                position,
                width,
                direction,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum RoomType {
        Bathroom,
        Bedroom,
        Living,
        Room,
    }

    impl RoomType {
        pub const ALL: [RoomType; 4] = [
            RoomType::Bathroom,
            RoomType::Bedroom,
            RoomType::Living,
            RoomType::Room,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                RoomType::Bathroom => "bathroom",
                RoomType::Bedroom => "bedroom",
                RoomType::Living => "living",
                RoomType::Room => "room",
            }
        }

        /// 首字母大写的名称，用于房间命名（如 `Bedroom 2`）。
        pub fn title(self) -> &'static str {
            match self {
                RoomType::Bathroom => "Bathroom",
                RoomType::Bedroom => "Bedroom",
                RoomType::Living => "Living",
                RoomType::Room => "Room",
            }
        }
    }

    impl fmt::Display for RoomType {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Room {
        pub id: String,
        pub name: String,
        pub room_type: RoomType,
        pub bounds: Bounds2D,
        pub walls: Vec<Wall>,
        pub doors: Vec<Door>,
        pub windows: Vec<Window>,
        pub area: f64,
    }

    impl Room {
        pub fn summary(&self) -> RoomSummary {
            RoomSummary {
                id: self.id.clone(),
                name: self.name.clone(),
                room_type: self.room_type,
                area: self.area,
                door_count: self.doors.len(),
                window_count: self.windows.len(),
            }
        }
    }

    /// 悬停面板展示的房间摘要。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RoomSummary {
        pub id: String,
        pub name: String,
        pub room_type: RoomType,
        pub area: f64,
        pub door_count: usize,
        pub window_count: usize,
    }

    /// 楼层结构：渲染管线与外部消费者使用的唯一产物，装配后不再修改。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FloorStructure {
        pub rooms: Vec<Room>,
        pub walls: Vec<Wall>,
        pub doors: Vec<Door>,
        pub windows: Vec<Window>,
        pub bounds: Bounds2D,
    }

    impl FloorStructure {
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.rooms.is_empty()
                && self.walls.is_empty()
                && self.doors.is_empty()
                && self.windows.is_empty()
        }

        pub fn room(&self, id: &str) -> Option<&Room> {
            self.rooms.iter().find(|room| room.id == id)
        }

        /// 返回包含该点的第一个房间（按 ID 顺序）。
        pub fn room_at(&self, point: Point2) -> Option<&Room> {
            self.rooms.iter().find(|room| room.bounds.contains(point))
        }
    }

}
