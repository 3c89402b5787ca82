//! 平面图渲染管线。
//!
//! 按固定图层优先级（标注 → 家具 → 文字 → 窗 → 门 → 墙 → 默认）自底向上绘制实体，
//! 随后叠加房间区域（虚线边界、按类型着色的半透明填充、两行标签），
//! 悬停房间最后以高亮色重绘。管线只依赖传入的样式表与画布，不持有全局状态。

use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, TAU};

use floorplan_core::entity::{
    Arc, BlockReference, Circle, Dimension, Ellipse, Entity, Line, Polyline, Spline, Text,
    UnknownEntity,
};
use floorplan_core::floor::{FloorStructure, Room};
use floorplan_core::geometry::Point2;
use floorplan_engine::extract::DEFAULT_DOOR_WIDTH;
use floorplan_engine::projection::{DEFAULT_MAX_SCALE, Projection};
use floorplan_engine::scene::PlanScene;
use tracing::{debug, warn};

use crate::canvas::{Canvas2d, Rgba, TextAlign};
use crate::style::{LayerCategory, StyleTable};

pub const PLACEHOLDER_MESSAGE: &str = "No floor plan loaded";

const PLACEHOLDER_FONT_PX: f64 = 16.0;
const LABEL_FONT_PX: f64 = 12.0;
const LABEL_LINE_OFFSET_PX: f64 = 8.0;
const MIN_TEXT_FONT_PX: f64 = 8.0;
const TEXT_PLATE_PADDING_PX: f64 = 2.0;
const ARROW_LENGTH_PX: f64 = 8.0;
const ROOM_DASH: [f64; 2] = [6.0, 4.0];
const ROOM_FILL_OPACITY: f64 = 0.15;
const HIGHLIGHT_FILL_OPACITY: f64 = 0.3;
const CLOSED_POLYLINE_FILL_OPACITY: f64 = 0.1;
const TEXT_PLATE_OPACITY: f64 = 0.8;
const ROOM_STROKE_WIDTH: f64 = 1.5;
const HIGHLIGHT_STROKE_WIDTH: f64 = 2.5;

/// 一次渲染的结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderOutcome {
    Rendered { entities: usize, rooms: usize },
    /// 没有可用的绘图表面，未做任何绘制。
    NoSurface,
    /// 没有楼层结构，仅绘制了居中提示文字。
    Placeholder,
}

/// 单帧渲染输入。`projection` 为空时按画布尺寸重新适配。
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub entities: &'a [Entity],
    pub floor: Option<&'a FloorStructure>,
    pub hovered: Option<&'a str>,
    pub projection: Option<Projection>,
}

impl<'a> RenderFrame<'a> {
    pub fn from_scene(scene: &'a PlanScene) -> Self {
        Self {
            entities: scene.entities(),
            floor: scene.floor(),
            hovered: scene.hovered_room().map(|room| room.id.as_str()),
            projection: scene.projection(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanRenderer {
    style: StyleTable,
    max_scale: f64,
}

impl Default for PlanRenderer {
    fn default() -> Self {
        Self::new(StyleTable::default(), DEFAULT_MAX_SCALE)
    }
}

impl PlanRenderer {
    pub fn new(style: StyleTable, max_scale: f64) -> Self {
        Self { style, max_scale }
    }

    #[inline]
    pub fn style(&self) -> &StyleTable {
        &self.style
    }

    pub fn render(&self, canvas: Option<&mut dyn Canvas2d>, frame: &RenderFrame<'_>) -> RenderOutcome {
        let Some(canvas) = canvas else {
            warn!("绘图表面不可用，跳过渲染");
            return RenderOutcome::NoSurface;
        };
        let (width, height) = canvas.size();
        let floor = match frame.floor {
            Some(floor) if !floor.is_empty() => floor,
            _ => {
                self.draw_placeholder(canvas, width, height);
                return RenderOutcome::Placeholder;
            }
        };

        canvas.set_fill_style(self.style.background());
        canvas.fill_rect(Point2::new(0.0, 0.0), width, height);

        let projection = frame
            .projection
            .unwrap_or_else(|| Projection::fit(&floor.bounds, width, height, self.max_scale));

        for category in LayerCategory::DRAW_ORDER {
            let style = self.style.style(category);
            canvas.set_stroke_style(style.color);
            canvas.set_fill_style(style.color);
            canvas.set_line_width(style.line_width);
            canvas.set_line_dash(&[]);
            for entity in frame
                .entities
                .iter()
                .filter(|entity| self.style.category(entity.layer_name()) == category)
            {
                draw_entity(canvas, &projection, entity, style.color);
            }
        }

        for room in &floor.rooms {
            self.draw_room(canvas, &projection, room, false);
        }
        if let Some(room) = frame.hovered.and_then(|id| floor.room(id)) {
            self.draw_room(canvas, &projection, room, true);
        }
        canvas.set_line_dash(&[]);

        debug!(
            entities = frame.entities.len(),
            rooms = floor.rooms.len(),
            scale = projection.scale,
            "平面图渲染完成"
        );
        RenderOutcome::Rendered {
            entities: frame.entities.len(),
            rooms: floor.rooms.len(),
        }
    }

    #[inline]
    pub fn render_scene(&self, canvas: Option<&mut dyn Canvas2d>, scene: &PlanScene) -> RenderOutcome {
        self.render(canvas, &RenderFrame::from_scene(scene))
    }

    fn draw_placeholder(&self, canvas: &mut dyn Canvas2d, width: f64, height: f64) {
        canvas.set_fill_style(self.style.style(LayerCategory::Text).color);
        canvas.set_font_size(PLACEHOLDER_FONT_PX);
        canvas.set_text_align(TextAlign::Center);
        canvas.fill_text(PLACEHOLDER_MESSAGE, Point2::new(width / 2.0, height / 2.0));
    }

    fn draw_room(&self, canvas: &mut dyn Canvas2d, projection: &Projection, room: &Room, highlighted: bool) {
        let (color, fill_opacity, line_width) = if highlighted {
            (self.style.highlight(), HIGHLIGHT_FILL_OPACITY, HIGHLIGHT_STROKE_WIDTH)
        } else {
            (self.style.room_color(room.room_type), ROOM_FILL_OPACITY, ROOM_STROKE_WIDTH)
        };
        let min = projection.to_canvas(room.bounds.min());
        let max = projection.to_canvas(room.bounds.max());

        canvas.begin_path();
        canvas.rect(min, max.x() - min.x(), max.y() - min.y());
        canvas.set_fill_style(color.with_opacity(fill_opacity));
        canvas.fill();
        canvas.set_stroke_style(color);
        canvas.set_line_width(line_width);
        canvas.set_line_dash(&ROOM_DASH);
        canvas.stroke();

        let center = projection.to_canvas(room.bounds.center());
        canvas.set_fill_style(self.style.style(LayerCategory::Text).color);
        canvas.set_font_size(LABEL_FONT_PX);
        canvas.set_text_align(TextAlign::Center);
        canvas.fill_text(
            &room.name,
            Point2::new(center.x(), center.y() - LABEL_LINE_OFFSET_PX),
        );
        canvas.fill_text(
            &room_detail_label(room),
            Point2::new(center.x(), center.y() + LABEL_LINE_OFFSET_PX),
        );
    }
}

/// 标签第二行：`类型 · 取整面积`。
pub fn room_detail_label(room: &Room) -> String {
    format!("{} · {}", room.room_type, room.area.round())
}

fn draw_entity(canvas: &mut dyn Canvas2d, projection: &Projection, entity: &Entity, color: Rgba) {
    match entity {
        Entity::Line(line) => draw_line(canvas, projection, line),
        Entity::Polyline(polyline) => draw_polyline(canvas, projection, polyline, color),
        Entity::Circle(circle) => draw_circle(canvas, projection, circle),
        Entity::Arc(arc) => draw_arc(canvas, projection, arc),
        Entity::BlockReference(reference) => draw_door_glyph(canvas, projection, reference),
        Entity::Text(text) => draw_text(canvas, projection, text, color),
        Entity::Dimension(dimension) => draw_dimension(canvas, projection, dimension, color),
        Entity::Ellipse(ellipse) => draw_ellipse(canvas, projection, ellipse),
        Entity::Spline(spline) => draw_spline(canvas, projection, spline),
        Entity::Unknown(unknown) => draw_unknown(canvas, projection, unknown),
    }
}

fn draw_line(canvas: &mut dyn Canvas2d, projection: &Projection, line: &Line) {
    canvas.begin_path();
    canvas.move_to(projection.to_canvas(line.start));
    canvas.line_to(projection.to_canvas(line.end));
    canvas.stroke();
}

fn trace_vertices(canvas: &mut dyn Canvas2d, projection: &Projection, vertices: &[Point2]) -> bool {
    let mut points = vertices.iter().map(|point| projection.to_canvas(*point));
    let Some(first) = points.next() else {
        return false;
    };
    canvas.begin_path();
    canvas.move_to(first);
    for point in points {
        canvas.line_to(point);
    }
    true
}

fn draw_polyline(canvas: &mut dyn Canvas2d, projection: &Projection, polyline: &Polyline, color: Rgba) {
    if !trace_vertices(canvas, projection, &polyline.vertices) {
        return;
    }
    if polyline.is_closed {
        canvas.close_path();
        canvas.set_fill_style(color.with_opacity(CLOSED_POLYLINE_FILL_OPACITY));
        canvas.fill();
        canvas.set_fill_style(color);
    }
    canvas.stroke();
}

fn draw_unknown(canvas: &mut dyn Canvas2d, projection: &Projection, unknown: &UnknownEntity) {
    if trace_vertices(canvas, projection, &unknown.vertices) {
        canvas.stroke();
    }
}

fn draw_circle(canvas: &mut dyn Canvas2d, projection: &Projection, circle: &Circle) {
    canvas.begin_path();
    canvas.arc(
        projection.to_canvas(circle.center),
        projection.to_canvas_length(circle.radius.abs()),
        0.0,
        TAU,
    );
    canvas.stroke();
}

fn draw_arc(canvas: &mut dyn Canvas2d, projection: &Projection, arc: &Arc) {
    canvas.begin_path();
    canvas.arc(
        projection.to_canvas(arc.center),
        projection.to_canvas_length(arc.radius.abs()),
        arc.start_angle,
        arc.end_angle,
    );
    canvas.stroke();
}

/// 门符号：沿插入角度的门扇线，加上 90° 开启弧。
fn draw_door_glyph(canvas: &mut dyn Canvas2d, projection: &Projection, reference: &BlockReference) {
    let width = reference.width.unwrap_or(DEFAULT_DOOR_WIDTH);
    let hinge = projection.to_canvas(reference.insert);
    let radius = projection.to_canvas_length(width);
    let (sin, cos) = reference.rotation.sin_cos();

    canvas.begin_path();
    canvas.move_to(hinge);
    canvas.line_to(Point2::new(hinge.x() + radius * cos, hinge.y() + radius * sin));
    canvas.stroke();

    canvas.begin_path();
    canvas.arc(hinge, radius, reference.rotation, reference.rotation + FRAC_PI_2);
    canvas.stroke();
}

fn font_size_for(projection: &Projection, height: f64) -> f64 {
    projection.to_canvas_length(height).max(MIN_TEXT_FONT_PX)
}

/// 文字下方先绘制半透明底板，避免与线条重叠难以辨认。
/// 旋转文字的底板随文字一起绕锚点旋转。
fn draw_label_with_plate(
    canvas: &mut dyn Canvas2d,
    text: &str,
    anchor: Point2,
    rotation: f64,
    font_size: f64,
    color: Rgba,
) {
    canvas.set_font_size(font_size);
    canvas.set_text_align(TextAlign::Start);
    let width = canvas.measure_text(text) + TEXT_PLATE_PADDING_PX * 2.0;
    let height = font_size + TEXT_PLATE_PADDING_PX * 2.0;
    let origin = Point2::new(
        anchor.x() - TEXT_PLATE_PADDING_PX,
        anchor.y() - font_size - TEXT_PLATE_PADDING_PX,
    );
    canvas.set_fill_style(Rgba::WHITE.with_opacity(TEXT_PLATE_OPACITY));
    if rotation == 0.0 {
        canvas.fill_rect(origin, width, height);
    } else {
        let (sin, cos) = rotation.sin_cos();
        let turn = |x: f64, y: f64| {
            let (dx, dy) = (x - anchor.x(), y - anchor.y());
            Point2::new(anchor.x() + dx * cos - dy * sin, anchor.y() + dx * sin + dy * cos)
        };
        canvas.begin_path();
        canvas.move_to(turn(origin.x(), origin.y()));
        canvas.line_to(turn(origin.x() + width, origin.y()));
        canvas.line_to(turn(origin.x() + width, origin.y() + height));
        canvas.line_to(turn(origin.x(), origin.y() + height));
        canvas.close_path();
        canvas.fill();
    }
    canvas.set_fill_style(color);
    canvas.set_text_rotation(rotation);
    canvas.fill_text(text, anchor);
    if rotation != 0.0 {
        canvas.set_text_rotation(0.0);
    }
}

fn draw_text(canvas: &mut dyn Canvas2d, projection: &Projection, text: &Text, color: Rgba) {
    if text.content.is_empty() {
        return;
    }
    let anchor = projection.to_canvas(text.insert);
    draw_label_with_plate(
        canvas,
        &text.content,
        anchor,
        text.rotation,
        font_size_for(projection, text.height),
        color,
    );
}

fn draw_dimension(canvas: &mut dyn Canvas2d, projection: &Projection, dimension: &Dimension, color: Rgba) {
    let start = projection.to_canvas(dimension.start);
    let end = projection.to_canvas(dimension.end);

    canvas.begin_path();
    canvas.move_to(start);
    canvas.line_to(end);
    canvas.stroke();

    let direction = (end.y() - start.y()).atan2(end.x() - start.x());
    draw_arrowhead(canvas, start, direction);
    draw_arrowhead(canvas, end, direction + std::f64::consts::PI);

    let anchor = dimension
        .text_midpoint
        .map(|point| projection.to_canvas(point))
        .unwrap_or_else(|| start.midpoint(end));
    draw_label_with_plate(canvas, &dimension.display_text(), anchor, 0.0, MIN_TEXT_FONT_PX * 1.25, color);
}

/// 箭头尖端位于 `tip`，两翼沿 `direction`（指向线段内部）张开 ±30°。
fn draw_arrowhead(canvas: &mut dyn Canvas2d, tip: Point2, direction: f64) {
    canvas.begin_path();
    for wing in [direction - FRAC_PI_6, direction + FRAC_PI_6] {
        let (sin, cos) = wing.sin_cos();
        canvas.move_to(tip);
        canvas.line_to(Point2::new(
            tip.x() + ARROW_LENGTH_PX * cos,
            tip.y() + ARROW_LENGTH_PX * sin,
        ));
    }
    canvas.stroke();
}

fn draw_ellipse(canvas: &mut dyn Canvas2d, projection: &Projection, ellipse: &Ellipse) {
    let radius_x = projection.to_canvas_length(ellipse.major_axis.length());
    canvas.begin_path();
    canvas.ellipse(
        projection.to_canvas(ellipse.center),
        radius_x,
        radius_x * ellipse.ratio.abs(),
        ellipse.major_axis.angle(),
        ellipse.start_parameter,
        ellipse.end_parameter,
    );
    canvas.stroke();
}

/// 逐段二次曲线近似：以控制点为曲线控制点、相邻控制点中点为分段端点。
fn draw_spline(canvas: &mut dyn Canvas2d, projection: &Projection, spline: &Spline) {
    let points: Vec<Point2> = spline
        .control_points
        .iter()
        .map(|point| projection.to_canvas(*point))
        .collect();
    let Some((&first, rest)) = points.split_first() else {
        return;
    };
    canvas.begin_path();
    canvas.move_to(first);
    if rest.len() < 2 {
        for point in rest {
            canvas.line_to(*point);
        }
    } else {
        for pair in rest.windows(2).take(rest.len() - 2) {
            canvas.quadratic_curve_to(pair[0], pair[0].midpoint(pair[1]));
        }
        let last = rest.len() - 1;
        canvas.quadratic_curve_to(rest[last - 1], rest[last]);
    }
    if spline.is_closed {
        canvas.close_path();
    }
    canvas.stroke();
}

#[cfg(test)]
mod tests {
    use floorplan_core::floor::RoomType;
    use floorplan_core::geometry::Bounds2D;
    use floorplan_engine::analyzer::FloorAnalyzer;

    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};

    fn rectangle_walls() -> Vec<Entity> {
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(300.0, 0.0),
            Point2::new(300.0, 200.0),
            Point2::new(0.0, 200.0),
        ];
        (0..4)
            .map(|i| Entity::line(corners[i], corners[(i + 1) % 4], "WALLS"))
            .collect()
    }

    fn stroke_color_before(commands: &[DrawCommand], index: usize) -> Option<Rgba> {
        commands[..index].iter().rev().find_map(|command| match command {
            DrawCommand::SetStrokeStyle(color) => Some(*color),
            _ => None,
        })
    }

    #[test]
    fn missing_surface_is_a_no_op() {
        let renderer = PlanRenderer::default();
        let frame = RenderFrame {
            entities: &[],
            floor: None,
            hovered: None,
            projection: None,
        };
        assert_eq!(renderer.render(None, &frame), RenderOutcome::NoSurface);
    }

    #[test]
    fn missing_floor_draws_only_placeholder() {
        let renderer = PlanRenderer::default();
        let mut canvas = RecordingCanvas::new(400.0, 300.0);
        let entities = rectangle_walls();
        let frame = RenderFrame {
            entities: &entities,
            floor: None,
            hovered: None,
            projection: None,
        };
        let outcome = renderer.render(Some(&mut canvas), &frame);
        assert_eq!(outcome, RenderOutcome::Placeholder);
        assert_eq!(canvas.texts(), vec![PLACEHOLDER_MESSAGE]);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Stroke)), 0);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::FillRect { .. })), 0);
        assert!(canvas.commands().contains(&DrawCommand::FillText {
            text: PLACEHOLDER_MESSAGE.to_string(),
            position: Point2::new(200.0, 150.0),
        }));

        let empty = FloorStructure {
            rooms: Vec::new(),
            walls: Vec::new(),
            doors: Vec::new(),
            windows: Vec::new(),
            bounds: Bounds2D::from_extents(0.0, 0.0, 1.0, 1.0),
        };
        let frame = RenderFrame {
            floor: Some(&empty),
            ..frame
        };
        let mut canvas = RecordingCanvas::new(400.0, 300.0);
        assert_eq!(renderer.render(Some(&mut canvas), &frame), RenderOutcome::Placeholder);
    }

    #[test]
    fn walls_are_drawn_after_decorative_layers() {
        let renderer = PlanRenderer::default();
        let mut entities = vec![Entity::line(
            Point2::new(0.0, 0.0),
            Point2::new(300.0, 0.0),
            "WALLS",
        )];
        entities.push(Entity::circle(Point2::new(50.0, 50.0), 10.0, "FURNITURE"));
        let floor = FloorAnalyzer::default().analyze(&entities);
        let mut canvas = RecordingCanvas::new(300.0, 200.0);
        let frame = RenderFrame {
            entities: &entities,
            floor: Some(&floor),
            hovered: None,
            projection: None,
        };
        renderer.render(Some(&mut canvas), &frame);

        let commands = canvas.commands();
        let arc_index = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Arc { .. }))
            .expect("furniture circle drawn");
        let wall_index = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::LineTo(p) if (p.x() - 300.0).abs() < 1e-9))
            .expect("wall drawn");
        assert!(arc_index < wall_index);
        assert_eq!(
            stroke_color_before(commands, wall_index),
            Some(renderer.style().style(LayerCategory::Walls).color)
        );
    }

    #[test]
    fn rooms_get_dashed_overlay_and_two_line_label() {
        let renderer = PlanRenderer::default();
        let entities = rectangle_walls();
        let floor = FloorAnalyzer::default().analyze(&entities);
        let mut canvas = RecordingCanvas::new(300.0, 200.0);
        let frame = RenderFrame {
            entities: &entities,
            floor: Some(&floor),
            hovered: None,
            projection: None,
        };
        let outcome = renderer.render(Some(&mut canvas), &frame);
        assert_eq!(outcome, RenderOutcome::Rendered { entities: 4, rooms: 1 });
        assert_eq!(canvas.texts(), vec!["Living 1", "living · 60000"]);
        assert!(canvas.commands().contains(&DrawCommand::SetLineDash(ROOM_DASH.to_vec())));
        assert!(canvas.commands().contains(&DrawCommand::SetFillStyle(
            renderer
                .style()
                .room_color(RoomType::Living)
                .with_opacity(ROOM_FILL_OPACITY)
        )));
    }

    #[test]
    fn hovered_room_is_redrawn_with_highlight() {
        let renderer = PlanRenderer::default();
        let entities = rectangle_walls();
        let floor = FloorAnalyzer::default().analyze(&entities);
        let mut canvas = RecordingCanvas::new(300.0, 200.0);
        let frame = RenderFrame {
            entities: &entities,
            floor: Some(&floor),
            hovered: Some("room-0"),
            projection: None,
        };
        renderer.render(Some(&mut canvas), &frame);

        let highlight = renderer.style().highlight();
        assert!(canvas.commands().contains(&DrawCommand::SetStrokeStyle(highlight)));
        assert!(canvas.commands().contains(&DrawCommand::SetFillStyle(
            highlight.with_opacity(HIGHLIGHT_FILL_OPACITY)
        )));
        assert_eq!(canvas.texts().len(), 4);
    }

    #[test]
    fn spline_uses_quadratic_segments_through_midpoints() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        let projection = Projection {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let spline = Spline {
            control_points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(20.0, 0.0),
                Point2::new(30.0, 10.0),
            ],
            is_closed: false,
            layer: "FURNITURE".to_string(),
        };
        draw_spline(&mut canvas, &projection, &spline);
        let curves: Vec<&DrawCommand> = canvas
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::QuadraticCurveTo { .. }))
            .collect();
        assert_eq!(
            curves,
            vec![
                &DrawCommand::QuadraticCurveTo {
                    control: Point2::new(10.0, 10.0),
                    end: Point2::new(15.0, 5.0),
                },
                &DrawCommand::QuadraticCurveTo {
                    control: Point2::new(20.0, 0.0),
                    end: Point2::new(30.0, 10.0),
                },
            ]
        );
    }

    #[test]
    fn dimension_draws_two_arrowheads_and_text() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        let projection = Projection {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let dimension = Dimension {
            start: Point2::new(0.0, 50.0),
            end: Point2::new(80.0, 50.0),
            text_midpoint: None,
            text: None,
            layer: "DIMENSIONS".to_string(),
        };
        draw_dimension(&mut canvas, &projection, &dimension, Rgba::BLACK);
        // 主线 1 次，两端箭头各 1 次。
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Stroke)), 3);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::MoveTo(_))), 5);
        assert_eq!(canvas.texts(), vec!["80"]);
    }

    #[test]
    fn rotated_text_carries_its_rotation() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        let projection = Projection {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let text = Text {
            insert: Point2::new(20.0, 20.0),
            content: "Hall".to_string(),
            height: 10.0,
            rotation: FRAC_PI_2,
            layer: "TEXT".to_string(),
        };
        draw_text(&mut canvas, &projection, &text, Rgba::BLACK);

        let commands = canvas.commands();
        let text_index = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::FillText { .. }))
            .expect("text drawn");
        assert_eq!(commands[text_index - 1], DrawCommand::SetTextRotation(FRAC_PI_2));
        assert_eq!(commands.last(), Some(&DrawCommand::SetTextRotation(0.0)));
        // 底板改为旋转后的四边形路径。
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::FillRect { .. })), 0);
        assert_eq!(canvas.count(|c| matches!(c, DrawCommand::Fill)), 1);
        assert!(canvas.commands().contains(&DrawCommand::MoveTo(Point2::new(32.0, 18.0))));
    }

    #[test]
    fn door_glyph_has_leaf_and_swing() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        let projection = Projection {
            scale: 2.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let reference = BlockReference {
            name: "DOOR".to_string(),
            insert: Point2::new(10.0, 10.0),
            rotation: 0.0,
            width: None,
            layer: "DOORS".to_string(),
        };
        draw_door_glyph(&mut canvas, &projection, &reference);
        assert!(canvas.commands().contains(&DrawCommand::LineTo(Point2::new(80.0, 20.0))));
        assert!(canvas.commands().contains(&DrawCommand::Arc {
            center: Point2::new(20.0, 20.0),
            radius: 60.0,
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
        }));
    }
}
