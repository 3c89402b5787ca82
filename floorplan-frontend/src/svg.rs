use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use floorplan_core::geometry::Point2;

use crate::canvas::{Canvas2d, Rgba, TextAlign, approximate_text_width};
use crate::errors::FrontendError;

const FULL_TURN_EPSILON: f64 = 1e-9;

/// 软件 SVG 画布：把路径与文字调用累积为 SVG 元素。
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    body: String,
    path: String,
    has_current_point: bool,
    stroke: Rgba,
    fill: Rgba,
    line_width: f64,
    dash: Vec<f64>,
    font_size: f64,
    align: TextAlign,
    text_rotation: f64,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            path: String::new(),
            has_current_point: false,
            stroke: Rgba::BLACK,
            fill: Rgba::BLACK,
            line_width: 1.0,
            dash: Vec::new(),
            font_size: 10.0,
            align: TextAlign::Start,
            text_rotation: 0.0,
        }
    }

    /// 生成完整 SVG 文本。
    pub fn finish(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
"#,
            w = fmt_num(self.width),
            h = fmt_num(self.height)
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    pub fn write_to(&self, path: &Path) -> Result<(), FrontendError> {
        fs::write(path, self.finish()).map_err(|source| FrontendError::WriteSvg {
            path: path.to_path_buf(),
            source,
        })
    }

    fn connect(&mut self, point: Point2) {
        let command = if self.has_current_point { 'L' } else { 'M' };
        let _ = write!(self.path, "{command}{} {} ", fmt_num(point.x()), fmt_num(point.y()));
        self.has_current_point = true;
    }

    /// 以 SVG 椭圆弧命令追加一段弧线；整圈拆分为两个半圈。
    fn elliptical_arc(
        &mut self,
        center: Point2,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) {
        let point_at = |angle: f64| {
            let (sin_r, cos_r) = rotation.sin_cos();
            let local_x = radius_x * angle.cos();
            let local_y = radius_y * angle.sin();
            Point2::new(
                center.x() + local_x * cos_r - local_y * sin_r,
                center.y() + local_x * sin_r + local_y * cos_r,
            )
        };

        let mut sweep = end_angle - start_angle;
        if sweep >= TAU - FULL_TURN_EPSILON {
            sweep = TAU;
        } else {
            sweep = sweep.rem_euclid(TAU);
        }

        self.connect(point_at(start_angle));
        let halves: &[(f64, f64)] = if sweep >= TAU {
            &[(0.0, PI), (PI, TAU)]
        } else {
            &[(0.0, 1.0)]
        };
        for &(from, to) in halves {
            let (segment_end, segment_sweep) = if sweep >= TAU {
                (start_angle + to, to - from)
            } else {
                (start_angle + sweep * to, sweep)
            };
            let end = point_at(segment_end);
            let large_arc = u8::from(segment_sweep > PI);
            let _ = write!(
                self.path,
                "A{} {} {} {} 1 {} {} ",
                fmt_num(radius_x),
                fmt_num(radius_y),
                fmt_num(rotation.to_degrees()),
                large_arc,
                fmt_num(end.x()),
                fmt_num(end.y())
            );
        }
    }

    fn push_path_element(&mut self, paint: &str) {
        if self.path.is_empty() {
            return;
        }
        let d = self.path.trim_end().to_string();
        let _ = writeln!(self.body, r#"  <path d="{d}" {paint}/>"#);
    }
}

impl Canvas2d for SvgCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.has_current_point = false;
    }

    fn move_to(&mut self, point: Point2) {
        let _ = write!(self.path, "M{} {} ", fmt_num(point.x()), fmt_num(point.y()));
        self.has_current_point = true;
    }

    fn line_to(&mut self, point: Point2) {
        self.connect(point);
    }

    fn quadratic_curve_to(&mut self, control: Point2, end: Point2) {
        if !self.has_current_point {
            self.move_to(control);
        }
        let _ = write!(
            self.path,
            "Q{} {} {} {} ",
            fmt_num(control.x()),
            fmt_num(control.y()),
            fmt_num(end.x()),
            fmt_num(end.y())
        );
    }

    fn arc(&mut self, center: Point2, radius: f64, start_angle: f64, end_angle: f64) {
        self.elliptical_arc(center, radius, radius, 0.0, start_angle, end_angle);
    }

    fn ellipse(
        &mut self,
        center: Point2,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) {
        self.elliptical_arc(center, radius_x, radius_y, rotation, start_angle, end_angle);
    }

    fn rect(&mut self, origin: Point2, width: f64, height: f64) {
        let _ = write!(
            self.path,
            "M{} {} h{} v{} h{} Z ",
            fmt_num(origin.x()),
            fmt_num(origin.y()),
            fmt_num(width),
            fmt_num(height),
            fmt_num(-width)
        );
        self.has_current_point = true;
    }

    fn close_path(&mut self) {
        if self.has_current_point {
            self.path.push_str("Z ");
        }
    }

    fn set_stroke_style(&mut self, color: Rgba) {
        self.stroke = color;
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.dash = pattern.to_vec();
    }

    fn set_font_size(&mut self, pixels: f64) {
        self.font_size = pixels;
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn set_text_rotation(&mut self, radians: f64) {
        self.text_rotation = radians;
    }

    fn stroke(&mut self) {
        let mut paint = format!(
            r#"fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{}""#,
            self.stroke.to_hex(),
            fmt_num(self.stroke.opacity()),
            fmt_num(self.line_width)
        );
        if !self.dash.is_empty() {
            let pattern: Vec<String> = self.dash.iter().map(|value| fmt_num(*value)).collect();
            let _ = write!(paint, r#" stroke-dasharray="{}""#, pattern.join(" "));
        }
        self.push_path_element(&paint);
    }

    fn fill(&mut self) {
        let paint = format!(
            r#"fill="{}" fill-opacity="{}" stroke="none""#,
            self.fill.to_hex(),
            fmt_num(self.fill.opacity())
        );
        self.push_path_element(&paint);
    }

    fn fill_rect(&mut self, origin: Point2, width: f64, height: f64) {
        let _ = writeln!(
            self.body,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}"/>"#,
            fmt_num(origin.x()),
            fmt_num(origin.y()),
            fmt_num(width),
            fmt_num(height),
            self.fill.to_hex(),
            fmt_num(self.fill.opacity())
        );
    }

    fn fill_text(&mut self, text: &str, position: Point2) {
        let anchor = match self.align {
            TextAlign::Start => "start",
            TextAlign::Center => "middle",
        };
        let transform = if self.text_rotation == 0.0 {
            String::new()
        } else {
            format!(
                r#" transform="rotate({} {} {})""#,
                fmt_num(self.text_rotation.to_degrees()),
                fmt_num(position.x()),
                fmt_num(position.y())
            )
        };
        let _ = writeln!(
            self.body,
            r#"  <text x="{}" y="{}"{transform} font-size="{}" font-family="sans-serif" text-anchor="{anchor}" fill="{}" fill-opacity="{}">{}</text>"#,
            fmt_num(position.x()),
            fmt_num(position.y()),
            fmt_num(self.font_size),
            self.fill.to_hex(),
            fmt_num(self.fill.opacity()),
            escape_xml(text)
        );
    }

    fn measure_text(&self, text: &str) -> f64 {
        approximate_text_width(text, self.font_size)
    }
}

/// 保留两位小数并去掉多余的零。
fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
