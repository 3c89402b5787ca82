//! 二维绘图上下文抽象。
//!
//! 接口形状对应常见的 2D canvas：路径构建、填充/描边样式、虚线与文字度量。
//! 坐标均为画布像素，角度为弧度并按角度增大方向绘制。

use floorplan_core::geometry::Point2;

use crate::errors::FrontendError;

/// 8 位 RGBA 颜色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// 解析 `#rrggbb` / `#rrggbbaa`。
    pub fn from_hex(key: &str, value: &str) -> Result<Self, FrontendError> {
        let invalid = || FrontendError::InvalidColor {
            key: key.to_string(),
            value: value.to_string(),
        };
        let digits = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |index: usize| {
            u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).map_err(|_| invalid())
        };
        let a = if digits.len() == 8 { channel(3)? } else { 255 };
        Ok(Self {
            r: channel(0)?,
            g: channel(1)?,
            b: channel(2)?,
            a,
        })
    }

    /// 以 0..=1 的不透明度替换 alpha 通道。
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    #[inline]
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
}

pub trait Canvas2d {
    /// 画布尺寸（像素）。
    fn size(&self) -> (f64, f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point2);
    fn line_to(&mut self, point: Point2);
    fn quadratic_curve_to(&mut self, control: Point2, end: Point2);
    fn arc(&mut self, center: Point2, radius: f64, start_angle: f64, end_angle: f64);
    fn ellipse(
        &mut self,
        center: Point2,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    );
    fn rect(&mut self, origin: Point2, width: f64, height: f64);
    fn close_path(&mut self);

    fn set_stroke_style(&mut self, color: Rgba);
    fn set_fill_style(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f64);
    /// 空切片表示实线。
    fn set_line_dash(&mut self, pattern: &[f64]);
    fn set_font_size(&mut self, pixels: f64);
    fn set_text_align(&mut self, align: TextAlign);
    /// 后续文字绕各自锚点旋转的角度（弧度），0 为水平。
    fn set_text_rotation(&mut self, radians: f64);

    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_rect(&mut self, origin: Point2, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, position: Point2);
    /// 文字宽度（像素），使用当前字号。
    fn measure_text(&self, text: &str) -> f64;
}

/// 无字体度量时的等宽近似：每个字符占字号的 0.6 倍。
pub(crate) fn approximate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.6
}

/// 记录下来的单条绘制调用。
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    MoveTo(Point2),
    LineTo(Point2),
    QuadraticCurveTo { control: Point2, end: Point2 },
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Ellipse {
        center: Point2,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Rect { origin: Point2, width: f64, height: f64 },
    ClosePath,
    SetStrokeStyle(Rgba),
    SetFillStyle(Rgba),
    SetLineWidth(f64),
    SetLineDash(Vec<f64>),
    SetFontSize(f64),
    SetTextAlign(TextAlign),
    SetTextRotation(f64),
    Stroke,
    Fill,
    FillRect { origin: Point2, width: f64, height: f64 },
    FillText { text: String, position: Point2 },
}

/// 只记录调用序列的画布，用于测试与无界面环境。
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    font_size: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            font_size: 10.0,
            commands: Vec::new(),
        }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// 所有 `fill_text` 调用的文字，按绘制顺序。
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|command| predicate(command)).count()
    }
}

impl Canvas2d for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, point: Point2) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point2) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn quadratic_curve_to(&mut self, control: Point2, end: Point2) {
        self.commands
            .push(DrawCommand::QuadraticCurveTo { control, end });
    }

    fn arc(&mut self, center: Point2, radius: f64, start_angle: f64, end_angle: f64) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
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
        self.commands.push(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            end_angle,
        });
    }

    fn rect(&mut self, origin: Point2, width: f64, height: f64) {
        self.commands.push(DrawCommand::Rect {
            origin,
            width,
            height,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn set_stroke_style(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::SetStrokeStyle(color));
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::SetFillStyle(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.commands.push(DrawCommand::SetLineDash(pattern.to_vec()));
    }

    fn set_font_size(&mut self, pixels: f64) {
        self.font_size = pixels;
        self.commands.push(DrawCommand::SetFontSize(pixels));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::SetTextAlign(align));
    }

    fn set_text_rotation(&mut self, radians: f64) {
        self.commands.push(DrawCommand::SetTextRotation(radians));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn fill_rect(&mut self, origin: Point2, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, position: Point2) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            position,
        });
    }

    fn measure_text(&self, text: &str) -> f64 {
        approximate_text_width(text, self.font_size)
    }
}
