use floorplan_core::floor::{FloorStructure, Room};
use floorplan_core::geometry::{Bounds2D, Point2};

use crate::errors::EngineError;

/// 默认放大上限，避免小图纸被过度放大。
pub const DEFAULT_MAX_SCALE: f64 = 10.0;
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;
const MIN_CANVAS_EXTENT: f64 = 1.0;

/// 视图参数：画布尺寸（像素）与放大上限，均须为有限正数。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub max_scale: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }
}

impl ViewSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("max_scale", self.max_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn fit(&self, bounds: &Bounds2D) -> Projection {
        Projection::fit(bounds, self.canvas_width, self.canvas_height, self.max_scale)
    }
}

/// 图纸单位到画布像素的缩放 + 平移变换。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Projection {
    /// `scale = min(cw / bw, ch / bh, max_scale)`，并使缩放后的图纸在画布内居中。
    pub fn fit(bounds: &Bounds2D, canvas_width: f64, canvas_height: f64, max_scale: f64) -> Self {
        let canvas_width = canvas_width.max(MIN_CANVAS_EXTENT);
        let canvas_height = canvas_height.max(MIN_CANVAS_EXTENT);
        let scale = (canvas_width / bounds.width())
            .min(canvas_height / bounds.height())
            .min(max_scale);
        let offset_x = (canvas_width - bounds.width() * scale) / 2.0 - bounds.min_x() * scale;
        let offset_y = (canvas_height - bounds.height() * scale) / 2.0 - bounds.min_y() * scale;
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    #[inline]
    pub fn to_canvas(&self, point: Point2) -> Point2 {
        Point2::new(
            self.offset_x + point.x() * self.scale,
            self.offset_y + point.y() * self.scale,
        )
    }

    #[inline]
    pub fn to_drawing(&self, pixel: Point2) -> Point2 {
        Point2::new(
            (pixel.x() - self.offset_x) / self.scale,
            (pixel.y() - self.offset_y) / self.scale,
        )
    }

    #[inline]
    pub fn to_canvas_length(&self, length: f64) -> f64 {
        length * self.scale
    }

    /// 指针位置（像素）下的房间。
    pub fn room_under_cursor<'a>(&self, floor: &'a FloorStructure, pixel: Point2) -> Option<&'a Room> {
        floor.room_at(self.to_drawing(pixel))
    }
}
