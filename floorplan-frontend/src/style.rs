use std::collections::BTreeMap;

use floorplan_config::{LayerConfig, RenderConfig};
use floorplan_core::floor::RoomType;

use crate::canvas::Rgba;
use crate::errors::FrontendError;

/// 渲染用的图层类别。`DRAW_ORDER` 为自底向上的绘制顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerCategory {
    Dimensions,
    Furniture,
    Text,
    Windows,
    Doors,
    Walls,
    Default,
}

impl LayerCategory {
    pub const DRAW_ORDER: [LayerCategory; 7] = [
        LayerCategory::Dimensions,
        LayerCategory::Furniture,
        LayerCategory::Text,
        LayerCategory::Windows,
        LayerCategory::Doors,
        LayerCategory::Walls,
        LayerCategory::Default,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LayerCategory::Dimensions => "dimensions",
            LayerCategory::Furniture => "furniture",
            LayerCategory::Text => "text",
            LayerCategory::Windows => "windows",
            LayerCategory::Doors => "doors",
            LayerCategory::Walls => "walls",
            LayerCategory::Default => "default",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::DRAW_ORDER
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(key.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub color: Rgba,
    pub line_width: f64,
}

impl LayerStyle {
    const fn new(color: Rgba, line_width: f64) -> Self {
        Self { color, line_width }
    }
}

const DIMENSION_LAYERS: [&str; 2] = ["DIMENSIONS", "DIM"];
const FURNITURE_LAYERS: [&str; 2] = ["FURNITURE", "FURN"];
const TEXT_LAYERS: [&str; 2] = ["TEXT", "ANNOTATION"];

/// 图层名 → 类别 → `{color, line_width}` 的静态样式表，另含房间填充色与悬停高亮色。
#[derive(Debug, Clone)]
pub struct StyleTable {
    layer_categories: BTreeMap<String, LayerCategory>,
    styles: BTreeMap<LayerCategory, LayerStyle>,
    room_colors: BTreeMap<RoomType, Rgba>,
    highlight: Rgba,
    background: Rgba,
}

impl Default for StyleTable {
    fn default() -> Self {
        let layers = LayerConfig::default();
        let mut table = Self {
            layer_categories: BTreeMap::new(),
            styles: BTreeMap::from([
                (LayerCategory::Dimensions, LayerStyle::new(Rgba::rgb(0x7f, 0x8c, 0x8d), 1.0)),
                (LayerCategory::Furniture, LayerStyle::new(Rgba::rgb(0x95, 0xa5, 0xa6), 1.0)),
                (LayerCategory::Text, LayerStyle::new(Rgba::rgb(0x33, 0x33, 0x33), 1.0)),
                (LayerCategory::Windows, LayerStyle::new(Rgba::rgb(0x34, 0x98, 0xdb), 2.0)),
                (LayerCategory::Doors, LayerStyle::new(Rgba::rgb(0x8b, 0x45, 0x13), 2.0)),
                (LayerCategory::Walls, LayerStyle::new(Rgba::rgb(0x2c, 0x3e, 0x50), 3.0)),
                (LayerCategory::Default, LayerStyle::new(Rgba::rgb(0x55, 0x55, 0x55), 1.0)),
            ]),
            room_colors: BTreeMap::from([
                (RoomType::Bathroom, Rgba::rgb(0x34, 0x98, 0xdb)),
                (RoomType::Bedroom, Rgba::rgb(0x9b, 0x59, 0xb6)),
                (RoomType::Living, Rgba::rgb(0x2e, 0xcc, 0x71)),
                (RoomType::Room, Rgba::rgb(0xf1, 0xc4, 0x0f)),
            ]),
            highlight: Rgba::rgb(0xff, 0x98, 0x00),
            background: Rgba::WHITE,
        };
        table.assign_layers(&layers);
        table
    }
}

impl StyleTable {
    /// 按配置构建：图层角色来自 `[layers]`，颜色覆盖来自 `[render]`。
    pub fn from_config(layers: &LayerConfig, render: &RenderConfig) -> Result<Self, FrontendError> {
        let mut table = Self::default();
        table.layer_categories.clear();
        table.assign_layers(layers);

        for (key, value) in &render.layer_colors {
            let category = LayerCategory::from_key(key)
                .ok_or_else(|| FrontendError::UnknownStyleKey(key.clone()))?;
            let color = Rgba::from_hex(key, value)?;
            if let Some(style) = table.styles.get_mut(&category) {
                style.color = color;
            }
        }
        for (key, value) in &render.room_colors {
            let room_type = RoomType::ALL
                .into_iter()
                .find(|room_type| room_type.as_str().eq_ignore_ascii_case(key.trim()))
                .ok_or_else(|| FrontendError::UnknownStyleKey(key.clone()))?;
            table.room_colors.insert(room_type, Rgba::from_hex(key, value)?);
        }
        table.highlight = Rgba::from_hex("highlight_color", &render.highlight_color)?;
        Ok(table)
    }

    fn assign_layers(&mut self, layers: &LayerConfig) {
        let groups: [(LayerCategory, Vec<&str>); 7] = [
            (LayerCategory::Dimensions, DIMENSION_LAYERS.to_vec()),
            (LayerCategory::Furniture, FURNITURE_LAYERS.to_vec()),
            (LayerCategory::Text, TEXT_LAYERS.to_vec()),
            (LayerCategory::Windows, layers.window_layers.iter().map(String::as_str).collect()),
            (LayerCategory::Doors, layers.door_layers.iter().map(String::as_str).collect()),
            (LayerCategory::Walls, layers.wall_layers.iter().map(String::as_str).collect()),
            (LayerCategory::Default, layers.default_layers.iter().map(String::as_str).collect()),
        ];
        for (category, names) in groups {
            for name in names {
                self.layer_categories
                    .insert(name.trim().to_ascii_uppercase(), category);
            }
        }
    }

    /// 图层名所属类别，未登记的图层归入 `Default`。
    pub fn category(&self, layer: &str) -> LayerCategory {
        self.layer_categories
            .get(&layer.trim().to_ascii_uppercase())
            .copied()
            .unwrap_or(LayerCategory::Default)
    }

    pub fn style(&self, category: LayerCategory) -> LayerStyle {
        self.styles
            .get(&category)
            .copied()
            .unwrap_or(LayerStyle::new(Rgba::BLACK, 1.0))
    }

    #[inline]
    pub fn layer_style(&self, layer: &str) -> LayerStyle {
        self.style(self.category(layer))
    }

    pub fn room_color(&self, room_type: RoomType) -> Rgba {
        self.room_colors
            .get(&room_type)
            .copied()
            .unwrap_or(Rgba::BLACK)
    }

    #[inline]
    pub fn highlight(&self) -> Rgba {
        self.highlight
    }

    #[inline]
    pub fn background(&self) -> Rgba {
        self.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_map_to_categories_case_insensitively() {
        let table = StyleTable::default();
        assert_eq!(table.category("walls"), LayerCategory::Walls);
        assert_eq!(table.category("Window"), LayerCategory::Windows);
        assert_eq!(table.category("DOORS"), LayerCategory::Doors);
        assert_eq!(table.category("dim"), LayerCategory::Dimensions);
        assert_eq!(table.category("0"), LayerCategory::Default);
        assert_eq!(table.category("E-LIGHTING"), LayerCategory::Default);
        assert!(table.style(LayerCategory::Walls).line_width > table.style(LayerCategory::Text).line_width);
    }

    #[test]
    fn config_overrides_colors_and_roles() {
        let layers = LayerConfig {
            wall_layers: vec!["A-WALL".to_string()],
            ..LayerConfig::default()
        };
        let mut render = RenderConfig::default();
        render.layer_colors.insert("walls".to_string(), "#101010".to_string());
        render.room_colors.insert("Bedroom".to_string(), "#3366ff".to_string());
        render.highlight_color = "#00ff00".to_string();

        let table = StyleTable::from_config(&layers, &render).expect("style table");
        assert_eq!(table.category("a-wall"), LayerCategory::Walls);
        assert_eq!(table.category("WALLS"), LayerCategory::Default);
        assert_eq!(table.layer_style("A-WALL").color, Rgba::rgb(0x10, 0x10, 0x10));
        assert_eq!(table.room_color(RoomType::Bedroom), Rgba::rgb(0x33, 0x66, 0xff));
        assert_eq!(table.highlight(), Rgba::rgb(0, 0xff, 0));
    }

    #[test]
    fn unknown_keys_and_bad_colors_are_rejected() {
        let mut render = RenderConfig::default();
        render.layer_colors.insert("roof".to_string(), "#101010".to_string());
        assert!(matches!(
            StyleTable::from_config(&LayerConfig::default(), &render),
            Err(FrontendError::UnknownStyleKey(key)) if key == "roof"
        ));

        let render = RenderConfig {
            highlight_color: "orange".to_string(),
            ..RenderConfig::default()
        };
        assert!(matches!(
            StyleTable::from_config(&LayerConfig::default(), &render),
            Err(FrontendError::InvalidColor { .. })
        ));
    }

    #[test]
    fn draw_order_puts_walls_above_decoration() {
        let order = LayerCategory::DRAW_ORDER;
        let position = |category| order.iter().position(|c| *c == category);
        assert!(position(LayerCategory::Walls) > position(LayerCategory::Furniture));
        assert!(position(LayerCategory::Doors) > position(LayerCategory::Windows));
        assert_eq!(order.last(), Some(&LayerCategory::Default));
    }
}
