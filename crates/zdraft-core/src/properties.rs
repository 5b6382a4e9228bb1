//! 实体视觉属性：颜色、线型、线宽

use serde::{Deserialize, Serialize};

/// 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Color {
    /// 随层
    #[default]
    ByLayer,
    /// 随块
    ByBlock,
    /// ACI 索引色（1-255）
    Index(u8),
    /// 真彩色
    Rgb(u8, u8, u8),
}

impl Color {
    pub const RED: Color = Color::Index(1);
    pub const WHITE: Color = Color::Index(7);

    /// 解析为具体颜色，`ByLayer`/`ByBlock` 使用给定的图层颜色
    pub fn resolve(&self, layer_color: Color) -> Color {
        match self {
            Color::ByLayer | Color::ByBlock => layer_color,
            other => *other,
        }
    }
}

/// 线型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineType {
    #[default]
    ByLayer,
    Continuous,
    Dashed,
    Dotted,
    DashDot,
    Center,
    Hidden,
    /// 自定义线型名
    Named(String),
}

/// 线宽（百分之一毫米，负值为特殊含义）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWeight(pub i16);

impl LineWeight {
    pub const BY_LAYER: LineWeight = LineWeight(-1);
    pub const BY_BLOCK: LineWeight = LineWeight(-2);
    pub const DEFAULT: LineWeight = LineWeight(-3);

    /// 以毫米表示的线宽，特殊值返回 None
    pub fn millimeters(&self) -> Option<f64> {
        (self.0 >= 0).then(|| self.0 as f64 / 100.0)
    }
}

impl Default for LineWeight {
    fn default() -> Self {
        Self::BY_LAYER
    }
}

/// 实体属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Properties {
    pub color: Color,
    pub line_type: LineType,
    pub line_weight: LineWeight,
}

impl Properties {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}
