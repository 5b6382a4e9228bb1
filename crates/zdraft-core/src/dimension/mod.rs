//! 尺寸标注
//!
//! 标注实体只保存定义点、放置点和样式覆盖；几何布局在需要时由
//! [`layout`] 中的纯函数计算。

mod chain;
mod layout;
mod style;

pub use chain::DimChain;
pub use layout::{
    aligned_layout, angular_layout, linear_layout, linear_rotation_for, radial_layout, Arrow,
    AngularLayout, DimLayout, LinearLayout, RadialLayout,
};
pub(crate) use layout::infinite_line_intersection;
pub use style::{
    ArrowDirection, ArrowStyle, DimStyle, DimStyleOverrides, DimTextAlignment, DimensionSettings,
};

use crate::geometry::Line;
use crate::math::{BoundingBox2, Point2};
use crate::transform::Transform2D;
use crate::units::DrawingUnit;
use serde::{Deserialize, Serialize};

/// 标注类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionKind {
    /// 线性标注 (Linear) - 水平或垂直
    Linear,
    /// 对齐标注 (Aligned)
    Aligned,
    Angular,
    /// 半径标注
    Radius,
    /// 直径标注
    Diameter,
    /// 连续标注
    Continue,
    /// 基线标注
    Baseline,
}

/// 标注的定义几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DimDefinition {
    /// 两点沿 `rotation` 方向测量
    Linear {
        start: Point2,
        end: Point2,
        rotation: f64,
    },
    /// 两点直线距离
    Aligned { start: Point2, end: Point2 },
    /// 两条直线的夹角
    Angular { first: Line, second: Line },
    /// 圆或圆弧（圆心 + 半径）
    Radial { center: Point2, radius: f64 },
}

/// 尺寸标注
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub kind: DimensionKind,
    pub definition: DimDefinition,
    /// 标注线位置点 (决定标注线的高度/距离，角度标注为弧位置)
    pub placement: Point2,
    /// 覆盖文本 (如果为空则显示测量值)
    pub text_override: Option<String>,
    /// 文本位置 (如果为None，则自动计算默认位置)
    pub text_position: Option<Point2>,
    /// 实体级样式覆盖
    #[serde(default)]
    pub style: DimStyleOverrides,
}

impl Dimension {
    fn with_definition(kind: DimensionKind, definition: DimDefinition, placement: Point2) -> Self {
        Self {
            kind,
            definition,
            placement,
            text_override: None,
            text_position: None,
            style: DimStyleOverrides::default(),
        }
    }

    /// 线性标注，根据放置点自动选择水平或垂直
    pub fn linear(start: Point2, end: Point2, placement: Point2) -> Self {
        let rotation = linear_rotation_for(start, end, placement);
        Self::rotated(start, end, rotation, placement)
    }

    /// 指定测量方向的线性标注
    pub fn rotated(start: Point2, end: Point2, rotation: f64, placement: Point2) -> Self {
        Self::with_definition(
            DimensionKind::Linear,
            DimDefinition::Linear { start, end, rotation },
            placement,
        )
    }

    pub fn aligned(start: Point2, end: Point2, placement: Point2) -> Self {
        Self::with_definition(DimensionKind::Aligned, DimDefinition::Aligned { start, end }, placement)
    }

    pub fn angular(first: Line, second: Line, placement: Point2) -> Self {
        Self::with_definition(DimensionKind::Angular, DimDefinition::Angular { first, second }, placement)
    }

    pub fn radius(center: Point2, radius: f64, placement: Point2) -> Self {
        Self::with_definition(DimensionKind::Radius, DimDefinition::Radial { center, radius }, placement)
    }

    pub fn diameter(center: Point2, radius: f64, placement: Point2) -> Self {
        Self::with_definition(DimensionKind::Diameter, DimDefinition::Radial { center, radius }, placement)
    }

    pub fn with_kind(mut self, kind: DimensionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_text_override(mut self, text: impl Into<String>) -> Self {
        self.text_override = Some(text.into());
        self
    }

    /// 按给定样式计算布局
    pub fn layout(&self, style: &DimStyle) -> DimLayout {
        let mut layout = match &self.definition {
            DimDefinition::Linear { start, end, rotation } => {
                DimLayout::Linear(linear_layout(*start, *end, *rotation, self.placement, style))
            }
            DimDefinition::Aligned { start, end } => {
                DimLayout::Linear(aligned_layout(*start, *end, self.placement, style))
            }
            DimDefinition::Angular { first, second } => {
                DimLayout::Angular(angular_layout(first, second, self.placement, style))
            }
            DimDefinition::Radial { center, radius } => DimLayout::Radial(radial_layout(
                *center,
                *radius,
                self.placement,
                self.kind == DimensionKind::Diameter,
                style,
            )),
        };
        if let Some(pos) = self.text_position {
            layout.set_text_position(pos);
        }
        layout
    }

    /// 获取测量值（长度为基础单位，角度为弧度）
    pub fn measurement(&self) -> f64 {
        match &self.definition {
            DimDefinition::Linear { start, end, rotation } => {
                ((end.x - start.x) * rotation.cos() + (end.y - start.y) * rotation.sin()).abs()
            }
            DimDefinition::Aligned { start, end } => (end - start).norm(),
            DimDefinition::Angular { .. } => self.layout(&DimStyle::default()).measurement(),
            DimDefinition::Radial { radius, .. } => {
                if self.kind == DimensionKind::Diameter {
                    radius * 2.0
                } else {
                    *radius
                }
            }
        }
    }

    /// 获取显示的文本
    pub fn display_text(&self, style: &DimStyle, unit: DrawingUnit) -> String {
        if let Some(text) = &self.text_override {
            return text.clone();
        }
        let val = self.measurement();
        match self.kind {
            DimensionKind::Angular => style.format_angle(val),
            DimensionKind::Radius => format!("R{}", style.format_length(val, unit)),
            DimensionKind::Diameter => format!("Ø{}", style.format_length(val, unit)),
            _ => style.format_length(val, unit),
        }
    }

    /// 按全局设置（样式回退和显示单位）得到的标注文字
    pub fn label(&self, settings: &DimensionSettings) -> String {
        self.display_text(&self.style.resolve(settings), settings.display_unit)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        self.layout(&DimStyle::default()).bounding_box()
    }

    /// 到尺寸线、尺寸界线或文字位置的最短距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        let layout = self.layout(&DimStyle::default());
        layout
            .distance_to_point(point)
            .min((layout.text_position() - point).norm())
    }

    pub fn transformed(&self, t: &Transform2D) -> Dimension {
        let definition = match &self.definition {
            DimDefinition::Linear { start, end, rotation } => DimDefinition::Linear {
                start: t.apply(start),
                end: t.apply(end),
                rotation: t.apply_angle(*rotation),
            },
            DimDefinition::Aligned { start, end } => DimDefinition::Aligned {
                start: t.apply(start),
                end: t.apply(end),
            },
            DimDefinition::Angular { first, second } => DimDefinition::Angular {
                first: Line::new(t.apply(&first.start), t.apply(&first.end)),
                second: Line::new(t.apply(&second.start), t.apply(&second.end)),
            },
            DimDefinition::Radial { center, radius } => DimDefinition::Radial {
                center: t.apply(center),
                radius: radius * t.scale_factor(),
            },
        };
        Dimension {
            definition,
            placement: t.apply(&self.placement),
            text_position: self.text_position.map(|p| t.apply(&p)),
            ..self.clone()
        }
    }
}
