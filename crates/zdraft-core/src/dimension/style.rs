//! 标注样式
//!
//! 样式字段按 "实体覆盖 → 全局标注设置 → 内置默认值" 的顺序解析。

use crate::properties::{Color, LineWeight};
use crate::units::DrawingUnit;
use serde::{Deserialize, Serialize};

/// 箭头样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArrowStyle {
    #[default]
    ClosedFilled,
    Open,
    Tick,
    Dot,
    None,
}

/// 箭头朝向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArrowDirection {
    /// 尺寸线足够长时放在内侧，否则放在外侧
    #[default]
    Auto,
    Inside,
    Outside,
}

/// 标注文字相对尺寸线的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DimTextAlignment {
    /// 位于尺寸线上方
    #[default]
    Above,
    /// 位于尺寸线中间
    Centered,
    /// 始终水平
    Horizontal,
}

/// 可选的样式覆盖，未设置的字段回退到下一层
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DimStyleOverrides {
    pub arrow_size: Option<f64>,
    pub arrow_style: Option<ArrowStyle>,
    pub arrow_direction: Option<ArrowDirection>,
    pub arrow_color: Option<Color>,
    pub dim_line_color: Option<Color>,
    pub ext_offset: Option<f64>,
    pub ext_extend: Option<f64>,
    pub ext_weight: Option<LineWeight>,
    pub ext_color: Option<Color>,
    pub text_height: Option<f64>,
    pub text_gap: Option<f64>,
    pub text_alignment: Option<DimTextAlignment>,
    pub text_color: Option<Color>,
    pub precision: Option<u8>,
    pub show_units: Option<bool>,
    pub baseline_spacing: Option<f64>,
}

impl DimStyleOverrides {
    /// 本层优先，未设置的字段取 `lower`
    pub fn layered_over(&self, lower: &DimStyleOverrides) -> DimStyleOverrides {
        DimStyleOverrides {
            arrow_size: self.arrow_size.or(lower.arrow_size),
            arrow_style: self.arrow_style.or(lower.arrow_style),
            arrow_direction: self.arrow_direction.or(lower.arrow_direction),
            arrow_color: self.arrow_color.or(lower.arrow_color),
            dim_line_color: self.dim_line_color.or(lower.dim_line_color),
            ext_offset: self.ext_offset.or(lower.ext_offset),
            ext_extend: self.ext_extend.or(lower.ext_extend),
            ext_weight: self.ext_weight.or(lower.ext_weight),
            ext_color: self.ext_color.or(lower.ext_color),
            text_height: self.text_height.or(lower.text_height),
            text_gap: self.text_gap.or(lower.text_gap),
            text_alignment: self.text_alignment.or(lower.text_alignment),
            text_color: self.text_color.or(lower.text_color),
            precision: self.precision.or(lower.precision),
            show_units: self.show_units.or(lower.show_units),
            baseline_spacing: self.baseline_spacing.or(lower.baseline_spacing),
        }
    }

    /// 解析出完整样式
    pub fn resolve(&self, settings: &DimensionSettings) -> DimStyle {
        let merged = self.layered_over(&settings.defaults);
        let d = DimStyle::default();
        DimStyle {
            arrow_size: merged.arrow_size.unwrap_or(d.arrow_size),
            arrow_style: merged.arrow_style.unwrap_or(d.arrow_style),
            arrow_direction: merged.arrow_direction.unwrap_or(d.arrow_direction),
            arrow_color: merged.arrow_color.unwrap_or(d.arrow_color),
            dim_line_color: merged.dim_line_color.unwrap_or(d.dim_line_color),
            ext_offset: merged.ext_offset.unwrap_or(d.ext_offset),
            ext_extend: merged.ext_extend.unwrap_or(d.ext_extend),
            ext_weight: merged.ext_weight.unwrap_or(d.ext_weight),
            ext_color: merged.ext_color.unwrap_or(d.ext_color),
            text_height: merged.text_height.unwrap_or(d.text_height),
            text_gap: merged.text_gap.unwrap_or(d.text_gap),
            text_alignment: merged.text_alignment.unwrap_or(d.text_alignment),
            text_color: merged.text_color.unwrap_or(d.text_color),
            precision: merged.precision.unwrap_or(d.precision),
            show_units: merged.show_units.unwrap_or(d.show_units),
            baseline_spacing: merged.baseline_spacing.unwrap_or(d.baseline_spacing),
        }
    }
}

/// 全局标注设置（由应用层加载/保存，构造时传入引擎）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DimensionSettings {
    /// 未被实体覆盖时使用的样式
    pub defaults: DimStyleOverrides,
    /// 标注文字显示单位
    pub display_unit: DrawingUnit,
}

/// 解析后的完整标注样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimStyle {
    pub arrow_size: f64,
    pub arrow_style: ArrowStyle,
    pub arrow_direction: ArrowDirection,
    pub arrow_color: Color,
    pub dim_line_color: Color,
    pub ext_offset: f64,
    pub ext_extend: f64,
    pub ext_weight: LineWeight,
    pub ext_color: Color,
    pub text_height: f64,
    pub text_gap: f64,
    pub text_alignment: DimTextAlignment,
    pub text_color: Color,
    pub precision: u8,
    pub show_units: bool,
    pub baseline_spacing: f64,
}

impl Default for DimStyle {
    fn default() -> Self {
        Self {
            arrow_size: 2.5,
            arrow_style: ArrowStyle::ClosedFilled,
            arrow_direction: ArrowDirection::Auto,
            arrow_color: Color::ByLayer,
            dim_line_color: Color::ByLayer,
            ext_offset: 0.625,
            ext_extend: 1.25,
            ext_weight: LineWeight::BY_LAYER,
            ext_color: Color::ByLayer,
            text_height: 2.5,
            text_gap: 0.625,
            text_alignment: DimTextAlignment::Above,
            text_color: Color::ByLayer,
            precision: 2,
            show_units: false,
            baseline_spacing: 3.75,
        }
    }
}

impl DimStyle {
    /// 格式化长度值（基础单位输入）
    pub fn format_length(&self, value: f64, unit: DrawingUnit) -> String {
        let shown = unit.from_base(value);
        let prec = self.precision as usize;
        if self.show_units {
            format!("{shown:.prec$}{}", unit.suffix())
        } else {
            format!("{shown:.prec$}")
        }
    }

    /// 格式化角度值（弧度输入，显示为度）
    pub fn format_angle(&self, radians: f64) -> String {
        let prec = self.precision.min(4) as usize;
        format!("{:.prec$}°", radians.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        let settings = DimensionSettings {
            defaults: DimStyleOverrides {
                arrow_size: Some(5.0),
                text_height: Some(3.5),
                ..Default::default()
            },
            display_unit: DrawingUnit::Millimeter,
        };
        let entity = DimStyleOverrides {
            arrow_size: Some(1.0),
            ..Default::default()
        };

        let style = entity.resolve(&settings);
        // 实体覆盖优先
        assert_eq!(style.arrow_size, 1.0);
        // 回退到全局设置
        assert_eq!(style.text_height, 3.5);
        // 回退到内置默认
        assert_eq!(style.ext_offset, DimStyle::default().ext_offset);
    }

    #[test]
    fn test_format_length_with_units() {
        let style = DimStyle {
            precision: 1,
            show_units: true,
            ..Default::default()
        };
        assert_eq!(style.format_length(254.0, DrawingUnit::Inch), "10.0in");
        assert_eq!(DimStyle::default().format_length(12.345, DrawingUnit::Millimeter), "12.35");
    }
}
