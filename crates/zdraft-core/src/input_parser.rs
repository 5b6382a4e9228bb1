//! 命令行输入解析器
//!
//! 支持多种输入格式：
//! - 绝对坐标: `100,50`
//! - 相对坐标: `@100,50`
//! - 极坐标: `@100<45` (相对) 或 `100<45` (长度+角度)
//! - 长度: `100`
//! - 角度: `<45`
//! - 关键字: `C`、`CLOSE`、`U`、`D` 等
//!
//! 长度和坐标按绘图单位输入，解析结果换算为基础单位（毫米）。
//! 角度按度输入，解析结果为弧度。

use crate::error::ParseError;
use crate::math::{polar, Point2};
use crate::units::DrawingUnit;

/// 解析后的输入值
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// 点坐标
    Point(Point2),
    /// 长度值
    Length(f64),
    /// 角度值（弧度）
    Angle(f64),
    /// 长度和角度（弧度）
    LengthAngle { length: f64, angle: f64 },
    /// 命令关键字（已转为大写）
    Keyword(String),
}

/// 输入解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct InputParser {
    unit: DrawingUnit,
}

impl InputParser {
    pub fn new(unit: DrawingUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> DrawingUnit {
        self.unit
    }

    /// 解析输入字符串
    ///
    /// `reference_point` 用于相对坐标和相对极坐标。
    pub fn parse(&self, input: &str, reference_point: Option<Point2>) -> Result<InputValue, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::MissingValue("Empty input".to_string()));
        }

        if is_keyword(input) {
            return Ok(InputValue::Keyword(input.to_uppercase()));
        }

        // 长度+角度 ("100<45" 或 "@100<45")
        if let Some(angle_pos) = input.rfind('<') {
            let (prefix, angle_str) = input.split_at(angle_pos);
            let angle = parse_number(&angle_str[1..], "angle")?.to_radians();

            let (is_relative, length_str) = match prefix.strip_prefix('@') {
                Some(rest) => (true, rest),
                None => (false, prefix),
            };
            if length_str.trim().is_empty() {
                return Ok(InputValue::Angle(angle));
            }
            let length = self.unit.to_base(parse_number(length_str, "length")?);

            if !is_relative {
                return Ok(InputValue::LengthAngle { length, angle });
            }
            let origin = reference_point.ok_or_else(|| {
                ParseError::MissingValue("Reference point required for relative polar coordinate".to_string())
            })?;
            return Ok(InputValue::Point(polar(origin, length, angle)));
        }

        // 坐标 ("100,50" 或 "@100,50")
        if let Some((x_str, y_str)) = input.split_once(',') {
            let (is_relative, x_str) = match x_str.strip_prefix('@') {
                Some(rest) => (true, rest),
                None => (false, x_str),
            };
            let x = self.unit.to_base(parse_number(x_str, "X coordinate")?);
            let y = self.unit.to_base(parse_number(y_str, "Y coordinate")?);

            if !is_relative {
                return Ok(InputValue::Point(Point2::new(x, y)));
            }
            let origin = reference_point.ok_or_else(|| {
                ParseError::MissingValue("Reference point required for relative coordinate".to_string())
            })?;
            return Ok(InputValue::Point(Point2::new(origin.x + x, origin.y + y)));
        }

        let value = parse_number(input, "value")?;
        Ok(InputValue::Length(self.unit.to_base(value)))
    }

    /// 解析为尺寸（宽高），用于矩形
    pub fn parse_dimensions(&self, input: &str) -> Result<(f64, f64), ParseError> {
        let (w_str, h_str) = input
            .trim()
            .split_once(',')
            .ok_or_else(|| ParseError::InvalidFormat("Dimensions must be in format 'width,height'".to_string()))?;
        let width = self.unit.to_base(parse_number(w_str, "width")?);
        let height = self.unit.to_base(parse_number(h_str, "height")?);
        Ok((width, height))
    }

    /// 解析为无单位的数值（边数、角度、比例因子）
    pub fn parse_scalar(input: &str) -> Result<f64, ParseError> {
        parse_number(input, "value")
    }
}

fn parse_number(s: &str, what: &str) -> Result<f64, ParseError> {
    let s = s.trim();
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidFormat(format!("Invalid {what}: {s}")))
}

/// 纯字母的输入视为关键字
fn is_keyword(input: &str) -> bool {
    input.chars().all(|c| c.is_ascii_alphabetic())
        && !matches!(input.to_ascii_lowercase().as_str(), "inf" | "infinity" | "nan")
}
