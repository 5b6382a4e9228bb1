//! 绘图单位
//!
//! 坐标以毫米为基础单位存储，输入/显示时按绘图单位换算。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// 绘图（显示）单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrawingUnit {
    #[default]
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Feet,
}

impl DrawingUnit {
    pub const ALL: [DrawingUnit; 5] = [
        DrawingUnit::Millimeter,
        DrawingUnit::Centimeter,
        DrawingUnit::Meter,
        DrawingUnit::Inch,
        DrawingUnit::Feet,
    ];

    /// 每个显示单位对应的基础单位（毫米）数量
    pub fn base_per_unit(&self) -> f64 {
        match self {
            DrawingUnit::Millimeter => 1.0,
            DrawingUnit::Centimeter => 10.0,
            DrawingUnit::Meter => 1000.0,
            DrawingUnit::Inch => 25.4,
            DrawingUnit::Feet => 304.8,
        }
    }

    /// 显示单位 -> 基础单位
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.base_per_unit()
    }

    /// 基础单位 -> 显示单位
    pub fn from_base(&self, value: f64) -> f64 {
        value / self.base_per_unit()
    }

    /// 单位后缀
    pub fn suffix(&self) -> &'static str {
        match self {
            DrawingUnit::Millimeter => "mm",
            DrawingUnit::Centimeter => "cm",
            DrawingUnit::Meter => "m",
            DrawingUnit::Inch => "in",
            DrawingUnit::Feet => "ft",
        }
    }
}

impl fmt::Display for DrawingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for DrawingUnit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(DrawingUnit::Millimeter),
            "cm" | "centimeter" | "centimeters" => Ok(DrawingUnit::Centimeter),
            "m" | "meter" | "meters" => Ok(DrawingUnit::Meter),
            "in" | "inch" | "inches" | "\"" => Ok(DrawingUnit::Inch),
            "ft" | "feet" | "foot" | "'" => Ok(DrawingUnit::Feet),
            other => Err(ParseError::InvalidFormat(format!("Unknown unit: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_round_trip() {
        for unit in DrawingUnit::ALL {
            for value in [0.0, 1.0, 25.0, 123.456, -7.25, 1e6] {
                let back = unit.from_base(unit.to_base(value));
                assert!(
                    (back - value).abs() <= 1e-9 * value.abs().max(1.0),
                    "{unit}: {value} -> {back}"
                );
            }
        }
    }

    #[test]
    fn test_unit_factors() {
        assert_eq!(DrawingUnit::Inch.to_base(1.0), 25.4);
        assert_eq!(DrawingUnit::Feet.to_base(1.0), 304.8);
        assert_eq!(DrawingUnit::Meter.from_base(2500.0), 2.5);
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("MM".parse::<DrawingUnit>().unwrap(), DrawingUnit::Millimeter);
        assert_eq!("feet".parse::<DrawingUnit>().unwrap(), DrawingUnit::Feet);
        assert!("furlong".parse::<DrawingUnit>().is_err());
    }
}
