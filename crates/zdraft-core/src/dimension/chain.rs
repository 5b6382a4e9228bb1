//! 连续标注与基线标注

use super::{DimDefinition, Dimension, DimensionKind};
use crate::math::{perpendicular, Point2, Vector2, DEGENERATE_TOLERANCE, EPSILON};

/// 从一个线性/对齐标注出发的标注链
///
/// 连续标注从上一个终点开始，共用同一条尺寸线；基线标注共用起点，
/// 每次沿法向再偏移一个基线间距。测量方向和偏移方向都沿用原始标注。
#[derive(Debug, Clone, PartialEq)]
pub struct DimChain {
    /// 基线标注的公共起点
    pub base_point: Point2,
    /// 连续标注的下一个起点
    pub last_point: Point2,
    /// 测量方向角
    pub rotation: f64,
    /// 当前尺寸线上的一点
    pub line_point: Point2,
    /// 尺寸线相对定义点所在的一侧（沿法向 ±1）
    pub side: f64,
}

impl DimChain {
    /// 只有线性类标注可以作为链的起点
    pub fn from_dimension(dim: &Dimension) -> Option<DimChain> {
        let (start, end, rotation) = match &dim.definition {
            DimDefinition::Linear { start, end, rotation } => (*start, *end, *rotation),
            DimDefinition::Aligned { start, end } => {
                let v = end - start;
                let rotation = if v.norm() < EPSILON { 0.0 } else { v.y.atan2(v.x) };
                (*start, *end, rotation)
            }
            DimDefinition::Angular { .. } | DimDefinition::Radial { .. } => return None,
        };
        let mut chain = DimChain {
            base_point: start,
            last_point: end,
            rotation,
            line_point: dim.placement,
            side: 1.0,
        };
        let offset = (dim.placement - start).dot(&chain.normal());
        if offset.abs() > EPSILON {
            chain.side = offset.signum();
        }
        Some(chain)
    }

    fn axis(&self) -> Vector2 {
        Vector2::new(self.rotation.cos(), self.rotation.sin())
    }

    fn normal(&self) -> Vector2 {
        perpendicular(&self.axis())
    }

    fn is_degenerate(&self, from: Point2, to: Point2) -> bool {
        (to - from).dot(&self.axis()).abs() < DEGENERATE_TOLERANCE
    }

    /// 从上一个终点连续标注到 `point`，测量长度为零时返回 None
    pub fn continue_to(&mut self, point: Point2) -> Option<Dimension> {
        if self.is_degenerate(self.last_point, point) {
            return None;
        }
        let dim = Dimension::rotated(self.last_point, point, self.rotation, self.line_point)
            .with_kind(DimensionKind::Continue);
        self.last_point = point;
        Some(dim)
    }

    /// 从基点标注到 `point`，尺寸线外移 `spacing`
    pub fn baseline_to(&mut self, point: Point2, spacing: f64) -> Option<Dimension> {
        if self.is_degenerate(self.base_point, point) {
            return None;
        }
        self.line_point += self.normal() * (self.side * spacing);
        let dim = Dimension::rotated(self.base_point, point, self.rotation, self.line_point)
            .with_kind(DimensionKind::Baseline);
        self.last_point = point;
        Some(dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{DimLayout, DimStyle};
    use approx::assert_relative_eq;

    fn origin_dim() -> Dimension {
        Dimension::rotated(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 0.0, Point2::new(5.0, 8.0))
    }

    fn dim_line_y(dim: &Dimension) -> f64 {
        match dim.layout(&DimStyle::default()) {
            DimLayout::Linear(l) => l.dim_line.start.y,
            _ => panic!("expected linear layout"),
        }
    }

    #[test]
    fn test_continue_shares_dim_line() {
        let mut chain = DimChain::from_dimension(&origin_dim()).unwrap();
        let next = chain.continue_to(Point2::new(25.0, 3.0)).unwrap();
        assert_eq!(next.kind, DimensionKind::Continue);
        assert_relative_eq!(next.measurement(), 15.0);
        assert_relative_eq!(dim_line_y(&next), 8.0);

        let third = chain.continue_to(Point2::new(30.0, 0.0)).unwrap();
        assert_relative_eq!(third.measurement(), 5.0);
    }

    #[test]
    fn test_baseline_stacks_by_spacing() {
        let mut chain = DimChain::from_dimension(&origin_dim()).unwrap();
        let first = chain.baseline_to(Point2::new(20.0, 0.0), 3.75).unwrap();
        let second = chain.baseline_to(Point2::new(30.0, 0.0), 3.75).unwrap();
        assert_relative_eq!(first.measurement(), 20.0);
        assert_relative_eq!(second.measurement(), 30.0);
        assert_relative_eq!(dim_line_y(&first), 11.75);
        assert_relative_eq!(dim_line_y(&second), 15.5);
    }

    #[test]
    fn test_baseline_below_moves_down() {
        let dim = Dimension::rotated(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 0.0, Point2::new(5.0, -6.0));
        let mut chain = DimChain::from_dimension(&dim).unwrap();
        let next = chain.baseline_to(Point2::new(15.0, 0.0), 2.0).unwrap();
        assert_relative_eq!(dim_line_y(&next), -8.0);
    }

    #[test]
    fn test_zero_length_continuation_ignored() {
        let mut chain = DimChain::from_dimension(&origin_dim()).unwrap();
        assert!(chain.continue_to(Point2::new(10.0, 5.0)).is_none());
        assert_eq!(chain.last_point, Point2::new(10.0, 0.0));
    }

    #[test]
    fn test_radial_cannot_start_chain() {
        let dim = Dimension::radius(Point2::origin(), 3.0, Point2::new(5.0, 0.0));
        assert!(DimChain::from_dimension(&dim).is_none());
    }
}
