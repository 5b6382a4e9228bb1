//! 标注几何布局
//!
//! 根据定义点和放置点计算尺寸界线、尺寸线、箭头和文字位置。
//! 所有函数都是纯计算，退化输入使用回退方向而不是报错。

use super::style::{ArrowDirection, DimStyle, DimTextAlignment};
use crate::geometry::{Arc, Line};
use crate::math::{
    angle_in_sweep, angle_of, ccw_sweep, cross, midpoint, normalize_angle, perpendicular, polar,
    BoundingBox2, Point2, Vector2, EPSILON,
};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// 箭头
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    /// 箭头尖端
    pub tip: Point2,
    /// 箭头指向（单位向量）
    pub direction: Vector2,
    pub size: f64,
}

/// 线性/对齐标注布局
#[derive(Debug, Clone, PartialEq)]
pub struct LinearLayout {
    pub ext_line1: Line,
    pub ext_line2: Line,
    pub dim_line: Line,
    pub arrows: [Arrow; 2],
    /// 尺寸线相对定义点的单位法向
    pub normal: Vector2,
    /// 放置点在法向上的投影（带符号）
    pub offset: f64,
    pub text_position: Point2,
    pub text_rotation: f64,
    pub measurement: f64,
}

/// 角度标注布局
#[derive(Debug, Clone, PartialEq)]
pub struct AngularLayout {
    pub vertex: Point2,
    pub arc: Arc,
    pub ext_line1: Option<Line>,
    pub ext_line2: Option<Line>,
    pub arrows: [Arrow; 2],
    pub text_position: Point2,
    /// 弧度
    pub measurement: f64,
}

/// 半径/直径标注布局
#[derive(Debug, Clone, PartialEq)]
pub struct RadialLayout {
    pub center: Point2,
    pub dim_line: Line,
    pub arrows: Vec<Arrow>,
    pub text_position: Point2,
    pub measurement: f64,
}

/// 任意标注的布局
#[derive(Debug, Clone, PartialEq)]
pub enum DimLayout {
    Linear(LinearLayout),
    Angular(AngularLayout),
    Radial(RadialLayout),
}

impl DimLayout {
    pub fn text_position(&self) -> Point2 {
        match self {
            DimLayout::Linear(l) => l.text_position,
            DimLayout::Angular(a) => a.text_position,
            DimLayout::Radial(r) => r.text_position,
        }
    }

    pub fn set_text_position(&mut self, position: Point2) {
        match self {
            DimLayout::Linear(l) => l.text_position = position,
            DimLayout::Angular(a) => a.text_position = position,
            DimLayout::Radial(r) => r.text_position = position,
        }
    }

    pub fn measurement(&self) -> f64 {
        match self {
            DimLayout::Linear(l) => l.measurement,
            DimLayout::Angular(a) => a.measurement,
            DimLayout::Radial(r) => r.measurement,
        }
    }

    /// 组成标注的直线段
    pub fn lines(&self) -> Vec<Line> {
        match self {
            DimLayout::Linear(l) => vec![l.ext_line1.clone(), l.ext_line2.clone(), l.dim_line.clone()],
            DimLayout::Angular(a) => a.ext_line1.iter().chain(a.ext_line2.iter()).cloned().collect(),
            DimLayout::Radial(r) => vec![r.dim_line.clone()],
        }
    }

    /// 到标注线条的最短距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        let lines = self.lines().iter().map(|l| l.distance_to_point(point)).fold(f64::MAX, f64::min);
        match self {
            DimLayout::Angular(a) => lines.min(a.arc.distance_to_point(point)),
            _ => lines,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points(
            self.lines().iter().flat_map(|l| [l.start, l.end]).chain([self.text_position()]),
        );
        if let DimLayout::Angular(a) = self {
            bbox = bbox.union(&a.arc.bounding_box());
        }
        bbox
    }
}

/// 文字角度保持可读（落在 (-π/2, π/2]）
fn readable_angle(angle: f64) -> f64 {
    let a = normalize_angle(angle);
    if a > FRAC_PI_2 && a <= 3.0 * FRAC_PI_2 {
        a - PI
    } else if a > 3.0 * FRAC_PI_2 {
        a - TAU
    } else {
        a
    }
}

fn side_of(value: f64) -> f64 {
    if value.abs() < EPSILON {
        1.0
    } else {
        value.signum()
    }
}

fn arrows_inside(direction: ArrowDirection, available: f64, arrow_size: f64) -> bool {
    match direction {
        ArrowDirection::Inside => true,
        ArrowDirection::Outside => false,
        ArrowDirection::Auto => available >= 2.0 * arrow_size,
    }
}

/// 尺寸界线：从定义点偏移 `exo` 开始，越过尺寸线 `exe` 结束
fn extension_line(anchor: Point2, foot: Point2, fallback: Vector2, style: &DimStyle) -> Line {
    let v = foot - anchor;
    let len = v.norm();
    let dir = if len < EPSILON { fallback } else { v / len };
    Line::new(anchor + dir * style.ext_offset.min(len), foot + dir * style.ext_extend)
}

/// 沿给定测量轴的线性布局。`axis` 必须是单位向量
fn axis_layout(start: Point2, end: Point2, axis: Vector2, placement: Point2, style: &DimStyle) -> LinearLayout {
    let normal = perpendicular(&axis);
    let offset = (placement - start).dot(&normal);
    let offset_end = (placement - end).dot(&normal);
    let side = side_of(offset);

    let dim_start = start + normal * offset;
    let dim_end = end + normal * offset_end;
    let dim_line = Line::new(dim_start, dim_end);
    let along = dim_line.direction().unwrap_or(axis);

    let ext_line1 = extension_line(start, dim_start, normal * side, style);
    let ext_line2 = extension_line(end, dim_end, normal * side, style);

    let inside = arrows_inside(style.arrow_direction, dim_line.length(), style.arrow_size);
    let outward = if inside { 1.0 } else { -1.0 };
    let arrows = [
        Arrow {
            tip: dim_start,
            direction: -along * outward,
            size: style.arrow_size,
        },
        Arrow {
            tip: dim_end,
            direction: along * outward,
            size: style.arrow_size,
        },
    ];

    let mid = midpoint(&dim_start, &dim_end);
    let lift = style.text_gap + style.text_height / 2.0;
    let (text_position, text_rotation) = match style.text_alignment {
        DimTextAlignment::Above => (mid + normal * side * lift, readable_angle(along.y.atan2(along.x))),
        DimTextAlignment::Centered => (mid, readable_angle(along.y.atan2(along.x))),
        DimTextAlignment::Horizontal => (mid + normal * side * lift, 0.0),
    };

    LinearLayout {
        ext_line1,
        ext_line2,
        dim_line,
        arrows,
        normal,
        offset,
        text_position,
        text_rotation,
        measurement: (end - start).dot(&axis).abs(),
    }
}

/// 对齐标注：尺寸线平行于两定义点连线。两点重合时法向回退为 (0, 1)
pub fn aligned_layout(start: Point2, end: Point2, placement: Point2, style: &DimStyle) -> LinearLayout {
    let axis = Line::new(start, end).direction().unwrap_or_else(|| Vector2::new(1.0, 0.0));
    axis_layout(start, end, axis, placement, style)
}

/// 线性标注：沿 `rotation` 方向测量（0 为水平，π/2 为垂直）
pub fn linear_layout(start: Point2, end: Point2, rotation: f64, placement: Point2, style: &DimStyle) -> LinearLayout {
    let axis = Vector2::new(rotation.cos(), rotation.sin());
    axis_layout(start, end, axis, placement, style)
}

/// 根据放置点选择水平或垂直测量
///
/// 放置点在两点包围盒左右两侧更远时测垂直距离，否则测水平距离。
pub fn linear_rotation_for(start: Point2, end: Point2, placement: Point2) -> f64 {
    let bbox = BoundingBox2::from_points([start, end]);
    let outside_x = (bbox.min.x - placement.x).max(placement.x - bbox.max.x).max(0.0);
    let outside_y = (bbox.min.y - placement.y).max(placement.y - bbox.max.y).max(0.0);
    if outside_x > outside_y {
        FRAC_PI_2
    } else {
        0.0
    }
}

/// 两条直线的交点；近似平行时返回 None
pub(crate) fn infinite_line_intersection(a: &Line, b: &Line) -> Option<Point2> {
    let d1 = a.end - a.start;
    let d2 = b.end - b.start;
    let det = cross(&d1, &d2);
    if det.abs() < EPSILON {
        return None;
    }
    let t = cross(&(b.start - a.start), &d2) / det;
    Some(a.start + d1 * t)
}

/// 角度边方向：从顶点指向直线上较远的端点
fn leg(line: &Line, vertex: &Point2) -> (f64, f64) {
    let ds = (line.start - vertex).norm();
    let de = (line.end - vertex).norm();
    let (far, len) = if de >= ds { (line.end, de) } else { (line.start, ds) };
    if len < EPSILON {
        (normalize_angle(line.angle()), 0.0)
    } else {
        (normalize_angle(angle_of(vertex, &far)), len)
    }
}

fn tangent(angle: f64) -> Vector2 {
    Vector2::new(-angle.sin(), angle.cos())
}

/// 角度标注
///
/// 两条边把整圆分成互补的两段弧，测量光标所在的那一段。
pub fn angular_layout(first: &Line, second: &Line, cursor: Point2, style: &DimStyle) -> AngularLayout {
    let vertex = infinite_line_intersection(first, second).unwrap_or_else(|| {
        let sum = first.start.coords + first.end.coords + second.start.coords + second.end.coords;
        Point2::from(sum / 4.0)
    });

    let (a1, len1) = leg(first, &vertex);
    let (a2, len2) = leg(second, &vertex);
    let sweep = ccw_sweep(a1, a2);

    let to_cursor = cursor - vertex;
    let primary = if to_cursor.norm() < EPSILON {
        true
    } else {
        angle_in_sweep(to_cursor.y.atan2(to_cursor.x), a1, a2)
    };
    let (start, end, value, start_len, end_len) = if primary {
        (a1, a2, sweep, len1, len2)
    } else {
        (a2, a1, TAU - sweep, len2, len1)
    };

    let radius = if to_cursor.norm() > EPSILON {
        to_cursor.norm()
    } else {
        (len1.min(len2) / 2.0).max(1.0)
    };
    let arc = Arc::new(vertex, radius, start, end);

    let ext = |angle: f64, leg_len: f64| {
        (leg_len + style.ext_offset < radius).then(|| {
            Line::new(
                polar(vertex, leg_len + style.ext_offset, angle),
                polar(vertex, radius + style.ext_extend, angle),
            )
        })
    };

    let inside = arrows_inside(style.arrow_direction, radius * value, style.arrow_size);
    let outward = if inside { 1.0 } else { -1.0 };
    let arrows = [
        Arrow {
            tip: polar(vertex, radius, start),
            direction: -tangent(start) * outward,
            size: style.arrow_size,
        },
        Arrow {
            tip: polar(vertex, radius, end),
            direction: tangent(end) * outward,
            size: style.arrow_size,
        },
    ];

    let bisector = start + value / 2.0;
    let text_radius = match style.text_alignment {
        DimTextAlignment::Centered => radius,
        _ => radius + style.text_gap + style.text_height / 2.0,
    };

    AngularLayout {
        vertex,
        arc,
        ext_line1: ext(start, start_len),
        ext_line2: ext(end, end_len),
        arrows,
        text_position: polar(vertex, text_radius, bisector),
        measurement: value,
    }
}

/// 半径/直径标注：尺寸线沿光标方向到达圆周
pub fn radial_layout(center: Point2, radius: f64, cursor: Point2, diameter: bool, style: &DimStyle) -> RadialLayout {
    let v = cursor - center;
    let dir = if v.norm() < EPSILON {
        Vector2::new(1.0, 0.0)
    } else {
        v / v.norm()
    };
    let boundary = center + dir * radius;
    let outside = v.norm() > radius;

    let (dim_line, arrows) = if diameter {
        let opposite = center - dir * radius;
        let end = if outside { cursor } else { boundary };
        (
            Line::new(opposite, end),
            vec![
                Arrow {
                    tip: opposite,
                    direction: -dir,
                    size: style.arrow_size,
                },
                Arrow {
                    tip: boundary,
                    direction: dir,
                    size: style.arrow_size,
                },
            ],
        )
    } else {
        let end = if outside { cursor } else { boundary };
        (
            Line::new(center, end),
            vec![Arrow {
                tip: boundary,
                direction: dir,
                size: style.arrow_size,
            }],
        )
    };

    let text_position = if outside {
        cursor + dir * (style.text_gap + style.text_height / 2.0)
    } else {
        midpoint(&center, &boundary)
    };

    RadialLayout {
        center,
        dim_line,
        arrows,
        text_position,
        measurement: if diameter { radius * 2.0 } else { radius },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_aligned_offset_and_extension_lines() {
        let style = DimStyle::default();
        let layout = aligned_layout(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(4.0, 5.0),
            &style,
        );
        assert_relative_eq!(layout.offset, 5.0);
        assert_relative_eq!(layout.measurement, 10.0);
        assert_relative_eq!(layout.dim_line.start, Point2::new(0.0, 5.0));
        assert_relative_eq!(layout.dim_line.end, Point2::new(10.0, 5.0));
        // 尺寸界线从 exo 开始，越过尺寸线 exe
        assert_relative_eq!(layout.ext_line1.start, Point2::new(0.0, style.ext_offset));
        assert_relative_eq!(layout.ext_line1.end, Point2::new(0.0, 5.0 + style.ext_extend));
        // 箭头在内侧时指向尺寸界线
        assert_relative_eq!(layout.arrows[0].direction, Vector2::new(-1.0, 0.0));
        assert_relative_eq!(layout.arrows[1].direction, Vector2::new(1.0, 0.0));
    }

    #[test]
    fn test_aligned_degenerate_uses_vertical_normal() {
        let p = Point2::new(3.0, 3.0);
        let layout = aligned_layout(p, p, Point2::new(3.0, 7.0), &DimStyle::default());
        assert_relative_eq!(layout.normal, Vector2::new(0.0, 1.0));
        assert_relative_eq!(layout.offset, 4.0);
        assert_relative_eq!(layout.measurement, 0.0);
    }

    #[test]
    fn test_short_dimension_puts_arrows_outside() {
        let style = DimStyle::default();
        let layout = aligned_layout(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 3.0),
            &style,
        );
        assert_relative_eq!(layout.arrows[0].direction, Vector2::new(1.0, 0.0));
    }

    #[test]
    fn test_linear_horizontal_vs_vertical() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 4.0);
        assert_eq!(linear_rotation_for(a, b, Point2::new(5.0, 10.0)), 0.0);
        assert_eq!(linear_rotation_for(a, b, Point2::new(20.0, 2.0)), FRAC_PI_2);

        let style = DimStyle::default();
        let h = linear_layout(a, b, 0.0, Point2::new(5.0, 10.0), &style);
        assert_relative_eq!(h.measurement, 10.0);
        assert_relative_eq!(h.dim_line.start.y, 10.0);
        assert_relative_eq!(h.dim_line.end.y, 10.0);

        let v = linear_layout(a, b, FRAC_PI_2, Point2::new(20.0, 2.0), &style);
        assert_relative_eq!(v.measurement, 4.0, epsilon = 1e-12);
        assert_relative_eq!(v.dim_line.start.x, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angular_cursor_selects_arc_per_quadrant() {
        let style = DimStyle::default();
        let first = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let second = Line::new(Point2::new(0.0, 0.0), Point2::new(0.0, 10.0));

        let q1 = angular_layout(&first, &second, Point2::new(5.0, 5.0), &style);
        assert_relative_eq!(q1.measurement, FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(q1.vertex, Point2::origin());

        for cursor in [Point2::new(-5.0, 5.0), Point2::new(-5.0, -5.0), Point2::new(5.0, -5.0)] {
            let layout = angular_layout(&first, &second, cursor, &style);
            assert_relative_eq!(layout.measurement, 3.0 * FRAC_PI_2, epsilon = 1e-12);
            assert!(layout.arc.contains_point(&cursor));
        }
    }

    #[test]
    fn test_angular_vertex_from_extended_lines() {
        let style = DimStyle::default();
        let first = Line::new(Point2::new(2.0, 0.0), Point2::new(10.0, 0.0));
        let second = Line::new(Point2::new(0.0, 2.0), Point2::new(0.0, 10.0));
        let layout = angular_layout(&first, &second, Point2::new(20.0, 20.0), &style);
        assert_relative_eq!(layout.vertex, Point2::origin());
        assert_relative_eq!(layout.measurement, FRAC_PI_2, epsilon = 1e-12);
        // 弧半径大于边长，需要尺寸界线
        assert!(layout.ext_line1.is_some());
        assert!(layout.ext_line2.is_some());
        // 文字位于角平分线上
        let t = layout.text_position;
        assert_relative_eq!(t.x, t.y, epsilon = 1e-9);
    }

    #[test]
    fn test_angular_parallel_falls_back_to_centroid() {
        let style = DimStyle::default();
        let first = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let second = Line::new(Point2::new(0.0, 4.0), Point2::new(10.0, 4.0));
        let layout = angular_layout(&first, &second, Point2::new(5.0, 8.0), &style);
        assert_relative_eq!(layout.vertex, Point2::new(5.0, 2.0));
        assert!(layout.measurement.is_finite());
    }

    #[test]
    fn test_radial_and_diameter() {
        let style = DimStyle::default();
        let c = Point2::new(1.0, 1.0);
        let r = radial_layout(c, 5.0, Point2::new(1.0, 3.0), false, &style);
        assert_relative_eq!(r.measurement, 5.0);
        assert_relative_eq!(r.dim_line.end, Point2::new(1.0, 6.0));
        assert_eq!(r.arrows.len(), 1);

        let d = radial_layout(c, 5.0, Point2::new(1.0, 3.0), true, &style);
        assert_relative_eq!(d.measurement, 10.0);
        assert_relative_eq!(d.dim_line.start, Point2::new(1.0, -4.0));
        assert_eq!(d.arrows.len(), 2);
    }
}
