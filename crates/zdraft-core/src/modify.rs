//! 编辑运算：偏移、修剪、延伸
//!
//! 这些函数只计算新几何，是否写入文档由命令层决定。
//! 无法处理的输入返回 None。

use crate::geometry::{Arc, Circle, Geometry, Line, Polyline, PolylineVertex};
use crate::intersect::{circle_intersections_extended, find_entity_intersections, line_intersections_extended};
use crate::math::{angle_of, ccw_sweep, cross, normalize_angle, perpendicular, Point2, EPSILON};

/// 参数比较容差
const PARAM_EPS: f64 = 1e-9;

/// 向 `side_point` 所在一侧偏移 `distance`
pub fn offset(geometry: &Geometry, distance: f64, side_point: Point2) -> Option<Geometry> {
    if distance <= EPSILON {
        return None;
    }
    match geometry {
        Geometry::Line(line) => {
            let dir = line.direction()?;
            let normal = perpendicular(&dir) * side_sign(line, &side_point);
            Some(Geometry::Line(Line::new(
                line.start + normal * distance,
                line.end + normal * distance,
            )))
        }
        Geometry::Circle(circle) => {
            let radius = offset_radius(circle.center, circle.radius, distance, side_point)?;
            Some(Geometry::Circle(Circle::new(circle.center, radius)))
        }
        Geometry::Arc(arc) => {
            let radius = offset_radius(arc.center, arc.radius, distance, side_point)?;
            Some(Geometry::Arc(Arc::new(arc.center, radius, arc.start_angle, arc.end_angle)))
        }
        Geometry::Polyline(pl) => offset_polyline(pl, distance, side_point).map(Geometry::Polyline),
        _ => None,
    }
}

fn offset_radius(center: Point2, radius: f64, distance: f64, side_point: Point2) -> Option<f64> {
    let outside = (side_point - center).norm() > radius;
    let r = if outside { radius + distance } else { radius - distance };
    (r > EPSILON).then_some(r)
}

/// 直线段多段线的偏移，相邻段在偏移线交点处斜接
fn offset_polyline(pl: &Polyline, distance: f64, side_point: Point2) -> Option<Polyline> {
    if pl.vertices.len() < 2 || pl.vertices.iter().any(|v| v.bulge.abs() > EPSILON) {
        return None;
    }
    let segments: Vec<Line> = pl
        .segments()
        .filter_map(|seg| match seg {
            crate::geometry::PolylineSegment::Line(l) if !l.is_degenerate() => Some(l),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        return None;
    }

    // 以距离侧点最近的段决定偏移方向
    let nearest = segments
        .iter()
        .min_by(|a, b| a.distance_to_point(&side_point).total_cmp(&b.distance_to_point(&side_point)))?;
    let sign = side_sign(nearest, &side_point);

    let shifted: Vec<Line> = segments
        .iter()
        .map(|l| {
            let n = perpendicular(&(l.end - l.start).normalize()) * (sign * distance);
            Line::new(l.start + n, l.end + n)
        })
        .collect();

    let n = shifted.len();
    let join = |a: &Line, b: &Line| -> Point2 {
        crate::dimension::infinite_line_intersection(a, b).unwrap_or(a.end)
    };

    let mut points = Vec::with_capacity(n + 1);
    if pl.closed {
        for i in 0..n {
            let prev = &shifted[(i + n - 1) % n];
            points.push(join(prev, &shifted[i]));
        }
    } else {
        points.push(shifted[0].start);
        for i in 1..n {
            points.push(join(&shifted[i - 1], &shifted[i]));
        }
        points.push(shifted[n - 1].end);
    }

    Some(Polyline::new(points.into_iter().map(PolylineVertex::new).collect(), pl.closed))
}

/// 修剪：删除拾取点两侧最近的两个交点之间的部分
///
/// 返回替换原实体的几何（可能为两段），没有可用交点时返回 None。
pub fn trim(target: &Geometry, cutting_edges: &[&Geometry], pick: Point2) -> Option<Vec<Geometry>> {
    let hits: Vec<f64> = cutting_edges
        .iter()
        .flat_map(|edge| find_entity_intersections(target, edge))
        .map(|i| i.t_a)
        .collect();

    match target {
        Geometry::Line(line) => trim_line(line, &hits, pick),
        Geometry::Circle(circle) => trim_circle(circle, &hits, pick),
        Geometry::Arc(arc) => trim_arc(arc, &hits, pick),
        _ => None,
    }
}

fn trim_line(line: &Line, hits: &[f64], pick: Point2) -> Option<Vec<Geometry>> {
    let inner: Vec<f64> = hits
        .iter()
        .copied()
        .filter(|t| *t > PARAM_EPS && *t < 1.0 - PARAM_EPS)
        .collect();
    if inner.is_empty() {
        return None;
    }
    let tp = line.project_param(&pick).clamp(0.0, 1.0);
    let lower = inner.iter().copied().filter(|t| *t < tp).fold(0.0, f64::max);
    let upper = inner.iter().copied().filter(|t| *t > tp).fold(1.0, f64::min);

    let mut pieces = Vec::new();
    if lower > PARAM_EPS {
        pieces.push(Geometry::Line(Line::new(line.start, line.point_at(lower))));
    }
    if upper < 1.0 - PARAM_EPS {
        pieces.push(Geometry::Line(Line::new(line.point_at(upper), line.end)));
    }
    Some(pieces)
}

fn trim_circle(circle: &Circle, hits: &[f64], pick: Point2) -> Option<Vec<Geometry>> {
    let mut angles: Vec<f64> = hits.iter().map(|a| normalize_angle(*a)).collect();
    angles.sort_by(f64::total_cmp);
    angles.dedup_by(|a, b| (*a - *b).abs() < PARAM_EPS);
    // 整圆至少需要两个切点才能断开
    if angles.len() < 2 {
        return None;
    }
    let ap = angle_of(&circle.center, &pick);
    // 拾取点逆时针方向的下一个交点与顺时针方向的上一个交点
    let next = angles
        .iter()
        .copied()
        .min_by(|a, b| ccw_sweep(ap, *a).total_cmp(&ccw_sweep(ap, *b)))?;
    let prev = angles
        .iter()
        .copied()
        .min_by(|a, b| ccw_sweep(*a, ap).total_cmp(&ccw_sweep(*b, ap)))?;
    Some(vec![Geometry::Arc(Arc::new(circle.center, circle.radius, next, prev))])
}

fn trim_arc(arc: &Arc, hits: &[f64], pick: Point2) -> Option<Vec<Geometry>> {
    let sweep = arc.sweep_angle();
    let inner: Vec<f64> = hits
        .iter()
        .map(|a| ccw_sweep(arc.start_angle, *a))
        .filter(|off| *off > PARAM_EPS && *off < sweep - PARAM_EPS)
        .collect();
    if inner.is_empty() {
        return None;
    }
    let on_arc = arc.closest_point(&pick);
    let op = ccw_sweep(arc.start_angle, angle_of(&arc.center, &on_arc)).min(sweep);
    let lower = inner.iter().copied().filter(|o| *o < op).fold(0.0, f64::max);
    let upper = inner.iter().copied().filter(|o| *o > op).fold(sweep, f64::min);

    let mut pieces = Vec::new();
    if lower > PARAM_EPS {
        pieces.push(Geometry::Arc(Arc::new(
            arc.center,
            arc.radius,
            arc.start_angle,
            arc.start_angle + lower,
        )));
    }
    if upper < sweep - PARAM_EPS {
        pieces.push(Geometry::Arc(Arc::new(
            arc.center,
            arc.radius,
            arc.start_angle + upper,
            arc.end_angle,
        )));
    }
    Some(pieces)
}

/// 延伸：把靠近拾取点的端点延伸到沿延长方向最近的边界交点
pub fn extend(target: &Geometry, boundaries: &[&Geometry], pick: Point2) -> Option<Geometry> {
    match target {
        Geometry::Line(line) => {
            if line.is_degenerate() {
                return None;
            }
            let from_end = line.project_param(&pick) >= 0.5;
            let params = boundaries
                .iter()
                .flat_map(|b| line_intersections_extended(line, b))
                .map(|i| i.t_a);
            if from_end {
                let t = params.filter(|t| *t > 1.0 + PARAM_EPS).fold(f64::INFINITY, f64::min);
                t.is_finite().then(|| Geometry::Line(Line::new(line.start, line.point_at(t))))
            } else {
                let t = params.filter(|t| *t < -PARAM_EPS).fold(f64::NEG_INFINITY, f64::max);
                t.is_finite().then(|| Geometry::Line(Line::new(line.point_at(t), line.end)))
            }
        }
        Geometry::Arc(arc) => {
            let from_end = (pick - arc.end_point()).norm() <= (pick - arc.start_point()).norm();
            let sweep = arc.sweep_angle();
            let angles: Vec<f64> = boundaries
                .iter()
                .flat_map(|b| circle_intersections_extended(arc, b))
                .map(|i| i.t_a)
                .collect();
            if from_end {
                let gain = angles
                    .iter()
                    .map(|a| ccw_sweep(arc.end_angle, *a))
                    .filter(|g| *g > PARAM_EPS && sweep + g < std::f64::consts::TAU)
                    .fold(f64::INFINITY, f64::min);
                gain.is_finite()
                    .then(|| Geometry::Arc(Arc::new(arc.center, arc.radius, arc.start_angle, arc.end_angle + gain)))
            } else {
                let gain = angles
                    .iter()
                    .map(|a| ccw_sweep(*a, arc.start_angle))
                    .filter(|g| *g > PARAM_EPS && sweep + g < std::f64::consts::TAU)
                    .fold(f64::INFINITY, f64::min);
                gain.is_finite()
                    .then(|| Geometry::Arc(Arc::new(arc.center, arc.radius, arc.start_angle - gain, arc.end_angle)))
            }
        }
        _ => None,
    }
}

/// 点位于直线左侧返回 1，右侧返回 -1（线上视为左侧）
fn side_sign(line: &Line, point: &Point2) -> f64 {
    let c = cross(&(line.end - line.start), &(point - line.start));
    if c < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)))
    }

    fn assert_line(g: &Geometry, x0: f64, y0: f64, x1: f64, y1: f64) {
        let Geometry::Line(l) = g else {
            panic!("expected line, got {}", g.type_name());
        };
        assert!((l.start - Point2::new(x0, y0)).norm() < 1e-9, "start {:?}", l.start);
        assert!((l.end - Point2::new(x1, y1)).norm() < 1e-9, "end {:?}", l.end);
    }

    #[test]
    fn test_offset_line_to_pick_side() {
        let line = seg(0.0, 0.0, 10.0, 0.0);
        let Some(Geometry::Line(up)) = offset(&line, 2.0, Point2::new(5.0, 7.0)) else {
            panic!("expected line");
        };
        assert!((up.start - Point2::new(0.0, 2.0)).norm() < 1e-12);
        let Some(Geometry::Line(down)) = offset(&line, 2.0, Point2::new(5.0, -7.0)) else {
            panic!("expected line");
        };
        assert!((down.end - Point2::new(10.0, -2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_offset_circle_inside_collapses() {
        let c = Geometry::Circle(Circle::new(Point2::origin(), 3.0));
        assert!(matches!(offset(&c, 1.0, Point2::new(10.0, 0.0)), Some(Geometry::Circle(c)) if (c.radius - 4.0).abs() < 1e-12));
        assert!(offset(&c, 5.0, Point2::new(1.0, 0.0)).is_none());
    }

    #[test]
    fn test_offset_closed_square_outward() {
        let sq = Geometry::Polyline(Polyline::from_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            true,
        ));
        let Some(Geometry::Polyline(out)) = offset(&sq, 1.0, Point2::new(5.0, -3.0)) else {
            panic!("expected polyline");
        };
        let pts: Vec<Point2> = out.points().collect();
        assert_eq!(pts.len(), 4);
        assert!((pts[0] - Point2::new(-1.0, -1.0)).norm() < 1e-9);
        assert!((pts[2] - Point2::new(11.0, 11.0)).norm() < 1e-9);
    }

    #[test]
    fn test_trim_line_middle_removes_between_cuts() {
        let target = seg(0.0, 0.0, 10.0, 0.0);
        let c1 = seg(3.0, -1.0, 3.0, 1.0);
        let c2 = seg(7.0, -1.0, 7.0, 1.0);
        let pieces = trim(&target, &[&c1, &c2], Point2::new(5.0, 0.2)).unwrap();
        assert_eq!(pieces.len(), 2);
        assert_line(&pieces[0], 0.0, 0.0, 3.0, 0.0);
        assert_line(&pieces[1], 7.0, 0.0, 10.0, 0.0);

        // 拾取端部时只留下一段
        let pieces = trim(&target, &[&c1, &c2], Point2::new(9.0, 0.0)).unwrap();
        assert_eq!(pieces.len(), 1);
        assert_line(&pieces[0], 0.0, 0.0, 7.0, 0.0);
    }

    #[test]
    fn test_trim_without_cut_is_none() {
        let target = seg(0.0, 0.0, 10.0, 0.0);
        let far = seg(20.0, -1.0, 20.0, 1.0);
        assert!(trim(&target, &[&far], Point2::new(5.0, 0.0)).is_none());
    }

    #[test]
    fn test_trim_circle_to_arc() {
        let circle = Geometry::Circle(Circle::new(Point2::origin(), 5.0));
        let cut = seg(0.0, -10.0, 0.0, 10.0);
        // 拾取右半圆，保留左半圆
        let pieces = trim(&circle, &[&cut], Point2::new(5.0, 0.0)).unwrap();
        let Geometry::Arc(arc) = &pieces[0] else {
            panic!("expected arc");
        };
        assert!((arc.sweep_angle() - PI).abs() < 1e-9);
        assert!(arc.contains_angle(PI));
        assert!(!arc.contains_angle(0.0));
    }

    #[test]
    fn test_trim_arc_end() {
        let arc = Geometry::Arc(Arc::new(Point2::origin(), 5.0, 0.0, PI));
        let cut = seg(0.0, 0.0, 0.0, 10.0);
        let pieces = trim(&arc, &[&cut], Point2::new(-4.0, 3.0)).unwrap();
        assert_eq!(pieces.len(), 1);
        let Geometry::Arc(kept) = &pieces[0] else {
            panic!("expected arc");
        };
        assert!((kept.sweep_angle() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_extend_line_to_boundary() {
        let target = seg(0.0, 0.0, 5.0, 0.0);
        let near = seg(8.0, -5.0, 8.0, 5.0);
        let far = seg(12.0, -5.0, 12.0, 5.0);
        let extended = extend(&target, &[&far, &near], Point2::new(4.0, 0.0)).unwrap();
        assert_line(&extended, 0.0, 0.0, 8.0, 0.0);

        // 起点方向没有边界
        assert!(extend(&target, &[&near], Point2::new(1.0, 0.0)).is_none());
    }

    #[test]
    fn test_extend_arc_end_angle() {
        let arc = Geometry::Arc(Arc::new(Point2::origin(), 5.0, 0.0, FRAC_PI_2));
        let boundary = seg(-10.0, 0.0, 10.0, 0.0);
        let Some(Geometry::Arc(ext)) = extend(&arc, &[&boundary], Point2::new(0.5, 5.0)) else {
            panic!("expected arc");
        };
        assert!((ext.sweep_angle() - PI).abs() < 1e-9);
    }
}
