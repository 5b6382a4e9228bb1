//! 图元求交
//!
//! 每个图元先分解为线性段、整圆或圆弧，再两两求交。
//! 线性段的参数为直线参数 t（多段线为 "段序号 + 局部 t"），圆和圆弧的参数为角度。

use crate::geometry::{Arc, Circle, Geometry, Line, PolylineSegment};
use crate::math::{cross, normalize_angle, Point2, EPSILON};
use serde::{Deserialize, Serialize};

/// 交点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub point: Point2,
    /// 交点在第一个图元上的参数
    pub t_a: f64,
    /// 交点在第二个图元上的参数
    pub t_b: f64,
}

/// 参数范围的容差
const PARAM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
enum Shape {
    /// 线段/射线/构造线，参数范围 [t_min, t_max]
    Linear { line: Line, t_min: f64, t_max: f64 },
    Circle(Circle),
    Arc(Arc),
}

#[derive(Debug, Clone)]
struct Piece {
    shape: Shape,
    /// 参数偏移（多段线段序号）
    base: f64,
}

impl Piece {
    fn segment(line: Line, base: f64) -> Self {
        Self {
            shape: Shape::Linear {
                line,
                t_min: 0.0,
                t_max: 1.0,
            },
            base,
        }
    }

    fn circle(circle: Circle) -> Self {
        Self {
            shape: Shape::Circle(circle),
            base: 0.0,
        }
    }

    /// 把分段后的局部参数换算为图元参数
    fn param(&self, local: f64) -> f64 {
        self.base + local
    }
}

fn chain_pieces(points: &[Point2], closed: bool) -> Vec<Piece> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let count = if closed { n } else { n - 1 };
    (0..count)
        .map(|i| Piece::segment(Line::new(points[i], points[(i + 1) % n]), i as f64))
        .collect()
}

/// 把图元分解为可求交的基本形状
fn pieces(geometry: &Geometry) -> Vec<Piece> {
    match geometry {
        Geometry::Line(l) => vec![Piece::segment(l.clone(), 0.0)],
        Geometry::Ray(r) => vec![Piece {
            shape: Shape::Linear {
                line: r.as_line(),
                t_min: 0.0,
                t_max: f64::INFINITY,
            },
            base: 0.0,
        }],
        Geometry::XLine(x) => vec![Piece {
            shape: Shape::Linear {
                line: x.as_line(),
                t_min: f64::NEG_INFINITY,
                t_max: f64::INFINITY,
            },
            base: 0.0,
        }],
        Geometry::Circle(c) => vec![Piece::circle(c.clone())],
        Geometry::Arc(a) => vec![Piece {
            shape: Shape::Arc(a.clone()),
            base: 0.0,
        }],
        Geometry::Donut(d) => vec![
            Piece::circle(Circle::new(d.center, d.inner_radius)),
            Piece::circle(Circle::new(d.center, d.outer_radius)),
        ],
        Geometry::Polyline(pl) => (0..pl.segment_count())
            .filter_map(|i| {
                pl.segment(i).map(|seg| match seg {
                    PolylineSegment::Line(l) => Piece::segment(l, i as f64),
                    PolylineSegment::Arc(a) => Piece {
                        shape: Shape::Arc(a),
                        base: i as f64,
                    },
                })
            })
            .collect(),
        Geometry::Ellipse(e) => {
            let samples: Vec<Point2> = (0..96)
                .map(|i| e.point_at(std::f64::consts::TAU * i as f64 / 96.0))
                .collect();
            chain_pieces(&samples, true)
        }
        Geometry::Spline(s) => chain_pieces(&s.sample(), false),
        Geometry::Hatch(h) => chain_pieces(&h.boundary, true),
        Geometry::Point(_)
        | Geometry::Text(_)
        | Geometry::MText(_)
        | Geometry::Dimension(_)
        | Geometry::Insert(_)
        | Geometry::Table(_) => Vec::new(),
    }
}

fn in_range(t: f64, t_min: f64, t_max: f64) -> bool {
    t >= t_min - PARAM_TOLERANCE && t <= t_max + PARAM_TOLERANCE
}

/// 两条直线的交点参数；平行或重合时返回 None
fn line_line(a: &Line, b: &Line) -> Option<(f64, f64)> {
    let d1 = a.end - a.start;
    let d2 = b.end - b.start;
    let det = cross(&d1, &d2);
    if det.abs() < EPSILON {
        return None;
    }
    let w = b.start - a.start;
    Some((cross(&w, &d2) / det, cross(&w, &d1) / det))
}

/// 直线与圆的交点参数 t（未限制范围）
fn line_circle(line: &Line, circle: &Circle) -> Vec<f64> {
    let d = line.end - line.start;
    let f = line.start - circle.center;
    let a = d.dot(&d);
    if a < EPSILON {
        return Vec::new();
    }
    let b = 2.0 * f.dot(&d);
    let c = f.dot(&f) - circle.radius * circle.radius;
    let disc = b * b - 4.0 * a * c;
    // 相切容差与尺度相关
    let tol = EPSILON * a.max(1.0) * circle.radius.max(1.0);
    if disc < -tol {
        Vec::new()
    } else if disc.abs() <= tol {
        vec![-b / (2.0 * a)]
    } else {
        let sq = disc.sqrt();
        vec![(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)]
    }
}

/// 两圆交点。同心（含重合）时为空，相切时返回一个点
fn circle_circle(c1: &Circle, c2: &Circle) -> Vec<Point2> {
    let v = c2.center - c1.center;
    let d = v.norm();
    if d < EPSILON {
        return Vec::new();
    }
    let (r1, r2) = (c1.radius, c2.radius);
    if d > r1 + r2 + EPSILON || d < (r1 - r2).abs() - EPSILON {
        return Vec::new();
    }
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h2 = r1 * r1 - a * a;
    let base = c1.center + v * (a / d);
    if h2 <= EPSILON * r1.max(1.0) {
        return vec![base];
    }
    let h = h2.sqrt();
    let perp = crate::math::perpendicular(&v) / d;
    vec![base + perp * h, base - perp * h]
}

fn circle_of(shape: &Shape) -> Option<(Circle, Option<&Arc>)> {
    match shape {
        Shape::Circle(c) => Some((c.clone(), None)),
        Shape::Arc(a) => Some((a.to_circle(), Some(a))),
        Shape::Linear { .. } => None,
    }
}

fn on_arc(arc: Option<&Arc>, point: &Point2) -> bool {
    arc.map_or(true, |a| a.contains_point(point))
}

fn angle_param(center: &Point2, point: &Point2) -> f64 {
    normalize_angle((point.y - center.y).atan2(point.x - center.x))
}

fn piece_intersections(a: &Piece, b: &Piece, out: &mut Vec<Intersection>) {
    match (&a.shape, &b.shape) {
        (
            Shape::Linear { line: la, t_min: a0, t_max: a1 },
            Shape::Linear { line: lb, t_min: b0, t_max: b1 },
        ) => {
            if let Some((ta, tb)) = line_line(la, lb) {
                if in_range(ta, *a0, *a1) && in_range(tb, *b0, *b1) {
                    out.push(Intersection {
                        point: la.point_at(ta),
                        t_a: a.param(ta),
                        t_b: b.param(tb),
                    });
                }
            }
        }
        (Shape::Linear { line, t_min, t_max }, other) => {
            if let Some((circle, arc)) = circle_of(other) {
                for t in line_circle(line, &circle) {
                    let p = line.point_at(t);
                    if in_range(t, *t_min, *t_max) && on_arc(arc, &p) {
                        out.push(Intersection {
                            point: p,
                            t_a: a.param(t),
                            t_b: b.param(angle_param(&circle.center, &p)),
                        });
                    }
                }
            }
        }
        (_, Shape::Linear { .. }) => {
            let mut swapped = Vec::new();
            piece_intersections(b, a, &mut swapped);
            out.extend(swapped.into_iter().map(|i| Intersection {
                point: i.point,
                t_a: i.t_b,
                t_b: i.t_a,
            }));
        }
        (sa, sb) => {
            if let (Some((ca, arc_a)), Some((cb, arc_b))) = (circle_of(sa), circle_of(sb)) {
                for p in circle_circle(&ca, &cb) {
                    if on_arc(arc_a, &p) && on_arc(arc_b, &p) {
                        out.push(Intersection {
                            point: p,
                            t_a: a.param(angle_param(&ca.center, &p)),
                            t_b: b.param(angle_param(&cb.center, &p)),
                        });
                    }
                }
            }
        }
    }
}

fn dedup(mut hits: Vec<Intersection>) -> Vec<Intersection> {
    let mut result: Vec<Intersection> = Vec::with_capacity(hits.len());
    for hit in hits.drain(..) {
        if !result.iter().any(|r| (r.point - hit.point).norm() < 1e-9) {
            result.push(hit);
        }
    }
    result
}

/// 两个图元的全部交点。退化输入返回空列表
pub fn find_entity_intersections(a: &Geometry, b: &Geometry) -> Vec<Intersection> {
    let pa = pieces(a);
    let pb = pieces(b);
    let mut out = Vec::new();
    for x in &pa {
        for y in &pb {
            piece_intersections(x, y, &mut out);
        }
    }
    dedup(out)
}

/// `line` 的无限延长线与 `other` 的交点，`t_a` 为 `line` 上的参数（可超出 [0, 1]）
pub fn line_intersections_extended(line: &Line, other: &Geometry) -> Vec<Intersection> {
    if line.is_degenerate() {
        return Vec::new();
    }
    let extended = Piece {
        shape: Shape::Linear {
            line: line.clone(),
            t_min: f64::NEG_INFINITY,
            t_max: f64::INFINITY,
        },
        base: 0.0,
    };
    let mut out = Vec::new();
    for piece in pieces(other) {
        piece_intersections(&extended, &piece, &mut out);
    }
    dedup(out)
}

/// 圆弧所在整圆与 `other` 的交点，`t_a` 为角度
pub fn circle_intersections_extended(arc: &Arc, other: &Geometry) -> Vec<Intersection> {
    let full = Piece::circle(arc.to_circle());
    let mut out = Vec::new();
    for piece in pieces(other) {
        piece_intersections(&full, &piece, &mut out);
    }
    dedup(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Polyline, Ray, XLine};
    use std::f64::consts::FRAC_PI_2;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)))
    }

    #[test]
    fn test_line_line_cross() {
        let hits = find_entity_intersections(&line(0.0, 0.0, 10.0, 10.0), &line(0.0, 10.0, 10.0, 0.0));
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - Point2::new(5.0, 5.0)).norm() < 1e-9);
        assert!((hits[0].t_a - 0.5).abs() < 1e-9);
        assert!((hits[0].t_b - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_and_out_of_range_are_empty() {
        assert!(find_entity_intersections(&line(0.0, 0.0, 10.0, 0.0), &line(0.0, 1.0, 10.0, 1.0)).is_empty());
        assert!(find_entity_intersections(&line(0.0, 0.0, 1.0, 1.0), &line(0.0, 10.0, 10.0, 0.0)).is_empty());
    }

    #[test]
    fn test_line_circle_secant_and_tangent() {
        let circle = Geometry::Circle(Circle::new(Point2::origin(), 5.0));
        let hits = find_entity_intersections(&line(-10.0, 0.0, 10.0, 0.0), &circle);
        assert_eq!(hits.len(), 2);
        let tangent = find_entity_intersections(&line(-10.0, 5.0, 10.0, 5.0), &circle);
        assert_eq!(tangent.len(), 1);
        assert!((tangent[0].point - Point2::new(0.0, 5.0)).norm() < 1e-6);
    }

    #[test]
    fn test_circle_circle_cases() {
        let a = Geometry::Circle(Circle::new(Point2::origin(), 5.0));
        let b = Geometry::Circle(Circle::new(Point2::new(8.0, 0.0), 5.0));
        let hits = find_entity_intersections(&a, &b);
        assert_eq!(hits.len(), 2);
        for h in &hits {
            assert!((h.point.x - 4.0).abs() < 1e-9);
            assert!((h.point.y.abs() - 3.0).abs() < 1e-9);
        }

        let touching = Geometry::Circle(Circle::new(Point2::new(10.0, 0.0), 5.0));
        assert_eq!(find_entity_intersections(&a, &touching).len(), 1);

        // 重合圆没有离散交点
        assert!(find_entity_intersections(&a, &a.clone()).is_empty());
    }

    #[test]
    fn test_arc_filters_by_sweep() {
        let arc = Geometry::Arc(Arc::new(Point2::origin(), 5.0, 0.0, FRAC_PI_2));
        let hits = find_entity_intersections(&line(-10.0, 3.0, 10.0, 3.0), &arc);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - Point2::new(4.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn test_ray_and_xline_bounds() {
        let ray = Geometry::Ray(Ray::through(Point2::origin(), Point2::new(1.0, 0.0)).unwrap());
        assert_eq!(find_entity_intersections(&ray, &line(5.0, -1.0, 5.0, 1.0)).len(), 1);
        assert!(find_entity_intersections(&ray, &line(-5.0, -1.0, -5.0, 1.0)).is_empty());

        let xline = Geometry::XLine(XLine::through(Point2::origin(), Point2::new(1.0, 0.0)).unwrap());
        assert_eq!(find_entity_intersections(&xline, &line(-5.0, -1.0, -5.0, 1.0)).len(), 1);
    }

    #[test]
    fn test_polyline_segments_and_vertex_dedup() {
        let square = Geometry::Polyline(Polyline::from_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            true,
        ));
        let hits = find_entity_intersections(&line(-5.0, 5.0, 15.0, 5.0), &square);
        assert_eq!(hits.len(), 2);
        // 穿过顶点 (10,10) 只算一次
        let corner = find_entity_intersections(&line(5.0, 15.0, 15.0, 5.0), &square);
        assert_eq!(corner.len(), 1);
    }

    #[test]
    fn test_extended_line_hits_behind() {
        let l = Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let hits = line_intersections_extended(&l, &line(5.0, -1.0, 5.0, 1.0));
        assert_eq!(hits.len(), 1);
        assert!((hits[0].t_a - 5.0).abs() < 1e-9);
    }
}
