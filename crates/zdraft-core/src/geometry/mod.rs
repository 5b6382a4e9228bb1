//! 几何图元定义
//!
//! 所有图元都位于绘图平面上，统一封装在 [`Geometry`] 枚举中。

mod annotation;
mod curves;

pub use annotation::{
    estimate_text_width, CellStyle, Hatch, Insert, MText, Table, TableCell, Text, TextAlignment,
    TextStyle,
};
pub use curves::{
    bulge_to_arc, Arc, Circle, Donut, Ellipse, Line, Point, Polyline, PolylineSegment,
    PolylineVertex, Ray, Spline, XLine, FAR_DISTANCE,
};
pub(crate) use curves::closest_on_chain;

use crate::dimension::Dimension;
use crate::math::{BoundingBox2, Point2};
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};

/// 几何图元枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Ray(Ray),
    XLine(XLine),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Polyline(Polyline),
    Spline(Spline),
    Donut(Donut),
    Text(Text),
    MText(MText),
    Dimension(Dimension),
    Hatch(Hatch),
    Insert(Insert),
    Table(Table),
}

impl Geometry {
    /// 获取几何的包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            Geometry::Point(p) => p.bounding_box(),
            Geometry::Line(l) => l.bounding_box(),
            Geometry::Ray(r) => r.bounding_box(),
            Geometry::XLine(x) => x.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Arc(a) => a.bounding_box(),
            Geometry::Ellipse(e) => e.bounding_box(),
            Geometry::Polyline(pl) => pl.bounding_box(),
            Geometry::Spline(s) => s.bounding_box(),
            Geometry::Donut(d) => d.bounding_box(),
            Geometry::Text(t) => t.bounding_box(),
            Geometry::MText(t) => t.bounding_box(),
            Geometry::Dimension(d) => d.bounding_box(),
            Geometry::Hatch(h) => h.bounding_box(),
            Geometry::Insert(i) => i.bounding_box(),
            Geometry::Table(t) => t.bounding_box(),
        }
    }

    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Ray(_) => "Ray",
            Geometry::XLine(_) => "XLine",
            Geometry::Circle(_) => "Circle",
            Geometry::Arc(_) => "Arc",
            Geometry::Ellipse(_) => "Ellipse",
            Geometry::Polyline(_) => "Polyline",
            Geometry::Spline(_) => "Spline",
            Geometry::Donut(_) => "Donut",
            Geometry::Text(_) => "Text",
            Geometry::MText(_) => "MText",
            Geometry::Dimension(_) => "Dimension",
            Geometry::Hatch(_) => "Hatch",
            Geometry::Insert(_) => "Insert",
            Geometry::Table(_) => "Table",
        }
    }

    /// 查询点到图元的距离，总是有限且非负
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        match self {
            Geometry::Point(p) => (p.position - point).norm(),
            Geometry::Line(l) => l.distance_to_point(point),
            Geometry::Ray(r) => r.distance_to_point(point),
            Geometry::XLine(x) => x.distance_to_point(point),
            Geometry::Circle(c) => c.distance_to_point(point),
            Geometry::Arc(a) => a.distance_to_point(point),
            Geometry::Ellipse(e) => e.distance_to_point(point),
            Geometry::Polyline(pl) => pl.distance_to_point(point),
            Geometry::Spline(s) => s.distance_to_point(point),
            Geometry::Donut(d) => d.distance_to_point(point),
            Geometry::Text(t) => t.distance_to_point(point),
            Geometry::MText(t) => t.distance_to_point(point),
            Geometry::Dimension(d) => d.distance_to_point(point),
            Geometry::Hatch(h) => h.distance_to_point(point),
            Geometry::Insert(i) => i.distance_to_point(point),
            Geometry::Table(t) => t.distance_to_point(point),
        }
    }

    /// 图元上距离查询点最近的点。注释类图元没有可投影的曲线，返回 None
    pub fn closest_point(&self, point: &Point2) -> Option<Point2> {
        match self {
            Geometry::Point(p) => Some(p.position),
            Geometry::Line(l) => Some(l.closest_point(point)),
            Geometry::Ray(r) => Some(r.closest_point(point)),
            Geometry::XLine(x) => Some(x.closest_point(point)),
            Geometry::Circle(c) => c.closest_point(point),
            Geometry::Arc(a) => Some(a.closest_point(point)),
            Geometry::Ellipse(e) => Some(e.closest_point(point)),
            Geometry::Polyline(pl) => pl.closest_point(point),
            Geometry::Spline(s) => s.closest_point(point),
            Geometry::Donut(d) => {
                let dist = (point - d.center).norm();
                let ring = if (dist - d.inner_radius).abs() < (dist - d.outer_radius).abs() {
                    d.inner_radius
                } else {
                    d.outer_radius
                };
                Circle::new(d.center, ring).closest_point(point)
            }
            Geometry::Text(_)
            | Geometry::MText(_)
            | Geometry::Dimension(_)
            | Geometry::Hatch(_)
            | Geometry::Insert(_)
            | Geometry::Table(_) => None,
        }
    }

    /// 应用仿射变换，返回同类型的新几何。镜像会翻转圆弧和凸度的绕向
    pub fn transformed(&self, t: &Transform2D) -> Geometry {
        let s = t.scale_factor();
        match self {
            Geometry::Point(p) => Geometry::Point(Point::from_point2(t.apply(&p.position))),
            Geometry::Line(l) => Geometry::Line(Line::new(t.apply(&l.start), t.apply(&l.end))),
            Geometry::Ray(r) => Geometry::Ray(Ray {
                origin: t.apply(&r.origin),
                direction: t.apply_vector(&r.direction).try_normalize(0.0).unwrap_or(r.direction),
            }),
            Geometry::XLine(x) => Geometry::XLine(XLine {
                origin: t.apply(&x.origin),
                direction: t.apply_vector(&x.direction).try_normalize(0.0).unwrap_or(x.direction),
            }),
            Geometry::Circle(c) => Geometry::Circle(Circle::new(t.apply(&c.center), c.radius * s)),
            Geometry::Arc(a) => {
                let start = t.apply_angle(a.start_angle);
                let end = t.apply_angle(a.end_angle);
                let (start, end) = if t.is_mirror() { (end, start) } else { (start, end) };
                Geometry::Arc(Arc::new(t.apply(&a.center), a.radius * s, start, end))
            }
            Geometry::Ellipse(e) => Geometry::Ellipse(Ellipse::new(
                t.apply(&e.center),
                e.radius_x * s,
                e.radius_y * s,
                t.apply_angle(e.rotation),
            )),
            Geometry::Polyline(pl) => {
                let flip = if t.is_mirror() { -1.0 } else { 1.0 };
                Geometry::Polyline(Polyline::new(
                    pl.vertices
                        .iter()
                        .map(|v| PolylineVertex::with_bulge(t.apply(&v.point), v.bulge * flip))
                        .collect(),
                    pl.closed,
                ))
            }
            Geometry::Spline(sp) => Geometry::Spline(Spline::new(
                sp.control_points.iter().map(|p| t.apply(p)).collect(),
                sp.degree,
                sp.closed,
            )),
            Geometry::Donut(d) => Geometry::Donut(Donut::new(
                t.apply(&d.center),
                d.inner_radius * s,
                d.outer_radius * s,
            )),
            Geometry::Text(text) => Geometry::Text(Text {
                position: t.apply(&text.position),
                height: text.height * s,
                rotation: t.apply_angle(text.rotation),
                ..text.clone()
            }),
            Geometry::MText(text) => Geometry::MText(MText {
                position: t.apply(&text.position),
                height: text.height * s,
                width: text.width * s,
                rotation: t.apply_angle(text.rotation),
                ..text.clone()
            }),
            Geometry::Dimension(d) => Geometry::Dimension(d.transformed(t)),
            Geometry::Hatch(h) => Geometry::Hatch(Hatch {
                boundary: h.boundary.iter().map(|p| t.apply(p)).collect(),
                islands: h
                    .islands
                    .iter()
                    .map(|island| island.iter().map(|p| t.apply(p)).collect())
                    .collect(),
                scale: h.scale * s,
                angle: t.apply_angle(h.angle),
                ..h.clone()
            }),
            Geometry::Insert(i) => Geometry::Insert(Insert {
                position: t.apply(&i.position),
                scale_x: i.scale_x * s,
                scale_y: i.scale_y * s,
                rotation: t.apply_angle(i.rotation),
                ..i.clone()
            }),
            Geometry::Table(tb) => Geometry::Table(Table {
                position: t.apply(&tb.position),
                row_heights: tb.row_heights.iter().map(|h| h * s).collect(),
                column_widths: tb.column_widths.iter().map(|w| w * s).collect(),
                ..tb.clone()
            }),
        }
    }
}

impl From<Line> for Geometry {
    fn from(line: Line) -> Self {
        Geometry::Line(line)
    }
}

impl From<Circle> for Geometry {
    fn from(circle: Circle) -> Self {
        Geometry::Circle(circle)
    }
}

impl From<Arc> for Geometry {
    fn from(arc: Arc) -> Self {
        Geometry::Arc(arc)
    }
}

impl From<Polyline> for Geometry {
    fn from(pl: Polyline) -> Self {
        Geometry::Polyline(pl)
    }
}

impl From<PolylineSegment> for Geometry {
    fn from(seg: PolylineSegment) -> Self {
        match seg {
            PolylineSegment::Line(l) => Geometry::Line(l),
            PolylineSegment::Arc(a) => Geometry::Arc(a),
        }
    }
}
