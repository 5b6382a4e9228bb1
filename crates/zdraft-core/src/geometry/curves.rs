//! 曲线类图元：点、线段、射线、构造线、圆、圆弧、椭圆、多段线、样条、圆环

use crate::math::{
    angle_in_sweep, angle_of, ccw_sweep, midpoint, normalize_angle, perpendicular, polar,
    BoundingBox2, Point2, Vector2, EPSILON,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// 圆弧超出扫掠范围时返回的距离。有限值，保证比较安全
pub const FAR_DISTANCE: f64 = 1.0e12;

/// 点标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: Point2,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
        }
    }

    pub fn from_point2(position: Point2) -> Self {
        Self { position }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(self.position, self.position)
    }
}

/// 线段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 单位方向向量，零长度时返回 None
    pub fn direction(&self) -> Option<Vector2> {
        let v = self.end - self.start;
        let len = v.norm();
        (len > EPSILON).then(|| v / len)
    }

    pub fn angle(&self) -> f64 {
        angle_of(&self.start, &self.end)
    }

    pub fn midpoint(&self) -> Point2 {
        midpoint(&self.start, &self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < EPSILON
    }

    /// 参数 t 处的点（t=0 起点，t=1 终点）
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + (self.end - self.start) * t
    }

    /// 点在直线上的投影参数（不截断）
    pub fn project_param(&self, point: &Point2) -> f64 {
        let v = self.end - self.start;
        let c2 = v.dot(&v);
        if c2 < EPSILON {
            return 0.0;
        }
        (point - self.start).dot(&v) / c2
    }

    /// 线段上距离给定点最近的点
    pub fn closest_point(&self, point: &Point2) -> Point2 {
        let t = self.project_param(point).clamp(0.0, 1.0);
        self.point_at(t)
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.closest_point(point)).norm()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.start, self.end])
    }
}

/// 射线（半无限线）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point2,
    /// 单位方向
    pub direction: Vector2,
}

impl Ray {
    /// 经过 `through` 的射线，两点重合时返回 None
    pub fn through(origin: Point2, through: Point2) -> Option<Self> {
        Line::new(origin, through)
            .direction()
            .map(|direction| Self { origin, direction })
    }

    pub fn closest_point(&self, point: &Point2) -> Point2 {
        let t = (point - self.origin).dot(&self.direction).max(0.0);
        self.origin + self.direction * t
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.closest_point(point)).norm()
    }

    /// 用于求交的等效线段（单位长度参数化）
    pub fn as_line(&self) -> Line {
        Line::new(self.origin, self.origin + self.direction)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(self.origin, self.origin)
    }
}

/// 构造线（双向无限）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XLine {
    pub origin: Point2,
    /// 单位方向
    pub direction: Vector2,
}

impl XLine {
    pub fn through(origin: Point2, through: Point2) -> Option<Self> {
        Line::new(origin, through)
            .direction()
            .map(|direction| Self { origin, direction })
    }

    pub fn closest_point(&self, point: &Point2) -> Point2 {
        let t = (point - self.origin).dot(&self.direction);
        self.origin + self.direction * t
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.closest_point(point)).norm()
    }

    pub fn as_line(&self) -> Line {
        Line::new(self.origin, self.origin + self.direction)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(self.origin, self.origin)
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    /// 半径取绝对值，保证非负
    pub fn new(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        polar(self.center, self.radius, angle)
    }

    /// 0°/90°/180°/270° 象限点
    pub fn quadrant_points(&self) -> [Point2; 4] {
        [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2].map(|a| self.point_at_angle(a))
    }

    /// 圆周上最近点；查询点位于圆心时没有方向信息，返回 None
    pub fn closest_point(&self, point: &Point2) -> Option<Point2> {
        let v = point - self.center;
        let len = v.norm();
        (len > EPSILON).then(|| self.center + v * (self.radius / len))
    }

    /// 到圆周的距离（非负）。圆心处返回半径
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        ((point - self.center).norm() - self.radius).abs()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius, self.center.y - self.radius),
            Point2::new(self.center.x + self.radius, self.center.y + self.radius),
        )
    }
}

/// 圆弧（从起始角逆时针扫到终止角，允许终止角小于起始角）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（弧度）
    pub start_angle: f64,
    /// 终止角度（弧度）
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
            start_angle,
            end_angle,
        }
    }

    /// 从三点创建圆弧：起点、弧上一点、终点。三点共线时返回 None
    pub fn from_three_points(p1: Point2, p2: Point2, p3: Point2) -> Option<Self> {
        let d = 2.0 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));

        if d.abs() < EPSILON {
            return None;
        }

        let s1 = p1.x * p1.x + p1.y * p1.y;
        let s2 = p2.x * p2.x + p2.y * p2.y;
        let s3 = p3.x * p3.x + p3.y * p3.y;
        let ux = (s1 * (p2.y - p3.y) + s2 * (p3.y - p1.y) + s3 * (p1.y - p2.y)) / d;
        let uy = (s1 * (p3.x - p2.x) + s2 * (p1.x - p3.x) + s3 * (p2.x - p1.x)) / d;

        let center = Point2::new(ux, uy);
        let radius = (p1 - center).norm();

        let a1 = angle_of(&center, &p1);
        let a2 = angle_of(&center, &p2);
        let a3 = angle_of(&center, &p3);

        // 中间点决定方向：若 p2 位于 p1->p3 的逆时针区间内则逆时针，否则交换端点
        if angle_in_sweep(a2, a1, a3) {
            Some(Self::new(center, radius, a1, a3))
        } else {
            Some(Self::new(center, radius, a3, a1))
        }
    }

    /// 扫掠角 (0, 2π]
    pub fn sweep_angle(&self) -> f64 {
        let sweep = ccw_sweep(self.start_angle, self.end_angle);
        if sweep < EPSILON {
            TAU
        } else {
            sweep
        }
    }

    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    pub fn start_point(&self) -> Point2 {
        polar(self.center, self.radius, self.start_angle)
    }

    pub fn end_point(&self) -> Point2 {
        polar(self.center, self.radius, self.end_angle)
    }

    pub fn mid_angle(&self) -> f64 {
        normalize_angle(self.start_angle + self.sweep_angle() / 2.0)
    }

    pub fn midpoint(&self) -> Point2 {
        polar(self.center, self.radius, self.mid_angle())
    }

    /// 检查角度是否在弧的扫掠范围内
    pub fn contains_angle(&self, angle: f64) -> bool {
        angle_in_sweep(angle, self.start_angle, self.end_angle)
    }

    /// 检查圆周上的点是否落在弧上
    pub fn contains_point(&self, point: &Point2) -> bool {
        self.contains_angle(angle_of(&self.center, point))
    }

    pub fn to_circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// 弧上最近点，径向投影落在扫掠范围外时取较近端点
    pub fn closest_point(&self, point: &Point2) -> Point2 {
        if let Some(on_circle) = self.to_circle().closest_point(point) {
            if self.contains_point(&on_circle) {
                return on_circle;
            }
        }
        let s = self.start_point();
        let e = self.end_point();
        if (point - s).norm() <= (point - e).norm() {
            s
        } else {
            e
        }
    }

    /// 到弧的距离。角度落在扫掠范围外时返回 `FAR_DISTANCE`
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        let v = point - self.center;
        if v.norm() < EPSILON {
            return self.radius;
        }
        if self.contains_angle(v.y.atan2(v.x)) {
            (v.norm() - self.radius).abs()
        } else {
            FAR_DISTANCE
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start_point(), self.end_point()]);
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            if self.contains_angle(angle) {
                bbox.expand_to_include(&polar(self.center, self.radius, angle));
            }
        }
        bbox
    }
}

/// 椭圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point2,
    /// 长半轴（沿 rotation 方向）
    pub radius_x: f64,
    pub radius_y: f64,
    /// 旋转角（弧度）
    pub rotation: f64,
}

impl Ellipse {
    const SAMPLES: usize = 128;

    pub fn new(center: Point2, radius_x: f64, radius_y: f64, rotation: f64) -> Self {
        Self {
            center,
            radius_x: radius_x.abs(),
            radius_y: radius_y.abs(),
            rotation,
        }
    }

    /// 参数 t 处的点
    pub fn point_at(&self, t: f64) -> Point2 {
        let (sin_r, cos_r) = self.rotation.sin_cos();
        let x = self.radius_x * t.cos();
        let y = self.radius_y * t.sin();
        Point2::new(
            self.center.x + x * cos_r - y * sin_r,
            self.center.y + x * sin_r + y * cos_r,
        )
    }

    /// 四个轴端点
    pub fn axis_points(&self) -> [Point2; 4] {
        [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2].map(|t| self.point_at(t))
    }

    fn sample(&self) -> Vec<Point2> {
        (0..Self::SAMPLES)
            .map(|i| self.point_at(TAU * i as f64 / Self::SAMPLES as f64))
            .collect()
    }

    /// 近似最近点（参数采样后在相邻采样段上投影）
    pub fn closest_point(&self, point: &Point2) -> Point2 {
        let samples = self.sample();
        closest_on_chain(&samples, true, point).unwrap_or(self.center)
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.closest_point(point)).norm()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let (sin_r, cos_r) = self.rotation.sin_cos();
        let hw = ((self.radius_x * cos_r).powi(2) + (self.radius_y * sin_r).powi(2)).sqrt();
        let hh = ((self.radius_x * sin_r).powi(2) + (self.radius_y * cos_r).powi(2)).sqrt();
        BoundingBox2::new(
            Point2::new(self.center.x - hw, self.center.y - hh),
            Point2::new(self.center.x + hw, self.center.y + hh),
        )
    }
}

/// 多段线顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    pub point: Point2,
    /// 凸度（bulge），0 表示直线段，正值为逆时针圆弧
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(point: Point2) -> Self {
        Self { point, bulge: 0.0 }
    }

    pub fn with_bulge(point: Point2, bulge: f64) -> Self {
        Self { point, bulge }
    }
}

/// 多段线的一段
#[derive(Debug, Clone, PartialEq)]
pub enum PolylineSegment {
    Line(Line),
    Arc(Arc),
}

/// 多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<PolylineVertex>,
    pub closed: bool,
}

impl Polyline {
    pub fn new(vertices: Vec<PolylineVertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// 从点列表创建（所有顶点都是直线连接）
    pub fn from_points(points: impl IntoIterator<Item = Point2>, closed: bool) -> Self {
        Self {
            vertices: points.into_iter().map(PolylineVertex::new).collect(),
            closed,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.vertices.iter().map(|v| v.point)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn segment_count(&self) -> usize {
        match self.vertices.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// 第 i 段
    pub fn segment(&self, i: usize) -> Option<PolylineSegment> {
        if i >= self.segment_count() {
            return None;
        }
        let v1 = &self.vertices[i];
        let v2 = &self.vertices[(i + 1) % self.vertices.len()];
        if v1.bulge.abs() < EPSILON {
            return Some(PolylineSegment::Line(Line::new(v1.point, v2.point)));
        }
        Some(match bulge_to_arc(v1.point, v2.point, v1.bulge) {
            Some(arc) => PolylineSegment::Arc(arc),
            None => PolylineSegment::Line(Line::new(v1.point, v2.point)),
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = PolylineSegment> + '_ {
        (0..self.segment_count()).filter_map(|i| self.segment(i))
    }

    pub fn length(&self) -> f64 {
        self.segments()
            .map(|seg| match seg {
                PolylineSegment::Line(l) => l.length(),
                PolylineSegment::Arc(a) => a.length(),
            })
            .sum()
    }

    pub fn closest_point(&self, point: &Point2) -> Option<Point2> {
        match self.vertices.len() {
            0 => None,
            1 => Some(self.vertices[0].point),
            _ => self
                .segments()
                .map(|seg| match seg {
                    PolylineSegment::Line(l) => l.closest_point(point),
                    PolylineSegment::Arc(a) => a.closest_point(point),
                })
                .min_by(|a, b| (a - point).norm().total_cmp(&(b - point).norm())),
        }
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.closest_point(point)
            .map(|p| (p - point).norm())
            .unwrap_or(FAR_DISTANCE)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        self.segments().fold(
            BoundingBox2::from_points(self.points()),
            |bbox, seg| match seg {
                PolylineSegment::Line(_) => bbox,
                PolylineSegment::Arc(a) => bbox.union(&a.bounding_box()),
            },
        )
    }
}

/// 凸度顶点对转换为圆弧（总是以逆时针方向表示）
pub fn bulge_to_arc(p1: Point2, p2: Point2, bulge: f64) -> Option<Arc> {
    let chord = p2 - p1;
    let chord_len = chord.norm();
    if chord_len < EPSILON || bulge.abs() < EPSILON {
        return None;
    }

    let s = chord_len / 2.0;
    let h = s * bulge.abs();
    let radius = (s * s + h * h) / (2.0 * h);
    let d = radius - h;

    let perp = if bulge > 0.0 {
        perpendicular(&chord) / chord_len
    } else {
        -perpendicular(&chord) / chord_len
    };
    let center = midpoint(&p1, &p2) + perp * d;

    let a1 = angle_of(&center, &p1);
    let a2 = angle_of(&center, &p2);
    if bulge > 0.0 {
        Some(Arc::new(center, radius, a1, a2))
    } else {
        Some(Arc::new(center, radius, a2, a1))
    }
}

/// 折线链上最近点
pub(crate) fn closest_on_chain(points: &[Point2], closed: bool, query: &Point2) -> Option<Point2> {
    match points.len() {
        0 => None,
        1 => Some(points[0]),
        n => {
            let count = if closed { n } else { n - 1 };
            (0..count)
                .map(|i| Line::new(points[i], points[(i + 1) % n]).closest_point(query))
                .min_by(|a, b| (a - query).norm().total_cmp(&(b - query).norm()))
        }
    }
}

/// 样条曲线（均匀 B 样条，开放时夹紧端点）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    pub control_points: Vec<Point2>,
    pub degree: usize,
    pub closed: bool,
}

impl Spline {
    const SAMPLES_PER_SPAN: usize = 16;

    pub fn new(control_points: Vec<Point2>, degree: usize, closed: bool) -> Self {
        Self {
            control_points,
            degree,
            closed,
        }
    }

    /// 实际使用的阶数（不超过控制点数 - 1）
    pub fn effective_degree(&self) -> usize {
        self.degree.min(self.control_points.len().saturating_sub(1)).max(1)
    }

    /// 参与计算的控制点与节点向量
    fn basis(&self) -> (Vec<Point2>, Vec<f64>, usize) {
        let p = self.effective_degree();
        if self.closed {
            let mut ctrl = self.control_points.clone();
            ctrl.extend(self.control_points.iter().take(p).copied());
            let knots = (0..ctrl.len() + p + 1).map(|i| i as f64).collect();
            (ctrl, knots, p)
        } else {
            let n = self.control_points.len();
            let spans = n - p;
            let mut knots = vec![0.0; p + 1];
            knots.extend((1..spans).map(|i| i as f64));
            knots.extend(std::iter::repeat(spans as f64).take(p + 1));
            (self.control_points.clone(), knots, p)
        }
    }

    /// 曲线采样点
    pub fn sample(&self) -> Vec<Point2> {
        if self.control_points.len() < 2 {
            return self.control_points.clone();
        }
        let (ctrl, knots, p) = self.basis();
        let n = ctrl.len();
        let (u0, u1) = (knots[p], knots[n]);
        let steps = (n - p) * Self::SAMPLES_PER_SPAN;
        (0..=steps)
            .map(|i| {
                let u = u0 + (u1 - u0) * i as f64 / steps as f64;
                de_boor(&ctrl, &knots, p, u)
            })
            .collect()
    }

    pub fn start_point(&self) -> Option<Point2> {
        self.sample().first().copied()
    }

    pub fn end_point(&self) -> Option<Point2> {
        self.sample().last().copied()
    }

    pub fn closest_point(&self, point: &Point2) -> Option<Point2> {
        closest_on_chain(&self.sample(), false, point)
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.closest_point(point)
            .map(|p| (p - point).norm())
            .unwrap_or(FAR_DISTANCE)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.control_points.iter().copied())
    }
}

/// de Boor 求值
fn de_boor(ctrl: &[Point2], knots: &[f64], p: usize, u: f64) -> Point2 {
    let n = ctrl.len();
    let mut k = p;
    while k < n - 1 && u >= knots[k + 1] {
        k += 1;
    }

    let mut d: Vec<Vector2> = (0..=p).map(|j| ctrl[j + k - p].coords).collect();
    for r in 1..=p {
        for j in (r..=p).rev() {
            let i = j + k - p;
            let denom = knots[i + p + 1 - r] - knots[i];
            let alpha = if denom.abs() < EPSILON {
                0.0
            } else {
                (u - knots[i]) / denom
            };
            d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
        }
    }
    Point2::from(d[p])
}

/// 圆环（填充的环形）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donut {
    pub center: Point2,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Donut {
    /// 内外半径自动排序
    pub fn new(center: Point2, inner_radius: f64, outer_radius: f64) -> Self {
        let (a, b) = (inner_radius.abs(), outer_radius.abs());
        Self {
            center,
            inner_radius: a.min(b),
            outer_radius: a.max(b),
        }
    }

    /// 填充区域内为 0
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        let d = (point - self.center).norm();
        if d >= self.inner_radius && d <= self.outer_radius {
            0.0
        } else if d < self.inner_radius {
            self.inner_radius - d
        } else {
            d - self.outer_radius
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        Circle::new(self.center, self.outer_radius).bounding_box()
    }
}
