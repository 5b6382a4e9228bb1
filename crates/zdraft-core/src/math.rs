//! 基础数学类型与角度工具
//!
//! 坐标统一使用 `f64`，二维几何计算基于 nalgebra 的 `Point2`/`Vector2`。

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

pub type Point2 = nalgebra::Point2<f64>;
pub type Point3 = nalgebra::Point3<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;

/// 几何比较容差
pub const EPSILON: f64 = 1e-9;

/// 判断"零长度"输入的容差（点击重合、零半径等）
pub const DEGENERATE_TOLERANCE: f64 = 1e-6;

/// 平面欧氏距离（忽略 z）
pub fn distance(p1: &Point2, p2: &Point2) -> f64 {
    (p2 - p1).norm()
}

/// 三维点投影到绘图平面
pub fn to_plane(p: &Point3) -> Point2 {
    Point2::new(p.x, p.y)
}

/// 极坐标：从 `origin` 沿 `angle` 方向走 `length`
pub fn polar(origin: Point2, length: f64, angle: f64) -> Point2 {
    Point2::new(origin.x + length * angle.cos(), origin.y + length * angle.sin())
}

/// 两点连线的方向角（弧度）
pub fn angle_of(from: &Point2, to: &Point2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// 角度转弧度
pub fn to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// 弧度转角度
pub fn to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// 角度归一化到 [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(TAU);
    // rem_euclid 在极小负数时可能返回 TAU 本身
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// 从 `from` 转到 `to` 的最短有向角差，范围 (-π, π]
pub fn angle_between(from: f64, to: f64) -> f64 {
    let mut delta = normalize_angle(to - from);
    if delta > PI {
        delta -= TAU;
    }
    delta
}

/// 逆时针扫掠角：从 `start` 逆时针到 `end`，范围 [0, 2π)
pub fn ccw_sweep(start: f64, end: f64) -> f64 {
    normalize_angle(end - start)
}

/// 检查角度是否位于从 `start` 逆时针扫到 `end` 的区间内（允许跨越 0 度）
pub fn angle_in_sweep(angle: f64, start: f64, end: f64) -> bool {
    let sweep = ccw_sweep(start, end);
    if sweep < EPSILON {
        // 起止角重合视为整圆
        return true;
    }
    let offset = normalize_angle(angle - start);
    offset <= sweep + EPSILON || offset >= TAU - EPSILON
}

/// 向量逆时针旋转 90 度
pub fn perpendicular(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 二维叉积（z 分量）
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// 二维轴对齐包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 空包围盒（min > max）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_to_include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &BoundingBox2) -> BoundingBox2 {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let mut bbox = *self;
        bbox.expand_to_include(&other.min);
        bbox.expand_to_include(&other.max);
        bbox
    }

    pub fn center(&self) -> Point2 {
        midpoint(&self.min, &self.max)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &BoundingBox2) -> bool {
        !(other.min.x > self.max.x
            || other.max.x < self.min.x
            || other.min.y > self.max.y
            || other.max.y < self.min.y)
    }

    /// 点到包围盒边界区域的距离（盒内为 0）
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        if self.is_empty() {
            return f64::MAX;
        }
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        (dx * dx + dy * dy).sqrt()
    }
}
