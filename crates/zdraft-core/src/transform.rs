//! 二维仿射变换（平移、旋转、缩放、镜像）

use crate::math::{Point2, Vector2, EPSILON};
use nalgebra::Matrix3;

/// 二维仿射变换，使用齐次坐标矩阵
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    matrix: Matrix3<f64>,
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn translation(offset: Vector2) -> Self {
        Self {
            matrix: Matrix3::new(1.0, 0.0, offset.x, 0.0, 1.0, offset.y, 0.0, 0.0, 1.0),
        }
    }

    /// 绕 `center` 逆时针旋转 `angle` 弧度
    pub fn rotation(center: Point2, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let rotate = Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0);
        Self::about(center, rotate)
    }

    /// 以 `center` 为基点等比缩放
    pub fn scaling(center: Point2, factor: f64) -> Self {
        let scale = Matrix3::new(factor, 0.0, 0.0, 0.0, factor, 0.0, 0.0, 0.0, 1.0);
        Self::about(center, scale)
    }

    /// 关于经过 `p1`、`p2` 的直线镜像。两点重合时退化为恒等变换
    pub fn mirror(p1: Point2, p2: Point2) -> Self {
        let d = p2 - p1;
        let len = d.norm();
        if len < EPSILON {
            return Self::identity();
        }
        let u = d / len;
        // 反射矩阵 2uu^T - I
        let reflect = Matrix3::new(
            2.0 * u.x * u.x - 1.0,
            2.0 * u.x * u.y,
            0.0,
            2.0 * u.x * u.y,
            2.0 * u.y * u.y - 1.0,
            0.0,
            0.0,
            0.0,
            1.0,
        );
        Self::about(p1, reflect)
    }

    fn about(center: Point2, linear: Matrix3<f64>) -> Self {
        let to_origin = Self::translation(-center.coords).matrix;
        let back = Self::translation(center.coords).matrix;
        Self {
            matrix: back * linear * to_origin,
        }
    }

    /// 先应用 self，再应用 other
    pub fn then(&self, other: &Transform2D) -> Transform2D {
        Transform2D {
            matrix: other.matrix * self.matrix,
        }
    }

    pub fn apply(&self, p: &Point2) -> Point2 {
        let m = &self.matrix;
        Point2::new(
            m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)],
            m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)],
        )
    }

    /// 变换方向向量（不含平移）
    pub fn apply_vector(&self, v: &Vector2) -> Vector2 {
        let m = &self.matrix;
        Vector2::new(
            m[(0, 0)] * v.x + m[(0, 1)] * v.y,
            m[(1, 0)] * v.x + m[(1, 1)] * v.y,
        )
    }

    /// 变换一个方向角
    pub fn apply_angle(&self, angle: f64) -> f64 {
        let v = self.apply_vector(&Vector2::new(angle.cos(), angle.sin()));
        v.y.atan2(v.x)
    }

    fn determinant(&self) -> f64 {
        let m = &self.matrix;
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
    }

    /// 线性部分的等比缩放因子
    pub fn scale_factor(&self) -> f64 {
        self.determinant().abs().sqrt()
    }

    /// 是否包含镜像（翻转绕向）
    pub fn is_mirror(&self) -> bool {
        self.determinant() < 0.0
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
