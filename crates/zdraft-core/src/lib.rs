//! ZDraft 核心几何内核
//!
//! 提供二维图元、求交、拾取、对象捕捉和尺寸标注几何。
//! 这里的函数都不修改文档，命令状态机在 `zdraft-command` 中。
//!
//! # 架构设计
//!
//! - `Entity`: 文档中的实体（ID + 几何 + 属性 + 图层）
//! - `Geometry`: 几何数据（直线、圆弧、多段线、文字、标注等）
//! - `SnapEngine`: 对象捕捉
//! - `dimension`: 标注布局的纯函数
//!
//! # 示例
//!
//! ```rust
//! use zdraft_core::prelude::*;
//!
//! let a = Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)));
//! let b = Geometry::Line(Line::new(Point2::new(0.0, 10.0), Point2::new(10.0, 0.0)));
//!
//! let hits = find_entity_intersections(&a, &b);
//! assert_eq!(hits.len(), 1);
//! ```

pub mod dimension;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input_parser;
pub mod intersect;
pub mod layer;
pub mod math;
pub mod modify;
pub mod properties;
pub mod settings;
pub mod snap;
pub mod transform;
pub mod units;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::dimension::{DimLayout, DimStyle, Dimension, DimensionKind, DimensionSettings};
    pub use crate::entity::{Entity, EntityId};
    pub use crate::error::{ParseError, SettingsError};
    pub use crate::geometry::{
        Arc, Circle, Donut, Ellipse, Geometry, Line, MText, Point, Polyline, Ray, Spline, Table, Text,
        XLine,
    };
    pub use crate::hit::find_closest;
    pub use crate::input_parser::{InputParser, InputValue};
    pub use crate::intersect::{find_entity_intersections, Intersection};
    pub use crate::layer::Layer;
    pub use crate::math::{Point2, Point3, Vector2};
    pub use crate::properties::{Color, LineType, Properties};
    pub use crate::settings::DraftSettings;
    pub use crate::snap::{SnapConfig, SnapEngine, SnapMask, SnapResult, SnapType};
    pub use crate::transform::Transform2D;
    pub use crate::units::DrawingUnit;
}
