//! 实体标识和管理
//!
//! ID 由文档单调分配，删除后不再复用。

use crate::geometry::Geometry;
use crate::math::BoundingBox2;
use crate::properties::Properties;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 实体唯一标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// 空ID（尚未加入文档）
    pub const NULL: EntityId = EntityId(0);
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 默认图层名
pub const DEFAULT_LAYER: &str = "0";

/// CAD实体
///
/// 一个实体包含几何数据和属性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// 唯一标识符
    pub id: EntityId,

    /// 几何类型和数据
    pub geometry: Geometry,

    /// 视觉属性
    pub properties: Properties,

    /// 所属图层名
    pub layer: String,

    /// 是否可见
    pub visible: bool,

    /// 是否锁定（不可编辑）
    pub locked: bool,

    /// 标高（命令首个输入点的 z 值）
    pub elevation: f64,
}

impl Entity {
    /// 创建新实体，ID 在加入文档时分配
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: EntityId::NULL,
            geometry,
            properties: Properties::default(),
            layer: DEFAULT_LAYER.to_string(),
            visible: true,
            locked: false,
            elevation: 0.0,
        }
    }

    /// 获取包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        self.geometry.bounding_box()
    }

    /// 使用指定的图层
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    /// 复制为新实体（ID 清空，几何替换）
    pub fn derive(&self, geometry: Geometry) -> Entity {
        Entity {
            id: EntityId::NULL,
            geometry,
            ..self.clone()
        }
    }
}
