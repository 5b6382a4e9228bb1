//! 图层

use crate::entity::DEFAULT_LAYER;
use crate::properties::{Color, LineType};
use serde::{Deserialize, Serialize};

/// 图层
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub color: Color,
    pub line_type: LineType,
    pub visible: bool,
    pub locked: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Color::WHITE,
            line_type: LineType::Continuous,
            visible: true,
            locked: false,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// 可见且未锁定的图层上的实体才参与捕捉和编辑
    pub fn is_editable(&self) -> bool {
        self.visible && !self.locked
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new(DEFAULT_LAYER)
    }
}
