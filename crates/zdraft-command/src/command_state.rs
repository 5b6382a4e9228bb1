//! 类型化的命令状态
//!
//! 每个 Action 把自己的内部状态投影成一个 [`CommandState`]，
//! 供预览渲染和状态栏读取。

use serde::{Deserialize, Serialize};
use zdraft_core::entity::EntityId;
use zdraft_core::math::Point2;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CommandState {
    #[default]
    Idle,
    Line {
        /// 连续画线的第一个点（闭合时回到这里）
        chain_start: Option<Point2>,
        segments: usize,
    },
    Polyline {
        vertices: usize,
    },
    Rectangle {
        first_corner: Option<Point2>,
    },
    Circle {
        center: Option<Point2>,
        /// 键入值按直径解释
        diameter_mode: bool,
    },
    Arc {
        points: usize,
    },
    Polygon {
        sides: u32,
        /// 外切（半径为边心距）
        circumscribed: bool,
        center: Option<Point2>,
    },
    Ellipse {
        center: Option<Point2>,
        major_end: Option<Point2>,
    },
    Point {
        placed: usize,
    },
    Spline {
        control_points: usize,
    },
    /// RAY / XLINE
    ConstructionLine {
        origin: Option<Point2>,
        infinite: bool,
        placed: usize,
    },
    Donut {
        inner_diameter: Option<f64>,
        outer_diameter: Option<f64>,
    },
    /// MOVE / COPY / ROTATE / SCALE
    Transform {
        selection: Vec<EntityId>,
        base_point: Option<Point2>,
        /// 复制命令已放置的副本数
        copies: usize,
    },
    Mirror {
        selection: Vec<EntityId>,
        first_point: Option<Point2>,
        second_point: Option<Point2>,
    },
    Erase {
        selection: Vec<EntityId>,
    },
    Offset {
        distance: Option<f64>,
        source: Option<EntityId>,
    },
    Trim {
        cutting_edges: Vec<EntityId>,
    },
    Extend {
        boundaries: Vec<EntityId>,
    },
    /// DIMLINEAR / DIMALIGNED
    DimLinear {
        first: Option<Point2>,
        second: Option<Point2>,
    },
    DimAngular {
        line1: Option<EntityId>,
        line2: Option<EntityId>,
    },
    /// DIMRADIUS / DIMDIAMETER
    DimRadial {
        target: Option<EntityId>,
    },
    /// DIMCONTINUE / DIMBASELINE
    DimChain {
        base_point: Option<Point2>,
        last_point: Option<Point2>,
        placed: usize,
    },
    /// TEXT / MTEXT
    Text {
        position: Option<Point2>,
        awaiting_editor: bool,
    },
    Table {
        position: Option<Point2>,
        awaiting_editor: bool,
    },
}

impl CommandState {
    pub fn is_idle(&self) -> bool {
        matches!(self, CommandState::Idle)
    }

    /// 处于选择阶段的命令当前的选择集
    pub fn selection(&self) -> &[EntityId] {
        match self {
            CommandState::Transform { selection, .. }
            | CommandState::Mirror { selection, .. }
            | CommandState::Erase { selection } => selection,
            CommandState::Trim { cutting_edges } => cutting_edges,
            CommandState::Extend { boundaries } => boundaries,
            _ => &[],
        }
    }
}
