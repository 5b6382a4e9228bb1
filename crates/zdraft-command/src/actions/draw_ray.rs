//! 射线与构造线 Action
//!
//! 先指定起点，此后每次点击生成一条经过该点的射线（RAY）或构造线（XLINE）。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Geometry, Ray, XLine};
use zdraft_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetOrigin,
    SetThroughPoint,
}

/// RAY / XLINE
pub struct DrawConstructionLineAction {
    status: Status,
    /// true 为双向无限的构造线
    infinite: bool,
    origin: Option<Point2>,
    placed: usize,
}

impl DrawConstructionLineAction {
    fn new(infinite: bool) -> Self {
        Self {
            status: Status::SetOrigin,
            infinite,
            origin: None,
            placed: 0,
        }
    }

    pub fn ray() -> Self {
        Self::new(false)
    }

    pub fn xline() -> Self {
        Self::new(true)
    }

    fn build(&self, origin: Point2, through: Point2) -> Option<Geometry> {
        if self.infinite {
            XLine::through(origin, through).map(Geometry::XLine)
        } else {
            Ray::through(origin, through).map(Geometry::Ray)
        }
    }
}

impl Action for DrawConstructionLineAction {
    fn action_type(&self) -> ActionType {
        if self.infinite {
            ActionType::DrawXLine
        } else {
            ActionType::DrawRay
        }
    }

    fn reset(&mut self) {
        self.status = Status::SetOrigin;
        self.origin = None;
        self.placed = 0;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetOrigin => 1,
            Status::SetThroughPoint => 2,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        match (self.status, self.origin) {
            (Status::SetThroughPoint, Some(origin)) => match self.build(origin, coord) {
                Some(geometry) => {
                    self.placed += 1;
                    ActionResult::Commit(EditBatch::create_one(geometry))
                }
                None => ActionResult::ignored("through point coincides with origin"),
            },
            _ => {
                self.origin = Some(coord);
                self.status = Status::SetThroughPoint;
                ActionResult::Continue
            }
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.origin.into_iter().collect()
    }

    fn state(&self) -> CommandState {
        CommandState::ConstructionLine {
            origin: self.origin,
            infinite: self.infinite,
            placed: self.placed,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetOrigin => "指定起点:",
            Status::SetThroughPoint => "指定通过点:",
        }
        .into()
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        self.origin
            .and_then(|origin| self.build(origin, cursor))
            .map(|g| vec![PreviewGeometry::new(g)])
            .unwrap_or_default()
    }
}
