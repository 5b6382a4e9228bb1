//! 绘制点 Action，每次点击放置一个点标记

use crate::action::{Action, ActionContext, ActionResult, ActionType};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Geometry, Point};
use zdraft_core::math::Point2;

/// 绘制点 Action
pub struct DrawPointAction {
    placed: Vec<Point2>,
}

impl DrawPointAction {
    pub fn new() -> Self {
        Self { placed: Vec::new() }
    }
}

impl Default for DrawPointAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawPointAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawPoint
    }

    fn reset(&mut self) {
        self.placed.clear();
    }

    fn step(&self) -> u32 {
        1
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        self.placed.push(coord);
        ActionResult::Commit(EditBatch::create_one(Geometry::Point(Point::from_point2(coord))))
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.placed.last().copied().into_iter().collect()
    }

    fn state(&self) -> CommandState {
        CommandState::Point {
            placed: self.placed.len(),
        }
    }

    fn prompt(&self) -> String {
        "指定点:".into()
    }
}
