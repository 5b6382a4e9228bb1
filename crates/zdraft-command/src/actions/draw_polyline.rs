//! 绘制多段线 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::coincident;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Geometry, Line, Polyline};
use zdraft_core::math::{angle_of, Point2};

/// 多段线绘制状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// 等待设置起点
    SetStartpoint,
    /// 等待设置下一点
    SetNextPoint,
}

/// 绘制多段线 Action
pub struct DrawPolylineAction {
    status: Status,
    vertices: Vec<Point2>,
}

impl DrawPolylineAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetStartpoint,
            vertices: Vec::new(),
        }
    }

    fn finish(&mut self, closed: bool) -> ActionResult {
        let polyline = Polyline::from_points(self.vertices.iter().copied(), closed);
        self.reset();
        ActionResult::Finish(EditBatch::create_one(Geometry::Polyline(polyline)))
    }
}

impl Default for DrawPolylineAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawPolylineAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawPolyline
    }

    fn reset(&mut self) {
        self.status = Status::SetStartpoint;
        self.vertices.clear();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetStartpoint => 1,
            Status::SetNextPoint => 2,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        if let Some(last) = self.vertices.last() {
            if coincident(last, &coord) {
                return ActionResult::ignored("vertex coincides with the previous one");
            }
        }
        self.vertices.push(coord);
        self.status = Status::SetNextPoint;
        ActionResult::Continue
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        if self.status != Status::SetNextPoint {
            return None;
        }
        match cmd {
            "C" | "CLOSE" => Some(if self.vertices.len() >= 3 {
                self.finish(true)
            } else {
                ActionResult::ignored("close needs at least three vertices")
            }),
            "U" | "UNDO" => {
                self.vertices.pop();
                if self.vertices.is_empty() {
                    self.status = Status::SetStartpoint;
                }
                Some(ActionResult::Continue)
            }
            _ => None,
        }
    }

    fn on_enter(&mut self, _ctx: &ActionContext) -> ActionResult {
        if self.vertices.len() >= 2 {
            self.finish(false)
        } else {
            ActionResult::Done
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.vertices.clone()
    }

    fn state(&self) -> CommandState {
        CommandState::Polyline {
            vertices: self.vertices.len(),
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetStartpoint => "指定起点:".into(),
            Status::SetNextPoint if self.vertices.len() >= 3 => "指定下一点 或 [闭合(C)/放弃(U)]:".into(),
            Status::SetNextPoint => "指定下一点 或 [放弃(U)]:".into(),
        }
    }

    fn available_commands(&self) -> Vec<&'static str> {
        match self.status {
            Status::SetStartpoint => vec![],
            Status::SetNextPoint if self.vertices.len() >= 3 => vec!["close", "undo"],
            Status::SetNextPoint => vec!["undo"],
        }
    }

    fn direction_hint(&self) -> Option<f64> {
        if self.status != Status::SetNextPoint {
            return None;
        }
        match self.vertices.as_slice() {
            [.., a, b] => Some(angle_of(a, b)),
            _ => Some(0.0),
        }
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        let mut previews = Vec::new();
        if self.vertices.len() >= 2 {
            let polyline = Polyline::from_points(self.vertices.iter().copied(), false);
            previews.push(PreviewGeometry::new(Geometry::Polyline(polyline)));
        }
        if let Some(&last) = self.vertices.last() {
            previews.push(PreviewGeometry::new(Geometry::Line(Line::new(last, cursor))));
        }
        previews
    }
}
