//! 绘制样条曲线 Action
//!
//! 逐个累积控制点，回车生成开放样条，C 生成闭合样条。
//! 次数取 min(3, n-1)。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::coincident;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Geometry, Polyline, Spline};
use zdraft_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetFirstPoint,
    SetNextPoint,
}

/// 绘制样条 Action
pub struct DrawSplineAction {
    status: Status,
    control_points: Vec<Point2>,
}

impl DrawSplineAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetFirstPoint,
            control_points: Vec::new(),
        }
    }

    fn spline(&self, closed: bool) -> Spline {
        let degree = 3.min(self.control_points.len().saturating_sub(1));
        Spline::new(self.control_points.clone(), degree, closed)
    }

    fn finish(&mut self, closed: bool) -> ActionResult {
        let spline = self.spline(closed);
        self.reset();
        ActionResult::Finish(EditBatch::create_one(Geometry::Spline(spline)))
    }
}

impl Default for DrawSplineAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawSplineAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawSpline
    }

    fn reset(&mut self) {
        self.status = Status::SetFirstPoint;
        self.control_points.clear();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetFirstPoint => 1,
            Status::SetNextPoint => 2,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        if self.control_points.last().is_some_and(|last| coincident(last, &coord)) {
            return ActionResult::ignored("control point coincides with the previous one");
        }
        self.control_points.push(coord);
        self.status = Status::SetNextPoint;
        ActionResult::Continue
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        if self.status != Status::SetNextPoint {
            return None;
        }
        match cmd {
            "C" | "CLOSE" => Some(if self.control_points.len() >= 3 {
                self.finish(true)
            } else {
                ActionResult::ignored("closed spline needs at least three points")
            }),
            "U" | "UNDO" => {
                self.control_points.pop();
                if self.control_points.is_empty() {
                    self.status = Status::SetFirstPoint;
                }
                Some(ActionResult::Continue)
            }
            _ => None,
        }
    }

    fn on_enter(&mut self, _ctx: &ActionContext) -> ActionResult {
        if self.control_points.len() >= 2 {
            self.finish(false)
        } else {
            ActionResult::Done
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.control_points.clone()
    }

    fn state(&self) -> CommandState {
        CommandState::Spline {
            control_points: self.control_points.len(),
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetFirstPoint => "指定第一个点:".into(),
            Status::SetNextPoint => "输入下一个点 或 [闭合(C)/放弃(U)]:".into(),
        }
    }

    fn available_commands(&self) -> Vec<&'static str> {
        match self.status {
            Status::SetFirstPoint => vec![],
            Status::SetNextPoint => vec!["close", "undo"],
        }
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        if self.control_points.is_empty() {
            return vec![];
        }
        let mut points = self.control_points.clone();
        points.push(cursor);
        let degree = 3.min(points.len() - 1);
        vec![
            PreviewGeometry::new(Geometry::Spline(Spline::new(points.clone(), degree, false))),
            // 控制多边形
            PreviewGeometry::reference(Geometry::Polyline(Polyline::from_points(points, false))),
        ]
    }
}
