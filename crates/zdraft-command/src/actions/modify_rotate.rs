//! 旋转 Action
//!
//! 旋转角可以用点指定（基点到该点的方向），也可以键入角度（度）。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::{coincident, SelectionPhase};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use crate::selection::SelectionSet;
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::{angle_of, to_radians, Point2};
use zdraft_core::transform::Transform2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectObjects,
    SetCenter,
    SetAngle,
}

/// 旋转 Action
pub struct RotateAction {
    status: Status,
    selection: SelectionPhase,
    center: Option<Point2>,
}

impl RotateAction {
    pub fn new() -> Self {
        Self::with_selection(SelectionSet::new())
    }

    pub fn with_selection(selection: SelectionSet) -> Self {
        Self {
            status: if selection.is_empty() {
                Status::SelectObjects
            } else {
                Status::SetCenter
            },
            selection: SelectionPhase::with_selection(selection),
            center: None,
        }
    }

    fn finish(&mut self, ctx: &ActionContext, angle: f64) -> ActionResult {
        let Some(center) = self.center else {
            return ActionResult::ignored("missing base point");
        };
        let changes = self.selection.transformed(ctx, &Transform2D::rotation(center, angle));
        self.reset();
        ActionResult::Finish(EditBatch::modify(changes))
    }
}

impl Default for RotateAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for RotateAction {
    fn action_type(&self) -> ActionType {
        ActionType::Rotate
    }

    fn reset(&mut self) {
        self.status = Status::SelectObjects;
        self.selection.clear();
        self.center = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SelectObjects => 1,
            Status::SetCenter => 2,
            Status::SetAngle => 3,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SelectObjects => self.selection.pick(ctx, coord),
            Status::SetCenter => {
                self.center = Some(coord);
                self.status = Status::SetAngle;
                ActionResult::Continue
            }
            Status::SetAngle => {
                let Some(center) = self.center else {
                    return ActionResult::ignored("missing base point");
                };
                if coincident(&center, &coord) {
                    return ActionResult::ignored("angle point coincides with base point");
                }
                self.finish(ctx, angle_of(&center, &coord))
            }
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        if self.status != Status::SetAngle {
            return ActionResult::ignored("this step needs a point");
        }
        self.finish(ctx, to_radians(value))
    }

    fn on_enter(&mut self, ctx: &ActionContext) -> ActionResult {
        if self.status == Status::SelectObjects {
            self.selection.prune(ctx);
            if self.selection.is_empty() {
                return ActionResult::Done;
            }
            self.status = Status::SetCenter;
            return ActionResult::Continue;
        }
        ActionResult::Done
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.center.into_iter().collect()
    }

    fn state(&self) -> CommandState {
        CommandState::Transform {
            selection: self.selection.to_vec(),
            base_point: self.center,
            copies: 0,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SelectObjects => "选择对象:",
            Status::SetCenter => "指定基点:",
            Status::SetAngle => "指定旋转角度:",
        }
        .into()
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        let Some(center) = self.center else {
            return vec![];
        };
        if coincident(&center, &cursor) {
            return vec![];
        }
        let t = Transform2D::rotation(center, angle_of(&center, &cursor));
        let mut previews: Vec<PreviewGeometry> = self
            .selection
            .transformed(ctx, &t)
            .into_iter()
            .map(|(_, g)| PreviewGeometry::new(g))
            .collect();
        previews.push(PreviewGeometry::reference(Geometry::Line(Line::new(center, cursor))));
        previews
    }
}
