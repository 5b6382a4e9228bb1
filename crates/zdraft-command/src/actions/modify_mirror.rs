//! 镜像 Action
//!
//! 镜像线两点确定后询问是否删除源对象（Y/N，默认 N）。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::{coincident, SelectionPhase};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use crate::selection::SelectionSet;
use zdraft_core::geometry::{Geometry, XLine};
use zdraft_core::math::Point2;
use zdraft_core::transform::Transform2D;

/// 镜像状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// 等待选择对象
    SelectObjects,
    /// 等待指定镜像线第一点
    SetAxisPoint1,
    /// 等待指定镜像线第二点
    SetAxisPoint2,
    /// 是否删除源对象
    ConfirmErase,
}

/// 镜像 Action
pub struct MirrorAction {
    status: Status,
    selection: SelectionPhase,
    axis_point1: Option<Point2>,
    axis_point2: Option<Point2>,
}

impl MirrorAction {
    pub fn new() -> Self {
        Self::with_selection(SelectionSet::new())
    }

    pub fn with_selection(selection: SelectionSet) -> Self {
        Self {
            status: if selection.is_empty() {
                Status::SelectObjects
            } else {
                Status::SetAxisPoint1
            },
            selection: SelectionPhase::with_selection(selection),
            axis_point1: None,
            axis_point2: None,
        }
    }

    fn finish(&mut self, ctx: &ActionContext, erase_source: bool) -> ActionResult {
        let (Some(p1), Some(p2)) = (self.axis_point1, self.axis_point2) else {
            return ActionResult::ignored("missing mirror line");
        };
        let t = Transform2D::mirror(p1, p2);
        // 删除源对象时直接原地镜像
        let batch = if erase_source {
            EditBatch::modify(self.selection.transformed(ctx, &t))
        } else {
            EditBatch::duplicate(self.selection.duplicated(ctx, &t))
        };
        self.reset();
        ActionResult::Finish(batch)
    }
}

impl Default for MirrorAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for MirrorAction {
    fn action_type(&self) -> ActionType {
        ActionType::Mirror
    }

    fn reset(&mut self) {
        self.status = Status::SelectObjects;
        self.selection.clear();
        self.axis_point1 = None;
        self.axis_point2 = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SelectObjects => 1,
            Status::SetAxisPoint1 => 2,
            Status::SetAxisPoint2 => 3,
            Status::ConfirmErase => 4,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SelectObjects => self.selection.pick(ctx, coord),
            Status::SetAxisPoint1 => {
                self.axis_point1 = Some(coord);
                self.status = Status::SetAxisPoint2;
                ActionResult::Continue
            }
            Status::SetAxisPoint2 => {
                if self.axis_point1.is_some_and(|p1| coincident(&p1, &coord)) {
                    return ActionResult::ignored("mirror line has zero length");
                }
                self.axis_point2 = Some(coord);
                self.status = Status::ConfirmErase;
                ActionResult::Continue
            }
            Status::ConfirmErase => ActionResult::ignored("answer Y or N"),
        }
    }

    fn on_command(&mut self, ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        if self.status != Status::ConfirmErase {
            return None;
        }
        match cmd {
            "Y" | "YES" => Some(self.finish(ctx, true)),
            "N" | "NO" => Some(self.finish(ctx, false)),
            _ => None,
        }
    }

    fn on_enter(&mut self, ctx: &ActionContext) -> ActionResult {
        match self.status {
            Status::SelectObjects => {
                self.selection.prune(ctx);
                if self.selection.is_empty() {
                    return ActionResult::Done;
                }
                self.status = Status::SetAxisPoint1;
                ActionResult::Continue
            }
            Status::ConfirmErase => self.finish(ctx, false),
            _ => ActionResult::Done,
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.axis_point1.into_iter().chain(self.axis_point2).collect()
    }

    fn state(&self) -> CommandState {
        CommandState::Mirror {
            selection: self.selection.to_vec(),
            first_point: self.axis_point1,
            second_point: self.axis_point2,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SelectObjects => "选择对象:",
            Status::SetAxisPoint1 => "指定镜像线的第一点:",
            Status::SetAxisPoint2 => "指定镜像线的第二点:",
            Status::ConfirmErase => "要删除源对象吗？[是(Y)/否(N)] <N>:",
        }
        .into()
    }

    fn available_commands(&self) -> Vec<&'static str> {
        if self.status == Status::ConfirmErase {
            vec!["yes", "no"]
        } else {
            vec![]
        }
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        let (p1, p2) = match (self.axis_point1, self.axis_point2) {
            (Some(p1), Some(p2)) => (p1, p2),
            (Some(p1), None) => (p1, cursor),
            _ => return vec![],
        };
        let Some(axis) = XLine::through(p1, p2) else {
            return vec![];
        };
        let t = Transform2D::mirror(p1, p2);
        let mut previews: Vec<PreviewGeometry> = self
            .selection
            .transformed(ctx, &t)
            .into_iter()
            .map(|(_, g)| PreviewGeometry::new(g))
            .collect();
        previews.push(PreviewGeometry::reference(Geometry::XLine(axis)));
        previews
    }
}
