//! 移动 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::{coincident, SelectionPhase};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use crate::selection::SelectionSet;
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::Point2;
use zdraft_core::transform::Transform2D;

/// 移动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// 等待选择对象（如果没有预选）
    SelectObjects,
    /// 等待指定基点
    SetBasePoint,
    /// 等待指定目标点
    SetDestination,
}

/// 移动 Action
pub struct MoveAction {
    status: Status,
    selection: SelectionPhase,
    base_point: Option<Point2>,
}

impl MoveAction {
    pub fn new() -> Self {
        Self::with_selection(SelectionSet::new())
    }

    /// 使用预选的实体初始化
    pub fn with_selection(selection: SelectionSet) -> Self {
        Self {
            status: if selection.is_empty() {
                Status::SelectObjects
            } else {
                Status::SetBasePoint
            },
            selection: SelectionPhase::with_selection(selection),
            base_point: None,
        }
    }
}

impl Default for MoveAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for MoveAction {
    fn action_type(&self) -> ActionType {
        ActionType::Move
    }

    fn reset(&mut self) {
        self.status = Status::SelectObjects;
        self.selection.clear();
        self.base_point = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SelectObjects => 1,
            Status::SetBasePoint => 2,
            Status::SetDestination => 3,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SelectObjects => self.selection.pick(ctx, coord),
            Status::SetBasePoint => {
                self.base_point = Some(coord);
                self.status = Status::SetDestination;
                ActionResult::Continue
            }
            Status::SetDestination => {
                let Some(base) = self.base_point else {
                    return ActionResult::ignored("missing base point");
                };
                if coincident(&base, &coord) {
                    return ActionResult::ignored("zero displacement");
                }
                let t = Transform2D::translation(coord - base);
                let changes = self.selection.transformed(ctx, &t);
                self.reset();
                ActionResult::Finish(EditBatch::modify(changes))
            }
        }
    }

    fn on_enter(&mut self, ctx: &ActionContext) -> ActionResult {
        if self.status == Status::SelectObjects {
            self.selection.prune(ctx);
            if self.selection.is_empty() {
                return ActionResult::Done;
            }
            self.status = Status::SetBasePoint;
            return ActionResult::Continue;
        }
        ActionResult::Done
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.base_point.into_iter().collect()
    }

    fn state(&self) -> CommandState {
        CommandState::Transform {
            selection: self.selection.to_vec(),
            base_point: self.base_point,
            copies: 0,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SelectObjects => "选择对象:",
            Status::SetBasePoint => "指定基点:",
            Status::SetDestination => "指定第二个点:",
        }
        .into()
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        let Some(base) = self.base_point else {
            return vec![];
        };
        let t = Transform2D::translation(cursor - base);
        let mut previews: Vec<PreviewGeometry> = self
            .selection
            .transformed(ctx, &t)
            .into_iter()
            .map(|(_, g)| PreviewGeometry::new(g))
            .collect();
        previews.push(PreviewGeometry::reference(Geometry::Line(Line::new(base, cursor))));
        previews
    }
}
