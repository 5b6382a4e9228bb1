//! 延伸 Action
//!
//! 先选择边界（直接回车表示所有可编辑实体），然后每次拾取一条直线或圆弧，
//! 把靠近拾取点的端点延伸到最近的边界。

use crate::action::{Action, ActionContext, ActionResult, ActionType};
use crate::actions::SelectionPhase;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::Geometry;
use zdraft_core::math::Point2;
use zdraft_core::modify::extend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectBoundaries,
    PickTarget,
}

/// 延伸 Action
pub struct ExtendAction {
    status: Status,
    boundaries: SelectionPhase,
}

impl ExtendAction {
    pub fn new() -> Self {
        Self {
            status: Status::SelectBoundaries,
            boundaries: SelectionPhase::new(),
        }
    }

    fn extend_at(&self, ctx: &ActionContext, point: Point2) -> ActionResult {
        let Some(target) = ctx.pick_for_edit(&point) else {
            return ActionResult::ignored("nothing under the cursor");
        };
        let entities = if self.boundaries.is_empty() {
            ctx.document.editable_entities()
        } else {
            self.boundaries.entities(ctx)
        };
        let boundaries: Vec<&Geometry> = entities
            .into_iter()
            .filter(|e| e.id != target.id)
            .map(|e| &e.geometry)
            .collect();
        match extend(&target.geometry, &boundaries, point) {
            Some(geometry) => ActionResult::Commit(EditBatch::modify(vec![(target.id, geometry)])),
            None => ActionResult::ignored("no boundary along the extension"),
        }
    }
}

impl Default for ExtendAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for ExtendAction {
    fn action_type(&self) -> ActionType {
        ActionType::Extend
    }

    fn reset(&mut self) {
        self.status = Status::SelectBoundaries;
        self.boundaries.clear();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SelectBoundaries => 1,
            Status::PickTarget => 2,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SelectBoundaries => self.boundaries.pick(ctx, coord),
            Status::PickTarget => self.extend_at(ctx, coord),
        }
    }

    fn on_enter(&mut self, ctx: &ActionContext) -> ActionResult {
        match self.status {
            Status::SelectBoundaries => {
                self.boundaries.prune(ctx);
                self.status = Status::PickTarget;
                ActionResult::Continue
            }
            Status::PickTarget => ActionResult::Done,
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        vec![]
    }

    fn state(&self) -> CommandState {
        CommandState::Extend {
            boundaries: self.boundaries.to_vec(),
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SelectBoundaries => "选择边界的边 <全部选择>:",
            Status::PickTarget => "选择要延伸的对象:",
        }
        .into()
    }
}
