//! 修剪 Action
//!
//! 先选择剪切边（直接回车表示所有可编辑实体都作为剪切边），
//! 然后每次拾取删除拾取点两侧最近交点之间的部分。

use crate::action::{Action, ActionContext, ActionResult, ActionType};
use crate::actions::SelectionPhase;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use tracing::debug;
use zdraft_core::entity::Entity;
use zdraft_core::geometry::Geometry;
use zdraft_core::math::Point2;
use zdraft_core::modify::trim;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectEdges,
    PickTarget,
}

/// 修剪 Action
pub struct TrimAction {
    status: Status,
    edges: SelectionPhase,
}

impl TrimAction {
    pub fn new() -> Self {
        Self {
            status: Status::SelectEdges,
            edges: SelectionPhase::new(),
        }
    }

    /// 剪切边几何，不含目标自身
    fn cutting_geometry<'a>(&self, ctx: &ActionContext<'a>, target: &Entity) -> Vec<&'a Geometry> {
        let entities = if self.edges.is_empty() {
            ctx.document.editable_entities()
        } else {
            self.edges.entities(ctx)
        };
        entities
            .into_iter()
            .filter(|e| e.id != target.id)
            .map(|e| &e.geometry)
            .collect()
    }

    fn trim_at(&self, ctx: &ActionContext, point: Point2) -> ActionResult {
        let Some(target) = ctx.pick_for_edit(&point) else {
            return ActionResult::ignored("nothing under the cursor");
        };
        let edges = self.cutting_geometry(ctx, target);
        let Some(mut pieces) = trim(&target.geometry, &edges, point) else {
            return ActionResult::ignored("no cutting edge intersects the picked entity");
        };
        debug!("修剪 {} -> {} 段", target.id, pieces.len());

        if pieces.is_empty() {
            return ActionResult::Commit(EditBatch::delete(vec![target.id]));
        }
        let first = pieces.remove(0);
        let batch = EditBatch::modify(vec![(target.id, first)]).merge(EditBatch::duplicate(
            pieces.into_iter().map(|g| target.derive(g)).collect(),
        ));
        ActionResult::Commit(batch)
    }
}

impl Default for TrimAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for TrimAction {
    fn action_type(&self) -> ActionType {
        ActionType::Trim
    }

    fn reset(&mut self) {
        self.status = Status::SelectEdges;
        self.edges.clear();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SelectEdges => 1,
            Status::PickTarget => 2,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SelectEdges => self.edges.pick(ctx, coord),
            Status::PickTarget => self.trim_at(ctx, coord),
        }
    }

    fn on_enter(&mut self, ctx: &ActionContext) -> ActionResult {
        match self.status {
            Status::SelectEdges => {
                self.edges.prune(ctx);
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
        CommandState::Trim {
            cutting_edges: self.edges.to_vec(),
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SelectEdges => "选择剪切边 <全部选择>:",
            Status::PickTarget => "选择要修剪的对象:",
        }
        .into()
    }
}
