//! 角度标注 Action：拾取两条直线，再指定标注弧位置
//!
//! 光标所在的一侧决定测量哪一段弧（夹角或它的补角）。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::dimension::Dimension;
use zdraft_core::entity::EntityId;
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    PickFirstLine,
    PickSecondLine,
    SetArcPosition,
}

/// 角度标注 Action
pub struct DimAngularAction {
    status: Status,
    line1: Option<EntityId>,
    line2: Option<EntityId>,
}

impl DimAngularAction {
    pub fn new() -> Self {
        Self {
            status: Status::PickFirstLine,
            line1: None,
            line2: None,
        }
    }

    /// 拾取直线，返回实体 ID
    fn pick_line(ctx: &ActionContext, point: &Point2) -> Result<EntityId, ActionResult> {
        match ctx.pick_for_edit(point) {
            Some(entity) if matches!(entity.geometry, Geometry::Line(_)) => Ok(entity.id),
            Some(entity) => Err(ActionResult::ignored(format!(
                "angular dimension needs a line, got {}",
                entity.geometry.type_name()
            ))),
            None => Err(ActionResult::ignored("nothing under the cursor")),
        }
    }

    fn line_of(ctx: &ActionContext, id: Option<EntityId>) -> Option<Line> {
        match &ctx.entity(id?)?.geometry {
            Geometry::Line(l) => Some(l.clone()),
            _ => None,
        }
    }

    fn build(&self, ctx: &ActionContext, placement: Point2) -> Option<Dimension> {
        let first = Self::line_of(ctx, self.line1)?;
        let second = Self::line_of(ctx, self.line2)?;
        Some(ctx.stamp_dimension(Dimension::angular(first, second, placement)))
    }
}

impl Default for DimAngularAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DimAngularAction {
    fn action_type(&self) -> ActionType {
        ActionType::DimAngular
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::PickFirstLine => 1,
            Status::PickSecondLine => 2,
            Status::SetArcPosition => 3,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::PickFirstLine => match Self::pick_line(ctx, &coord) {
                Ok(id) => {
                    self.line1 = Some(id);
                    self.status = Status::PickSecondLine;
                    ActionResult::Continue
                }
                Err(ignored) => ignored,
            },
            Status::PickSecondLine => match Self::pick_line(ctx, &coord) {
                Ok(id) if Some(id) == self.line1 => ActionResult::ignored("pick a different line"),
                Ok(id) => {
                    self.line2 = Some(id);
                    self.status = Status::SetArcPosition;
                    ActionResult::Continue
                }
                Err(ignored) => ignored,
            },
            Status::SetArcPosition => match self.build(ctx, coord) {
                Some(dim) => {
                    self.reset();
                    ActionResult::Finish(EditBatch::create_one(Geometry::Dimension(dim)))
                }
                None => {
                    self.reset();
                    ActionResult::ignored("picked lines are gone")
                }
            },
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        vec![]
    }

    fn state(&self) -> CommandState {
        CommandState::DimAngular {
            line1: self.line1,
            line2: self.line2,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::PickFirstLine => "选择第一条直线:",
            Status::PickSecondLine => "选择第二条直线:",
            Status::SetArcPosition => "指定标注弧线位置:",
        }
        .into()
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        if self.status != Status::SetArcPosition {
            return vec![];
        }
        self.build(ctx, cursor)
            .map(|dim| vec![PreviewGeometry::new(Geometry::Dimension(dim))])
            .unwrap_or_default()
    }
}
