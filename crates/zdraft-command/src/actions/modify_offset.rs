//! 偏移 Action
//!
//! 先给出偏移距离（键入或两点），然后反复拾取对象并指定偏移侧。
//! 偏移结果是源实体的副本，保留其图层与属性。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::entity::EntityId;
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::{distance, Point2, DEGENERATE_TOLERANCE};
use zdraft_core::modify::offset;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    /// `first` 为两点取距离时的第一点
    SetDistance { first: Option<Point2> },
    SelectEntity,
    SetSide { source: EntityId },
}

/// 偏移 Action
pub struct OffsetAction {
    status: Status,
    distance: Option<f64>,
}

impl OffsetAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetDistance { first: None },
            distance: None,
        }
    }

    fn set_distance(&mut self, value: f64) -> ActionResult {
        if value < DEGENERATE_TOLERANCE {
            return ActionResult::ignored("offset distance must be positive");
        }
        self.distance = Some(value);
        self.status = Status::SelectEntity;
        ActionResult::Continue
    }

    fn can_offset(geometry: &Geometry) -> bool {
        matches!(
            geometry,
            Geometry::Line(_) | Geometry::Circle(_) | Geometry::Arc(_) | Geometry::Polyline(_)
        )
    }
}

impl Default for OffsetAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for OffsetAction {
    fn action_type(&self) -> ActionType {
        ActionType::Offset
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetDistance { .. } => 1,
            Status::SelectEntity => 2,
            Status::SetSide { .. } => 3,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SetDistance { first: None } => {
                self.status = Status::SetDistance { first: Some(coord) };
                ActionResult::Continue
            }
            Status::SetDistance { first: Some(p) } => self.set_distance(distance(&p, &coord)),
            Status::SelectEntity => match ctx.pick_for_edit(&coord) {
                Some(entity) if Self::can_offset(&entity.geometry) => {
                    self.status = Status::SetSide { source: entity.id };
                    ActionResult::Continue
                }
                Some(entity) => ActionResult::ignored(format!("cannot offset {}", entity.geometry.type_name())),
                None => ActionResult::ignored("nothing under the cursor"),
            },
            Status::SetSide { source } => {
                let (Some(entity), Some(d)) = (ctx.entity(source), self.distance) else {
                    self.status = Status::SelectEntity;
                    return ActionResult::ignored("source entity is gone");
                };
                match offset(&entity.geometry, d, coord) {
                    Some(geometry) => {
                        // 回到拾取步骤，可以继续偏移
                        self.status = Status::SelectEntity;
                        ActionResult::Commit(EditBatch::duplicate(vec![entity.derive(geometry)]))
                    }
                    None => ActionResult::ignored("offset is not possible on that side"),
                }
            }
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        match self.status {
            Status::SetDistance { .. } => self.set_distance(ctx.length(value)),
            _ => ActionResult::ignored("this step needs a point"),
        }
    }

    fn on_enter(&mut self, _ctx: &ActionContext) -> ActionResult {
        match self.status {
            // 回车重新拾取
            Status::SetSide { .. } => {
                self.status = Status::SelectEntity;
                ActionResult::Continue
            }
            _ => ActionResult::Done,
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        match self.status {
            Status::SetDistance { first } => first.into_iter().collect(),
            _ => vec![],
        }
    }

    fn state(&self) -> CommandState {
        CommandState::Offset {
            distance: self.distance,
            source: match self.status {
                Status::SetSide { source } => Some(source),
                _ => None,
            },
        }
    }

    fn prompt(&self) -> String {
        match (self.status, self.distance) {
            (Status::SetDistance { first: None }, _) => "指定偏移距离:".into(),
            (Status::SetDistance { .. }, _) => "指定第二点:".into(),
            (Status::SelectEntity, _) => "选择要偏移的对象 或 <退出>:".into(),
            (Status::SetSide { .. }, Some(d)) => format!("指定要偏移的那一侧上的点 (距离 {d}):"),
            (Status::SetSide { .. }, None) => "指定要偏移的那一侧上的点:".into(),
        }
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        match self.status {
            Status::SetDistance { first: Some(p) } => {
                vec![PreviewGeometry::reference(Geometry::Line(Line::new(p, cursor)))]
            }
            Status::SetSide { source } => ctx
                .entity(source)
                .zip(self.distance)
                .and_then(|(entity, d)| offset(&entity.geometry, d, cursor))
                .map(|g| vec![PreviewGeometry::new(g)])
                .unwrap_or_default(),
            _ => vec![],
        }
    }
}
