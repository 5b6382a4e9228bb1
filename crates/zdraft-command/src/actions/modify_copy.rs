//! 复制 Action
//!
//! 默认多重复制：放置一个副本后停留在目标点步骤，回车结束。
//! `M` 切换单次/多重模式。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::{coincident, SelectionPhase};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use crate::selection::SelectionSet;
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::Point2;
use zdraft_core::transform::Transform2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectObjects,
    SetBasePoint,
    SetDestination,
}

/// 复制 Action
pub struct CopyAction {
    status: Status,
    selection: SelectionPhase,
    base_point: Option<Point2>,
    multiple: bool,
    copies: usize,
}

impl CopyAction {
    pub fn new() -> Self {
        Self::with_selection(SelectionSet::new())
    }

    pub fn with_selection(selection: SelectionSet) -> Self {
        Self {
            status: if selection.is_empty() {
                Status::SelectObjects
            } else {
                Status::SetBasePoint
            },
            selection: SelectionPhase::with_selection(selection),
            base_point: None,
            multiple: true,
            copies: 0,
        }
    }
}

impl Default for CopyAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for CopyAction {
    fn action_type(&self) -> ActionType {
        ActionType::Copy
    }

    fn reset(&mut self) {
        self.status = Status::SelectObjects;
        self.selection.clear();
        self.base_point = None;
        self.copies = 0;
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
                let batch = EditBatch::duplicate(self.selection.duplicated(ctx, &t));
                if self.multiple {
                    self.copies += 1;
                    ActionResult::Commit(batch)
                } else {
                    self.reset();
                    ActionResult::Finish(batch)
                }
            }
        }
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "M" | "MULTIPLE" if self.status != Status::SelectObjects => {
                self.multiple = !self.multiple;
                Some(ActionResult::Continue)
            }
            _ => None,
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
            copies: self.copies,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SelectObjects => "选择对象:".into(),
            Status::SetBasePoint => "指定基点 或 [模式(M)]:".into(),
            Status::SetDestination if self.copies > 0 => "指定第二个点 或 [退出(Enter)]:".into(),
            Status::SetDestination => "指定第二个点:".into(),
        }
    }

    fn available_commands(&self) -> Vec<&'static str> {
        if self.status == Status::SelectObjects {
            vec![]
        } else {
            vec!["multiple"]
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{committed, ctx};
    use crate::document::Document;
    use zdraft_core::entity::{Entity, EntityId};
    use zdraft_core::properties::Color;
    use zdraft_core::settings::DraftSettings;

    #[test]
    fn test_multiple_copies_keep_properties() {
        let mut doc = Document::new();
        let mut entity = Entity::new(Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))));
        entity.properties.color = Color::RED;
        let id = doc.add_entity(entity);
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = CopyAction::with_selection(SelectionSet::from_ids([id]));

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        for x in [5.0, 10.0] {
            let batch = committed(action.on_coordinate(&ctx, Point2::new(x, 0.0)));
            assert_eq!(batch.duplicate.len(), 1);
            assert_eq!(batch.duplicate[0].id, EntityId::NULL);
            assert_eq!(batch.duplicate[0].properties.color, Color::RED);
        }
        assert_eq!(action.step(), 3);
        assert!(matches!(action.on_enter(&ctx), ActionResult::Done));
    }

    #[test]
    fn test_single_mode_finishes() {
        let mut doc = Document::new();
        let id = doc.add(Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))));
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = CopyAction::with_selection(SelectionSet::from_ids([id]));

        action.on_command(&ctx, "M");
        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        assert!(matches!(action.on_coordinate(&ctx, Point2::new(0.0, 5.0)), ActionResult::Finish(_)));
        assert_eq!(action.step(), 1);
    }
}
