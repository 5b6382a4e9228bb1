//! 删除 Action：选择对象后回车删除

use crate::action::{Action, ActionContext, ActionResult, ActionType};
use crate::actions::SelectionPhase;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use crate::selection::SelectionSet;
use zdraft_core::math::Point2;

/// 删除 Action
pub struct EraseAction {
    selection: SelectionPhase,
}

impl EraseAction {
    pub fn new() -> Self {
        Self::with_selection(SelectionSet::new())
    }

    pub fn with_selection(selection: SelectionSet) -> Self {
        Self {
            selection: SelectionPhase::with_selection(selection),
        }
    }
}

impl Default for EraseAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for EraseAction {
    fn action_type(&self) -> ActionType {
        ActionType::Erase
    }

    fn reset(&mut self) {
        self.selection.clear();
    }

    fn step(&self) -> u32 {
        1
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        self.selection.pick(ctx, coord)
    }

    fn on_enter(&mut self, ctx: &ActionContext) -> ActionResult {
        self.selection.prune(ctx);
        if self.selection.is_empty() {
            return ActionResult::Done;
        }
        let ids = self.selection.to_vec();
        self.reset();
        ActionResult::Finish(EditBatch::delete(ids))
    }

    fn temp_points(&self) -> Vec<Point2> {
        vec![]
    }

    fn state(&self) -> CommandState {
        CommandState::Erase {
            selection: self.selection.to_vec(),
        }
    }

    fn prompt(&self) -> String {
        if self.selection.is_empty() {
            "选择对象:".into()
        } else {
            format!("选择对象 (已选择 {} 个):", self.selection.ids().len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{committed, ctx};
    use crate::document::Document;
    use zdraft_core::geometry::{Circle, Geometry, Line};
    use zdraft_core::settings::DraftSettings;

    #[test]
    fn test_erase_picked_entities() {
        let mut doc = Document::new();
        let line = doc.add(Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))));
        let circle = doc.add(Geometry::Circle(Circle::new(Point2::new(50.0, 50.0), 5.0)));
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = EraseAction::new();

        action.on_coordinate(&ctx, Point2::new(5.0, 0.5));
        action.on_coordinate(&ctx, Point2::new(55.0, 50.0));
        let batch = committed(action.on_enter(&ctx));
        assert_eq!(batch.delete, vec![line, circle]);
    }

    #[test]
    fn test_empty_selection_ends_without_changes() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        assert!(matches!(EraseAction::new().on_enter(&ctx), ActionResult::Done));
    }
}
