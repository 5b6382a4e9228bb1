//! 缩放 Action
//!
//! 比例因子可以键入，也可以用点指定（基点到该点的距离）。
//! `R` 进入参照模式：先给出参照长度，再给出新长度，比例为两者之比。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::SelectionPhase;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use crate::selection::SelectionSet;
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::{distance, Point2, DEGENERATE_TOLERANCE};
use zdraft_core::transform::Transform2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectObjects,
    SetCenter,
    SetFactor,
    /// 参考模式：参考长度
    SetReference,
    /// 参考模式：新长度
    SetTarget,
}

/// 缩放 Action
pub struct ScaleAction {
    status: Status,
    selection: SelectionPhase,
    center: Option<Point2>,
    reference_length: Option<f64>,
}

impl ScaleAction {
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
            reference_length: None,
        }
    }

    fn finish(&mut self, ctx: &ActionContext, factor: f64) -> ActionResult {
        let Some(center) = self.center else {
            return ActionResult::ignored("missing base point");
        };
        if !factor.is_finite() || factor < DEGENERATE_TOLERANCE {
            return ActionResult::ignored("scale factor must be positive");
        }
        let changes = self.selection.transformed(ctx, &Transform2D::scaling(center, factor));
        self.reset();
        ActionResult::Finish(EditBatch::modify(changes))
    }

    fn set_reference(&mut self, length: f64) -> ActionResult {
        if length < DEGENERATE_TOLERANCE {
            return ActionResult::ignored("zero reference length");
        }
        self.reference_length = Some(length);
        self.status = Status::SetTarget;
        ActionResult::Continue
    }
}

impl Default for ScaleAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for ScaleAction {
    fn action_type(&self) -> ActionType {
        ActionType::Scale
    }

    fn reset(&mut self) {
        self.status = Status::SelectObjects;
        self.selection.clear();
        self.center = None;
        self.reference_length = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SelectObjects => 1,
            Status::SetCenter => 2,
            Status::SetFactor | Status::SetReference => 3,
            Status::SetTarget => 4,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SelectObjects => self.selection.pick(ctx, coord),
            Status::SetCenter => {
                self.center = Some(coord);
                self.status = Status::SetFactor;
                ActionResult::Continue
            }
            Status::SetFactor => match self.center {
                Some(center) => self.finish(ctx, distance(&center, &coord)),
                None => ActionResult::ignored("missing base point"),
            },
            Status::SetReference => match self.center {
                Some(center) => self.set_reference(distance(&center, &coord)),
                None => ActionResult::ignored("missing base point"),
            },
            Status::SetTarget => match (self.center, self.reference_length) {
                (Some(center), Some(reference)) => self.finish(ctx, distance(&center, &coord) / reference),
                _ => ActionResult::ignored("missing reference length"),
            },
        }
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "R" | "REFERENCE" if self.status == Status::SetFactor => {
                self.status = Status::SetReference;
                Some(ActionResult::Continue)
            }
            _ => None,
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        match self.status {
            Status::SetFactor => self.finish(ctx, value),
            Status::SetReference => self.set_reference(ctx.length(value)),
            Status::SetTarget => match self.reference_length {
                Some(reference) => self.finish(ctx, ctx.length(value) / reference),
                None => ActionResult::ignored("missing reference length"),
            },
            Status::SelectObjects | Status::SetCenter => ActionResult::ignored("this step needs a point"),
        }
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
            Status::SetFactor => "指定比例因子 或 [参照(R)]:",
            Status::SetReference => "指定参照长度:",
            Status::SetTarget => "指定新的长度:",
        }
        .into()
    }

    fn available_commands(&self) -> Vec<&'static str> {
        if self.status == Status::SetFactor {
            vec!["reference"]
        } else {
            vec![]
        }
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        let Some(center) = self.center else {
            return vec![];
        };
        let factor = match (self.status, self.reference_length) {
            (Status::SetFactor, _) => distance(&center, &cursor),
            (Status::SetTarget, Some(reference)) => distance(&center, &cursor) / reference,
            _ => 0.0,
        };
        let mut previews = vec![PreviewGeometry::reference(Geometry::Line(Line::new(center, cursor)))];
        if factor > DEGENERATE_TOLERANCE {
            let t = Transform2D::scaling(center, factor);
            previews.extend(
                self.selection
                    .transformed(ctx, &t)
                    .into_iter()
                    .map(|(_, g)| PreviewGeometry::new(g)),
            );
        }
        previews
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{committed, ctx};
    use crate::document::Document;
    use zdraft_core::geometry::Circle;
    use zdraft_core::settings::DraftSettings;

    fn radius(batch: &EditBatch) -> f64 {
        match &batch.modify[0].1 {
            Geometry::Circle(c) => c.radius,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_typed_factor() {
        let mut doc = Document::new();
        let id = doc.add(Geometry::Circle(Circle::new(Point2::new(0.0, 0.0), 2.0)));
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = ScaleAction::with_selection(SelectionSet::from_ids([id]));

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        assert!(matches!(action.on_value(&ctx, 0.0), ActionResult::Ignored(_)));
        assert!(matches!(action.on_value(&ctx, -2.0), ActionResult::Ignored(_)));
        let batch = committed(action.on_value(&ctx, 2.5));
        assert!((radius(&batch) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_mode() {
        let mut doc = Document::new();
        let id = doc.add(Geometry::Circle(Circle::new(Point2::new(0.0, 0.0), 2.0)));
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = ScaleAction::with_selection(SelectionSet::from_ids([id]));

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        action.on_command(&ctx, "R");
        action.on_coordinate(&ctx, Point2::new(4.0, 0.0));
        assert_eq!(action.step(), 4);
        let batch = committed(action.on_coordinate(&ctx, Point2::new(0.0, 2.0)));
        assert!((radius(&batch) - 1.0).abs() < 1e-9);
    }
}
