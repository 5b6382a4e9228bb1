//! 绘制圆环 Action
//!
//! 内径、外径可以键入或用两点指定，回车接受默认值；之后每次点击放置一个圆环。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Donut, Geometry, Line};
use zdraft_core::math::{distance, Point2, DEGENERATE_TOLERANCE};

const DEFAULT_INNER_DIAMETER: f64 = 0.5;
const DEFAULT_OUTER_DIAMETER: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    /// `first` 为两点取直径时的第一点
    SetInner { first: Option<Point2> },
    SetOuter { first: Option<Point2> },
    SetCenter,
}

/// 绘制圆环 Action
pub struct DrawDonutAction {
    status: Status,
    inner_diameter: Option<f64>,
    outer_diameter: Option<f64>,
    last_center: Option<Point2>,
}

impl DrawDonutAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetInner { first: None },
            inner_diameter: None,
            outer_diameter: None,
            last_center: None,
        }
    }

    fn set_inner(&mut self, diameter: f64) -> ActionResult {
        if diameter < 0.0 {
            return ActionResult::ignored("negative diameter");
        }
        self.inner_diameter = Some(diameter);
        self.status = Status::SetOuter { first: None };
        ActionResult::Continue
    }

    fn set_outer(&mut self, diameter: f64) -> ActionResult {
        let inner = self.inner_diameter.unwrap_or(DEFAULT_INNER_DIAMETER);
        if diameter - inner < DEGENERATE_TOLERANCE {
            return ActionResult::ignored("outer diameter must exceed inner diameter");
        }
        self.outer_diameter = Some(diameter);
        self.status = Status::SetCenter;
        ActionResult::Continue
    }

    fn donut(&self, center: Point2) -> Donut {
        let inner = self.inner_diameter.unwrap_or(DEFAULT_INNER_DIAMETER);
        let outer = self.outer_diameter.unwrap_or(DEFAULT_OUTER_DIAMETER);
        Donut::new(center, inner / 2.0, outer / 2.0)
    }
}

impl Default for DrawDonutAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawDonutAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawDonut
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetInner { .. } => 1,
            Status::SetOuter { .. } => 2,
            Status::SetCenter => 3,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SetInner { first: None } => {
                self.status = Status::SetInner { first: Some(coord) };
                ActionResult::Continue
            }
            Status::SetInner { first: Some(p) } => self.set_inner(distance(&p, &coord)),
            Status::SetOuter { first: None } => {
                self.status = Status::SetOuter { first: Some(coord) };
                ActionResult::Continue
            }
            Status::SetOuter { first: Some(p) } => self.set_outer(distance(&p, &coord)),
            Status::SetCenter => {
                self.last_center = Some(coord);
                ActionResult::Commit(EditBatch::create_one(Geometry::Donut(self.donut(coord))))
            }
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        match self.status {
            Status::SetInner { .. } => self.set_inner(ctx.length(value)),
            Status::SetOuter { .. } => self.set_outer(ctx.length(value)),
            Status::SetCenter => ActionResult::ignored("center must be a point"),
        }
    }

    fn on_enter(&mut self, _ctx: &ActionContext) -> ActionResult {
        match self.status {
            Status::SetInner { .. } => self.set_inner(DEFAULT_INNER_DIAMETER),
            Status::SetOuter { .. } => self.set_outer(DEFAULT_OUTER_DIAMETER),
            Status::SetCenter => ActionResult::Done,
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        match self.status {
            Status::SetInner { first } | Status::SetOuter { first } => first.into_iter().collect(),
            Status::SetCenter => self.last_center.into_iter().collect(),
        }
    }

    fn state(&self) -> CommandState {
        CommandState::Donut {
            inner_diameter: self.inner_diameter,
            outer_diameter: self.outer_diameter,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetInner { first: None } => format!("指定圆环的内径 <{DEFAULT_INNER_DIAMETER}>:"),
            Status::SetOuter { first: None } => format!("指定圆环的外径 <{DEFAULT_OUTER_DIAMETER}>:"),
            Status::SetInner { .. } | Status::SetOuter { .. } => "指定第二点:".into(),
            Status::SetCenter => "指定圆环的中心点 或 <退出>:".into(),
        }
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        match self.status {
            Status::SetInner { first: Some(p) } | Status::SetOuter { first: Some(p) } => {
                vec![PreviewGeometry::reference(Geometry::Line(Line::new(p, cursor)))]
            }
            Status::SetCenter => vec![PreviewGeometry::new(Geometry::Donut(self.donut(cursor)))],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{committed, ctx};
    use crate::document::Document;
    use zdraft_core::settings::DraftSettings;

    #[test]
    fn test_typed_diameters_then_repeat() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawDonutAction::new();

        action.on_value(&ctx, 2.0);
        action.on_value(&ctx, 6.0);
        assert_eq!(action.step(), 3);

        for x in [0.0, 10.0] {
            let batch = committed(action.on_coordinate(&ctx, Point2::new(x, 0.0)));
            match &batch.create[0] {
                Geometry::Donut(d) => {
                    assert_eq!(d.inner_radius, 1.0);
                    assert_eq!(d.outer_radius, 3.0);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(action.step(), 3);
    }

    #[test]
    fn test_diameters_by_points_and_defaults() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawDonutAction::new();

        action.on_enter(&ctx);
        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        action.on_coordinate(&ctx, Point2::new(0.0, 4.0));
        assert_eq!(
            action.state(),
            CommandState::Donut {
                inner_diameter: Some(DEFAULT_INNER_DIAMETER),
                outer_diameter: Some(4.0),
            }
        );
    }

    #[test]
    fn test_outer_must_exceed_inner() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawDonutAction::new();

        action.on_value(&ctx, 5.0);
        assert!(matches!(action.on_value(&ctx, 5.0), ActionResult::Ignored(_)));
        assert_eq!(action.step(), 2);
    }
}
