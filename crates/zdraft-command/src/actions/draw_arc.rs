//! 绘制圆弧 Action（三点：起点、弧上一点、终点）

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::coincident;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Arc, Geometry, Line};
use zdraft_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetStartpoint,
    SetSecondPoint,
    SetEndpoint,
}

/// 绘制圆弧 Action
pub struct DrawArcAction {
    status: Status,
    points: Vec<Point2>,
}

impl DrawArcAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetStartpoint,
            points: Vec::with_capacity(3),
        }
    }
}

impl Default for DrawArcAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawArcAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawArc
    }

    fn reset(&mut self) {
        self.status = Status::SetStartpoint;
        self.points.clear();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetStartpoint => 1,
            Status::SetSecondPoint => 2,
            Status::SetEndpoint => 3,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        if self.points.iter().any(|p| coincident(p, &coord)) {
            return ActionResult::ignored("arc points must be distinct");
        }
        match self.status {
            Status::SetStartpoint => {
                self.points.push(coord);
                self.status = Status::SetSecondPoint;
                ActionResult::Continue
            }
            Status::SetSecondPoint => {
                self.points.push(coord);
                self.status = Status::SetEndpoint;
                ActionResult::Continue
            }
            Status::SetEndpoint => {
                let [p1, p2] = [self.points[0], self.points[1]];
                match Arc::from_three_points(p1, p2, coord) {
                    Some(arc) => {
                        self.reset();
                        ActionResult::Finish(EditBatch::create_one(Geometry::Arc(arc)))
                    }
                    None => ActionResult::ignored("collinear arc points"),
                }
            }
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.points.clone()
    }

    fn state(&self) -> CommandState {
        CommandState::Arc {
            points: self.points.len(),
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetStartpoint => "指定圆弧的起点:",
            Status::SetSecondPoint => "指定圆弧的第二个点:",
            Status::SetEndpoint => "指定圆弧的端点:",
        }
        .into()
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        match self.points.as_slice() {
            [p1] => vec![PreviewGeometry::reference(Geometry::Line(Line::new(*p1, cursor)))],
            [p1, p2] => Arc::from_three_points(*p1, *p2, cursor)
                .map(|arc| vec![PreviewGeometry::new(Geometry::Arc(arc))])
                .unwrap_or_default(),
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
    fn test_three_point_arc() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawArcAction::new();

        action.on_coordinate(&ctx, Point2::new(10.0, 0.0));
        action.on_coordinate(&ctx, Point2::new(0.0, 10.0));
        let batch = committed(action.on_coordinate(&ctx, Point2::new(-10.0, 0.0)));
        match &batch.create[0] {
            Geometry::Arc(arc) => {
                assert!(arc.center.coords.norm() < 1e-9);
                assert!((arc.radius - 10.0).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_collinear_points_are_ignored() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawArcAction::new();

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        action.on_coordinate(&ctx, Point2::new(1.0, 0.0));
        assert!(matches!(action.on_coordinate(&ctx, Point2::new(2.0, 0.0)), ActionResult::Ignored(_)));
        assert_eq!(action.step(), 3);
    }
}
