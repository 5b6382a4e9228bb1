//! 绘制矩形 Action
//!
//! 两个对角点生成闭合的四顶点多段线，顶点顺序为
//! (x0,y0),(x1,y0),(x1,y1),(x0,y1)。第二步可以键入 `w,h`。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Geometry, Polyline};
use zdraft_core::math::{Point2, Vector2, DEGENERATE_TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetCorner1,
    SetCorner2,
}

/// 绘制矩形 Action
pub struct DrawRectangleAction {
    status: Status,
    corner1: Option<Point2>,
}

impl DrawRectangleAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetCorner1,
            corner1: None,
        }
    }

    fn rectangle(c1: Point2, c2: Point2) -> Polyline {
        Polyline::from_points(
            [
                Point2::new(c1.x, c1.y),
                Point2::new(c2.x, c1.y),
                Point2::new(c2.x, c2.y),
                Point2::new(c1.x, c2.y),
            ],
            true,
        )
    }

    fn is_flat(c1: &Point2, c2: &Point2) -> bool {
        (c2.x - c1.x).abs() < DEGENERATE_TOLERANCE || (c2.y - c1.y).abs() < DEGENERATE_TOLERANCE
    }

    fn finish(&mut self, c2: Point2) -> ActionResult {
        let Some(c1) = self.corner1 else {
            return ActionResult::ignored("missing first corner");
        };
        if Self::is_flat(&c1, &c2) {
            return ActionResult::ignored("rectangle has zero width or height");
        }
        self.reset();
        ActionResult::Finish(EditBatch::create_one(Geometry::Polyline(Self::rectangle(c1, c2))))
    }
}

impl Default for DrawRectangleAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawRectangleAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawRectangle
    }

    fn reset(&mut self) {
        self.status = Status::SetCorner1;
        self.corner1 = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetCorner1 => 1,
            Status::SetCorner2 => 2,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SetCorner1 => {
                self.corner1 = Some(coord);
                self.status = Status::SetCorner2;
                ActionResult::Continue
            }
            Status::SetCorner2 => self.finish(coord),
        }
    }

    fn on_dimensions(&mut self, _ctx: &ActionContext, width: f64, height: f64) -> Option<ActionResult> {
        if self.status != Status::SetCorner2 {
            return None;
        }
        let c1 = self.corner1?;
        Some(self.finish(c1 + Vector2::new(width, height)))
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.corner1.into_iter().collect()
    }

    fn state(&self) -> CommandState {
        CommandState::Rectangle {
            first_corner: self.corner1,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetCorner1 => "指定第一个角点:".into(),
            Status::SetCorner2 => "指定另一个角点 或 [尺寸 宽,高]:".into(),
        }
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        match self.corner1 {
            Some(c1) if !Self::is_flat(&c1, &cursor) => {
                vec![PreviewGeometry::new(Geometry::Polyline(Self::rectangle(c1, cursor)))]
            }
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

    fn corners(batch: &EditBatch) -> Vec<Point2> {
        match &batch.create[0] {
            Geometry::Polyline(pl) => {
                assert!(pl.closed);
                pl.points().collect()
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_two_corners() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawRectangleAction::new();

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        let batch = committed(action.on_coordinate(&ctx, Point2::new(10.0, 5.0)));
        assert_eq!(
            corners(&batch),
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 5.0),
                Point2::new(0.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_typed_dimensions() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawRectangleAction::new();

        assert!(action.on_dimensions(&ctx, 3.0, 4.0).is_none());
        action.on_coordinate(&ctx, Point2::new(1.0, 1.0));
        let batch = committed(action.on_dimensions(&ctx, 3.0, 4.0).unwrap());
        assert_eq!(corners(&batch)[2], Point2::new(4.0, 5.0));
    }

    #[test]
    fn test_flat_rectangle_is_ignored() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawRectangleAction::new();

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        assert!(matches!(action.on_coordinate(&ctx, Point2::new(5.0, 0.0)), ActionResult::Ignored(_)));
        assert_eq!(action.step(), 2);
    }
}
