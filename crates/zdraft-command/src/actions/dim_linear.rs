//! 线性/对齐标注 Action
//!
//! 两个定义点加一个放置点。DIMLINEAR 按放置点自动选择水平或垂直测量，
//! DIMALIGNED 沿两点连线测量。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::coincident;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::dimension::Dimension;
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetFirstPoint,
    SetSecondPoint,
    SetPlacement,
}

/// 线性/对齐标注 Action
pub struct DimLinearAction {
    aligned: bool,
    status: Status,
    first: Option<Point2>,
    second: Option<Point2>,
}

impl DimLinearAction {
    fn with_mode(aligned: bool) -> Self {
        Self {
            aligned,
            status: Status::SetFirstPoint,
            first: None,
            second: None,
        }
    }

    /// DIMLINEAR
    pub fn linear() -> Self {
        Self::with_mode(false)
    }

    /// DIMALIGNED
    pub fn aligned() -> Self {
        Self::with_mode(true)
    }

    fn build(&self, start: Point2, end: Point2, placement: Point2) -> Dimension {
        if self.aligned {
            Dimension::aligned(start, end, placement)
        } else {
            Dimension::linear(start, end, placement)
        }
    }
}

impl Default for DimLinearAction {
    fn default() -> Self {
        Self::linear()
    }
}

impl Action for DimLinearAction {
    fn action_type(&self) -> ActionType {
        if self.aligned {
            ActionType::DimAligned
        } else {
            ActionType::DimLinear
        }
    }

    fn reset(&mut self) {
        self.status = Status::SetFirstPoint;
        self.first = None;
        self.second = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetFirstPoint => 1,
            Status::SetSecondPoint => 2,
            Status::SetPlacement => 3,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SetFirstPoint => {
                self.first = Some(coord);
                self.status = Status::SetSecondPoint;
                ActionResult::Continue
            }
            Status::SetSecondPoint => {
                if self.first.is_some_and(|p| coincident(&p, &coord)) {
                    return ActionResult::ignored("dimension points coincide");
                }
                self.second = Some(coord);
                self.status = Status::SetPlacement;
                ActionResult::Continue
            }
            Status::SetPlacement => {
                let (Some(start), Some(end)) = (self.first, self.second) else {
                    return ActionResult::ignored("missing definition points");
                };
                let dim = ctx.stamp_dimension(self.build(start, end, coord));
                self.reset();
                ActionResult::Finish(EditBatch::create_one(Geometry::Dimension(dim)))
            }
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.first.into_iter().chain(self.second).collect()
    }

    fn state(&self) -> CommandState {
        CommandState::DimLinear {
            first: self.first,
            second: self.second,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetFirstPoint => "指定第一个尺寸界线原点:",
            Status::SetSecondPoint => "指定第二条尺寸界线原点:",
            Status::SetPlacement => "指定尺寸线位置:",
        }
        .into()
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        match (self.first, self.second) {
            (Some(start), Some(end)) => {
                let dim = ctx.stamp_dimension(self.build(start, end, cursor));
                vec![PreviewGeometry::new(Geometry::Dimension(dim))]
            }
            (Some(start), None) => vec![PreviewGeometry::reference(Geometry::Line(Line::new(start, cursor)))],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{committed, ctx};
    use crate::document::Document;
    use approx::assert_relative_eq;
    use zdraft_core::dimension::DimensionKind;
    use zdraft_core::settings::DraftSettings;

    fn place(action: &mut DimLinearAction, ctx: &ActionContext, points: [Point2; 3]) -> Dimension {
        action.on_coordinate(ctx, points[0]);
        action.on_coordinate(ctx, points[1]);
        let batch = committed(action.on_coordinate(ctx, points[2]));
        match batch.create.into_iter().next() {
            Some(Geometry::Dimension(d)) => d,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_linear_picks_vertical_from_placement() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DimLinearAction::linear();

        // 放置点在右侧，测量竖直距离
        let dim = place(
            &mut action,
            &ctx,
            [Point2::new(0.0, 0.0), Point2::new(3.0, 4.0), Point2::new(10.0, 2.0)],
        );
        assert_eq!(dim.kind, DimensionKind::Linear);
        assert_relative_eq!(dim.measurement(), 4.0);
        assert_eq!(action.step(), 1);
    }

    #[test]
    fn test_aligned_measures_true_length() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DimLinearAction::aligned();

        let dim = place(
            &mut action,
            &ctx,
            [Point2::new(0.0, 0.0), Point2::new(3.0, 4.0), Point2::new(-2.0, 4.0)],
        );
        assert_eq!(dim.kind, DimensionKind::Aligned);
        assert_relative_eq!(dim.measurement(), 5.0);
    }

    #[test]
    fn test_coincident_points_are_ignored() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DimLinearAction::linear();

        action.on_coordinate(&ctx, Point2::new(1.0, 1.0));
        assert!(matches!(action.on_coordinate(&ctx, Point2::new(1.0, 1.0)), ActionResult::Ignored(_)));
        assert_eq!(action.step(), 2);
    }
}
