//! 半径/直径标注 Action：拾取圆或圆弧，再指定尺寸线位置

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::dimension::Dimension;
use zdraft_core::entity::EntityId;
use zdraft_core::geometry::Geometry;
use zdraft_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    PickCurve,
    SetPlacement,
}

/// 半径/直径标注 Action
pub struct DimRadialAction {
    diameter: bool,
    status: Status,
    target: Option<EntityId>,
}

impl DimRadialAction {
    fn with_mode(diameter: bool) -> Self {
        Self {
            diameter,
            status: Status::PickCurve,
            target: None,
        }
    }

    /// DIMRADIUS
    pub fn radius() -> Self {
        Self::with_mode(false)
    }

    /// DIMDIAMETER
    pub fn diameter() -> Self {
        Self::with_mode(true)
    }

    fn center_radius(geometry: &Geometry) -> Option<(Point2, f64)> {
        match geometry {
            Geometry::Circle(c) => Some((c.center, c.radius)),
            Geometry::Arc(a) => Some((a.center, a.radius)),
            _ => None,
        }
    }

    fn build(&self, ctx: &ActionContext, placement: Point2) -> Option<Dimension> {
        let (center, radius) = Self::center_radius(&ctx.entity(self.target?)?.geometry)?;
        let dim = if self.diameter {
            Dimension::diameter(center, radius, placement)
        } else {
            Dimension::radius(center, radius, placement)
        };
        Some(ctx.stamp_dimension(dim))
    }
}

impl Default for DimRadialAction {
    fn default() -> Self {
        Self::radius()
    }
}

impl Action for DimRadialAction {
    fn action_type(&self) -> ActionType {
        if self.diameter {
            ActionType::DimDiameter
        } else {
            ActionType::DimRadius
        }
    }

    fn reset(&mut self) {
        self.status = Status::PickCurve;
        self.target = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::PickCurve => 1,
            Status::SetPlacement => 2,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::PickCurve => match ctx.pick_for_edit(&coord) {
                Some(entity) if Self::center_radius(&entity.geometry).is_some() => {
                    self.target = Some(entity.id);
                    self.status = Status::SetPlacement;
                    ActionResult::Continue
                }
                Some(entity) => ActionResult::ignored(format!("cannot dimension {}", entity.geometry.type_name())),
                None => ActionResult::ignored("nothing under the cursor"),
            },
            Status::SetPlacement => {
                let result = match self.build(ctx, coord) {
                    Some(dim) => ActionResult::Finish(EditBatch::create_one(Geometry::Dimension(dim))),
                    None => ActionResult::ignored("picked curve is gone"),
                };
                self.reset();
                result
            }
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        vec![]
    }

    fn state(&self) -> CommandState {
        CommandState::DimRadial { target: self.target }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::PickCurve => "选择圆弧或圆:",
            Status::SetPlacement => "指定尺寸线位置:",
        }
        .into()
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        self.build(ctx, cursor)
            .map(|dim| vec![PreviewGeometry::new(Geometry::Dimension(dim))])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{committed, ctx};
    use crate::document::Document;
    use approx::assert_relative_eq;
    use zdraft_core::dimension::DimensionKind;
    use zdraft_core::geometry::{Arc, Circle, Line};
    use zdraft_core::settings::DraftSettings;

    fn dimension_of(batch: EditBatch) -> Dimension {
        match batch.create.into_iter().next() {
            Some(Geometry::Dimension(d)) => d,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_radius_and_diameter_of_circle() {
        let mut doc = Document::new();
        let id = doc.add(Geometry::Circle(Circle::new(Point2::new(0.0, 0.0), 5.0)));
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);

        let mut radius = DimRadialAction::radius();
        radius.on_coordinate(&ctx, Point2::new(5.0, 0.0));
        assert_eq!(radius.state(), CommandState::DimRadial { target: Some(id) });
        let dim = dimension_of(committed(radius.on_coordinate(&ctx, Point2::new(10.0, 0.0))));
        assert_eq!(dim.kind, DimensionKind::Radius);
        assert_relative_eq!(dim.measurement(), 5.0);

        let mut diameter = DimRadialAction::diameter();
        diameter.on_coordinate(&ctx, Point2::new(0.0, 5.0));
        let dim = dimension_of(committed(diameter.on_coordinate(&ctx, Point2::new(0.0, 10.0))));
        assert_relative_eq!(dim.measurement(), 10.0);
        assert_eq!(diameter.step(), 1);
    }

    #[test]
    fn test_arc_is_accepted_and_line_is_not() {
        let mut doc = Document::new();
        doc.add(Geometry::Arc(Arc::new(Point2::new(0.0, 0.0), 3.0, 0.0, std::f64::consts::PI)));
        doc.add(Geometry::Line(Line::new(Point2::new(20.0, 0.0), Point2::new(30.0, 0.0))));
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DimRadialAction::radius();

        assert!(matches!(action.on_coordinate(&ctx, Point2::new(25.0, 0.0)), ActionResult::Ignored(_)));
        action.on_coordinate(&ctx, Point2::new(0.0, 3.0));
        assert_eq!(action.step(), 2);
    }
}
