//! 绘制圆 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Circle, Geometry, Line};
use zdraft_core::math::{Point2, DEGENERATE_TOLERANCE};

/// 圆绘制状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// 等待设置圆心
    SetCenter,
    /// 等待设置半径
    SetRadius,
}

/// 绘制圆 Action
pub struct DrawCircleAction {
    status: Status,
    center: Option<Point2>,
    /// 键入值按直径解释
    diameter_mode: bool,
}

impl DrawCircleAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetCenter,
            center: None,
            diameter_mode: false,
        }
    }

    fn finish(&mut self, radius: f64) -> ActionResult {
        let Some(center) = self.center else {
            return ActionResult::ignored("missing center");
        };
        if radius < DEGENERATE_TOLERANCE {
            return ActionResult::ignored("zero radius");
        }
        self.reset();
        ActionResult::Finish(EditBatch::create_one(Geometry::Circle(Circle::new(center, radius))))
    }
}

impl Default for DrawCircleAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircleAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircle
    }

    fn reset(&mut self) {
        self.status = Status::SetCenter;
        self.center = None;
        self.diameter_mode = false;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetCenter => 1,
            Status::SetRadius => 2,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SetCenter => {
                self.center = Some(coord);
                self.status = Status::SetRadius;
                ActionResult::Continue
            }
            Status::SetRadius => {
                let Some(center) = self.center else {
                    return ActionResult::ignored("missing center");
                };
                let distance = (coord - center).norm();
                // 直径模式下拾取点到圆心的距离为直径
                let radius = if self.diameter_mode { distance / 2.0 } else { distance };
                self.finish(radius)
            }
        }
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "D" | "DIAMETER" if self.status == Status::SetRadius => {
                self.diameter_mode = !self.diameter_mode;
                Some(ActionResult::Continue)
            }
            _ => None,
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        if self.status != Status::SetRadius {
            return ActionResult::ignored("center must be a point");
        }
        let length = ctx.length(value);
        let radius = if self.diameter_mode { length / 2.0 } else { length };
        self.finish(radius)
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.center.into_iter().collect()
    }

    fn state(&self) -> CommandState {
        CommandState::Circle {
            center: self.center,
            diameter_mode: self.diameter_mode,
        }
    }

    fn prompt(&self) -> String {
        match (self.status, self.diameter_mode) {
            (Status::SetCenter, _) => "指定圆心:".into(),
            (Status::SetRadius, false) => "指定半径 或 [直径(D)]:".into(),
            (Status::SetRadius, true) => "指定直径 或 [半径(D)]:".into(),
        }
    }

    fn available_commands(&self) -> Vec<&'static str> {
        if self.status == Status::SetRadius {
            vec!["diameter"]
        } else {
            vec![]
        }
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        let Some(center) = self.center else {
            return vec![];
        };
        let distance = (cursor - center).norm();
        let radius = if self.diameter_mode { distance / 2.0 } else { distance };
        if radius < DEGENERATE_TOLERANCE {
            return vec![];
        }
        vec![
            PreviewGeometry::new(Geometry::Circle(Circle::new(center, radius))),
            PreviewGeometry::reference(Geometry::Line(Line::new(center, cursor))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{committed, ctx};
    use crate::document::Document;
    use zdraft_core::settings::DraftSettings;
    use zdraft_core::units::DrawingUnit;

    fn radius_of(batch: &EditBatch) -> f64 {
        match &batch.create[0] {
            Geometry::Circle(c) => c.radius,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_radius_from_point() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawCircleAction::new();

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        let batch = committed(action.on_coordinate(&ctx, Point2::new(3.0, 4.0)));
        assert!((radius_of(&batch) - 5.0).abs() < 1e-9);
        assert_eq!(action.step(), 1);
    }

    #[test]
    fn test_diameter_toggle_and_units() {
        let doc = Document::new();
        let settings = DraftSettings {
            units: DrawingUnit::Centimeter,
            ..DraftSettings::default()
        };
        let ctx = ctx(&doc, &settings);
        let mut action = DrawCircleAction::new();

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        action.on_command(&ctx, "D");
        let batch = committed(action.on_value(&ctx, 2.0));
        // 2cm 直径 = 10mm 半径
        assert!((radius_of(&batch) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_radius_is_ignored() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawCircleAction::new();

        action.on_coordinate(&ctx, Point2::new(2.0, 2.0));
        assert!(matches!(action.on_value(&ctx, 0.0), ActionResult::Ignored(_)));
        assert_eq!(action.step(), 2);
    }
}
