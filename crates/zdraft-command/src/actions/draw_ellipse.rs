//! 绘制椭圆 Action（中心、长轴端点、另一半轴距离）

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::coincident;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Ellipse, Geometry, Line};
use zdraft_core::math::{angle_of, cross, Point2, DEGENERATE_TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetCenter,
    SetMajorAxis,
    SetMinorAxis,
}

/// 绘制椭圆 Action
pub struct DrawEllipseAction {
    status: Status,
    center: Option<Point2>,
    major_end: Option<Point2>,
}

impl DrawEllipseAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetCenter,
            center: None,
            major_end: None,
        }
    }

    fn ellipse(center: Point2, major_end: Point2, minor: f64) -> Ellipse {
        let major = (major_end - center).norm();
        Ellipse::new(center, major, minor, angle_of(&center, &major_end))
    }

    /// 点到长轴所在直线的距离
    fn minor_from_point(center: Point2, major_end: Point2, point: Point2) -> f64 {
        let axis = major_end - center;
        cross(&axis, &(point - center)).abs() / axis.norm()
    }

    fn finish(&mut self, minor: f64) -> ActionResult {
        let (Some(center), Some(major_end)) = (self.center, self.major_end) else {
            return ActionResult::ignored("missing axis");
        };
        if minor < DEGENERATE_TOLERANCE {
            return ActionResult::ignored("zero minor axis");
        }
        self.reset();
        ActionResult::Finish(EditBatch::create_one(Geometry::Ellipse(Self::ellipse(
            center, major_end, minor,
        ))))
    }
}

impl Default for DrawEllipseAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawEllipseAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawEllipse
    }

    fn reset(&mut self) {
        self.status = Status::SetCenter;
        self.center = None;
        self.major_end = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetCenter => 1,
            Status::SetMajorAxis => 2,
            Status::SetMinorAxis => 3,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SetCenter => {
                self.center = Some(coord);
                self.status = Status::SetMajorAxis;
                ActionResult::Continue
            }
            Status::SetMajorAxis => {
                let Some(center) = self.center else {
                    return ActionResult::ignored("missing center");
                };
                if coincident(&center, &coord) {
                    return ActionResult::ignored("zero major axis");
                }
                self.major_end = Some(coord);
                self.status = Status::SetMinorAxis;
                ActionResult::Continue
            }
            Status::SetMinorAxis => {
                let (Some(center), Some(major_end)) = (self.center, self.major_end) else {
                    return ActionResult::ignored("missing axis");
                };
                self.finish(Self::minor_from_point(center, major_end, coord))
            }
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        if self.status != Status::SetMinorAxis {
            return ActionResult::ignored("this step needs a point");
        }
        self.finish(ctx.length(value))
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.center.into_iter().chain(self.major_end).collect()
    }

    fn state(&self) -> CommandState {
        CommandState::Ellipse {
            center: self.center,
            major_end: self.major_end,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetCenter => "指定椭圆的中心点:",
            Status::SetMajorAxis => "指定轴的端点:",
            Status::SetMinorAxis => "指定另一条半轴长度:",
        }
        .into()
    }

    /// 键入长轴半长时沿 X 轴
    fn direction_hint(&self) -> Option<f64> {
        (self.status == Status::SetMajorAxis).then_some(0.0)
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        match (self.center, self.major_end) {
            (Some(center), None) => vec![PreviewGeometry::reference(Geometry::Line(Line::new(center, cursor)))],
            (Some(center), Some(major_end)) => {
                let minor = Self::minor_from_point(center, major_end, cursor);
                if minor < DEGENERATE_TOLERANCE {
                    return vec![];
                }
                vec![PreviewGeometry::new(Geometry::Ellipse(Self::ellipse(center, major_end, minor)))]
            }
            _ => vec![],
        }
    }
}
