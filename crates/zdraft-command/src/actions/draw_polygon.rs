//! 绘制正多边形 Action
//!
//! 第一步可键入边数（3..=1024，默认 4）或直接点击中心；半径点给出一个
//! 顶点（内接）。外切模式下半径为边心距，半径点落在一条边的中点。

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Geometry, Line, Polyline};
use zdraft_core::math::{angle_of, polar, Point2, DEGENERATE_TOLERANCE};

const DEFAULT_SIDES: u32 = 4;
const MIN_SIDES: u32 = 3;
const MAX_SIDES: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// 边数或中心
    SetSides,
    SetCenter,
    SetRadius,
}

/// 绘制正多边形 Action
pub struct DrawPolygonAction {
    status: Status,
    sides: u32,
    circumscribed: bool,
    center: Option<Point2>,
}

impl DrawPolygonAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetSides,
            sides: DEFAULT_SIDES,
            circumscribed: false,
            center: None,
        }
    }

    /// 顶点：`radius` 是中心到半径点的距离，`angle` 是半径点方向
    fn vertices(&self, center: Point2, radius: f64, angle: f64) -> Vec<Point2> {
        let n = self.sides as f64;
        let (vertex_radius, first_angle) = if self.circumscribed {
            (radius / (std::f64::consts::PI / n).cos(), angle + std::f64::consts::PI / n)
        } else {
            (radius, angle)
        };
        (0..self.sides)
            .map(|i| polar(center, vertex_radius, first_angle + TAU * i as f64 / n))
            .collect()
    }

    fn finish(&mut self, radius: f64, angle: f64) -> ActionResult {
        let Some(center) = self.center else {
            return ActionResult::ignored("missing center");
        };
        if radius < DEGENERATE_TOLERANCE {
            return ActionResult::ignored("zero radius");
        }
        let polyline = Polyline::from_points(self.vertices(center, radius, angle), true);
        self.reset();
        ActionResult::Finish(EditBatch::create_one(Geometry::Polyline(polyline)))
    }
}

impl Default for DrawPolygonAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawPolygonAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawPolygon
    }

    fn reset(&mut self) {
        self.status = Status::SetSides;
        self.sides = DEFAULT_SIDES;
        self.circumscribed = false;
        self.center = None;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetSides => 1,
            Status::SetCenter => 2,
            Status::SetRadius => 3,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            // 点击中心时使用当前边数
            Status::SetSides | Status::SetCenter => {
                self.center = Some(coord);
                self.status = Status::SetRadius;
                ActionResult::Continue
            }
            Status::SetRadius => {
                let Some(center) = self.center else {
                    return ActionResult::ignored("missing center");
                };
                self.finish((coord - center).norm(), angle_of(&center, &coord))
            }
        }
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "C" | "CIRCUMSCRIBED" => {
                self.circumscribed = !self.circumscribed;
                Some(ActionResult::Continue)
            }
            "I" | "INSCRIBED" => {
                self.circumscribed = false;
                Some(ActionResult::Continue)
            }
            _ => None,
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        match self.status {
            Status::SetSides => {
                let rounded = value.round();
                if (value - rounded).abs() > 1e-9 || !(MIN_SIDES as f64..=MAX_SIDES as f64).contains(&rounded) {
                    return ActionResult::ignored(format!("side count must be {MIN_SIDES}..={MAX_SIDES}"));
                }
                self.sides = rounded as u32;
                self.status = Status::SetCenter;
                ActionResult::Continue
            }
            Status::SetCenter => ActionResult::ignored("center must be a point"),
            // 键入半径时第一个顶点朝上
            Status::SetRadius => self.finish(ctx.length(value), FRAC_PI_2),
        }
    }

    fn on_enter(&mut self, _ctx: &ActionContext) -> ActionResult {
        if self.status == Status::SetSides {
            self.status = Status::SetCenter;
            return ActionResult::Continue;
        }
        ActionResult::Done
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.center.into_iter().collect()
    }

    fn state(&self) -> CommandState {
        CommandState::Polygon {
            sides: self.sides,
            circumscribed: self.circumscribed,
            center: self.center,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetSides => format!("输入边数 <{}> 或 指定中心点:", self.sides),
            Status::SetCenter => "指定正多边形的中心点:".into(),
            Status::SetRadius if self.circumscribed => "指定边心距 或 [内接(I)/外切(C)]:".into(),
            Status::SetRadius => "指定外接圆半径 或 [内接(I)/外切(C)]:".into(),
        }
    }

    fn available_commands(&self) -> Vec<&'static str> {
        vec!["inscribed", "circumscribed"]
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        let Some(center) = self.center else {
            return vec![];
        };
        let radius = (cursor - center).norm();
        if radius < DEGENERATE_TOLERANCE {
            return vec![];
        }
        let vertices = self.vertices(center, radius, angle_of(&center, &cursor));
        vec![
            PreviewGeometry::new(Geometry::Polyline(Polyline::from_points(vertices, true))),
            PreviewGeometry::reference(Geometry::Line(Line::new(center, cursor))),
        ]
    }
}
