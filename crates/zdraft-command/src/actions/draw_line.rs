//! 绘制线段 Action
//!
//! 连续画线：每个新点与上一点生成一条线段，回车或 Esc 结束。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::coincident;
use crate::command_state::CommandState;
use crate::document::EditBatch;
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::{angle_of, Point2};

/// 线段绘制状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// 等待设置起点
    SetStartpoint,
    /// 等待设置终点
    SetEndpoint,
}

/// 绘制线段 Action
pub struct DrawLineAction {
    status: Status,
    /// 已确定的点列表（连续画线）
    points: Vec<Point2>,
}

impl DrawLineAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetStartpoint,
            points: Vec::new(),
        }
    }

    fn segments(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// 回到链的第一个点并结束
    fn close(&mut self) -> ActionResult {
        let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) else {
            return ActionResult::ignored("no chain to close");
        };
        if self.segments() < 2 {
            return ActionResult::ignored("close needs at least two segments");
        }
        self.reset();
        ActionResult::Finish(EditBatch::create_one(Geometry::Line(Line::new(last, first))))
    }
}

impl Default for DrawLineAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawLineAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawLine
    }

    fn reset(&mut self) {
        self.status = Status::SetStartpoint;
        self.points.clear();
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetStartpoint => 1,
            Status::SetEndpoint => 2,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SetStartpoint => {
                self.points.clear();
                self.points.push(coord);
                self.status = Status::SetEndpoint;
                ActionResult::Continue
            }
            Status::SetEndpoint => {
                let Some(&start) = self.points.last() else {
                    return ActionResult::ignored("missing start point");
                };
                // 拒绝零长度线段
                if coincident(&start, &coord) {
                    return ActionResult::ignored("zero-length segment");
                }
                // 终点变成下一条线的起点
                self.points.push(coord);
                ActionResult::Commit(EditBatch::create_one(Geometry::Line(Line::new(start, coord))))
            }
        }
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "C" | "CLOSE" if self.status == Status::SetEndpoint => Some(self.close()),
            _ => None,
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        self.points.clone()
    }

    fn state(&self) -> CommandState {
        CommandState::Line {
            chain_start: self.points.first().copied(),
            segments: self.segments(),
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetStartpoint => "指定第一点:".into(),
            Status::SetEndpoint if self.segments() >= 2 => "指定下一点 或 [闭合(C)]:".into(),
            Status::SetEndpoint => "指定下一点:".into(),
        }
    }

    fn available_commands(&self) -> Vec<&'static str> {
        if self.status == Status::SetEndpoint && self.segments() >= 2 {
            vec!["close"]
        } else {
            vec![]
        }
    }

    fn direction_hint(&self) -> Option<f64> {
        if self.status != Status::SetEndpoint {
            return None;
        }
        match self.points.as_slice() {
            [.., a, b] => Some(angle_of(a, b)),
            _ => Some(0.0),
        }
    }

    fn preview(&self, _ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        match (self.status, self.points.last()) {
            (Status::SetEndpoint, Some(&start)) if !coincident(&start, &cursor) => {
                vec![PreviewGeometry::new(Geometry::Line(Line::new(start, cursor)))]
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

    #[test]
    fn test_draw_line_basic() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawLineAction::new();

        let result = action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        assert!(matches!(result, ActionResult::Continue));
        assert_eq!(action.step(), 2);

        let batch = committed(action.on_coordinate(&ctx, Point2::new(100.0, 100.0)));
        assert_eq!(
            batch.create,
            vec![Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(100.0, 100.0)))]
        );
        // 连续画线停留在第二步
        assert_eq!(action.step(), 2);
        assert_eq!(action.temp_points().len(), 2);
    }

    #[test]
    fn test_zero_length_segment_is_ignored() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawLineAction::new();

        action.on_coordinate(&ctx, Point2::new(1.0, 1.0));
        let result = action.on_coordinate(&ctx, Point2::new(1.0, 1.0));
        assert!(matches!(result, ActionResult::Ignored(_)));
        assert_eq!(action.temp_points(), vec![Point2::new(1.0, 1.0)]);
    }

    #[test]
    fn test_close_needs_two_segments() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DrawLineAction::new();

        action.on_coordinate(&ctx, Point2::new(0.0, 0.0));
        action.on_coordinate(&ctx, Point2::new(10.0, 0.0));
        assert!(matches!(action.on_command(&ctx, "C"), Some(ActionResult::Ignored(_))));

        action.on_coordinate(&ctx, Point2::new(10.0, 10.0));
        let batch = match action.on_command(&ctx, "CLOSE") {
            Some(ActionResult::Finish(batch)) => batch,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(
            batch.create,
            vec![Geometry::Line(Line::new(Point2::new(10.0, 10.0), Point2::new(0.0, 0.0)))]
        );
        assert_eq!(action.step(), 1);
    }
}
