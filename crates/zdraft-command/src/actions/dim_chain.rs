//! 连续/基线标注 Action
//!
//! 启动时从文档中最后一个线性类标注接续；没有可接续的标注时先拾取一个。
//! 每次点击生成一个新标注并保持在当前步骤，回车结束。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use tracing::debug;
use zdraft_core::dimension::{DimChain, Dimension};
use zdraft_core::geometry::Geometry;
use zdraft_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// 选择作为起点的标注
    SelectBase,
    /// 指定下一个尺寸界线原点
    NextPoint,
}

/// 连续/基线标注 Action
pub struct DimChainAction {
    baseline: bool,
    status: Status,
    chain: Option<DimChain>,
    placed: usize,
}

impl DimChainAction {
    fn with_mode(baseline: bool) -> Self {
        Self {
            baseline,
            status: Status::SelectBase,
            chain: None,
            placed: 0,
        }
    }

    /// DIMCONTINUE
    pub fn continued() -> Self {
        Self::with_mode(false)
    }

    /// DIMBASELINE
    pub fn baseline() -> Self {
        Self::with_mode(true)
    }

    fn start_from(&mut self, dim: &Dimension) -> bool {
        match DimChain::from_dimension(dim) {
            Some(chain) => {
                self.chain = Some(chain);
                self.status = Status::NextPoint;
                true
            }
            None => false,
        }
    }

    /// 推进标注链；`chain` 是副本时用于预览
    fn next_dimension(&self, chain: &mut DimChain, ctx: &ActionContext, point: Point2) -> Option<Dimension> {
        let dim = if self.baseline {
            chain.baseline_to(point, ctx.dim_style().baseline_spacing)
        } else {
            chain.continue_to(point)
        }?;
        Some(ctx.stamp_dimension(dim))
    }
}

impl Default for DimChainAction {
    fn default() -> Self {
        Self::continued()
    }
}

impl Action for DimChainAction {
    fn action_type(&self) -> ActionType {
        if self.baseline {
            ActionType::DimBaseline
        } else {
            ActionType::DimContinue
        }
    }

    fn init(&mut self, ctx: &ActionContext) {
        if let Some(dim) = ctx.last_linear_dimension() {
            self.start_from(dim);
        }
    }

    fn reset(&mut self) {
        self.status = Status::SelectBase;
        self.chain = None;
        self.placed = 0;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SelectBase => 1,
            Status::NextPoint => 2,
        }
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SelectBase => match ctx.pick_for_edit(&coord).map(|e| &e.geometry) {
                Some(Geometry::Dimension(dim)) if self.start_from(dim) => ActionResult::Continue,
                Some(_) => ActionResult::ignored("pick a linear or aligned dimension"),
                None => ActionResult::ignored("nothing under the cursor"),
            },
            Status::NextPoint => {
                let Some(mut chain) = self.chain.take() else {
                    self.status = Status::SelectBase;
                    return ActionResult::ignored("no dimension to chain from");
                };
                let result = match self.next_dimension(&mut chain, ctx, coord) {
                    Some(dim) => {
                        self.placed += 1;
                        debug!("{} #{}", self.name(), self.placed);
                        ActionResult::Commit(EditBatch::create_one(Geometry::Dimension(dim)))
                    }
                    None => ActionResult::ignored("zero-length dimension"),
                };
                self.chain = Some(chain);
                result
            }
        }
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "S" | "SELECT" => {
                self.chain = None;
                self.status = Status::SelectBase;
                Some(ActionResult::Continue)
            }
            _ => None,
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        match &self.chain {
            Some(chain) if self.baseline => vec![chain.base_point],
            Some(chain) => vec![chain.last_point],
            None => vec![],
        }
    }

    fn state(&self) -> CommandState {
        CommandState::DimChain {
            base_point: self.chain.as_ref().map(|c| c.base_point),
            last_point: self.chain.as_ref().map(|c| c.last_point),
            placed: self.placed,
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SelectBase if self.baseline => "选择基准标注:".into(),
            Status::SelectBase => "选择连续标注:".into(),
            Status::NextPoint => "指定第二条尺寸界线原点 或 [选择(S)] <退出>:".into(),
        }
    }

    fn available_commands(&self) -> Vec<&'static str> {
        vec!["select"]
    }

    fn preview(&self, ctx: &ActionContext, cursor: Point2) -> Vec<PreviewGeometry> {
        let Some(mut chain) = self.chain.clone() else {
            return vec![];
        };
        self.next_dimension(&mut chain, ctx, cursor)
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
    use zdraft_core::settings::DraftSettings;

    fn doc_with_dimension() -> Document {
        let mut doc = Document::new();
        doc.add(Geometry::Dimension(Dimension::rotated(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            0.0,
            Point2::new(5.0, 8.0),
        )));
        doc
    }

    fn placed(result: ActionResult) -> Dimension {
        match committed(result).create.into_iter().next() {
            Some(Geometry::Dimension(d)) => d,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_continue_from_last_dimension() {
        let doc = doc_with_dimension();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DimChainAction::continued();

        action.init(&ctx);
        assert_eq!(action.step(), 2);
        let first = placed(action.on_coordinate(&ctx, Point2::new(25.0, 3.0)));
        assert_eq!(first.kind, DimensionKind::Continue);
        assert_relative_eq!(first.measurement(), 15.0);
        let second = placed(action.on_coordinate(&ctx, Point2::new(30.0, 0.0)));
        assert_relative_eq!(second.measurement(), 5.0);

        assert!(matches!(action.on_enter(&ctx), ActionResult::Done));
    }

    #[test]
    fn test_baseline_shares_start_point() {
        let doc = doc_with_dimension();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DimChainAction::baseline();

        action.init(&ctx);
        let first = placed(action.on_coordinate(&ctx, Point2::new(20.0, 0.0)));
        let second = placed(action.on_coordinate(&ctx, Point2::new(30.0, 0.0)));
        assert_eq!(first.kind, DimensionKind::Baseline);
        assert_relative_eq!(first.measurement(), 20.0);
        assert_relative_eq!(second.measurement(), 30.0);
        assert_eq!(
            action.state(),
            CommandState::DimChain {
                base_point: Some(Point2::new(0.0, 0.0)),
                last_point: Some(Point2::new(30.0, 0.0)),
                placed: 2,
            }
        );
    }

    #[test]
    fn test_without_dimension_waits_for_pick() {
        let doc = Document::new();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DimChainAction::continued();

        action.init(&ctx);
        assert_eq!(action.step(), 1);
        assert!(matches!(action.on_coordinate(&ctx, Point2::new(1.0, 1.0)), ActionResult::Ignored(_)));
    }

    #[test]
    fn test_zero_length_is_ignored() {
        let doc = doc_with_dimension();
        let settings = DraftSettings::default();
        let ctx = ctx(&doc, &settings);
        let mut action = DimChainAction::continued();

        action.init(&ctx);
        assert!(matches!(action.on_coordinate(&ctx, Point2::new(10.0, 5.0)), ActionResult::Ignored(_)));
        assert_eq!(action.step(), 2);
    }
}
