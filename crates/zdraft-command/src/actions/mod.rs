//! 具体的 Action 实现
//!
//! 每个绘图/编辑/标注命令对应一个 Action 实现

mod dim_angular;
mod dim_chain;
mod dim_linear;
mod dim_radial;
mod draw_arc;
mod draw_circle;
mod draw_donut;
mod draw_ellipse;
mod draw_line;
mod draw_point;
mod draw_polygon;
mod draw_polyline;
mod draw_ray;
mod draw_rectangle;
mod draw_spline;
mod draw_table;
mod draw_text;
mod modify_copy;
mod modify_erase;
mod modify_extend;
mod modify_mirror;
mod modify_move;
mod modify_offset;
mod modify_rotate;
mod modify_scale;
mod modify_trim;
mod select;

pub use dim_angular::DimAngularAction;
pub use dim_chain::DimChainAction;
pub use dim_linear::DimLinearAction;
pub use dim_radial::DimRadialAction;
pub use draw_arc::DrawArcAction;
pub use draw_circle::DrawCircleAction;
pub use draw_donut::DrawDonutAction;
pub use draw_ellipse::DrawEllipseAction;
pub use draw_line::DrawLineAction;
pub use draw_point::DrawPointAction;
pub use draw_polygon::DrawPolygonAction;
pub use draw_polyline::DrawPolylineAction;
pub use draw_ray::DrawConstructionLineAction;
pub use draw_rectangle::DrawRectangleAction;
pub use draw_spline::DrawSplineAction;
pub use draw_table::DrawTableAction;
pub use draw_text::DrawTextAction;
pub use modify_copy::CopyAction;
pub use modify_erase::EraseAction;
pub use modify_extend::ExtendAction;
pub use modify_mirror::MirrorAction;
pub use modify_move::MoveAction;
pub use modify_offset::OffsetAction;
pub use modify_rotate::RotateAction;
pub use modify_scale::ScaleAction;
pub use modify_trim::TrimAction;
pub use select::SelectionPhase;

pub(crate) use draw_table::table_from_payload;

use crate::action::{Action, ActionType};
use crate::selection::SelectionSet;
use zdraft_core::math::{Point2, DEGENERATE_TOLERANCE};

/// 创建指定类型的 Action
///
/// `preselection` 是命令启动前已选中的实体，只有选择类命令使用。
pub fn create_action(action_type: ActionType, preselection: &SelectionSet) -> Box<dyn Action> {
    let selection = preselection.clone();
    match action_type {
        ActionType::DrawLine => Box::new(DrawLineAction::new()),
        ActionType::DrawPolyline => Box::new(DrawPolylineAction::new()),
        ActionType::DrawRectangle => Box::new(DrawRectangleAction::new()),
        ActionType::DrawCircle => Box::new(DrawCircleAction::new()),
        ActionType::DrawArc => Box::new(DrawArcAction::new()),
        ActionType::DrawPolygon => Box::new(DrawPolygonAction::new()),
        ActionType::DrawEllipse => Box::new(DrawEllipseAction::new()),
        ActionType::DrawPoint => Box::new(DrawPointAction::new()),
        ActionType::DrawSpline => Box::new(DrawSplineAction::new()),
        ActionType::DrawRay => Box::new(DrawConstructionLineAction::ray()),
        ActionType::DrawXLine => Box::new(DrawConstructionLineAction::xline()),
        ActionType::DrawDonut => Box::new(DrawDonutAction::new()),
        ActionType::Move => Box::new(MoveAction::with_selection(selection)),
        ActionType::Copy => Box::new(CopyAction::with_selection(selection)),
        ActionType::Rotate => Box::new(RotateAction::with_selection(selection)),
        ActionType::Scale => Box::new(ScaleAction::with_selection(selection)),
        ActionType::Mirror => Box::new(MirrorAction::with_selection(selection)),
        ActionType::Erase => Box::new(EraseAction::with_selection(selection)),
        ActionType::Offset => Box::new(OffsetAction::new()),
        ActionType::Trim => Box::new(TrimAction::new()),
        ActionType::Extend => Box::new(ExtendAction::new()),
        ActionType::DimLinear => Box::new(DimLinearAction::linear()),
        ActionType::DimAligned => Box::new(DimLinearAction::aligned()),
        ActionType::DimAngular => Box::new(DimAngularAction::new()),
        ActionType::DimRadius => Box::new(DimRadialAction::radius()),
        ActionType::DimDiameter => Box::new(DimRadialAction::diameter()),
        ActionType::DimContinue => Box::new(DimChainAction::continued()),
        ActionType::DimBaseline => Box::new(DimChainAction::baseline()),
        ActionType::Text => Box::new(DrawTextAction::single_line()),
        ActionType::MText => Box::new(DrawTextAction::multi_line()),
        ActionType::Table => Box::new(DrawTableAction::new()),
    }
}

/// 两点重合（零长度、零半径输入）
pub(crate) fn coincident(a: &Point2, b: &Point2) -> bool {
    (b - a).norm() < DEGENERATE_TOLERANCE
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::action::{ActionContext, ActionResult};
    use crate::document::{Document, EditBatch};
    use zdraft_core::settings::DraftSettings;

    pub fn ctx<'a>(document: &'a Document, settings: &'a DraftSettings) -> ActionContext<'a> {
        ActionContext {
            document,
            settings,
            view_scale: 1.0,
            reference_point: None,
        }
    }

    /// 取出提交的批次，其他结果直接失败
    pub fn committed(result: ActionResult) -> EditBatch {
        match result {
            ActionResult::Commit(batch) | ActionResult::Finish(batch) => batch,
            other => panic!("expected a commit, got {other:?}"),
        }
    }
}
