//! Action 系统
//!
//! 每个绘图/编辑命令是一个独立的 Action 实现，内部用私有的状态枚举
//! 推进步骤。引擎把点、数值、关键字和回车分发给当前 Action，
//! 再根据返回的 [`ActionResult`] 提交修改或结束命令。

use serde::{Deserialize, Serialize};
use zdraft_core::dimension::{DimStyle, Dimension};
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::geometry::Geometry;
use zdraft_core::hit::find_closest;
use zdraft_core::math::Point2;
use zdraft_core::settings::DraftSettings;

use crate::command_state::CommandState;
use crate::document::{Document, EditBatch};
use crate::editor::EditorRequest;

/// Action 执行结果
pub enum ActionResult {
    /// 输入被接受，状态已推进
    Continue,
    /// 输入被忽略，状态不变（原因写入调试日志）
    Ignored(String),
    /// 提交修改，命令继续（可重复命令）
    Commit(EditBatch),
    /// 提交修改并结束命令
    Finish(EditBatch),
    /// 不提交任何修改，结束命令
    Done,
    /// 取消当前命令
    Cancel,
    /// 挂起，等待外部编辑器回传
    AwaitEditor(EditorRequest),
}

impl ActionResult {
    pub fn ignored(reason: impl Into<String>) -> Self {
        ActionResult::Ignored(reason.into())
    }
}

impl std::fmt::Debug for ActionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionResult::Continue => write!(f, "Continue"),
            ActionResult::Ignored(reason) => write!(f, "Ignored({reason})"),
            ActionResult::Commit(batch) => write!(f, "Commit({batch:?})"),
            ActionResult::Finish(batch) => write!(f, "Finish({batch:?})"),
            ActionResult::Done => write!(f, "Done"),
            ActionResult::Cancel => write!(f, "Cancel"),
            ActionResult::AwaitEditor(req) => write!(f, "AwaitEditor({:?})", req.kind()),
        }
    }
}

/// 命令类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    // 绘图
    DrawLine,
    DrawPolyline,
    DrawRectangle,
    DrawCircle,
    DrawArc,
    DrawPolygon,
    DrawEllipse,
    DrawPoint,
    DrawSpline,
    DrawRay,
    DrawXLine,
    DrawDonut,

    // 修改
    Move,
    Copy,
    Rotate,
    Scale,
    Mirror,
    Erase,
    Offset,
    Trim,
    Extend,

    // 标注
    DimLinear,
    DimAligned,
    DimAngular,
    DimRadius,
    DimDiameter,
    DimContinue,
    DimBaseline,

    // 注释
    Text,
    MText,
    Table,
}

impl ActionType {
    pub const ALL: [ActionType; 31] = [
        ActionType::DrawLine,
        ActionType::DrawPolyline,
        ActionType::DrawRectangle,
        ActionType::DrawCircle,
        ActionType::DrawArc,
        ActionType::DrawPolygon,
        ActionType::DrawEllipse,
        ActionType::DrawPoint,
        ActionType::DrawSpline,
        ActionType::DrawRay,
        ActionType::DrawXLine,
        ActionType::DrawDonut,
        ActionType::Move,
        ActionType::Copy,
        ActionType::Rotate,
        ActionType::Scale,
        ActionType::Mirror,
        ActionType::Erase,
        ActionType::Offset,
        ActionType::Trim,
        ActionType::Extend,
        ActionType::DimLinear,
        ActionType::DimAligned,
        ActionType::DimAngular,
        ActionType::DimRadius,
        ActionType::DimDiameter,
        ActionType::DimContinue,
        ActionType::DimBaseline,
        ActionType::Text,
        ActionType::MText,
        ActionType::Table,
    ];

    /// 完整命令名
    pub fn name(&self) -> &'static str {
        match self {
            ActionType::DrawLine => "LINE",
            ActionType::DrawPolyline => "POLYLINE",
            ActionType::DrawRectangle => "RECTANGLE",
            ActionType::DrawCircle => "CIRCLE",
            ActionType::DrawArc => "ARC",
            ActionType::DrawPolygon => "POLYGON",
            ActionType::DrawEllipse => "ELLIPSE",
            ActionType::DrawPoint => "POINT",
            ActionType::DrawSpline => "SPLINE",
            ActionType::DrawRay => "RAY",
            ActionType::DrawXLine => "XLINE",
            ActionType::DrawDonut => "DONUT",
            ActionType::Move => "MOVE",
            ActionType::Copy => "COPY",
            ActionType::Rotate => "ROTATE",
            ActionType::Scale => "SCALE",
            ActionType::Mirror => "MIRROR",
            ActionType::Erase => "ERASE",
            ActionType::Offset => "OFFSET",
            ActionType::Trim => "TRIM",
            ActionType::Extend => "EXTEND",
            ActionType::DimLinear => "DIMLINEAR",
            ActionType::DimAligned => "DIMALIGNED",
            ActionType::DimAngular => "DIMANGULAR",
            ActionType::DimRadius => "DIMRADIUS",
            ActionType::DimDiameter => "DIMDIAMETER",
            ActionType::DimContinue => "DIMCONTINUE",
            ActionType::DimBaseline => "DIMBASELINE",
            ActionType::Text => "TEXT",
            ActionType::MText => "MTEXT",
            ActionType::Table => "TABLE",
        }
    }

    /// 快捷键/短命令
    pub fn shortcuts(&self) -> &'static [&'static str] {
        match self {
            ActionType::DrawLine => &["L"],
            ActionType::DrawPolyline => &["PL", "PLINE"],
            ActionType::DrawRectangle => &["REC", "RECT"],
            ActionType::DrawCircle => &["C"],
            ActionType::DrawArc => &["A"],
            ActionType::DrawPolygon => &["POL"],
            ActionType::DrawEllipse => &["EL"],
            ActionType::DrawPoint => &["PO"],
            ActionType::DrawSpline => &["SPL"],
            // 命令名已是最短形式，没有快捷键
            ActionType::DrawRay => &[],
            ActionType::DrawXLine => &["XL"],
            ActionType::DrawDonut => &["DO"],
            ActionType::Move => &["M"],
            ActionType::Copy => &["CO", "CP"],
            ActionType::Rotate => &["RO"],
            ActionType::Scale => &["SC"],
            ActionType::Mirror => &["MI"],
            ActionType::Erase => &["E"],
            ActionType::Offset => &["O"],
            ActionType::Trim => &["TR"],
            ActionType::Extend => &["EX"],
            ActionType::DimLinear => &["DLI"],
            ActionType::DimAligned => &["DAL"],
            ActionType::DimAngular => &["DAN"],
            ActionType::DimRadius => &["DRA"],
            ActionType::DimDiameter => &["DDI"],
            ActionType::DimContinue => &["DCO"],
            ActionType::DimBaseline => &["DBA"],
            ActionType::Text => &["T", "DT"],
            ActionType::MText => &["MT"],
            ActionType::Table => &["TB"],
        }
    }

    /// 需要先选择对象的命令
    pub fn uses_selection(&self) -> bool {
        matches!(
            self,
            ActionType::Move
                | ActionType::Copy
                | ActionType::Rotate
                | ActionType::Scale
                | ActionType::Mirror
                | ActionType::Erase
        )
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Action 上下文 - 传递给 Action 的运行时信息
pub struct ActionContext<'a> {
    pub document: &'a Document,
    pub settings: &'a DraftSettings,
    /// 每个世界单位对应的像素数
    pub view_scale: f64,
    /// 最近一次提交的点（相对坐标、长度输入的参考点）
    pub reference_point: Option<Point2>,
}

impl<'a> ActionContext<'a> {
    /// 键入的长度换算为基础单位
    pub fn length(&self, typed: f64) -> f64 {
        self.settings.units.to_base(typed)
    }

    /// 选择对象时的世界坐标容差
    pub fn select_tolerance(&self) -> f64 {
        self.settings.selection.select_tolerance / self.view_scale
    }

    /// 编辑拾取的世界坐标容差
    pub fn pick_tolerance(&self) -> f64 {
        self.settings.selection.pick_tolerance / self.view_scale
    }

    /// 在可编辑实体中拾取
    pub fn pick(&self, point: &Point2, tolerance: f64) -> Option<&'a Entity> {
        let candidates = self.document.editable_entities();
        let id = find_closest(point, candidates.iter().copied(), tolerance)?;
        self.document.get(id)
    }

    /// 选择阶段的拾取
    pub fn pick_for_selection(&self, point: &Point2) -> Option<&'a Entity> {
        self.pick(point, self.select_tolerance())
    }

    /// 编辑阶段的拾取
    pub fn pick_for_edit(&self, point: &Point2) -> Option<&'a Entity> {
        self.pick(point, self.pick_tolerance())
    }

    pub fn entity(&self, id: EntityId) -> Option<&'a Entity> {
        self.document.get(id)
    }

    /// 新建标注带上全局标注设置
    pub fn stamp_dimension(&self, mut dim: Dimension) -> Dimension {
        dim.style = dim.style.layered_over(&self.settings.dimension.defaults);
        dim
    }

    /// 按全局设置解析的标注样式
    pub fn dim_style(&self) -> DimStyle {
        zdraft_core::dimension::DimStyleOverrides::default().resolve(&self.settings.dimension)
    }

    /// 文档中最后创建的线性类标注
    pub fn last_linear_dimension(&self) -> Option<&'a Dimension> {
        self.document.last_linear_dimension()
    }
}

/// 预览几何体
#[derive(Debug, Clone)]
pub struct PreviewGeometry {
    pub geometry: Geometry,
    /// 是否是参考线（虚线显示）
    pub is_reference: bool,
}

impl PreviewGeometry {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: false,
        }
    }

    pub fn reference(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: true,
        }
    }
}

/// Action trait - 所有绘图/编辑命令的核心接口
pub trait Action: Send {
    /// 获取 action 类型
    fn action_type(&self) -> ActionType;

    /// 获取 action 名称
    fn name(&self) -> &str {
        self.action_type().name()
    }

    /// 命令启动时调用一次
    fn init(&mut self, _ctx: &ActionContext) {}

    /// 重置到第一步
    fn reset(&mut self);

    /// 当前步骤（从 1 开始）
    fn step(&self) -> u32;

    // ========== 事件处理 ==========

    /// 点输入（点击或键入坐标，已经过捕捉）
    fn on_coordinate(&mut self, ctx: &ActionContext, coord: Point2) -> ActionResult;

    /// 关键字输入，不认识的关键字返回 None
    fn on_command(&mut self, _ctx: &ActionContext, _cmd: &str) -> Option<ActionResult> {
        None
    }

    /// 数值输入（半径、长度、角度、边数、比例等）
    ///
    /// 数值按键入原样传入，表示长度时由 Action 调用 [`ActionContext::length`] 换算。
    fn on_value(&mut self, _ctx: &ActionContext, _value: f64) -> ActionResult {
        ActionResult::ignored("this step does not accept a value")
    }

    /// 宽高输入 `w,h`（已换算为基础单位），只有需要尺寸的步骤处理
    fn on_dimensions(&mut self, _ctx: &ActionContext, _width: f64, _height: f64) -> Option<ActionResult> {
        None
    }

    /// 回车（空输入）
    fn on_enter(&mut self, _ctx: &ActionContext) -> ActionResult {
        ActionResult::Done
    }

    // ========== 状态输出 ==========

    /// 已提交的临时点
    fn temp_points(&self) -> Vec<Point2>;

    /// 类型化的命令状态
    fn state(&self) -> CommandState;

    /// 获取当前状态的提示文本
    fn prompt(&self) -> String;

    /// 获取当前可用的关键字
    fn available_commands(&self) -> Vec<&'static str> {
        vec![]
    }

    /// 方向距离输入：当前步骤不接受数值时，单独的长度沿此方向（弧度）
    /// 从上一点量取。光标偏离上一点时改用光标方向。返回 None 表示不支持
    fn direction_hint(&self) -> Option<f64> {
        None
    }

    // ========== 预览 ==========

    /// 获取预览几何体
    fn preview(&self, _ctx: &ActionContext, _cursor: Point2) -> Vec<PreviewGeometry> {
        vec![]
    }
}
