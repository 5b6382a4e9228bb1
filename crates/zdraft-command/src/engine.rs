//! 命令引擎
//!
//! 持有文档、当前命令和编辑器挂起点，把指针点击、键入文本和编辑器回传
//! 分发给当前 [`Action`]，再按 [`ActionResult`] 提交修改或结束命令。
//! 事件按到达顺序处理；文档只在命令提交时整批修改。

use serde::Serialize;
use tracing::{debug, info, warn};
use zdraft_core::entity::EntityId;
use zdraft_core::geometry::Geometry;
use zdraft_core::hit::find_closest;
use zdraft_core::input_parser::{InputParser, InputValue};
use zdraft_core::math::{angle_of, distance, polar, to_plane, to_radians, Point2, Point3, DEGENERATE_TOLERANCE};
use zdraft_core::settings::DraftSettings;
use zdraft_core::snap::{SnapEngine, SnapMarker, SnapResult};
use zdraft_core::units::DrawingUnit;

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::create_action;
use crate::command_registry::CommandRegistry;
use crate::command_state::CommandState;
use crate::document::{BatchOutcome, Document, EditBatch};
use crate::editor::{edit_entity_request, EditorKind, EditorPayload, EditorSession, TablePayload, TextPayload};
use crate::error::CommandError;
use crate::selection::SelectionSet;
use crate::throttle::MoveThrottle;

/// 命令会话的只读快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandSnapshot {
    pub active_command: Option<ActionType>,
    /// 从 1 开始，空闲时为 0
    pub step: u32,
    pub temp_points: Vec<Point2>,
    pub state: CommandState,
    pub cursor: Point2,
    pub prompt: String,
    /// 当前步骤可用的关键字
    pub keywords: Vec<&'static str>,
}

/// 命令引擎
pub struct CommandEngine {
    document: Document,
    settings: DraftSettings,
    registry: CommandRegistry,
    snap: SnapEngine,
    parser: InputParser,
    action: Option<Box<dyn Action>>,
    editor: EditorSession,
    /// 空闲时的选择集，启动选择类命令时作为预选
    selection: SelectionSet,
    hovered: Option<EntityId>,
    throttle: MoveThrottle,
    cursor: Point2,
    last_snap: Option<SnapResult>,
    /// 每个世界单位对应的像素数
    view_scale: f64,
    /// 最近提交的点，相对坐标以它为原点
    reference_point: Option<Point2>,
    /// 当前命令第一个三维输入点的 Z
    elevation: Option<f64>,
    /// 空闲时回车重复上一个命令
    last_command: Option<ActionType>,
    messages: Vec<String>,
}

impl CommandEngine {
    pub fn new(settings: DraftSettings) -> Self {
        Self {
            document: Document::new(),
            registry: CommandRegistry::new(),
            snap: SnapEngine::new(settings.snap_config()),
            parser: InputParser::new(settings.units),
            action: None,
            editor: EditorSession::new(),
            selection: SelectionSet::new(),
            hovered: None,
            throttle: MoveThrottle::new(),
            cursor: Point2::origin(),
            last_snap: None,
            view_scale: 1.0,
            reference_point: None,
            elevation: None,
            last_command: None,
            messages: Vec::new(),
            settings,
        }
    }

    // ========== 访问器 ==========

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    pub fn active_command(&self) -> Option<ActionType> {
        self.action.as_ref().map(|a| a.action_type())
    }

    pub fn is_idle(&self) -> bool {
        self.action.is_none()
    }

    pub fn pending_editor(&self) -> Option<&EditorKind> {
        self.editor.pending_kind()
    }

    /// 编辑器打开时显示的初始内容
    pub fn pending_editor_content(&self) -> Option<&EditorPayload> {
        self.editor.pending_request().and_then(|r| r.initial())
    }

    pub fn reference_point(&self) -> Option<Point2> {
        self.reference_point
    }

    /// 最近一次捕捉的标记
    pub fn snap_marker(&self) -> Option<(Point2, SnapMarker)> {
        self.last_snap.as_ref().and_then(|s| s.marker())
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn set_view_scale(&mut self, view_scale: f64) {
        if view_scale.is_finite() && view_scale > 0.0 {
            self.view_scale = view_scale;
        }
    }

    /// 切换绘图单位，影响之后的键入值
    pub fn set_units(&mut self, unit: DrawingUnit) {
        self.settings.units = unit;
        self.parser = InputParser::new(unit);
    }

    pub fn snapshot(&self) -> CommandSnapshot {
        match &self.action {
            Some(action) => CommandSnapshot {
                active_command: Some(action.action_type()),
                step: action.step(),
                temp_points: action.temp_points(),
                state: action.state(),
                cursor: self.cursor,
                prompt: action.prompt(),
                keywords: action.available_commands(),
            },
            None => CommandSnapshot {
                active_command: None,
                step: 0,
                temp_points: vec![],
                state: CommandState::Idle,
                cursor: self.cursor,
                prompt: "命令:".to_string(),
                keywords: vec![],
            },
        }
    }

    /// 以光标为动态点的预览
    pub fn preview(&self) -> Vec<PreviewGeometry> {
        let Some(action) = &self.action else {
            return vec![];
        };
        let ctx = ActionContext {
            document: &self.document,
            settings: &self.settings,
            view_scale: self.view_scale,
            reference_point: self.reference_point,
        };
        action.preview(&ctx, self.cursor)
    }

    // ========== 命令生命周期 ==========

    /// 启动命令，先取消正在进行的命令
    pub fn start_command(&mut self, action_type: ActionType) {
        if self.action.is_some() {
            self.cancel_command();
        }
        let mut action = create_action(action_type, &self.selection);
        if action_type.uses_selection() {
            self.selection.clear();
        }
        let ctx = ActionContext {
            document: &self.document,
            settings: &self.settings,
            view_scale: self.view_scale,
            reference_point: self.reference_point,
        };
        action.init(&ctx);
        info!("开始命令: {}", action.name());
        self.last_command = Some(action_type);
        self.elevation = None;
        self.action = Some(action);
    }

    /// 按命令名、快捷键或别名启动命令（不区分大小写）
    pub fn start_command_by_name(&mut self, token: &str) -> Result<ActionType, CommandError> {
        match self.registry.lookup(token) {
            Some(action_type) => {
                self.start_command(action_type);
                Ok(action_type)
            }
            None => {
                let token = token.trim().to_string();
                warn!("未知命令: {}", token);
                self.messages.push(format!("未知命令: \"{token}\""));
                Err(CommandError::UnknownCommand(token))
            }
        }
    }

    /// 取消当前命令，可重复调用
    ///
    /// 丢弃临时点和挂起的编辑器，之前迭代已提交的实体保留。
    /// 空闲时清空选择集。
    pub fn cancel_command(&mut self) {
        if self.editor.close() {
            debug!("丢弃挂起的编辑器请求");
        }
        match self.action.take() {
            Some(action) => {
                info!("取消命令: {}", action.name());
                self.messages.push(format!("*取消* {}", action.name()));
            }
            None => self.selection.clear(),
        }
        self.elevation = None;
    }

    fn complete_command(&mut self) {
        if let Some(action) = self.action.take() {
            info!("命令完成: {}", action.name());
        }
        self.elevation = None;
    }

    // ========== 输入 ==========

    fn with_action<R>(&mut self, f: impl FnOnce(&mut Box<dyn Action>, &ActionContext) -> R) -> Option<R> {
        let action = self.action.as_mut()?;
        let ctx = ActionContext {
            document: &self.document,
            settings: &self.settings,
            view_scale: self.view_scale,
            reference_point: self.reference_point,
        };
        Some(f(action, &ctx))
    }

    /// 指针点击，先经过对象捕捉
    pub fn handle_command_input(&mut self, point: Point2) {
        let entities = self.document.editable_entities();
        let result = self.snap.resolve(point, &entities, self.view_scale, self.reference_point);
        let snapped = result.point();
        if let SnapResult::Snapped { mode, .. } = &result {
            debug!("捕捉 {} ({:.3}, {:.3})", mode.name(), snapped.x, snapped.y);
        }
        self.last_snap = Some(result);
        self.handle_snapped_input(snapped);
    }

    /// 三维点输入，Z 作为当前命令新实体的标高
    pub fn handle_command_input_3d(&mut self, point: Point3) {
        if self.action.is_some() && self.elevation.is_none() {
            self.elevation = Some(point.z);
        }
        self.handle_command_input(to_plane(&point));
    }

    /// 已经确定的点（键入坐标或调用方已捕捉）
    pub fn handle_snapped_input(&mut self, point: Point2) {
        self.cursor = point;
        if self.editor.is_pending() {
            debug!("编辑器打开时忽略点输入");
            return;
        }
        if self.action.is_none() {
            self.toggle_selection_at(point);
            return;
        }
        let Some(result) = self.with_action(|action, ctx| action.on_coordinate(ctx, point)) else {
            return;
        };
        if !matches!(result, ActionResult::Ignored(_)) {
            self.reference_point = Some(point);
        }
        self.handle_result(result);
    }

    /// 长度+角度输入：从参考点沿角度（度）方向量取长度
    pub fn handle_length_angle(&mut self, length: f64, angle_deg: f64) {
        let Some(origin) = self.reference_point else {
            warn!("长度+角度输入需要参考点");
            self.messages.push("需要先指定一个点".to_string());
            return;
        };
        let point = polar(origin, self.settings.units.to_base(length), to_radians(angle_deg));
        self.handle_snapped_input(point);
    }

    /// 命令行键入
    ///
    /// 空输入等同回车；空闲时的非空输入作为命令名。
    pub fn handle_value_input(&mut self, raw: &str) {
        let input = raw.trim();
        if self.editor.is_pending() {
            debug!("编辑器打开时忽略键入: {:?}", input);
            return;
        }
        if input.is_empty() {
            self.handle_enter();
            return;
        }
        if self.action.is_none() {
            // 未知命令已记录到消息
            let _ = self.start_command_by_name(input);
            return;
        }

        if let Ok(value) = InputParser::parse_scalar(input) {
            self.dispatch_length(value);
            return;
        }

        // "w,h" 先交给需要尺寸的步骤
        if !input.contains('@') && !input.contains('<') {
            if let Ok((width, height)) = self.parser.parse_dimensions(input) {
                let handled = self
                    .with_action(|action, ctx| action.on_dimensions(ctx, width, height))
                    .flatten();
                if let Some(result) = handled {
                    self.handle_result(result);
                    return;
                }
            }
        }

        match self.parser.parse(input, self.reference_point) {
            Ok(InputValue::Keyword(keyword)) => self.handle_keyword(&keyword),
            Ok(InputValue::Point(point)) => self.handle_snapped_input(point),
            Ok(InputValue::LengthAngle { length, angle }) => match self.reference_point {
                Some(origin) => self.handle_snapped_input(polar(origin, length, angle)),
                None => {
                    warn!("长度+角度输入需要参考点: {}", input);
                    self.messages.push("需要先指定一个点".to_string());
                }
            },
            Ok(InputValue::Angle(angle)) => self.dispatch_value(angle.to_degrees()),
            Ok(InputValue::Length(length)) => self.dispatch_length(self.settings.units.from_base(length)),
            Err(e) => {
                warn!("无效输入 {:?}: {}", input, e);
                self.messages.push(format!("无效输入: {e}"));
            }
        }
    }

    fn dispatch_value(&mut self, value: f64) {
        if let Some(result) = self.with_action(|action, ctx| action.on_value(ctx, value)) {
            self.handle_value_result(value, result);
        }
    }

    /// 长度先交给当前步骤，步骤不收数值时按方向距离落点
    fn dispatch_length(&mut self, value: f64) {
        let Some(result) = self.with_action(|action, ctx| action.on_value(ctx, value)) else {
            return;
        };
        if matches!(result, ActionResult::Ignored(_)) {
            if let Some(point) = self.direct_distance_point(value) {
                debug!("方向距离输入 {} -> ({:.3}, {:.3})", value, point.x, point.y);
                self.handle_snapped_input(point);
                return;
            }
        }
        self.handle_value_result(value, result);
    }

    fn handle_value_result(&mut self, value: f64, result: ActionResult) {
        if let ActionResult::Ignored(reason) = &result {
            self.messages.push(format!("当前步骤不接受数值 {value}: {reason}"));
        }
        self.handle_result(result);
    }

    /// 从参考点沿光标方向量取长度，光标与参考点重合时用命令给出的方向
    fn direct_distance_point(&self, value: f64) -> Option<Point2> {
        let hint = self.action.as_ref()?.direction_hint()?;
        let origin = self.reference_point?;
        let angle = if distance(&origin, &self.cursor) > DEGENERATE_TOLERANCE {
            angle_of(&origin, &self.cursor)
        } else {
            hint
        };
        Some(polar(origin, self.settings.units.to_base(value), angle))
    }

    fn handle_enter(&mut self) {
        if self.action.is_none() {
            if let Some(action_type) = self.last_command {
                self.start_command(action_type);
            }
            return;
        }
        if let Some(result) = self.with_action(|action, ctx| action.on_enter(ctx)) {
            self.handle_result(result);
        }
    }

    /// 关键字先交给当前命令，命令不认识时作为新命令名
    fn handle_keyword(&mut self, keyword: &str) {
        let handled = self
            .with_action(|action, ctx| action.on_command(ctx, keyword))
            .flatten();
        if let Some(result) = handled {
            self.handle_result(result);
            return;
        }
        match self.registry.lookup(keyword) {
            Some(action_type) => self.start_command(action_type),
            None => {
                warn!("无效关键字: {}", keyword);
                let keywords = self.action.as_ref().map(|a| a.available_commands()).unwrap_or_default();
                if keywords.is_empty() {
                    self.messages.push(format!("无效关键字: {keyword}"));
                } else {
                    self.messages.push(format!("无效关键字: {keyword}（可用: {}）", keywords.join(", ")));
                }
            }
        }
    }

    fn handle_result(&mut self, result: ActionResult) {
        match result {
            ActionResult::Continue => {
                if let Some(action) = &self.action {
                    debug!("{} -> 步骤 {}", action.name(), action.step());
                }
            }
            ActionResult::Ignored(reason) => debug!("忽略输入: {}", reason),
            ActionResult::Commit(batch) => {
                self.commit(batch);
            }
            ActionResult::Finish(batch) => {
                self.commit(batch);
                self.complete_command();
            }
            ActionResult::Done => self.complete_command(),
            ActionResult::Cancel => self.cancel_command(),
            ActionResult::AwaitEditor(request) => {
                debug!("等待编辑器: {:?}", request.kind());
                if self.editor.open(request).is_some() {
                    warn!("丢弃未完成的编辑器请求");
                }
            }
        }
    }

    fn commit(&mut self, batch: EditBatch) -> Option<BatchOutcome> {
        if batch.is_empty() {
            return None;
        }
        match self.document.apply(batch, self.elevation.unwrap_or(0.0)) {
            Ok(outcome) => {
                debug!(
                    "提交: 新建 {} 修改 {} 删除 {}",
                    outcome.created.len(),
                    outcome.modified.len(),
                    outcome.deleted.len()
                );
                for id in &outcome.created {
                    if let Some(Geometry::Dimension(dim)) = self.document.get(*id).map(|e| &e.geometry) {
                        self.messages.push(format!("标注文字 = {}", dim.label(&self.settings.dimension)));
                    }
                }
                let document = &self.document;
                self.selection.retain(|id| document.contains(*id));
                if self.hovered.is_some_and(|id| !document.contains(id)) {
                    self.hovered = None;
                }
                Some(outcome)
            }
            Err(e) => {
                warn!("提交失败: {}", e);
                self.messages.push(e.to_string());
                None
            }
        }
    }

    // ========== 外部编辑器 ==========

    pub fn submit_text(&mut self, payload: TextPayload) -> Result<BatchOutcome, CommandError> {
        self.submit_editor(EditorPayload::Text(payload))
    }

    pub fn submit_table(&mut self, payload: TablePayload) -> Result<BatchOutcome, CommandError> {
        self.submit_editor(EditorPayload::Table(payload))
    }

    /// 用回传内容恢复挂起的命令，随后结束该命令
    fn submit_editor(&mut self, payload: EditorPayload) -> Result<BatchOutcome, CommandError> {
        if self.editor.is_submitting() {
            return Err(CommandError::AlreadySubmitting);
        }
        match self.editor.pending_kind() {
            None => return Err(CommandError::EditorNotPending),
            Some(kind) if !kind.accepts(&payload) => return Err(CommandError::PayloadMismatch),
            Some(_) => {}
        }
        let request = self.editor.begin_submit().ok_or(CommandError::EditorNotPending)?;
        let outcome = match request.resume(payload) {
            Some(batch) => self.document.apply(batch, self.elevation.unwrap_or(0.0)),
            None => {
                debug!("编辑器回传为空，不生成实体");
                Ok(BatchOutcome::default())
            }
        };
        self.editor.end_submit();
        self.complete_command();
        outcome
    }

    /// 关闭编辑器，挂起的命令一并取消
    pub fn cancel_editor(&mut self) -> bool {
        if !self.editor.is_pending() {
            return false;
        }
        self.cancel_command();
        true
    }

    /// 双击文本或表格进入编辑，只在空闲时有效
    pub fn double_click(&mut self, point: Point2) -> bool {
        if self.action.is_some() || self.editor.is_pending() {
            return false;
        }
        let tolerance = self.settings.selection.pick_tolerance / self.view_scale;
        let candidates = self.document.editable_entities();
        let Some(entity) = find_closest(&point, candidates.iter().copied(), tolerance).and_then(|id| self.document.get(id))
        else {
            return false;
        };
        let Some(request) = edit_entity_request(entity.id, &entity.geometry) else {
            debug!("{} 不是可编辑的文本", entity.id);
            return false;
        };
        info!("编辑 {} {}", entity.geometry.type_name(), entity.id);
        self.editor.open(request);
        true
    }

    // ========== 选择与悬停 ==========

    /// 不经捕捉的拾取：空闲时切换选择，命令中作为点输入
    pub fn pick(&mut self, point: Point2) {
        self.handle_snapped_input(point);
    }

    fn toggle_selection_at(&mut self, point: Point2) {
        let tolerance = self.settings.selection.select_tolerance / self.view_scale;
        let candidates = self.document.editable_entities();
        match find_closest(&point, candidates.iter().copied(), tolerance) {
            Some(id) => {
                let selected = self.selection.toggle(id);
                debug!("{} {}", if selected { "选中" } else { "取消选中" }, id);
            }
            None => debug!("没有拾取到对象"),
        }
    }

    /// 新的一帧，重置移动节流
    pub fn begin_frame(&mut self) {
        self.throttle.begin_frame();
    }

    /// 悬停高亮，每帧最多计算一次，不影响命令状态
    pub fn hover(&mut self, point: Point2) -> Option<EntityId> {
        if self.throttle.should_process() {
            self.hovered = self.hit_visible(point);
        }
        self.hovered
    }

    /// 指针移动：更新光标、捕捉标记和悬停对象
    pub fn mouse_move(&mut self, point: Point2) {
        self.cursor = point;
        if !self.throttle.should_process() {
            return;
        }
        let entities = self.document.editable_entities();
        let result = self.snap.resolve(point, &entities, self.view_scale, self.reference_point);
        self.cursor = result.point();
        self.last_snap = Some(result);
        self.hovered = self.hit_visible(point);
    }

    fn hit_visible(&self, point: Point2) -> Option<EntityId> {
        let tolerance = self.settings.selection.select_tolerance / self.view_scale;
        let candidates = self.document.visible_entities();
        find_closest(&point, candidates.iter().copied(), tolerance)
    }
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new(DraftSettings::default())
    }
}

impl std::fmt::Debug for CommandEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEngine")
            .field("active_command", &self.active_command())
            .field("entities", &self.document.len())
            .field("editor", &self.editor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CommandEngine {
        let mut settings = DraftSettings::default();
        settings.snap.enabled = false;
        CommandEngine::new(settings)
    }

    #[test]
    fn test_idle_snapshot() {
        let engine = engine();
        let snap = engine.snapshot();
        assert_eq!(snap.active_command, None);
        assert_eq!(snap.step, 0);
        assert!(snap.state.is_idle());
    }

    #[test]
    fn test_keyword_not_used_by_command_starts_new_command() {
        let mut engine = engine();
        engine.start_command(ActionType::DrawLine);
        engine.handle_value_input("circle");
        assert_eq!(engine.active_command(), Some(ActionType::DrawCircle));
    }

    #[test]
    fn test_enter_when_idle_repeats_last_command() {
        let mut engine = engine();
        engine.start_command(ActionType::DrawPoint);
        engine.handle_value_input("1,1");
        engine.cancel_command();
        engine.handle_value_input("");
        assert_eq!(engine.active_command(), Some(ActionType::DrawPoint));
    }

    #[test]
    fn test_elevation_from_first_3d_point() {
        let mut engine = engine();
        engine.start_command(ActionType::DrawLine);
        engine.handle_command_input_3d(Point3::new(0.0, 0.0, 12.5));
        engine.handle_command_input_3d(Point3::new(10.0, 0.0, 99.0));
        let entity = engine.document().last().unwrap();
        assert_eq!(entity.elevation, 12.5);
        assert!(matches!(entity.geometry, Geometry::Line(_)));
    }

    #[test]
    fn test_preselection_is_consumed() {
        let mut engine = engine();
        engine.start_command(ActionType::DrawCircle);
        engine.handle_value_input("0,0");
        engine.handle_value_input("5");
        engine.pick(Point2::new(5.0, 0.0));
        assert_eq!(engine.selection().len(), 1);

        engine.start_command(ActionType::Erase);
        assert!(engine.selection().is_empty());
        engine.handle_value_input("");
        assert!(engine.document().is_empty());
        assert!(engine.is_idle());
    }

    #[test]
    fn test_hover_is_throttled_per_frame() {
        let mut engine = engine();
        engine.start_command(ActionType::DrawCircle);
        engine.handle_value_input("0,0");
        engine.handle_value_input("5");

        engine.begin_frame();
        let first = engine.hover(Point2::new(5.0, 0.0));
        assert!(first.is_some());
        // 同一帧内第二次不重新计算
        assert_eq!(engine.hover(Point2::new(100.0, 100.0)), first);
        engine.begin_frame();
        assert_eq!(engine.hover(Point2::new(100.0, 100.0)), None);
        assert!(engine.is_idle());
    }
}
