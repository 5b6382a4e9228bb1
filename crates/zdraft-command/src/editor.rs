//! 外部编辑器挂起点
//!
//! TEXT/MTEXT/TABLE 以及双击编辑会打开外部编辑器。命令状态机在这里挂起，
//! 保存一个续延，编辑器回传内容后由引擎调用续延生成修改。
//! 同一时刻最多只有一个挂起的请求。

use serde::{Deserialize, Serialize};
use zdraft_core::entity::EntityId;
use zdraft_core::geometry::{CellStyle, Geometry, MText, Text, TextStyle};
use zdraft_core::math::Point2;

use crate::actions::table_from_payload;
use crate::document::EditBatch;

/// 文本编辑器回传内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextPayload {
    pub text: String,
    pub style: TextStyle,
}

impl TextPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }
}

/// 表格编辑器回传内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePayload {
    pub rows: usize,
    pub cols: usize,
    /// 行优先的单元文本，不足的单元留空
    pub cells: Vec<String>,
    pub row_height: f64,
    pub col_width: f64,
    pub cell_style: CellStyle,
}

impl TablePayload {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: Vec::new(),
            row_height: 8.0,
            col_width: 25.0,
            cell_style: CellStyle::default(),
        }
    }

    pub fn with_cells(mut self, cells: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cells = cells.into_iter().map(Into::into).collect();
        self
    }
}

/// 编辑器回传
#[derive(Debug, Clone, PartialEq)]
pub enum EditorPayload {
    Text(TextPayload),
    Table(TablePayload),
}

/// 请求打开的编辑器
#[derive(Debug, Clone, PartialEq)]
pub enum EditorKind {
    /// 新建单行文本
    Text { position: Point2 },
    /// 新建多行文本
    MText { position: Point2 },
    /// 新建表格
    Table { position: Point2 },
    /// 编辑已有实体（双击）
    EditEntity { id: EntityId },
}

impl EditorKind {
    /// 是否接受该类型的回传
    pub fn accepts(&self, payload: &EditorPayload) -> bool {
        match self {
            EditorKind::Table { .. } => matches!(payload, EditorPayload::Table(_)),
            EditorKind::Text { .. } | EditorKind::MText { .. } => matches!(payload, EditorPayload::Text(_)),
            EditorKind::EditEntity { .. } => true,
        }
    }
}

/// 续延：编辑器回传后生成修改，回传内容不可用时返回 None
pub type Continuation = Box<dyn FnOnce(EditorPayload) -> Option<EditBatch> + Send>;

/// 一次挂起的编辑请求
pub struct EditorRequest {
    kind: EditorKind,
    /// 编辑器打开时显示的初始内容
    initial: Option<EditorPayload>,
    continuation: Continuation,
}

impl EditorRequest {
    pub fn new(kind: EditorKind, continuation: Continuation) -> Self {
        Self {
            kind,
            initial: None,
            continuation,
        }
    }

    pub fn with_initial(mut self, initial: EditorPayload) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn kind(&self) -> &EditorKind {
        &self.kind
    }

    pub fn initial(&self) -> Option<&EditorPayload> {
        self.initial.as_ref()
    }

    /// 用回传内容恢复
    pub fn resume(self, payload: EditorPayload) -> Option<EditBatch> {
        (self.continuation)(payload)
    }
}

/// 双击已有文本/表格时的编辑请求，回传内容替换原实体；其他图元返回 None
pub fn edit_entity_request(id: EntityId, geometry: &Geometry) -> Option<EditorRequest> {
    let initial = match geometry {
        Geometry::Text(t) => EditorPayload::Text(TextPayload {
            text: t.content.clone(),
            style: TextStyle {
                font: t.style.clone(),
                height: t.height,
                rotation: t.rotation,
                alignment: t.alignment,
                ..TextStyle::default()
            },
        }),
        Geometry::MText(m) => EditorPayload::Text(TextPayload {
            text: m.content.clone(),
            style: TextStyle {
                font: m.style.clone(),
                height: m.height,
                rotation: m.rotation,
                alignment: m.alignment,
                ..TextStyle::default()
            },
        }),
        Geometry::Table(t) => EditorPayload::Table(TablePayload {
            rows: t.rows(),
            cols: t.cols(),
            cells: t.cells.iter().map(|c| c.text.clone()).collect(),
            row_height: t.row_heights.first().copied().unwrap_or(8.0),
            col_width: t.column_widths.first().copied().unwrap_or(25.0),
            cell_style: t.cells.first().map(|c| c.style.clone()).unwrap_or_default(),
        }),
        _ => return None,
    };

    let source = geometry.clone();
    let continuation: Continuation = Box::new(move |payload| {
        let replaced = match (source, payload) {
            (Geometry::Text(t), EditorPayload::Text(p)) if !p.text.trim().is_empty() => {
                Geometry::Text(Text::from_style(t.position, p.text, &p.style))
            }
            (Geometry::MText(m), EditorPayload::Text(p)) if !p.text.trim().is_empty() => Geometry::MText(MText {
                width: m.width,
                line_spacing: m.line_spacing,
                ..MText::from_style(m.position, p.text, &p.style)
            }),
            (Geometry::Table(t), EditorPayload::Table(p)) => Geometry::Table(table_from_payload(t.position, p)?),
            _ => return None,
        };
        Some(EditBatch::modify(vec![(id, replaced)]))
    });
    Some(EditorRequest::new(EditorKind::EditEntity { id }, continuation).with_initial(initial))
}

/// 挂起状态
#[derive(Default)]
pub enum PendingInput {
    #[default]
    None,
    Awaiting(EditorRequest),
}

/// 编辑器会话
#[derive(Default)]
pub struct EditorSession {
    pending: PendingInput,
    /// 正在提交，防止重复提交
    submitting: bool,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.pending, PendingInput::Awaiting(_))
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn pending_kind(&self) -> Option<&EditorKind> {
        match &self.pending {
            PendingInput::Awaiting(req) => Some(req.kind()),
            PendingInput::None => None,
        }
    }

    pub fn pending_request(&self) -> Option<&EditorRequest> {
        match &self.pending {
            PendingInput::Awaiting(req) => Some(req),
            PendingInput::None => None,
        }
    }

    /// 打开编辑器；已有挂起请求时旧请求被丢弃
    pub fn open(&mut self, request: EditorRequest) -> Option<EditorRequest> {
        match std::mem::replace(&mut self.pending, PendingInput::Awaiting(request)) {
            PendingInput::Awaiting(old) => Some(old),
            PendingInput::None => None,
        }
    }

    /// 开始提交：取出挂起请求并设置提交标志
    pub fn begin_submit(&mut self) -> Option<EditorRequest> {
        if self.submitting {
            return None;
        }
        match std::mem::take(&mut self.pending) {
            PendingInput::Awaiting(req) => {
                self.submitting = true;
                Some(req)
            }
            PendingInput::None => None,
        }
    }

    /// 提交结束
    pub fn end_submit(&mut self) {
        self.submitting = false;
    }

    /// 关闭编辑器，丢弃续延
    pub fn close(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.pending = PendingInput::None;
        was_pending
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("pending", &self.pending_kind())
            .field("submitting", &self.submitting)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::geometry::{Geometry, Text};

    fn text_request() -> EditorRequest {
        let position = Point2::new(1.0, 2.0);
        EditorRequest::new(
            EditorKind::Text { position },
            Box::new(move |payload| match payload {
                EditorPayload::Text(t) => Some(EditBatch::create_one(Geometry::Text(Text::from_style(
                    position, t.text, &t.style,
                )))),
                EditorPayload::Table(_) => None,
            }),
        )
    }

    #[test]
    fn test_submit_runs_continuation_once() {
        let mut session = EditorSession::new();
        session.open(text_request());
        assert!(session.is_pending());

        let req = session.begin_submit().unwrap();
        assert!(session.is_submitting());
        // 提交过程中不能再次提交
        assert!(session.begin_submit().is_none());

        let batch = req.resume(EditorPayload::Text(TextPayload::new("hello"))).unwrap();
        assert_eq!(batch.create.len(), 1);
        session.end_submit();
        assert!(!session.is_pending());
        assert!(session.begin_submit().is_none());
    }

    #[test]
    fn test_close_discards_continuation() {
        let mut session = EditorSession::new();
        session.open(text_request());
        assert!(session.close());
        assert!(!session.close());
        assert!(session.begin_submit().is_none());
    }

    #[test]
    fn test_edit_entity_replaces_content() {
        let id = EntityId(7);
        let original = Geometry::Text(Text::new(Point2::new(4.0, 4.0), "旧", 5.0));
        let req = edit_entity_request(id, &original).unwrap();
        match req.initial() {
            Some(EditorPayload::Text(t)) => {
                assert_eq!(t.text, "旧");
                assert_eq!(t.style.height, 5.0);
            }
            other => panic!("unexpected {other:?}"),
        }

        let batch = req.resume(EditorPayload::Text(TextPayload::new("新"))).unwrap();
        assert_eq!(batch.modify.len(), 1);
        assert_eq!(batch.modify[0].0, id);
        assert!(matches!(&batch.modify[0].1, Geometry::Text(t) if t.content == "新" && t.position == Point2::new(4.0, 4.0)));

        let line = Geometry::Line(zdraft_core::geometry::Line::new(Point2::origin(), Point2::new(1.0, 0.0)));
        assert!(edit_entity_request(id, &line).is_none());
    }

    #[test]
    fn test_kind_accepts_payload() {
        let kind = EditorKind::Table { position: Point2::origin() };
        assert!(kind.accepts(&EditorPayload::Table(TablePayload::new(2, 2))));
        assert!(!kind.accepts(&EditorPayload::Text(TextPayload::new("x"))));
    }
}
