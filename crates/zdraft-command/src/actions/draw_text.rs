//! 单行/多行文字 Action
//!
//! 指定插入点后挂起，等待外部编辑器回传内容。

use crate::action::{Action, ActionContext, ActionResult, ActionType};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use crate::editor::{EditorKind, EditorPayload, EditorRequest};
use zdraft_core::geometry::{Geometry, MText, Text};
use zdraft_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    SetPosition,
    AwaitingEditor { position: Point2 },
}

/// 文字 Action
pub struct DrawTextAction {
    multi_line: bool,
    status: Status,
}

impl DrawTextAction {
    fn with_mode(multi_line: bool) -> Self {
        Self {
            multi_line,
            status: Status::SetPosition,
        }
    }

    /// TEXT
    pub fn single_line() -> Self {
        Self::with_mode(false)
    }

    /// MTEXT
    pub fn multi_line() -> Self {
        Self::with_mode(true)
    }

    fn request(&self, position: Point2) -> EditorRequest {
        let multi_line = self.multi_line;
        let kind = if multi_line {
            EditorKind::MText { position }
        } else {
            EditorKind::Text { position }
        };
        EditorRequest::new(
            kind,
            Box::new(move |payload| {
                let EditorPayload::Text(t) = payload else {
                    return None;
                };
                if t.text.trim().is_empty() {
                    return None;
                }
                let geometry = if multi_line {
                    Geometry::MText(MText::from_style(position, t.text, &t.style))
                } else {
                    Geometry::Text(Text::from_style(position, t.text, &t.style))
                };
                Some(EditBatch::create_one(geometry))
            }),
        )
    }
}

impl Default for DrawTextAction {
    fn default() -> Self {
        Self::single_line()
    }
}

impl Action for DrawTextAction {
    fn action_type(&self) -> ActionType {
        if self.multi_line {
            ActionType::MText
        } else {
            ActionType::Text
        }
    }

    fn reset(&mut self) {
        self.status = Status::SetPosition;
    }

    fn step(&self) -> u32 {
        match self.status {
            Status::SetPosition => 1,
            Status::AwaitingEditor { .. } => 2,
        }
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, coord: Point2) -> ActionResult {
        match self.status {
            Status::SetPosition => {
                self.status = Status::AwaitingEditor { position: coord };
                ActionResult::AwaitEditor(self.request(coord))
            }
            Status::AwaitingEditor { .. } => ActionResult::ignored("waiting for the text editor"),
        }
    }

    fn on_enter(&mut self, _ctx: &ActionContext) -> ActionResult {
        match self.status {
            Status::SetPosition => ActionResult::Done,
            Status::AwaitingEditor { .. } => ActionResult::ignored("waiting for the text editor"),
        }
    }

    fn temp_points(&self) -> Vec<Point2> {
        match self.status {
            Status::AwaitingEditor { position } => vec![position],
            Status::SetPosition => vec![],
        }
    }

    fn state(&self) -> CommandState {
        match self.status {
            Status::SetPosition => CommandState::Text {
                position: None,
                awaiting_editor: false,
            },
            Status::AwaitingEditor { position } => CommandState::Text {
                position: Some(position),
                awaiting_editor: true,
            },
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetPosition => "指定文字的起点:",
            Status::AwaitingEditor { .. } => "输入文字:",
        }
        .into()
    }
}
