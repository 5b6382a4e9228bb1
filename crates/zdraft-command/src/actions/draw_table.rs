//! 表格 Action：指定插入点后挂起，等待表格编辑器回传行列与单元内容

use crate::action::{Action, ActionContext, ActionResult, ActionType};
use crate::command_state::CommandState;
use crate::document::EditBatch;
use crate::editor::{EditorKind, EditorPayload, EditorRequest, TablePayload};
use zdraft_core::geometry::{Geometry, Table};
use zdraft_core::math::Point2;

/// 按回传内容生成表格，行数或列数为零时返回 None
pub(crate) fn table_from_payload(position: Point2, payload: TablePayload) -> Option<Table> {
    if payload.rows == 0 || payload.cols == 0 {
        return None;
    }
    let mut table = Table::new(position, payload.rows, payload.cols, payload.row_height, payload.col_width);
    for (index, text) in payload.cells.into_iter().enumerate() {
        // 多出的单元忽略
        let Some(cell) = table.cell_mut(index / payload.cols, index % payload.cols) else {
            break;
        };
        cell.text = text;
    }
    for cell in &mut table.cells {
        cell.style = payload.cell_style.clone();
    }
    Some(table)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    SetPosition,
    AwaitingEditor { position: Point2 },
}

/// 表格 Action
pub struct DrawTableAction {
    status: Status,
}

impl DrawTableAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetPosition,
        }
    }
}

impl Default for DrawTableAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawTableAction {
    fn action_type(&self) -> ActionType {
        ActionType::Table
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
        if self.status != Status::SetPosition {
            return ActionResult::ignored("waiting for the table editor");
        }
        self.status = Status::AwaitingEditor { position: coord };
        let request = EditorRequest::new(
            EditorKind::Table { position: coord },
            Box::new(move |payload| match payload {
                EditorPayload::Table(t) => {
                    table_from_payload(coord, t).map(|table| EditBatch::create_one(Geometry::Table(table)))
                }
                EditorPayload::Text(_) => None,
            }),
        )
        .with_initial(EditorPayload::Table(TablePayload::new(3, 3)));
        ActionResult::AwaitEditor(request)
    }

    fn on_enter(&mut self, _ctx: &ActionContext) -> ActionResult {
        match self.status {
            Status::SetPosition => ActionResult::Done,
            Status::AwaitingEditor { .. } => ActionResult::ignored("waiting for the table editor"),
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
            Status::SetPosition => CommandState::Table {
                position: None,
                awaiting_editor: false,
            },
            Status::AwaitingEditor { position } => CommandState::Table {
                position: Some(position),
                awaiting_editor: true,
            },
        }
    }

    fn prompt(&self) -> String {
        match self.status {
            Status::SetPosition => "指定插入点:",
            Status::AwaitingEditor { .. } => "编辑表格:",
        }
        .into()
    }
}
