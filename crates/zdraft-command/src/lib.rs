//! ZDraft 交互式绘图命令引擎
//!
//! 把指针点击、键入值和关键字转换为实体和编辑。每个命令是一个 [`Action`]，
//! 由 [`CommandEngine`] 驱动，完成时整批写入 [`Document`]。
//!
//! ```rust
//! use zdraft_command::{ActionType, CommandEngine};
//!
//! let mut engine = CommandEngine::default();
//! engine.start_command(ActionType::DrawLine);
//! engine.handle_value_input("0,0");
//! engine.handle_value_input("@10,0");
//! engine.handle_value_input("");
//!
//! assert_eq!(engine.document().len(), 1);
//! assert!(engine.is_idle());
//! ```

pub mod action;
pub mod actions;
pub mod command_registry;
pub mod command_state;
pub mod document;
pub mod editor;
pub mod engine;
pub mod error;
pub mod selection;
pub mod throttle;

pub use action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
pub use actions::create_action;
pub use command_registry::CommandRegistry;
pub use command_state::CommandState;
pub use document::{BatchOutcome, Document, EditBatch};
pub use editor::{EditorKind, EditorPayload, EditorRequest, EditorSession, PendingInput, TablePayload, TextPayload};
pub use engine::{CommandEngine, CommandSnapshot};
pub use error::CommandError;
pub use selection::SelectionSet;
pub use throttle::MoveThrottle;
