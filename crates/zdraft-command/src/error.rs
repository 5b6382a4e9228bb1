//! 命令层错误定义

use thiserror::Error;
use zdraft_core::entity::EntityId;

/// 引擎拒绝请求时返回的错误
///
/// 这些错误不改变命令状态。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("No editor is waiting for input")]
    EditorNotPending,

    #[error("Editor submission already in progress")]
    AlreadySubmitting,

    #[error("Editor payload does not match the pending request")]
    PayloadMismatch,

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Entity {0} is locked")]
    EntityLocked(EntityId),
}
