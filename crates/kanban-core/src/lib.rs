//! Kanban Board Engine
//!
//! Layered like the rest of the app:
//! - domain: columns, tasks, typed ids, errors
//! - position / drag: drop-index math and the per-gesture drag session
//! - board: the board store and its single move path
//! - reconciler / actions: optimistic moves and request/response flows
//! - service: persistence interfaces implemented by the web client

pub mod actions;
pub mod board;
pub mod domain;
pub mod drag;
pub mod position;
pub mod reconciler;
pub mod service;

#[cfg(test)]
mod tests;

pub use board::{Board, BoardStore};
pub use domain::{Column, ColumnId, DomainError, DomainResult, Executor, ProjectId, Task, TaskId, TaskStatus};
pub use drag::{DragSession, DropRequest, DropTarget, DraggedTask, DRAG_THRESHOLD_PX};
pub use position::{drop_index, visible_boxes, BoundingBox};
pub use reconciler::{
    BoardHandle, FailurePolicy, MoveCommand, MoveFailure, MoveOutcome, MoveReconciler, PendingMove, MOVE_FAILED,
};
pub use service::{
    BoardCrudService, ColumnPatch, ColumnService, MoveTaskDto, NewTask, ServiceError, ServiceResult,
};
