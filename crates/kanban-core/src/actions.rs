//! Board Actions
//!
//! Request/response flows that are not moves: full reload and column/task
//! CRUD. Unlike moves these are pessimistic; the store changes only after the
//! service answers. Failures land in the matching error slot.

use crate::domain::{ColumnId, DomainError, ProjectId, Task, TaskId};
use crate::reconciler::BoardHandle;
use crate::service::{BoardCrudService, ColumnPatch, ColumnService, NewTask};

pub const LOAD_FAILED: &str = "Failed to load columns.";
pub const CREATE_COLUMN_FAILED: &str = "Failed to create column.";
pub const UPDATE_COLUMN_FAILED: &str = "Failed to update column.";
pub const DELETE_COLUMN_FAILED: &str = "Failed to delete column. Standard columns cannot be deleted.";
pub const CREATE_TASK_FAILED: &str = "Failed to create task.";
pub const UPDATE_TASK_FAILED: &str = "Failed to update task.";
pub const DELETE_TASK_FAILED: &str = "Failed to delete task.";

/// Replace a project's board with the server's layout.
///
/// This is the only way to get back to server truth after a failed move.
/// Returns whether the reload succeeded.
pub async fn reload_board<S, H>(service: &S, handle: &H, project_id: &ProjectId) -> bool
where
    S: ColumnService + ?Sized,
    H: BoardHandle,
{
    handle.update(|store| {
        store.set_loading(true);
        store.clear_column_error();
    });
    match service.fetch_columns(project_id).await {
        Ok(columns) => {
            handle.update(|store| {
                store.replace_columns(project_id.clone(), columns);
                store.set_loading(false);
            });
            true
        }
        Err(err) => {
            let message = err.message_or(LOAD_FAILED);
            log::warn!("board reload failed: project={project_id}: {message}");
            handle.update(|store| {
                store.set_loading(false);
                store.set_column_error(message);
            });
            false
        }
    }
}

pub async fn create_column<S, H>(service: &S, handle: &H, project_id: &ProjectId, title: &str) -> bool
where
    S: BoardCrudService + ?Sized,
    H: BoardHandle,
{
    match service.create_column(project_id, title).await {
        Ok(column) => handle.update(|store| {
            let added = store
                .require_board_mut(project_id)
                .and_then(|board| board.add_column(column));
            match added {
                Ok(()) => {
                    store.clear_column_error();
                    true
                }
                Err(err) => {
                    store.set_column_error(format!("{CREATE_COLUMN_FAILED} {err}"));
                    false
                }
            }
        }),
        Err(err) => {
            handle.update(|store| store.set_column_error(err.message_or(CREATE_COLUMN_FAILED)));
            false
        }
    }
}

pub async fn update_column<S, H>(
    service: &S,
    handle: &H,
    project_id: &ProjectId,
    column_id: &ColumnId,
    patch: ColumnPatch,
) -> bool
where
    S: BoardCrudService + ?Sized,
    H: BoardHandle,
{
    match service.update_column(column_id, &patch).await {
        Ok(column) => handle.update(|store| {
            let updated = store.require_board_mut(project_id).and_then(|board| {
                board
                    .update_column(&column.id, Some(column.title), Some(column.order_index))
                    .map(|_| ())
            });
            match updated {
                Ok(()) => {
                    store.clear_column_error();
                    true
                }
                Err(err) => {
                    store.set_column_error(format!("{UPDATE_COLUMN_FAILED} {err}"));
                    false
                }
            }
        }),
        Err(err) => {
            handle.update(|store| store.set_column_error(err.message_or(UPDATE_COLUMN_FAILED)));
            false
        }
    }
}

/// Delete a column. Protected columns are refused without a request.
pub async fn delete_column<S, H>(
    service: &S,
    handle: &H,
    project_id: &ProjectId,
    column_id: &ColumnId,
) -> bool
where
    S: BoardCrudService + ?Sized,
    H: BoardHandle,
{
    let protected = handle.update(|store| {
        store
            .board(project_id)
            .and_then(|b| b.column(column_id))
            .is_some_and(|c| c.is_protected)
    });
    if protected {
        handle.update(|store| store.set_column_error(DELETE_COLUMN_FAILED));
        return false;
    }

    match service.delete_column(column_id).await {
        Ok(()) => handle.update(|store| {
            let removed = store
                .require_board_mut(project_id)
                .and_then(|board| board.remove_column(column_id));
            match removed {
                Ok(_) | Err(DomainError::NotFound(_)) => {
                    store.clear_column_error();
                    true
                }
                Err(err) => {
                    store.set_column_error(err.to_string());
                    false
                }
            }
        }),
        Err(err) => {
            handle.update(|store| store.set_column_error(err.message_or(DELETE_COLUMN_FAILED)));
            false
        }
    }
}

pub async fn create_task<S, H>(service: &S, handle: &H, new_task: &NewTask) -> bool
where
    S: BoardCrudService + ?Sized,
    H: BoardHandle,
{
    match service.create_task(new_task).await {
        Ok(task) => handle.update(|store| {
            let added = store
                .require_board_mut(&new_task.project_id)
                .and_then(|board| board.add_task(task).map(|_| ()));
            match added {
                Ok(()) => {
                    store.clear_task_error();
                    true
                }
                Err(err) => {
                    store.set_task_error(format!("{CREATE_TASK_FAILED} {err}"));
                    false
                }
            }
        }),
        Err(err) => {
            handle.update(|store| store.set_task_error(err.message_or(CREATE_TASK_FAILED)));
            false
        }
    }
}

pub async fn update_task<S, H>(service: &S, handle: &H, task: &Task) -> bool
where
    S: BoardCrudService + ?Sized,
    H: BoardHandle,
{
    match service.update_task(task).await {
        Ok(updated) => handle.update(|store| {
            let project_id = updated.project_id.clone();
            let applied = store
                .require_board_mut(&project_id)
                .and_then(|board| board.update_task(updated).map(|_| ()));
            match applied {
                Ok(()) => {
                    store.clear_task_error();
                    true
                }
                Err(err) => {
                    store.set_task_error(format!("{UPDATE_TASK_FAILED} {err}"));
                    false
                }
            }
        }),
        Err(err) => {
            handle.update(|store| store.set_task_error(err.message_or(UPDATE_TASK_FAILED)));
            false
        }
    }
}

pub async fn delete_task<S, H>(service: &S, handle: &H, project_id: &ProjectId, task_id: &TaskId) -> bool
where
    S: BoardCrudService + ?Sized,
    H: BoardHandle,
{
    match service.delete_task(task_id).await {
        Ok(()) => handle.update(|store| {
            let removed = store
                .require_board_mut(project_id)
                .and_then(|board| board.remove_task(task_id));
            match removed {
                // Already gone locally is fine
                Ok(_) | Err(DomainError::NotFound(_)) => {
                    store.clear_task_error();
                    true
                }
                Err(err) => {
                    log::warn!("delete task: local removal failed: task={task_id}: {err}");
                    store.set_task_error(err.to_string());
                    false
                }
            }
        }),
        Err(err) => {
            handle.update(|store| store.set_task_error(err.message_or(DELETE_TASK_FAILED)));
            false
        }
    }
}
