//! Move Reconciler
//!
//! Bridges a finished drop gesture to persistence with optimistic-update
//! semantics. One move runs through three steps:
//!
//! 1. [`MoveReconciler::apply`] mutates the store synchronously at drop time.
//! 2. [`MoveReconciler::persist`] awaits the persistence service. The store is
//!    not borrowed across this await.
//! 3. [`MoveReconciler::resolve`] records the outcome in the store.
//!
//! Because step 1 runs at drop time, moves of the same task land in the
//! store in drop order regardless of how their requests resolve.

use std::cell::RefCell;
use std::rc::Rc;

use crate::board::BoardStore;
use crate::domain::{ColumnId, ProjectId, Task, TaskId};
use crate::drag::DropRequest;
use crate::service::{ColumnService, MoveTaskDto};

/// Fallback message when the service gives none
pub const MOVE_FAILED: &str = "Failed to move task.";

/// What to do with the optimistic layout when persistence fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep the moved layout and show the error; a later reload resyncs
    #[default]
    KeepOptimistic,
    /// Put the task back where it was, unless a newer move already moved it
    RollbackOnFailure,
}

/// A move to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub source_column_id: ColumnId,
    pub target_column_id: ColumnId,
    /// `None` appends to the end of the target column
    pub target_index: Option<usize>,
}

impl MoveCommand {
    pub fn from_drop(project_id: ProjectId, drop: DropRequest) -> Self {
        Self {
            project_id,
            task_id: drop.task_id,
            source_column_id: drop.source_column_id,
            target_column_id: drop.target_column_id,
            target_index: drop.target_index,
        }
    }
}

/// A move applied to the store whose persistence is not yet confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub project_id: ProjectId,
    pub task_id: TaskId,
    pub source_column_id: ColumnId,
    /// Index the task had in its source column before the move
    pub origin_index: usize,
    /// What gets sent to the service
    pub dto: MoveTaskDto,
    /// The task as it sits in the store after the optimistic move
    pub optimistic: Task,
    /// Store move generation of the task right after this move
    pub generation: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveFailure {
    pub task_id: TaskId,
    pub message: String,
    /// Set when the optimistic move had been applied before the failure
    pub pending: Option<PendingMove>,
}

/// Where a move attempt stands
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Store updated, persistence outstanding
    Applied(PendingMove),
    /// Service confirmed the move
    Succeeded { pending: PendingMove, confirmed: Task },
    Failed(MoveFailure),
}

impl MoveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, MoveOutcome::Succeeded { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            MoveOutcome::Failed(failure) => Some(&failure.message),
            _ => None,
        }
    }
}

/// Shared, single-threaded access to a [`BoardStore`].
///
/// Each call is one synchronous mutation; implementations must not hold the
/// store across an await.
pub trait BoardHandle {
    fn update<R>(&self, f: impl FnOnce(&mut BoardStore) -> R) -> R;
}

impl BoardHandle for RefCell<BoardStore> {
    fn update<R>(&self, f: impl FnOnce(&mut BoardStore) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

impl<H: BoardHandle> BoardHandle for Rc<H> {
    fn update<R>(&self, f: impl FnOnce(&mut BoardStore) -> R) -> R {
        (**self).update(f)
    }
}

/// Runs moves against a [`ColumnService`]
#[derive(Debug, Clone)]
pub struct MoveReconciler<S> {
    service: S,
    policy: FailurePolicy,
}

impl<S: ColumnService> MoveReconciler<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Apply the move to the store right away.
    ///
    /// Returns [`MoveOutcome::Applied`] or, when the task or a column is not
    /// where the command says, [`MoveOutcome::Failed`] with the store
    /// untouched apart from the error slot.
    pub fn apply(&self, store: &mut BoardStore, command: MoveCommand) -> MoveOutcome {
        let MoveCommand {
            project_id,
            task_id,
            source_column_id,
            target_column_id,
            target_index,
        } = command;

        let origin_index = store
            .board(&project_id)
            .and_then(|b| b.column(&source_column_id))
            .and_then(|c| c.task_index(&task_id));
        let index = target_index.unwrap_or(usize::MAX);

        let moved = store.move_task(&project_id, &task_id, &source_column_id, &target_column_id, index);
        match moved {
            Ok(task) => {
                let origin_index = origin_index.unwrap_or(task.position);
                log::debug!(
                    "move applied: task={task_id} {source_column_id}[{origin_index}] -> {target_column_id}[{}]",
                    task.position
                );
                store.clear_task_error();
                let generation = store.move_generation(&task_id);
                MoveOutcome::Applied(PendingMove {
                    generation,
                    dto: MoveTaskDto {
                        column_id: target_column_id,
                        position: task.position,
                    },
                    project_id,
                    task_id,
                    source_column_id,
                    origin_index,
                    optimistic: task,
                })
            }
            Err(err) => {
                let message = format!("{MOVE_FAILED} {err}");
                log::warn!("move rejected locally: task={task_id}: {err}");
                store.set_task_error(message.clone());
                MoveOutcome::Failed(MoveFailure {
                    task_id,
                    message,
                    pending: None,
                })
            }
        }
    }

    /// Issue the persistence request for an applied move
    pub async fn persist(&self, pending: PendingMove) -> MoveOutcome {
        match self
            .service
            .move_task(&pending.project_id, &pending.task_id, &pending.dto)
            .await
        {
            Ok(confirmed) => MoveOutcome::Succeeded { pending, confirmed },
            Err(err) => {
                let message = err.message_or(MOVE_FAILED);
                log::warn!("move persistence failed: task={}: {message}", pending.task_id);
                MoveOutcome::Failed(MoveFailure {
                    task_id: pending.task_id.clone(),
                    message,
                    pending: Some(pending),
                })
            }
        }
    }

    /// Record a finished move in the store
    pub fn resolve(&self, store: &mut BoardStore, outcome: &MoveOutcome) {
        match outcome {
            MoveOutcome::Applied(_) => {}
            MoveOutcome::Succeeded { pending, .. } => {
                log::debug!("move confirmed: task={}", pending.task_id);
                store.clear_task_error();
            }
            MoveOutcome::Failed(failure) => {
                store.set_task_error(failure.message.clone());
                if self.policy == FailurePolicy::RollbackOnFailure {
                    if let Some(pending) = &failure.pending {
                        rollback(store, pending);
                    }
                }
            }
        }
    }

    /// Full protocol: apply, persist, resolve
    pub async fn move_task<H: BoardHandle>(&self, handle: &H, command: MoveCommand) -> MoveOutcome {
        let applied = handle.update(|store| self.apply(store, command));
        let MoveOutcome::Applied(pending) = applied else {
            return applied;
        };
        let outcome = self.persist(pending).await;
        handle.update(|store| self.resolve(store, &outcome));
        outcome
    }
}

/// Undo an optimistic move unless the task was moved or reloaded since.
///
/// Moves of other tasks may shift its position; that does not count.
fn rollback(store: &mut BoardStore, pending: &PendingMove) {
    let untouched = pending.generation.is_some()
        && store.move_generation(&pending.task_id) == pending.generation;
    if !untouched {
        log::debug!("rollback skipped: task={} moved again since", pending.task_id);
        return;
    }
    if let Err(err) = store.move_task(
        &pending.project_id,
        &pending.task_id,
        &pending.dto.column_id,
        &pending.source_column_id,
        pending.origin_index,
    ) {
        log::warn!("rollback failed: task={}: {err}", pending.task_id);
    }
}
