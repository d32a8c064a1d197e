//! Drag Session Tracking
//!
//! Ephemeral state for one drag gesture: which task is being dragged, and
//! which column/index it would land in if released now. Nothing here touches
//! the board; cancelling a gesture only clears this state.

use crate::domain::{ColumnId, TaskId};
use crate::position::{drop_index, BoundingBox};

/// Movement threshold in pixels before a press becomes a drag
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// The task being dragged and the column it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggedTask {
    pub task_id: TaskId,
    pub source_column_id: ColumnId,
}

/// Column and insertion index currently under the pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub column_id: ColumnId,
    pub index: usize,
}

/// Everything the reconciler needs to carry out a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRequest {
    pub task_id: TaskId,
    pub source_column_id: ColumnId,
    pub target_column_id: ColumnId,
    /// `None` when no drag-over was tracked for the target column (append)
    pub target_index: Option<usize>,
}

/// Mouse pressed on a card, drag not started yet
#[derive(Debug, Clone, PartialEq)]
struct PendingPress {
    task: DraggedTask,
    start_x: f64,
    start_y: f64,
}

/// Drag state for a single gesture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    pending: Option<PendingPress>,
    dragged: Option<DraggedTask>,
    /// Column and index live and die together
    target: Option<DropTarget>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press on a card; the drag begins once the pointer moves
    /// further than [`DRAG_THRESHOLD_PX`].
    pub fn press(&mut self, task_id: TaskId, source_column_id: ColumnId, x: f64, y: f64) {
        if self.dragged.is_some() {
            return;
        }
        self.pending = Some(PendingPress {
            task: DraggedTask { task_id, source_column_id },
            start_x: x,
            start_y: y,
        });
    }

    /// Feed pointer movement. Returns `true` when this call started the drag.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        if self.dragged.is_some() {
            return false;
        }
        let Some(pending) = &self.pending else {
            return false;
        };
        let dx = (x - pending.start_x).abs();
        let dy = (y - pending.start_y).abs();
        if dx <= DRAG_THRESHOLD_PX && dy <= DRAG_THRESHOLD_PX {
            return false;
        }
        let task = pending.task.clone();
        self.begin_drag(task.task_id, task.source_column_id);
        true
    }

    /// Start dragging `task_id` out of `source_column_id`
    pub fn begin_drag(&mut self, task_id: TaskId, source_column_id: ColumnId) {
        log::debug!("drag start: task={task_id} from column={source_column_id}");
        self.pending = None;
        self.target = None;
        self.dragged = Some(DraggedTask { task_id, source_column_id });
    }

    /// Recompute the drop target for a pointer over `column_id`.
    ///
    /// `visible` must already exclude the dragged card. Ignored when no drag
    /// is in progress. Returns the computed index.
    pub fn update_target(
        &mut self,
        column_id: &ColumnId,
        pointer_y: f64,
        visible: &[BoundingBox],
    ) -> Option<usize> {
        self.dragged.as_ref()?;
        let index = drop_index(pointer_y, visible);
        self.target = Some(DropTarget { column_id: column_id.clone(), index });
        Some(index)
    }

    /// Pointer left every column
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Clear everything; used for both completed drops and cancellations
    pub fn end_drag(&mut self) {
        if let Some(dragged) = &self.dragged {
            log::debug!("drag end: task={}", dragged.task_id);
        }
        self.pending = None;
        self.dragged = None;
        self.target = None;
    }

    /// Finish the gesture with a drop and hand back the move to perform.
    ///
    /// `hovered` is the column the release happened over, if the view knows
    /// it; otherwise the tracked target column is used. The tracked index is
    /// only used when it belongs to the column being dropped on. Returns
    /// `None` (a cancellation) when nothing is being dragged or there is no
    /// column to drop on. The session is cleared either way.
    pub fn drop_on(&mut self, hovered: Option<&ColumnId>) -> Option<DropRequest> {
        let dragged = self.dragged.take();
        let target = self.target.take();
        self.pending = None;

        let dragged = dragged?;
        let target_column_id = match (hovered, &target) {
            (Some(column), _) => column.clone(),
            (None, Some(t)) => t.column_id.clone(),
            (None, None) => {
                log::debug!("drop outside any column: task={} cancelled", dragged.task_id);
                return None;
            }
        };
        let target_index = target
            .filter(|t| t.column_id == target_column_id)
            .map(|t| t.index);

        Some(DropRequest {
            task_id: dragged.task_id,
            source_column_id: dragged.source_column_id,
            target_column_id,
            target_index,
        })
    }

    // ========================
    // Selectors
    // ========================

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dragged(&self) -> Option<&DraggedTask> {
        self.dragged.as_ref()
    }

    pub fn dragged_task_id(&self) -> Option<&TaskId> {
        self.dragged.as_ref().map(|d| &d.task_id)
    }

    pub fn target(&self) -> Option<&DropTarget> {
        self.target.as_ref()
    }

    pub fn is_target_column(&self, column_id: &ColumnId) -> bool {
        self.target.as_ref().is_some_and(|t| &t.column_id == column_id)
    }

    /// Index at which to draw the drop indicator in `column_id`, if any
    pub fn indicator_index(&self, column_id: &ColumnId) -> Option<usize> {
        self.target
            .as_ref()
            .filter(|t| &t.column_id == column_id)
            .map(|t| t.index)
    }
}
