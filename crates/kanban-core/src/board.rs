//! Board State Store
//!
//! Holds the committed (or optimistically committed) column layout for each
//! project. Every mutation is synchronous and either completes fully or
//! leaves the board untouched.

use std::collections::{HashMap, HashSet};

use crate::domain::{index_of, Column, ColumnId, DomainError, DomainResult, ProjectId, Task, TaskId};

/// Column layout of one project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    /// Build a board from columns as delivered by a full reload.
    ///
    /// A task id appearing more than once keeps only its first occurrence
    /// in column order.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let mut seen = HashSet::new();
        for column in &mut columns {
            column.normalize();
            let before = column.tasks.len();
            column.tasks.retain(|t| seen.insert(t.id.clone()));
            if column.tasks.len() != before {
                log::warn!(
                    "reload: dropped {} duplicate task(s) from column {}",
                    before - column.tasks.len(),
                    column.id
                );
                column.normalize();
            }
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Columns ordered by their `order_index` (stable for ties)
    pub fn sorted_columns(&self) -> Vec<&Column> {
        let mut sorted: Vec<&Column> = self.columns.iter().collect();
        sorted.sort_by_key(|c| c.order_index);
        sorted
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == column_id)
    }

    /// Column currently holding `task_id`
    pub fn column_of(&self, task_id: &TaskId) -> Option<&Column> {
        self.columns.iter().find(|c| c.task_index(task_id).is_some())
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.columns.iter().find_map(|c| c.task(task_id))
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    fn column_index(&self, column_id: &ColumnId) -> DomainResult<usize> {
        index_of(&self.columns, column_id)
            .ok_or_else(|| DomainError::NotFound(format!("column {column_id}")))
    }

    /// Move `task_id` from `source` to `target` at `index`.
    ///
    /// `index` is clamped to the target length after removal, so `usize::MAX`
    /// appends. Both columns are reindexed. Returns the moved task. On error
    /// the board is unchanged.
    pub fn move_task(
        &mut self,
        task_id: &TaskId,
        source: &ColumnId,
        target: &ColumnId,
        index: usize,
    ) -> DomainResult<Task> {
        let source_idx = self.column_index(source)?;
        let target_idx = self.column_index(target)?;
        let from = self.columns[source_idx].task_index(task_id).ok_or_else(|| {
            DomainError::NotFound(format!("task {task_id} in column {source}"))
        })?;

        let task = self.columns[source_idx].tasks.remove(from);
        let target_column = &mut self.columns[target_idx];
        let index = index.min(target_column.tasks.len());
        target_column.tasks.insert(index, task);
        target_column.reindex();
        if source_idx != target_idx {
            self.columns[source_idx].reindex();
        }

        Ok(self.columns[target_idx].tasks[index].clone())
    }

    // ========================
    // Column / Task CRUD
    // ========================

    pub fn add_column(&mut self, column: Column) -> DomainResult<()> {
        if index_of(&self.columns, &column.id).is_some() {
            return Err(DomainError::Conflict(format!("column {} already exists", column.id)));
        }
        let mut column = column;
        column.normalize();
        self.columns.push(column);
        Ok(())
    }

    /// Apply a title and/or ordering change; tasks are left alone
    pub fn update_column(
        &mut self,
        column_id: &ColumnId,
        title: Option<String>,
        order_index: Option<i32>,
    ) -> DomainResult<&Column> {
        let idx = self.column_index(column_id)?;
        let column = &mut self.columns[idx];
        if let Some(title) = title {
            column.title = title;
        }
        if let Some(order_index) = order_index {
            column.order_index = order_index;
        }
        Ok(&self.columns[idx])
    }

    /// Protected (standard) columns are refused
    pub fn remove_column(&mut self, column_id: &ColumnId) -> DomainResult<Column> {
        let idx = self.column_index(column_id)?;
        if self.columns[idx].is_protected {
            return Err(DomainError::Conflict(
                "Standard columns cannot be deleted.".to_string(),
            ));
        }
        Ok(self.columns.remove(idx))
    }

    /// Append a new task to the column named by its `column_id`
    pub fn add_task(&mut self, task: Task) -> DomainResult<&Task> {
        if self.task(&task.id).is_some() {
            return Err(DomainError::Conflict(format!("task {} already exists", task.id)));
        }
        let idx = self.column_index(&task.column_id)?;
        let column = &mut self.columns[idx];
        column.tasks.push(task);
        column.reindex();
        let last = column.tasks.len() - 1;
        Ok(&self.columns[idx].tasks[last])
    }

    /// Replace a task's content in place.
    ///
    /// The task keeps its current column and position; moving goes through
    /// [`Board::move_task`].
    pub fn update_task(&mut self, updated: Task) -> DomainResult<&Task> {
        let (col_idx, task_idx) = self
            .locate(&updated.id)
            .ok_or_else(|| DomainError::NotFound(format!("task {}", updated.id)))?;
        let slot = &mut self.columns[col_idx].tasks[task_idx];
        let column_id = slot.column_id.clone();
        let position = slot.position;
        *slot = Task { column_id, position, ..updated };
        Ok(&self.columns[col_idx].tasks[task_idx])
    }

    pub fn remove_task(&mut self, task_id: &TaskId) -> DomainResult<Task> {
        let (col_idx, task_idx) = self
            .locate(task_id)
            .ok_or_else(|| DomainError::NotFound(format!("task {task_id}")))?;
        let column = &mut self.columns[col_idx];
        let removed = column.tasks.remove(task_idx);
        column.reindex();
        Ok(removed)
    }

    fn locate(&self, task_id: &TaskId) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, c)| c.task_index(task_id).map(|ti| (ci, ti)))
    }
}

/// Boards for every loaded project, plus the UI-facing status slots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardStore {
    columns_by_project: HashMap<ProjectId, Board>,
    is_loading: bool,
    /// Load and column CRUD failures
    column_error: Option<String>,
    /// Move and task CRUD failures
    task_error: Option<String>,
    /// Bumped on every successful move
    move_seq: u64,
    /// Sequence number of each task's latest move
    last_moves: HashMap<TaskId, u64>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, project_id: &ProjectId) -> Option<&Board> {
        self.columns_by_project.get(project_id)
    }

    pub fn board_mut(&mut self, project_id: &ProjectId) -> Option<&mut Board> {
        self.columns_by_project.get_mut(project_id)
    }

    /// Board for `project_id`, or a "not loaded" error
    pub fn require_board_mut(&mut self, project_id: &ProjectId) -> DomainResult<&mut Board> {
        self.columns_by_project
            .get_mut(project_id)
            .ok_or_else(|| DomainError::NotFound(format!("board for project {project_id}")))
    }

    /// Columns of a project sorted by `order_index`; empty when not loaded
    pub fn sorted_columns(&self, project_id: &ProjectId) -> Vec<&Column> {
        self.board(project_id).map(Board::sorted_columns).unwrap_or_default()
    }

    /// Replace a project's board wholesale (full reload)
    pub fn replace_columns(&mut self, project_id: ProjectId, columns: Vec<Column>) {
        log::debug!("board reload: project={project_id} columns={}", columns.len());
        if let Some(old) = self.columns_by_project.get(&project_id) {
            for task in old.columns().iter().flat_map(|c| &c.tasks) {
                self.last_moves.remove(&task.id);
            }
        }
        self.columns_by_project.insert(project_id, Board::from_columns(columns));
    }

    /// The single move path used by the reconciler
    pub fn move_task(
        &mut self,
        project_id: &ProjectId,
        task_id: &TaskId,
        source: &ColumnId,
        target: &ColumnId,
        index: usize,
    ) -> DomainResult<Task> {
        let moved = self
            .require_board_mut(project_id)?
            .move_task(task_id, source, target, index)?;
        self.move_seq += 1;
        self.last_moves.insert(task_id.clone(), self.move_seq);
        Ok(moved)
    }

    /// Sequence number of the latest move of `task_id` since it was loaded
    pub fn move_generation(&self, task_id: &TaskId) -> Option<u64> {
        self.last_moves.get(task_id).copied()
    }

    // ========================
    // Status slots
    // ========================

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn column_error(&self) -> Option<&str> {
        self.column_error.as_deref()
    }

    pub fn task_error(&self) -> Option<&str> {
        self.task_error.as_deref()
    }

    pub fn set_column_error(&mut self, message: impl Into<String>) {
        self.column_error = Some(message.into());
    }

    pub fn set_task_error(&mut self, message: impl Into<String>) {
        self.task_error = Some(message.into());
    }

    pub fn clear_column_error(&mut self) {
        self.column_error = None;
    }

    pub fn clear_task_error(&mut self) {
        self.task_error = None;
    }

    /// First error to show in the banner, task errors taking precedence
    pub fn banner_message(&self) -> Option<&str> {
        self.task_error().or(self.column_error())
    }
}
