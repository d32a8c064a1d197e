//! Column Entity
//!
//! An ordered bucket of tasks. The order of `tasks` is the board order.

use serde::{Deserialize, Serialize};

use super::entity::{index_of, Entity};
use super::ids::{ColumnId, ProjectId, TaskId};
use super::task::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub project_id: ProjectId,
    /// Ordering key relative to sibling columns
    #[serde(default)]
    pub order_index: i32,
    /// Standard columns cannot be deleted
    #[serde(default)]
    pub is_protected: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(
        id: impl Into<ColumnId>,
        title: impl Into<String>,
        project_id: impl Into<ProjectId>,
        order_index: i32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            project_id: project_id.into(),
            order_index,
            is_protected: false,
            tasks: Vec::new(),
        }
    }

    pub fn protected(mut self) -> Self {
        self.is_protected = true;
        self
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self.reindex();
        self
    }

    /// Index of a task inside this column
    pub fn task_index(&self, task_id: &TaskId) -> Option<usize> {
        index_of(&self.tasks, task_id)
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == task_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Make every task's `position` equal its index and point it at this column
    pub fn reindex(&mut self) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.position = index;
            task.column_id = self.id.clone();
        }
    }

    /// Order tasks by their incoming `position` (stable), then reindex.
    ///
    /// Used on data from a full reload, where positions may have gaps.
    pub fn normalize(&mut self) {
        self.tasks.sort_by_key(|t| t.position);
        self.reindex();
    }
}

impl Entity for Column {
    type Id = ColumnId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
