//! REST Wire Types
//!
//! Shapes exchanged with the project API and their mapping onto the board
//! model. Server data is loose (most fields optional); the mapping fills the
//! gaps so the board only ever sees complete columns and tasks.

use chrono::{DateTime, NaiveDate, Utc};
use kanban_core::{Column, ColumnId, Executor, ProjectId, Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

// ========================
// Responses
// ========================

/// `GET /projects/{id}/columns`; owner details are not needed here
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectWithColumnsResponse {
    pub id: String,
    #[serde(default)]
    pub columns: Vec<ColumnDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDto {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub order_index: Option<i32>,
    /// Older payloads send `order` instead of `orderIndex`
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub is_protected: Option<bool>,
    #[serde(default)]
    pub tasks: Option<Vec<TaskDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorDto {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub project: Option<IdRef>,
    #[serde(default)]
    pub column: Option<IdRef>,
    #[serde(default)]
    pub executors: Vec<ExecutorDto>,
    #[serde(default)]
    pub position: Option<usize>,
}

/// Error body the API sends with non-success statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ========================
// Requests
// ========================

#[derive(Debug, Clone, Serialize)]
pub struct CreateColumnBody<'a> {
    pub title: &'a str,
}

/// `PUT /tasks/{id}` body; column and position are owned by moves
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub due_date: Option<String>,
    pub status: TaskStatus,
}

impl<'a> From<&'a Task> for UpdateTaskBody<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            title: &task.title,
            description: task.description.as_deref(),
            due_date: task.due_date.map(|d| d.to_rfc3339()),
            status: task.status,
        }
    }
}

// ========================
// Mapping
// ========================

impl ColumnDto {
    /// Board column for `project_id`; task order follows `position` when
    /// the server sends one, else the payload order
    pub fn into_column(self, project_id: &ProjectId) -> Column {
        let project_id = self
            .project_id
            .filter(|id| !id.is_empty())
            .map(ProjectId::new)
            .unwrap_or_else(|| project_id.clone());
        let column_id = ColumnId::new(self.id);
        let tasks = self
            .tasks
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, dto)| dto.into_task(&column_id, &project_id, i))
            .collect();

        let mut column = Column::new(
            column_id,
            self.title,
            project_id,
            self.order_index.or(self.order).unwrap_or_default(),
        );
        column.is_protected = self.is_protected.unwrap_or(false);
        column.tasks = tasks;
        column
    }
}

impl TaskDto {
    /// Board task; `column_id` and `fallback_position` apply when the payload
    /// omits them
    pub fn into_task(self, column_id: &ColumnId, project_id: &ProjectId, fallback_position: usize) -> Task {
        let due_date = self.due_date.as_deref().and_then(parse_due_date);
        let project_id = self
            .project
            .map(|p| ProjectId::new(p.id))
            .unwrap_or_else(|| project_id.clone());
        let column_id = self
            .column
            .map(|c| ColumnId::new(c.id))
            .unwrap_or_else(|| column_id.clone());

        Task {
            id: TaskId::new(self.id),
            title: self.title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            due_date,
            status: self.status.unwrap_or_default(),
            column_id,
            project_id,
            position: self.position.unwrap_or(fallback_position),
            executors: self
                .executors
                .into_iter()
                .map(|e| Executor { id: e.id, full_name: e.full_name, email: e.email })
                .collect(),
        }
    }
}

impl ProjectWithColumnsResponse {
    pub fn into_columns(self) -> Vec<Column> {
        let project_id = ProjectId::new(self.id);
        self.columns
            .into_iter()
            .map(|c| c.into_column(&project_id))
            .collect()
    }
}

/// RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC)
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(err) => {
            log::warn!("ignoring unparseable due date {raw:?}: {err}");
            None
        }
    }
}
