//! Persistence Collaborators
//!
//! Abstract interfaces the engine calls out to. The web client implements
//! them over REST; tests use in-memory fakes.
//!
//! Futures are `?Send`: the board runs on a single-threaded event loop and
//! browser fetch futures are not `Send`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Column, ColumnId, ProjectId, Task, TaskId, TaskStatus};

/// Failure reported by a persistence service.
///
/// `Display` is the bare human-readable message so it can go straight into
/// the UI error slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Request never completed (offline, DNS, CORS, ...)
    #[error("{0}")]
    Transport(String),
    /// Server answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// Response body did not match the expected shape
    #[error("{0}")]
    Decode(String),
}

impl ServiceError {
    /// The error text, or `fallback` when the service gave no message
    pub fn message_or(&self, fallback: &str) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            fallback.to_string()
        } else {
            text
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Move request body: `{ "columnId": ..., "position": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskDto {
    pub column_id: ColumnId,
    pub position: usize,
}

/// Moves and full reloads
#[async_trait(?Send)]
pub trait ColumnService {
    /// Persist a task move; resolves with the server's copy of the task
    async fn move_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        dto: &MoveTaskDto,
    ) -> ServiceResult<Task>;

    /// Full column layout of a project
    async fn fetch_columns(&self, project_id: &ProjectId) -> ServiceResult<Vec<Column>>;
}

/// Fields for a new task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    pub column_id: ColumnId,
    pub project_id: ProjectId,
}

/// Partial column update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

/// Plain request/response CRUD for columns and tasks
#[async_trait(?Send)]
pub trait BoardCrudService {
    async fn create_column(&self, project_id: &ProjectId, title: &str) -> ServiceResult<Column>;

    async fn update_column(&self, column_id: &ColumnId, patch: &ColumnPatch) -> ServiceResult<Column>;

    async fn delete_column(&self, column_id: &ColumnId) -> ServiceResult<()>;

    async fn create_task(&self, task: &NewTask) -> ServiceResult<Task>;

    async fn update_task(&self, task: &Task) -> ServiceResult<Task>;

    async fn delete_task(&self, task_id: &TaskId) -> ServiceResult<()>;
}
