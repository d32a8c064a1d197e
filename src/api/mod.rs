//! REST Client
//!
//! Implements the board's persistence services over the project API. Every
//! request carries the saved bearer token when there is one. Non-success
//! responses become [`ServiceError::Rejected`] with the server's `message`.

mod dto;

use async_trait::async_trait;
use kanban_core::{
    BoardCrudService, Column, ColumnId, ColumnPatch, ColumnService, MoveTaskDto, NewTask, ProjectId, ServiceError,
    ServiceResult, Task, TaskId,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config;
use dto::{ColumnDto, CreateColumnBody, ErrorBody, ProjectWithColumnsResponse, TaskDto, UpdateTaskBody};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, segments: &[&str]) -> String {
        build_url(&self.base_url, segments)
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        log::debug!("{method} {url}");
        let request = self.http.request(method, url);
        match config::auth_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ServiceResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(rejection(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ServiceResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

fn build_url(base_url: &str, segments: &[&str]) -> String {
    segments.iter().fold(base_url.to_string(), |mut url, segment| {
        url.push('/');
        url.extend(utf8_percent_encode(segment, SEGMENT));
        url
    })
}

/// Error for a non-success response; the body's `message` when it has one
fn rejection(status: u16, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_default();
    log::warn!("request rejected: status={status} message={message:?}");
    ServiceError::Rejected { status, message }
}

#[async_trait(?Send)]
impl ColumnService for RestClient {
    async fn move_task(&self, project_id: &ProjectId, task_id: &TaskId, dto: &MoveTaskDto) -> ServiceResult<Task> {
        let request = self
            .request(
                Method::PUT,
                &["projects", project_id.as_str(), "tasks", task_id.as_str(), "move"],
            )
            .json(dto);
        let task: TaskDto = self.send_json(request).await?;
        Ok(task.into_task(&dto.column_id, project_id, dto.position))
    }

    async fn fetch_columns(&self, project_id: &ProjectId) -> ServiceResult<Vec<Column>> {
        let request = self.request(Method::GET, &["projects", project_id.as_str(), "columns"]);
        let response: ProjectWithColumnsResponse = self.send_json(request).await?;
        Ok(response.into_columns())
    }
}

#[async_trait(?Send)]
impl BoardCrudService for RestClient {
    async fn create_column(&self, project_id: &ProjectId, title: &str) -> ServiceResult<Column> {
        let request = self
            .request(Method::POST, &["projects", project_id.as_str(), "columns"])
            .json(&CreateColumnBody { title });
        let column: ColumnDto = self.send_json(request).await?;
        Ok(column.into_column(project_id))
    }

    async fn update_column(&self, column_id: &ColumnId, patch: &ColumnPatch) -> ServiceResult<Column> {
        let request = self
            .request(Method::PUT, &["columns", column_id.as_str()])
            .json(patch);
        let column: ColumnDto = self.send_json(request).await?;
        Ok(column.into_column(&ProjectId::default()))
    }

    async fn delete_column(&self, column_id: &ColumnId) -> ServiceResult<()> {
        self.send(self.request(Method::DELETE, &["columns", column_id.as_str()]))
            .await
            .map(|_| ())
    }

    async fn create_task(&self, task: &NewTask) -> ServiceResult<Task> {
        let request = self.request(Method::POST, &["tasks"]).json(task);
        let created: TaskDto = self.send_json(request).await?;
        Ok(created.into_task(&task.column_id, &task.project_id, usize::MAX))
    }

    async fn update_task(&self, task: &Task) -> ServiceResult<Task> {
        let request = self
            .request(Method::PUT, &["tasks", task.id.as_str()])
            .json(&UpdateTaskBody::from(task));
        let updated: TaskDto = self.send_json(request).await?;
        Ok(updated.into_task(&task.column_id, &task.project_id, task.position))
    }

    async fn delete_task(&self, task_id: &TaskId) -> ServiceResult<()> {
        self.send(self.request(Method::DELETE, &["tasks", task_id.as_str()]))
            .await
            .map(|_| ())
    }
}
