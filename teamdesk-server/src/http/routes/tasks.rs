//! Task endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use teamdesk_core::models::{required_text, RelatedKind, TaskPriority, TaskStatus, MAX_SHORT_TEXT};
use teamdesk_core::ValidationError;

use crate::db::{NewTask, Person, Related, Task, TaskRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{parse_date, ApiJson, LooseId};
use crate::http::server::AppState;

/// Task as stored, plus the nested shapes the task board renders
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: Task,
    pub assigned_to: Person,
    pub related_to: Option<Related>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            assigned_to: task.assignee(),
            related_to: task.related(),
            task,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RelatedRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: LooseId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "due_date")]
    pub due_date: Option<String>,
    #[serde(alias = "related_to")]
    pub related_to: Option<RelatedRequest>,
}

impl CreateTaskRequest {
    fn into_new_task(self, assignee: Person) -> Result<NewTask, ValidationError> {
        let related = match self.related_to {
            Some(r) => Some((
                RelatedKind::parse(r.kind.trim())?,
                required_text("relatedTo.id", &r.id.into_text(), MAX_SHORT_TEXT)?,
                required_text("relatedTo.name", &r.name, MAX_SHORT_TEXT)?,
            )),
            None => None,
        };

        Ok(NewTask {
            title: required_text("title", self.title.as_deref().unwrap_or_default(), MAX_SHORT_TEXT)?,
            priority: match self.priority.as_deref().map(str::trim) {
                None | Some("") => TaskPriority::Medium,
                Some(p) => TaskPriority::parse(p)?,
            },
            status: match self.status.as_deref().map(str::trim) {
                None | Some("") => TaskStatus::ToDo,
                Some(s) => TaskStatus::parse(s)?,
            },
            due_date: self
                .due_date
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(|d| parse_date("dueDate", d))
                .transpose()?,
            assignee,
            related,
        })
    }
}

/// GET /tasks
async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = TaskRepo::new(&state.pool).list().await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// POST /tasks
async fn create_task(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let task = TaskRepo::new(&state.pool)
        .create(req.into_new_task(state.default_owner())?)
        .await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Task routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/tasks", get(list_tasks).post(create_task))
}
