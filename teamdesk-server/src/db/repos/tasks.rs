//! Task repository

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use teamdesk_core::models::{RelatedKind, TaskPriority, TaskStatus};

use super::{DbError, Person};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub priority: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub assignee_name: String,
    pub assignee_avatar: String,
    pub related_type: Option<String>,
    pub related_id: Option<String>,
    pub related_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What a task points at (a lead or a deal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Related {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub name: String,
}

impl Task {
    pub fn assignee(&self) -> Person {
        Person::new(&self.assignee_name, &self.assignee_avatar)
    }

    /// All three related columns set, or no relation.
    pub fn related(&self) -> Option<Related> {
        match (&self.related_type, &self.related_id, &self.related_name) {
            (Some(kind), Some(id), Some(name)) => Some(Related {
                kind: kind.clone(),
                id: id.clone(),
                name: name.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub assignee: Person,
    pub related: Option<(RelatedKind, String, String)>,
}

/// Task repository
pub struct TaskRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TaskRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Task>, DbError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, priority, status, due_date, assignee_name, assignee_avatar,
                   related_type, related_id, related_name, created_at
            FROM tasks
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn create(&self, task: NewTask) -> Result<Task, DbError> {
        let (related_type, related_id, related_name) = match &task.related {
            Some((kind, id, name)) => (Some(kind.as_str()), Some(id.as_str()), Some(name.as_str())),
            None => (None, None, None),
        };

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks
                (title, priority, status, due_date, assignee_name, assignee_avatar,
                 related_type, related_id, related_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, priority, status, due_date, assignee_name, assignee_avatar,
                      related_type, related_id, related_name, created_at
            "#,
        )
        .bind(&task.title)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(&task.assignee.name)
        .bind(&task.assignee.avatar)
        .bind(related_type)
        .bind(related_id)
        .bind(related_name)
        .fetch_one(self.pool)
        .await?;

        Ok(task)
    }
}
