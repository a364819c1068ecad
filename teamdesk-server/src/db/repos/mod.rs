//! Repository implementations for database access
//!
//! Each repository borrows the pool and exposes the handful of statements
//! its table needs. Partial updates use `COALESCE($n, column)` so a single
//! statement covers every combination of supplied fields.

pub mod activities;
pub mod bookmarks;
pub mod contacts;
pub mod deals;
pub mod leads;
pub mod products;
pub mod reports;
pub mod tasks;
pub mod users;

use serde::{Deserialize, Serialize};

pub use activities::{Activity, ActivityRepo, NewActivity};
pub use bookmarks::{Bookmark, BookmarkRepo, NewBookmark};
pub use contacts::{Contact, ContactChanges, ContactRepo, NewContact};
pub use deals::{Deal, DealChanges, DealRepo, NewDeal};
pub use leads::{Lead, LeadRepo, NewLead};
pub use products::{NewProduct, Product, ProductRepo};
pub use reports::{ReportRepo, SummaryCounts};
pub use tasks::{NewTask, Related, Task, TaskRepo};
pub use users::{NewUser, User, UserChanges, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Raw driver error; the message is passed through to API clients
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} already exists: {detail}")]
    Conflict {
        resource: &'static str,
        detail: String,
    },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Turn a unique-constraint violation into `Conflict`, pass others through.
    pub(crate) fn from_unique(err: sqlx::Error, resource: &'static str, detail: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict {
                resource,
                detail: detail.to_owned(),
            },
            _ => Self::Sqlx(err),
        }
    }
}

/// Denormalized person reference (owner, author, assignee)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub avatar: String,
}

impl Person {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }
}
