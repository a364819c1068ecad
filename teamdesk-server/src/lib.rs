//! teamdesk-server: REST API for the TeamDesk CRM dashboard
//!
//! Thin handlers over a PostgreSQL table set, plus a passthrough to a
//! generative model for the chat assistant.

pub mod chat;
pub mod db;
pub mod http;
pub mod reports;

pub use chat::{ChatError, ChatModel, GeminiClient};
pub use db::{create_pool, PoolSettings};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
