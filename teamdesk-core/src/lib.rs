//! teamdesk-core: shared building blocks for the TeamDesk CRM backend
//!
//! - Closed vocabularies (lead status, deal stage, task priority, ...)
//! - Input validation for user-supplied fields
//! - Layered configuration (defaults, TOML file, environment)

pub mod config;
pub mod error;
pub mod models;

pub use config::{Environment, TeamdeskConfig};
pub use error::{CoreError, Result};
pub use models::ValidationError;
