//! Domain models with validation at construction
//!
//! User input is validated when building these types.
//! Invalid input returns ValidationError, not panic.

pub mod fields;
pub mod validation;
pub mod vocab;

pub use fields::{amount, default_avatar, optional_text, required_text, Email};
pub use fields::{MAX_LONG_TEXT, MAX_SHORT_TEXT};
pub use validation::ValidationError;
pub use vocab::{
    ActivityKind, BookmarkKind, DealStage, EmailKind, LeadStatus, RelatedKind, TaskPriority,
    TaskStatus,
};
