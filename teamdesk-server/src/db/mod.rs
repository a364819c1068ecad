//! Database layer - connection pool, schema, repositories, seed data
//!
//! - Bounded connection pool, no Arc<Mutex<Connection>>
//! - One repository per table, each a thin wrapper over `&PgPool`
//! - Owner/author name+avatar pairs are denormalized into rows, not joined

pub mod migrations;
pub mod pool;
pub mod repos;
pub mod seed;

pub use pool::{create_pool, PoolSettings};
pub use repos::*;
