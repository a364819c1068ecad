//! Route handlers organized by resource

pub mod activity;
pub mod auth;
pub mod bookmarks;
pub mod chat;
pub mod contacts;
pub mod deals;
pub mod health;
pub mod leads;
pub mod products;
pub mod reports;
pub mod tasks;
pub mod users;
