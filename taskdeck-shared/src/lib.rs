//! # TaskDeck Shared Library
//!
//! Domain types, persistence, authentication and notifications shared by the
//! TaskDeck API server.
//!
//! ## Module Organization
//!
//! - `stats`: task aggregation (dashboard, report, calendar, due labels, lists)
//! - `models`: database models and their queries
//! - `store`: the `TaskStore` boundary and its implementations
//! - `loader`: fetch-then-aggregate functions used by the HTTP handlers
//! - `auth`: password hashing, JWTs and the auth middleware
//! - `notify`: fire-and-forget email and push notifications
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod loader;
pub mod models;
pub mod notify;
pub mod stats;
pub mod store;

/// Current version of the TaskDeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
