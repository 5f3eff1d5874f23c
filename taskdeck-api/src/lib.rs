//! # TaskDeck API Server Library
//!
//! HTTP surface of TaskDeck: authentication, tasks, aggregated statistics,
//! calendar views and user settings.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
