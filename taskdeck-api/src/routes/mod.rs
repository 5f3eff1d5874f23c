/// API route handlers, one module per resource
///
/// - `health`: liveness and database connectivity
/// - `auth`: register, login, refresh, current user
/// - `tasks`: task CRUD and completion
/// - `stats`: dashboard, report, upcoming and recent lists
/// - `calendar`: calendar marks and day view
/// - `settings`: user preferences and push token

pub mod auth;
pub mod calendar;
pub mod health;
pub mod settings;
pub mod stats;
pub mod tasks;
