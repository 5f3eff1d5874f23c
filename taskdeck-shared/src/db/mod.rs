/// Database layer
///
/// - [`pool`]: PostgreSQL connection pool and health checks
/// - [`migrations`]: schema migrations embedded from `migrations/`
///
/// Row types and their queries live in [`crate::models`].

pub mod migrations;
pub mod pool;
