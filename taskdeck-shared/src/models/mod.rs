/// Database models for TaskDeck
///
/// This module contains the database models and their SQL operations.
///
/// # Models
///
/// - `user`: User accounts and push token registration
/// - `task`: To-do items owned by a user
/// - `settings`: Per-user preferences
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{Task, TaskFilter};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let pending = Task::list_by_user(&pool, Uuid::new_v4(), TaskFilter::pending()).await?;
/// # Ok(())
/// # }
/// ```

pub mod settings;
pub mod task;
pub mod user;
