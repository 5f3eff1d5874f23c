/// Task notifications
///
/// Creating or completing a task produces a [`Notification`] that is handed to
/// a [`Notifier`] through [`dispatch`]. Dispatch is fire-and-forget: it runs on
/// a detached tokio task, a failure is logged and dropped, and nothing is
/// retried.
///
/// # Channels
///
/// - [`email::EmailSender`]: SMTP via lettre, enabled when `SMTP_HOST` is set
/// - [`push::PushSender`]: Expo push HTTP API via reqwest, enabled by `PUSH_ENABLED`
/// - [`channel::ChannelNotifier`]: routes one notification to the channels a
///   user has enabled in their settings
/// - [`LogNotifier`]: writes notifications to the log only
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskdeck_shared::notify::{dispatch, LogNotifier, Notification, Notifier};
/// # use taskdeck_shared::models::task::Task;
///
/// # fn example(task: &Task) {
/// let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
/// dispatch(notifier, task.user_id, Notification::task_created(task));
/// # }
/// ```

pub mod channel;
pub mod email;
pub mod push;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::task::Task;

pub use channel::ChannelNotifier;
pub use email::{EmailConfig, EmailError, EmailSender};
pub use push::{PushConfig, PushError, PushSender};

/// What happened to the task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TaskCreated,
    TaskCompleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TaskCreated => "task_created",
            NotificationKind::TaskCompleted => "task_completed",
        }
    }
}

/// A message about one task, rendered once and sent on any channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub task_id: Uuid,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn task_created(task: &Task) -> Self {
        Self {
            kind: NotificationKind::TaskCreated,
            task_id: task.id,
            title: "New task created".to_string(),
            body: format!(
                "\"{}\" is due {} {} UTC",
                task.title,
                task.due_date.format("%Y-%m-%d"),
                task.effective_due_time().format("%H:%M")
            ),
        }
    }

    pub fn task_completed(task: &Task) -> Self {
        Self {
            kind: NotificationKind::TaskCompleted,
            task_id: task.id,
            title: "Task completed".to_string(),
            body: format!("\"{}\" was marked as completed", task.title),
        }
    }
}

/// Notification errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Push(#[from] PushError),

    #[error("User {0} not found")]
    UnknownUser(Uuid),
}

/// Delivers notifications to a user
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: Uuid, notification: Notification) -> Result<(), NotifyError>;
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: Uuid, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            user_id = %user_id,
            task_id = %notification.task_id,
            kind = notification.kind.as_str(),
            title = %notification.title,
            "Notification"
        );
        Ok(())
    }
}

/// Sends a notification in the background
///
/// The caller does not wait for delivery. The returned handle may be dropped;
/// it exists so tests can wait for completion.
pub fn dispatch(
    notifier: Arc<dyn Notifier>,
    user_id: Uuid,
    notification: Notification,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let task_id = notification.task_id;
        let kind = notification.kind;

        if let Err(e) = notifier.notify(user_id, notification).await {
            tracing::warn!(
                user_id = %user_id,
                task_id = %task_id,
                kind = kind.as_str(),
                error = %e,
                "Notification delivery failed"
            );
        }
    })
}
