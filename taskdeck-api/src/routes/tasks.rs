/// Task endpoints
///
/// Every query is scoped to the authenticated user; another user's task is
/// indistinguishable from a missing one (404).
///
/// - `GET /v1/tasks?completed=`: list in screen order
/// - `POST /v1/tasks`: create
/// - `GET /v1/tasks/:id`: fetch one
/// - `PATCH /v1/tasks/:id`: partial edit
/// - `POST /v1/tasks/:id/complete`: mark completed, once

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskdeck_shared::{
    auth::middleware::AuthContext,
    loader,
    models::task::{CreateTask, Priority, Task, TaskFilter, UpdateTask},
    notify::{self, Notification},
};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// `true` for completed, `false` for pending, absent for all
    pub completed: Option<bool>,
}

/// New task
///
/// `priority` accepts any label; only `high` and `medium` are recognised and
/// everything else is stored as `low`. Absent means `medium`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 50, message = "Title must be 1 to 50 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub priority: Option<String>,

    pub due_date: DateTime<Utc>,

    pub due_time: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }

    fn into_create(self, user_id: Uuid) -> CreateTask {
        CreateTask {
            user_id,
            title: self.title,
            description: self.description,
            priority: self
                .priority
                .as_deref()
                .map(Priority::from_label)
                .unwrap_or_default(),
            due_date: self.due_date,
            due_time: self.due_time,
        }
    }
}

/// Partial edit; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 50, message = "Title must be 1 to 50 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,

    pub priority: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    pub due_time: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    fn normalized(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            ..self
        }
    }

    fn into_update(self) -> UpdateTask {
        UpdateTask {
            title: self.title,
            description: self.description,
            priority: self.priority.as_deref().map(Priority::from_label),
            due_date: self.due_date,
            due_time: self.due_time,
        }
    }
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Task {} not found", id))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = TaskFilter {
        completed: query.completed,
    };
    let tasks = loader::load_task_list(state.tasks.as_ref(), auth.user_id, filter).await?;
    Ok(Json(tasks))
}

/// Create a task
///
/// ```text
/// POST /v1/tasks
///
/// {
///   "title": "Pay rent",
///   "description": "Transfer before the 5th",
///   "priority": "high",
///   "due_date": "2025-07-05T12:00:00Z"
/// }
/// ```
///
/// Responds 201 with the stored task and sends a `task_created` notification
/// in the background.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let req = req.normalized();
    req.validate()?;

    let task = state.tasks.create_task(req.into_create(auth.user_id)).await?;

    tracing::info!(
        user_id = %auth.user_id,
        task_id = %task.id,
        priority = task.priority.as_str(),
        "Task created"
    );
    notify::dispatch(
        state.notifier.clone(),
        auth.user_id,
        Notification::task_created(&task),
    );

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state
        .tasks
        .get_task(auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let req = req.normalized();
    req.validate()?;

    let task = state
        .tasks
        .update_task(auth.user_id, id, req.into_update())
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(task))
}

/// Mark a task completed
///
/// Completion is one-way: 409 if the task is already completed.
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let existing = state
        .tasks
        .get_task(auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let already_completed = || ApiError::Conflict(format!("Task {} is already completed", id));
    if existing.completed {
        return Err(already_completed());
    }

    // A concurrent completion can still win between the read and the write
    let task = state
        .tasks
        .complete_task(auth.user_id, id)
        .await?
        .ok_or_else(already_completed)?;

    tracing::info!(user_id = %auth.user_id, task_id = %task.id, "Task completed");
    notify::dispatch(
        state.notifier.clone(),
        auth.user_id,
        Notification::task_completed(&task),
    );

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(title: &str, description: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            description: description.to_string(),
            priority: None,
            due_date: Utc.with_ymd_and_hms(2025, 7, 5, 12, 0, 0).unwrap(),
            due_time: None,
        }
    }

    #[test]
    fn test_title_is_trimmed_before_length_check() {
        let padded = format!("  {}  ", "a".repeat(50));
        let req = request(&padded, " body ").normalized();
        assert_eq!(req.title.len(), 50);
        assert_eq!(req.description, "body");
        assert!(req.validate().is_ok());

        let too_long = request(&"a".repeat(51), "body").normalized();
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let errors = request("   ", "  ").normalized().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn test_priority_labels() {
        let user = Uuid::new_v4();

        let default = request("A", "B").into_create(user);
        assert_eq!(default.priority, Priority::Medium);

        let mut req = request("A", "B");
        req.priority = Some("HIGH".to_string());
        assert_eq!(req.into_create(user).priority, Priority::High);

        let mut req = request("A", "B");
        req.priority = Some("urgent".to_string());
        assert_eq!(req.into_create(user).priority, Priority::Low);
    }

    #[test]
    fn test_update_request_validates_present_fields_only() {
        let empty = UpdateTaskRequest::default().normalized();
        assert!(empty.validate().is_ok());
        assert!(empty.into_update().is_empty());

        let blank_title = UpdateTaskRequest {
            title: Some("  ".to_string()),
            ..Default::default()
        }
        .normalized();
        assert!(blank_title.validate().is_err());
    }
}
