/// Per-user preferences
///
/// One row per user. A missing row means "all defaults"; the row is created the
/// first time settings are read.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_settings (
///     user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
///     notifications BOOLEAN NOT NULL DEFAULT TRUE,
///     dark_mode BOOLEAN NOT NULL DEFAULT FALSE,
///     sound_enabled BOOLEAN NOT NULL DEFAULT TRUE,
///     email_notifications BOOLEAN NOT NULL DEFAULT TRUE,
///     show_completed_tasks BOOLEAN NOT NULL DEFAULT TRUE,
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Stored user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSettings {
    /// Owner
    pub user_id: Uuid,

    /// Push notifications enabled
    pub notifications: bool,

    /// Dark theme in the client
    pub dark_mode: bool,

    /// Client feedback sounds
    pub sound_enabled: bool,

    /// Email notifications enabled
    pub email_notifications: bool,

    /// Whether completed tasks are shown in mixed lists
    pub show_completed_tasks: bool,

    /// Last change
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Settings a user starts with
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            notifications: true,
            dark_mode: false,
            sound_enabled: true,
            email_notifications: true,
            show_completed_tasks: true,
            updated_at: Utc::now(),
        }
    }
}

/// Partial settings change; `None` keeps the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettings {
    pub notifications: Option<bool>,
    pub dark_mode: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub email_notifications: Option<bool>,
    pub show_completed_tasks: Option<bool>,
}

const SETTINGS_COLUMNS: &str = "user_id, notifications, dark_mode, sound_enabled, \
                                email_notifications, show_completed_tasks, updated_at";

impl UserSettings {
    /// Loads a user's settings, creating the default row if none exists
    pub async fn get_or_create(pool: &PgPool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let select = format!("SELECT {SETTINGS_COLUMNS} FROM user_settings WHERE user_id = $1");

        if let Some(settings) = sqlx::query_as::<_, UserSettings>(&select)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
        {
            return Ok(settings);
        }

        tracing::debug!(user_id = %user_id, "Creating default settings");

        sqlx::query("INSERT INTO user_settings (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(pool)
            .await?;

        sqlx::query_as::<_, UserSettings>(&select)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Applies a partial update, creating the row first if needed
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        data: UpdateSettings,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO user_settings AS s
                (user_id, notifications, dark_mode, sound_enabled,
                 email_notifications, show_completed_tasks)
            VALUES ($1, COALESCE($2, TRUE), COALESCE($3, FALSE), COALESCE($4, TRUE),
                    COALESCE($5, TRUE), COALESCE($6, TRUE))
            ON CONFLICT (user_id) DO UPDATE
            SET notifications = COALESCE($2, s.notifications),
                dark_mode = COALESCE($3, s.dark_mode),
                sound_enabled = COALESCE($4, s.sound_enabled),
                email_notifications = COALESCE($5, s.email_notifications),
                show_completed_tasks = COALESCE($6, s.show_completed_tasks),
                updated_at = NOW()
            RETURNING {SETTINGS_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .bind(data.notifications)
            .bind(data.dark_mode)
            .bind(data.sound_enabled)
            .bind(data.email_notifications)
            .bind(data.show_completed_tasks)
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let user_id = Uuid::new_v4();
        let settings = UserSettings::defaults_for(user_id);
        assert_eq!(settings.user_id, user_id);
        assert!(settings.notifications);
        assert!(!settings.dark_mode);
        assert!(settings.sound_enabled);
        assert!(settings.email_notifications);
        assert!(settings.show_completed_tasks);
    }

    #[test]
    fn test_update_settings_deserializes_partial() {
        let update: UpdateSettings = serde_json::from_str(r#"{"dark_mode": true}"#).unwrap();
        assert_eq!(update.dark_mode, Some(true));
        assert!(update.notifications.is_none());
        assert!(update.email_notifications.is_none());
    }
}
