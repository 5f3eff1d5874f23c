/// User settings endpoints
///
/// - `GET /v1/settings`: current settings, defaults created on first read
/// - `PATCH /v1/settings`: change any subset of the toggles
/// - `PUT /v1/settings/push-token`: register (or clear, with `null`) the
///   device's Expo push token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use taskdeck_shared::{
    auth::middleware::AuthContext,
    models::{
        settings::{UpdateSettings, UserSettings},
        user::User,
    },
    notify::push::is_expo_push_token,
};

#[derive(Debug, Deserialize)]
pub struct PushTokenRequest {
    pub push_token: Option<String>,
}

impl PushTokenRequest {
    /// Trimmed token; blank counts as clearing it
    fn token(&self) -> ApiResult<Option<&str>> {
        match self.push_token.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(token) if is_expo_push_token(token) => Ok(Some(token)),
            Some(_) => Err(ApiError::validation(
                "push_token",
                "Expected an Expo push token like ExponentPushToken[...]",
            )),
        }
    }
}

pub async fn get_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserSettings>> {
    let settings = UserSettings::get_or_create(&state.db, auth.user_id).await?;
    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(changes): Json<UpdateSettings>,
) -> ApiResult<Json<UserSettings>> {
    let settings = UserSettings::update(&state.db, auth.user_id, changes).await?;
    tracing::debug!(user_id = %auth.user_id, "Settings updated");
    Ok(Json(settings))
}

/// Responds 204 on success
pub async fn register_push_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<PushTokenRequest>,
) -> ApiResult<StatusCode> {
    let token = req.token()?;

    if !User::set_push_token(&state.db, auth.user_id, token).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(
        user_id = %auth.user_id,
        registered = token.is_some(),
        "Push token updated"
    );
    Ok(StatusCode::NO_CONTENT)
}
