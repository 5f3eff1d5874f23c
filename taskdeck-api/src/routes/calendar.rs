/// Calendar endpoints
///
/// Dates are local to the caller. Clients send their UTC offset in minutes,
/// east positive (UTC-3 is `-180`); without it the server default applies.
///
/// - `GET /v1/calendar?tz_offset_minutes=`: dots per date
/// - `GET /v1/calendar/:date?tz_offset_minutes=`: tasks due on `YYYY-MM-DD`

use crate::{
    app::AppState,
    config::MAX_TZ_OFFSET_MINUTES,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::middleware::AuthContext,
    loader,
    models::task::Task,
    stats::{parse_date_key, CalendarMarks},
};

#[derive(Debug, Default, Deserialize)]
pub struct OffsetQuery {
    pub tz_offset_minutes: Option<i32>,
}

impl OffsetQuery {
    pub fn resolve(&self, default_minutes: i32) -> ApiResult<FixedOffset> {
        let minutes = self.tz_offset_minutes.unwrap_or(default_minutes);

        if !(-MAX_TZ_OFFSET_MINUTES..=MAX_TZ_OFFSET_MINUTES).contains(&minutes) {
            return Err(ApiError::validation(
                "tz_offset_minutes",
                format!("Must be between -{0} and {0}", MAX_TZ_OFFSET_MINUTES),
            ));
        }

        FixedOffset::east_opt(minutes * 60)
            .ok_or_else(|| ApiError::validation("tz_offset_minutes", "Invalid UTC offset"))
    }
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

pub async fn calendar_marks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<OffsetQuery>,
) -> ApiResult<Json<CalendarMarks>> {
    let offset = query.resolve(state.config.tasks.default_tz_offset_minutes)?;
    let marks = loader::load_calendar(state.tasks.as_ref(), auth.user_id, &offset).await?;
    Ok(Json(marks))
}

pub async fn tasks_on_date(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(date): Path<String>,
    Query(query): Query<OffsetQuery>,
) -> ApiResult<Json<DayResponse>> {
    let date = parse_date_key(&date)?;
    let offset = query.resolve(state.config.tasks.default_tz_offset_minutes)?;

    let tasks = loader::load_day(state.tasks.as_ref(), auth.user_id, date, &offset).await?;
    Ok(Json(DayResponse { date, tasks }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_resolution() {
        let default = OffsetQuery::default().resolve(-180).unwrap();
        assert_eq!(default.local_minus_utc(), -180 * 60);

        let explicit = OffsetQuery { tz_offset_minutes: Some(330) }.resolve(0).unwrap();
        assert_eq!(explicit.local_minus_utc(), 330 * 60);

        assert!(OffsetQuery { tz_offset_minutes: Some(841) }.resolve(0).is_err());
        assert!(OffsetQuery { tz_offset_minutes: Some(-841) }.resolve(0).is_err());
    }

    #[test]
    fn test_offset_resolution_rejects_integer_extremes() {
        for minutes in [i32::MIN, i32::MIN + 1, i32::MAX] {
            let result = OffsetQuery { tz_offset_minutes: Some(minutes) }.resolve(0);
            assert!(
                matches!(result, Err(ApiError::ValidationError(_))),
                "offset {} should be a validation error",
                minutes
            );
        }

        let edge = OffsetQuery { tz_offset_minutes: Some(-MAX_TZ_OFFSET_MINUTES) }.resolve(0).unwrap();
        assert_eq!(edge.local_minus_utc(), -MAX_TZ_OFFSET_MINUTES * 60);
    }
}
