/// Aggregated views for the dashboard and reports screens
///
/// - `GET /v1/stats/dashboard?horizon_days=`
/// - `GET /v1/stats/report`
/// - `GET /v1/stats/upcoming?horizon_days=`
/// - `GET /v1/stats/recent?limit=`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use taskdeck_shared::{
    auth::middleware::AuthContext,
    loader,
    models::task::Task,
    stats::{DashboardStats, ReportStats, UpcomingTask, DEFAULT_RECENT_LIMIT},
};

pub const MAX_HORIZON_DAYS: i64 = 365;
pub const MAX_RECENT_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct HorizonQuery {
    pub horizon_days: Option<i64>,
}

impl HorizonQuery {
    /// Requested horizon, or the configured default
    pub fn resolve(&self, default: i64) -> ApiResult<i64> {
        match self.horizon_days {
            None => Ok(default),
            Some(days) if (0..=MAX_HORIZON_DAYS).contains(&days) => Ok(days),
            Some(_) => Err(ApiError::validation(
                "horizon_days",
                format!("Must be between 0 and {}", MAX_HORIZON_DAYS),
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

impl RecentQuery {
    pub fn resolve(&self) -> ApiResult<usize> {
        match self.limit {
            None => Ok(DEFAULT_RECENT_LIMIT),
            Some(limit) if (1..=MAX_RECENT_LIMIT).contains(&limit) => Ok(limit),
            Some(_) => Err(ApiError::validation(
                "limit",
                format!("Must be between 1 and {}", MAX_RECENT_LIMIT),
            )),
        }
    }
}

/// Pending, completed and upcoming counters
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<HorizonQuery>,
) -> ApiResult<Json<DashboardStats>> {
    let horizon = query.resolve(state.config.tasks.upcoming_horizon_days)?;
    let stats =
        loader::load_dashboard(state.tasks.as_ref(), auth.user_id, Utc::now(), horizon).await?;
    Ok(Json(stats))
}

/// Totals, priority breakdown, completion rate and average completion time
///
/// A stored task completed before it was created fails the whole report
/// with 500; the offending task is logged.
pub async fn report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ReportStats>> {
    let stats = loader::load_report(state.tasks.as_ref(), auth.user_id, Utc::now()).await?;
    Ok(Json(stats))
}

pub async fn upcoming(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<HorizonQuery>,
) -> ApiResult<Json<Vec<UpcomingTask>>> {
    let horizon = query.resolve(state.config.tasks.upcoming_horizon_days)?;
    let tasks =
        loader::load_upcoming(state.tasks.as_ref(), auth.user_id, Utc::now(), horizon).await?;
    Ok(Json(tasks))
}

pub async fn recent(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let limit = query.resolve()?;
    let tasks = loader::load_recent(state.tasks.as_ref(), auth.user_id, limit).await?;
    Ok(Json(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_resolution() {
        assert_eq!(HorizonQuery::default().resolve(7).unwrap(), 7);
        assert_eq!(HorizonQuery { horizon_days: Some(0) }.resolve(7).unwrap(), 0);
        assert!(HorizonQuery { horizon_days: Some(-1) }.resolve(7).is_err());
        assert!(HorizonQuery { horizon_days: Some(366) }.resolve(7).is_err());
    }

    #[test]
    fn test_recent_limit_resolution() {
        assert_eq!(RecentQuery::default().resolve().unwrap(), DEFAULT_RECENT_LIMIT);
        assert_eq!(RecentQuery { limit: Some(20) }.resolve().unwrap(), 20);
        assert!(RecentQuery { limit: Some(0) }.resolve().is_err());
        assert!(RecentQuery { limit: Some(101) }.resolve().is_err());
    }
}
