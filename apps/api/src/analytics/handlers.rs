//! Axum route handlers for the admin dashboard. All require an admin caller.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::analytics::metrics::{compute_dashboard_metrics, DashboardMetrics};
use crate::chat::history::{filter_interactions, ChatFilter, ChatHistoryQuery};
use crate::errors::AppError;
use crate::models::activity::ActivityRecord;
use crate::models::chat::ChatInteraction;
use crate::models::user::{LoginLog, UserRecord};
use crate::state::AppState;
use crate::users::auth::AdminUser;
use crate::users::directory::{filter_users, UserDirectoryQuery, UserFilter};

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct LoginLogQuery {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

fn clamp_limit(limit: Option<i64>) -> Result<i64, AppError> {
    match limit {
        None => Ok(DEFAULT_LIST_LIMIT),
        Some(n) if (1..=MAX_LIST_LIMIT).contains(&n) => Ok(n),
        Some(n) => Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}, got {n}"
        ))),
    }
}

/// GET /api/v1/admin/metrics
pub async fn handle_metrics(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<DashboardMetrics>, AppError> {
    let users = state.repo.list_users().await?;
    let records = state.repo.list_assessment_records(None).await?;
    Ok(Json(compute_dashboard_metrics(
        &users,
        &records,
        Utc::now(),
        state.config.active_user_window_days,
    )))
}

/// GET /api/v1/admin/users?search=&role=&sort_by=&order=
pub async fn handle_list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UserDirectoryQuery>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    let filter = UserFilter::try_from(query)?;
    let users = state.repo.list_users().await?;
    Ok(Json(filter_users(users, &filter)))
}

/// GET /api/v1/admin/login-logs?user_id=&limit=
pub async fn handle_login_logs(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<LoginLogQuery>,
) -> Result<Json<Vec<LoginLog>>, AppError> {
    let limit = clamp_limit(query.limit)?;
    let logs = state
        .repo
        .list_login_logs(query.user_id.as_deref(), limit)
        .await?;
    Ok(Json(logs))
}

/// GET /api/v1/admin/activities?limit=
pub async fn handle_activities(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityRecord>>, AppError> {
    let limit = clamp_limit(query.limit)?;
    Ok(Json(state.repo.list_activities(limit).await?))
}

/// GET /api/v1/admin/chat-interactions?search=&user_id=&start_date=&end_date=
pub async fn handle_chat_interactions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<Vec<ChatInteraction>>, AppError> {
    let filter = ChatFilter::try_from(query)?;
    let interactions = state.repo.list_chat_interactions().await?;
    Ok(Json(filter_interactions(interactions, &filter)))
}
