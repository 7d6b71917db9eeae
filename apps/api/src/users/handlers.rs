//! Axum route handlers for login tracking and the caller's own profile.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{DeviceInfo, LoginEvent, UserRecord};
use crate::state::AppState;
use crate::users::auth::{CurrentUser, USER_ID_HEADER};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Any `role` the client sends is ignored; roles are only changed in the database.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub display_name: Option<String>,
    pub session_id: Option<String>,
    #[serde(default)]
    pub device_info: DeviceInfo,
}

/// First `x-forwarded-for` hop, else `x-real-ip`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(str::to_string)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/users/login
///
/// Called by the client right after the identity provider signs the user in.
/// Creates the user on first login and appends a login log entry.
pub async fn handle_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<UserRecord>), AppError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(AppError::Unauthorized)?
        .to_string();

    let email = request.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }

    let event = LoginEvent {
        user_id,
        email,
        display_name: request
            .display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        session_id: request.session_id,
        ip_address: client_ip(&headers),
        device: request.device_info,
        at: Utc::now(),
    };

    let user = state.repo.record_login(&event).await?;
    info!("User {} logged in ({} total)", user.id, user.login_count);

    let status = if user.login_count == 1 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(user)))
}

/// GET /api/v1/users/me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<UserRecord> {
    Json(user)
}
