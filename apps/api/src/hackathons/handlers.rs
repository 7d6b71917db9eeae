//! Axum route handlers for hackathon listings and admin management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::hackathons::schedule::{parse_technologies, HackathonStatus};
use crate::models::hackathon::{Hackathon, NewHackathon};
use crate::state::AppState;
use crate::users::auth::{AdminUser, CurrentUser};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct HackathonListQuery {
    pub status: Option<String>,
}

/// Technologies arrive either as the admin form's comma-separated string or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TechnologiesInput {
    Csv(String),
    List(Vec<String>),
}

impl TechnologiesInput {
    fn into_list(self) -> Vec<String> {
        match self {
            TechnologiesInput::Csv(raw) => parse_technologies(&raw),
            TechnologiesInput::List(items) => parse_technologies(&items.join(",")),
        }
    }
}

/// Body of both create and update; an update replaces every editable field.
#[derive(Debug, Deserialize)]
pub struct HackathonRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub skill_level: Option<String>,
    pub technologies: Option<TechnologiesInput>,
}

impl TryFrom<HackathonRequest> for NewHackathon {
    type Error = AppError;

    fn try_from(request: HackathonRequest) -> Result<Self, Self::Error> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if request.end_date < request.start_date {
            return Err(AppError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }

        Ok(NewHackathon {
            title,
            description: request.description.filter(|d| !d.trim().is_empty()),
            start_date: request.start_date,
            end_date: request.end_date,
            skill_level: request.skill_level.filter(|l| !l.trim().is_empty()),
            technologies: request
                .technologies
                .map(TechnologiesInput::into_list)
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HackathonView {
    #[serde(flatten)]
    pub hackathon: Hackathon,
    pub status: HackathonStatus,
}

impl HackathonView {
    fn at(hackathon: Hackathon, now: DateTime<Utc>) -> Self {
        let status = HackathonStatus::at(hackathon.start_date, hackathon.end_date, now);
        Self { hackathon, status }
    }
}

#[derive(Debug, Serialize)]
pub struct JoinHackathonResponse {
    pub hackathon_id: i64,
    pub joined: bool,
    pub already_joined: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/hackathons?status=upcoming|active|completed|all
pub async fn handle_list_hackathons(
    State(state): State<AppState>,
    Query(query): Query<HackathonListQuery>,
) -> Result<Json<Vec<HackathonView>>, AppError> {
    let wanted = match query.status.as_deref() {
        Some(raw) => HackathonStatus::parse_filter(raw)?,
        None => None,
    };

    let now = Utc::now();
    let views = state
        .repo
        .list_hackathons()
        .await?
        .into_iter()
        .map(|h| HackathonView::at(h, now))
        .filter(|v| wanted.map_or(true, |status| v.status == status))
        .collect();

    Ok(Json(views))
}

/// POST /api/v1/hackathons (admin)
pub async fn handle_create_hackathon(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<HackathonRequest>,
) -> Result<(StatusCode, Json<HackathonView>), AppError> {
    let new = NewHackathon::try_from(request)?;

    let now = Utc::now();
    let created = state.repo.create_hackathon(&new, now).await?;
    info!("Admin {} created hackathon {}", admin.id, created.id);

    Ok((StatusCode::CREATED, Json(HackathonView::at(created, now))))
}

/// PUT /api/v1/hackathons/:id (admin)
pub async fn handle_update_hackathon(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(hackathon_id): Path<i64>,
    Json(request): Json<HackathonRequest>,
) -> Result<Json<HackathonView>, AppError> {
    let changes = NewHackathon::try_from(request)?;
    let updated = state.repo.update_hackathon(hackathon_id, &changes).await?;
    info!("Admin {} updated hackathon {hackathon_id}", admin.id);

    Ok(Json(HackathonView::at(updated, Utc::now())))
}

/// DELETE /api/v1/hackathons/:id (admin)
pub async fn handle_delete_hackathon(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(hackathon_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_hackathon(hackathon_id).await?;
    info!("Admin {} deleted hackathon {hackathon_id}", admin.id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/hackathons/:id/join
pub async fn handle_join_hackathon(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(hackathon_id): Path<i64>,
) -> Result<Json<JoinHackathonResponse>, AppError> {
    let joined = state
        .repo
        .join_hackathon(hackathon_id, &user.id, Utc::now())
        .await?;

    if joined {
        info!("User {} joined hackathon {hackathon_id}", user.id);
    }

    Ok(Json(JoinHackathonResponse {
        hackathon_id,
        joined,
        already_joined: !joined,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technologies_accept_csv_or_list() {
        let csv: TechnologiesInput = serde_json::from_str(r#""Rust, Go ,""#).unwrap();
        assert_eq!(csv.into_list(), vec!["Rust".to_string(), "Go".to_string()]);

        let list: TechnologiesInput = serde_json::from_str(r#"[" Rust", ""]"#).unwrap();
        assert_eq!(list.into_list(), vec!["Rust".to_string()]);
    }

    fn request(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> HackathonRequest {
        HackathonRequest {
            title: title.to_string(),
            description: Some("  ".to_string()),
            start_date: start,
            end_date: end,
            skill_level: None,
            technologies: Some(TechnologiesInput::Csv("Rust, ".to_string())),
        }
    }

    #[test]
    fn test_request_validation() {
        let now = Utc::now();
        let later = now + chrono::Duration::hours(3);

        let ok = NewHackathon::try_from(request("  Jam ", now, later)).unwrap();
        assert_eq!(ok.title, "Jam");
        assert_eq!(ok.description, None);
        assert_eq!(ok.technologies, vec!["Rust".to_string()]);

        // same instant is allowed
        assert!(NewHackathon::try_from(request("Jam", now, now)).is_ok());
        assert!(NewHackathon::try_from(request(" ", now, later)).is_err());
        assert!(NewHackathon::try_from(request("Jam", later, now)).is_err());
    }
}
