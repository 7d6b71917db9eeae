//! Persistence boundary. Handlers talk to `Arc<dyn Repository>` only.
//!
//! `PgRepository` backs production; `InMemoryRepository` backs tests.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::activity::{ActivityRecord, NewActivity};
use crate::models::assessment_record::AssessmentRecord;
use crate::models::chat::ChatInteraction;
use crate::models::hackathon::{Hackathon, NewHackathon};
use crate::models::user::{LoginEvent, LoginLog, UserRecord};

#[cfg(test)]
pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

#[async_trait]
pub trait Repository: Send + Sync {
    // ── users ───────────────────────────────────────────────────────────────

    /// Creates the user on first login (always with `Role::User`), otherwise
    /// bumps `login_count` and `last_login`. Appends a login log either way.
    async fn record_login(&self, event: &LoginEvent) -> Result<UserRecord, AppError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, AppError>;

    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError>;

    /// Stores the skills found in the user's latest resume and flags the
    /// resume step as done. Returns the previous skill list.
    async fn mark_resume_analyzed(
        &self,
        user_id: &str,
        skills: &[String],
    ) -> Result<Vec<String>, AppError>;

    /// Newest first.
    async fn list_login_logs(
        &self,
        user_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<LoginLog>, AppError>;

    // ── assessments & learning ──────────────────────────────────────────────

    async fn save_assessment_record(&self, record: &AssessmentRecord) -> Result<(), AppError>;

    /// Oldest first. `None` lists every user's records.
    async fn list_assessment_records(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<AssessmentRecord>, AppError>;

    /// Returns `false` if the video was already marked complete.
    async fn mark_video_completed(
        &self,
        user_id: &str,
        video_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    async fn list_completed_videos(&self, user_id: &str) -> Result<Vec<String>, AppError>;

    // ── activity feed ───────────────────────────────────────────────────────

    async fn record_activity(&self, activity: NewActivity) -> Result<(), AppError>;

    /// Newest first.
    async fn list_activities(&self, limit: i64) -> Result<Vec<ActivityRecord>, AppError>;

    // ── hackathons ──────────────────────────────────────────────────────────

    async fn create_hackathon(
        &self,
        hackathon: &NewHackathon,
        at: DateTime<Utc>,
    ) -> Result<Hackathon, AppError>;

    /// Ordered by start date.
    async fn list_hackathons(&self) -> Result<Vec<Hackathon>, AppError>;

    /// Replaces the editable fields. Participants and `created_at` are kept.
    /// `NotFound` for an unknown hackathon.
    async fn update_hackathon(
        &self,
        hackathon_id: i64,
        hackathon: &NewHackathon,
    ) -> Result<Hackathon, AppError>;

    /// Deletes the hackathon and its participants. `NotFound` for an unknown hackathon.
    async fn delete_hackathon(&self, hackathon_id: i64) -> Result<(), AppError>;

    /// `NotFound` for an unknown hackathon. Returns `false` if already joined.
    async fn join_hackathon(
        &self,
        hackathon_id: i64,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, AppError>;

    // ── chat ────────────────────────────────────────────────────────────────

    async fn save_chat_interaction(
        &self,
        user_id: &str,
        message: &str,
        response: &str,
        at: DateTime<Utc>,
    ) -> Result<ChatInteraction, AppError>;

    /// Newest first.
    async fn list_chat_interactions(&self) -> Result<Vec<ChatInteraction>, AppError>;
}

/// Records an activity without failing the caller. The feed is best-effort.
pub async fn record_activity_logged(repo: &dyn Repository, activity: NewActivity) {
    let activity_type = activity.event.activity_type();
    if let Err(e) = repo.record_activity(activity).await {
        tracing::warn!("Failed to record {activity_type} activity: {e}");
    }
}
