//! Axum route handlers for the learner's progress view.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::activity::{ActivityEvent, NewActivity};
use crate::progress::workflow::{
    load_progress, record_workflow_progress, LearningProgress, WorkflowStage,
};
use crate::repository::record_activity_logged;
use crate::state::AppState;
use crate::users::auth::CurrentUser;

#[derive(Debug, Default, Deserialize)]
pub struct VideoCompletedRequest {
    pub skill: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoCompletedResponse {
    pub video_id: String,
    pub newly_completed: bool,
    pub progress: LearningProgress,
}

/// GET /api/v1/progress
pub async fn handle_get_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<LearningProgress>, AppError> {
    let progress = load_progress(state.repo.as_ref(), &user).await?;
    Ok(Json(progress))
}

/// POST /api/v1/progress/videos/:video_id/complete
///
/// Idempotent: marking a watched video again changes nothing.
pub async fn handle_complete_video(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(video_id): Path<String>,
    body: Option<Json<VideoCompletedRequest>>,
) -> Result<Json<VideoCompletedResponse>, AppError> {
    let video_id = video_id.trim().to_string();
    if video_id.is_empty() {
        return Err(AppError::Validation("video_id cannot be empty".to_string()));
    }
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let newly_completed = state
        .repo
        .mark_video_completed(&user.id, &video_id, Utc::now())
        .await?;

    if newly_completed {
        info!("User {} completed video {video_id}", user.id);
        let event = ActivityEvent::VideoCompleted {
            video_id: video_id.clone(),
            skill: request.skill,
        };
        record_activity_logged(state.repo.as_ref(), NewActivity::now(&user.id, event)).await;
        record_workflow_progress(state.repo.as_ref(), &user.id, WorkflowStage::VideoLearning)
            .await;
    }

    let progress = load_progress(state.repo.as_ref(), &user).await?;
    Ok(Json(VideoCompletedResponse {
        video_id,
        newly_completed,
        progress,
    }))
}
