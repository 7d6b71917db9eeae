//! Axum route handler for resume analysis.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::activity::{ActivityEvent, NewActivity};
use crate::progress::workflow::{record_workflow_progress, WorkflowStage};
use crate::repository::record_activity_logged;
use crate::skills::document::{decode_document_blocking, DecodeMethod};
use crate::state::AppState;
use crate::users::auth::MaybeUser;

#[derive(Debug, Serialize)]
pub struct AnalyzeResumeResponse {
    pub file_name: String,
    pub skills: Vec<String>,
    pub skills_count: usize,
    pub text_length: usize,
    /// `content_based` when at least one skill was found, else `no_skills_found`.
    pub extraction_method: &'static str,
    pub decode_method: DecodeMethod,
}

struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Bytes,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("resume exceeds the upload size limit".to_string())
    } else {
        AppError::Validation(format!("invalid multipart body: {}", e.body_text()))
    }
}

/// Pulls the `file` part out of the form. Other parts are skipped.
async fn read_file_part(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "resume".to_string());
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::Validation("multipart field 'file' is required".to_string()))
}

/// POST /api/v1/resumes/analyze
///
/// Decodes the uploaded resume and extracts catalog skills. Anonymous callers
/// get the analysis only; signed-in callers also have the resume stored and
/// their skill profile updated.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    let upload = read_file_part(&mut multipart).await?;
    let file_size = upload.bytes.len();

    let document = decode_document_blocking(
        upload.file_name.clone(),
        upload.content_type.clone(),
        upload.bytes.clone(),
    )
    .await;

    let skills: Vec<String> = state.extractor.extract(&document.text).into_iter().collect();
    let extraction_method = if skills.is_empty() {
        "no_skills_found"
    } else {
        "content_based"
    };

    info!(
        "Analyzed resume {} ({file_size} bytes, {:?}): {} skills",
        upload.file_name,
        document.method,
        skills.len()
    );

    if let Some(user) = user {
        if let Err(e) = state
            .resumes
            .put_resume(
                &user.id,
                &upload.file_name,
                upload.content_type.as_deref(),
                upload.bytes,
            )
            .await
        {
            warn!("Resume for user {} was not stored: {e}", user.id);
        }

        let previous = state.repo.mark_resume_analyzed(&user.id, &skills).await?;

        let repo = state.repo.as_ref();
        record_activity_logged(
            repo,
            NewActivity::now(
                &user.id,
                ActivityEvent::ResumeUploaded {
                    file_name: upload.file_name.clone(),
                    file_size: file_size as u64,
                    skill_count: skills.len() as u32,
                    extraction_method: extraction_method.to_string(),
                },
            ),
        )
        .await;
        for skill in &skills {
            record_activity_logged(
                repo,
                NewActivity::now(&user.id, ActivityEvent::SkillIdentified { skill: skill.clone() }),
            )
            .await;
        }
        if previous != skills {
            record_activity_logged(
                repo,
                NewActivity::now(&user.id, ActivityEvent::SkillsUpdated { skills: skills.clone() }),
            )
            .await;
        }

        let stage = if skills.is_empty() {
            WorkflowStage::ResumeUpload
        } else {
            WorkflowStage::SkillsExtraction
        };
        record_workflow_progress(repo, &user.id, stage).await;
    }

    Ok(Json(AnalyzeResumeResponse {
        file_name: upload.file_name,
        skills_count: skills.len(),
        skills,
        text_length: document.text.chars().count(),
        extraction_method,
        decode_method: document.method,
    }))
}
