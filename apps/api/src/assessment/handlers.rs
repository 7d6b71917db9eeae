//! Axum route handlers for the assessment session: start, then submit.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::generator::generate;
use crate::assessment::models::{AnswerSet, Assessment, QuestionSource, ScoreResult};
use crate::assessment::recommendations::{analyze, AssessmentAnalysis};
use crate::assessment::scorer::score_at;
use crate::errors::AppError;
use crate::models::activity::{ActivityEvent, NewActivity};
use crate::models::assessment_record::AssessmentRecord;
use crate::progress::workflow::{record_workflow_progress, WorkflowStage};
use crate::repository::record_activity_logged;
use crate::state::AppState;
use crate::users::auth::MaybeUser;

pub const MAX_SKILL_CHARS: usize = 100;

/// Upper bound on skills per batch start.
pub const MAX_BATCH_SKILLS: usize = 25;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartAssessmentRequest {
    pub skill: String,
}

/// A question as shown to the test taker: no answer, no explanation.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentView {
    pub id: Uuid,
    pub title: String,
    pub skill: String,
    pub difficulty: String,
    pub time_limit_secs: u32,
    pub source: QuestionSource,
    pub questions: Vec<QuestionView>,
    pub created_at: DateTime<Utc>,
}

impl From<&Assessment> for AssessmentView {
    fn from(a: &Assessment) -> Self {
        AssessmentView {
            id: a.id,
            title: a.title.clone(),
            skill: a.skill.clone(),
            difficulty: a.difficulty.clone(),
            time_limit_secs: a.time_limit_secs,
            source: a.source,
            questions: a
                .questions
                .iter()
                .map(|q| QuestionView {
                    id: q.id.clone(),
                    question: q.prompt.clone(),
                    options: q.options.clone(),
                })
                .collect(),
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartBatchRequest {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchAssessmentsView {
    pub assessments: Vec<AssessmentView>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssessmentRequest {
    #[serde(default)]
    pub answers: AnswerSet,
}

#[derive(Debug, Serialize)]
pub struct SubmitAssessmentResponse {
    pub result: ScoreResult,
    pub weak_skill: bool,
    pub analysis: AssessmentAnalysis,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/assessments
///
/// Generates an assessment for one skill and holds it in the session cache
/// until it is submitted or expires.
pub async fn handle_start_assessment(
    State(state): State<AppState>,
    Json(request): Json<StartAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentView>), AppError> {
    let skill = validate_skill(&request.skill)?;

    let assessment = generate(skill);
    state.assessments.put(&assessment).await?;

    info!(
        "Started {:?} assessment {} for {skill} ({} questions)",
        assessment.source,
        assessment.id,
        assessment.questions.len()
    );

    Ok((StatusCode::CREATED, Json(AssessmentView::from(&assessment))))
}

/// POST /api/v1/assessments/batch
///
/// One independent assessment per listed skill, each cached and submitted
/// on its own. Repeated skill names are started once.
pub async fn handle_start_batch(
    State(state): State<AppState>,
    Json(request): Json<StartBatchRequest>,
) -> Result<(StatusCode, Json<BatchAssessmentsView>), AppError> {
    if request.skills.is_empty() {
        return Err(AppError::Validation("skills cannot be empty".to_string()));
    }
    if request.skills.len() > MAX_BATCH_SKILLS {
        return Err(AppError::Validation(format!(
            "at most {MAX_BATCH_SKILLS} skills per batch"
        )));
    }

    let mut skills: Vec<&str> = Vec::with_capacity(request.skills.len());
    for raw in &request.skills {
        let skill = validate_skill(raw)?;
        if !skills.contains(&skill) {
            skills.push(skill);
        }
    }

    let mut assessments = Vec::with_capacity(skills.len());
    for skill in skills {
        let assessment = generate(skill);
        state.assessments.put(&assessment).await?;
        assessments.push(AssessmentView::from(&assessment));
    }

    info!("Started batch of {} assessments", assessments.len());
    Ok((StatusCode::CREATED, Json(BatchAssessmentsView { assessments })))
}

/// POST /api/v1/assessments/:id/submit
///
/// Scores whatever answers were given; unanswered questions count as wrong.
/// An assessment can be submitted once. If the result cannot be saved the
/// assessment goes back into the cache so the submission can be retried.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(assessment_id): Path<Uuid>,
    Json(request): Json<SubmitAssessmentRequest>,
) -> Result<Json<SubmitAssessmentResponse>, AppError> {
    let assessment = state
        .assessments
        .take(assessment_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Assessment {assessment_id} not found or expired"
            ))
        })?;

    let submitted_at = Utc::now();
    let result = score_at(&assessment, &request.answers, submitted_at);

    let analysis = analyze(&result);
    info!(
        "Assessment {assessment_id} ({}) scored {} / {}",
        result.skill,
        result.score,
        result.performance.as_str()
    );

    if let Some(user) = user {
        let record = AssessmentRecord::from_result(&user.id, &assessment, &result, submitted_at);
        if let Err(e) = state.repo.save_assessment_record(&record).await {
            if let Err(put_err) = state.assessments.put(&assessment).await {
                warn!("Assessment {assessment_id} could not be restored after a failed save: {put_err}");
            }
            return Err(e);
        }

        let event = ActivityEvent::AssessmentCompleted {
            skill: result.skill.clone(),
            score: result.score,
            correct_answers: result.correct_answers,
            total_questions: result.total_questions,
            elapsed_seconds: result.elapsed_seconds,
            performance: result.performance,
            weak_skill_identified: result.is_weak(),
        };
        record_activity_logged(state.repo.as_ref(), NewActivity::now(&user.id, event)).await;
        record_workflow_progress(state.repo.as_ref(), &user.id, WorkflowStage::SkillAssessment)
            .await;
    }

    Ok(Json(SubmitAssessmentResponse {
        weak_skill: result.is_weak(),
        result,
        analysis,
    }))
}

fn validate_skill(raw: &str) -> Result<&str, AppError> {
    let skill = raw.trim();
    if skill.is_empty() {
        return Err(AppError::Validation("skill cannot be empty".to_string()));
    }
    if skill.chars().count() > MAX_SKILL_CHARS {
        return Err(AppError::Validation(format!(
            "skill exceeds {MAX_SKILL_CHARS} characters"
        )));
    }
    Ok(skill)
}
