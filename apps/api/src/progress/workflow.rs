//! The four-step learning workflow and weak-skill tracking.
//!
//! Pure functions over a user's record, assessment history and completed
//! videos. `record_workflow_progress` is the only part that touches storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assessment::models::is_weak_score;
use crate::assessment::recommendations::{recommend_videos, VideoRecommendation};
use crate::errors::AppError;
use crate::models::activity::{ActivityEvent, NewActivity};
use crate::models::assessment_record::AssessmentRecord;
use crate::models::user::UserRecord;
use crate::repository::{record_activity_logged, Repository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    ResumeUpload,
    SkillsExtraction,
    SkillAssessment,
    VideoLearning,
}

impl WorkflowStage {
    pub const ALL: [WorkflowStage; 4] = [
        WorkflowStage::ResumeUpload,
        WorkflowStage::SkillsExtraction,
        WorkflowStage::SkillAssessment,
        WorkflowStage::VideoLearning,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WorkflowStage::ResumeUpload => "Resume Upload",
            WorkflowStage::SkillsExtraction => "Skills Extraction",
            WorkflowStage::SkillAssessment => "Skill Assessment",
            WorkflowStage::VideoLearning => "Video Learning",
        }
    }

    /// 1-based position in the workflow.
    pub fn number(&self) -> u8 {
        match self {
            WorkflowStage::ResumeUpload => 1,
            WorkflowStage::SkillsExtraction => 2,
            WorkflowStage::SkillAssessment => 3,
            WorkflowStage::VideoLearning => 4,
        }
    }
}

pub const TOTAL_STEPS: u8 = WorkflowStage::ALL.len() as u8;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStep {
    pub step: u8,
    pub name: &'static str,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakSkill {
    pub skill: String,
    pub score: u32,
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningProgress {
    pub steps: Vec<WorkflowStep>,
    /// Index of the first incomplete step; `TOTAL_STEPS` once all are done.
    pub current_step: u8,
    pub progress_percent: u8,
    pub assessments_taken: usize,
    pub weak_skills: Vec<WeakSkill>,
    pub completed_videos: Vec<String>,
    /// Videos for weak skills that have not been watched yet.
    pub recommendations: Vec<VideoRecommendation>,
}

/// Skills whose most recent assessment scored below the weak threshold.
/// An older failing score is superseded by a newer passing one.
pub fn weak_skills(records: &[AssessmentRecord]) -> Vec<WeakSkill> {
    let mut latest: BTreeMap<&str, &AssessmentRecord> = BTreeMap::new();
    for record in records {
        latest
            .entry(record.skill.as_str())
            .and_modify(|current| {
                if record.completed_at >= current.completed_at {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    latest
        .into_values()
        .filter(|r| is_weak_score(r.score))
        .map(|r| WeakSkill {
            skill: r.skill.clone(),
            score: r.score,
            assessed_at: r.completed_at,
        })
        .collect()
}

pub fn compute_progress(
    user: &UserRecord,
    records: &[AssessmentRecord],
    completed_videos: &[String],
) -> LearningProgress {
    let steps: Vec<WorkflowStep> = WorkflowStage::ALL
        .iter()
        .map(|stage| WorkflowStep {
            step: stage.number(),
            name: stage.name(),
            completed: match stage {
                WorkflowStage::ResumeUpload => user.resume_uploaded,
                WorkflowStage::SkillsExtraction => !user.skills.is_empty(),
                WorkflowStage::SkillAssessment => !records.is_empty(),
                WorkflowStage::VideoLearning => !completed_videos.is_empty(),
            },
        })
        .collect();

    let current_step = steps
        .iter()
        .position(|s| !s.completed)
        .unwrap_or(steps.len()) as u8;
    let done = steps.iter().filter(|s| s.completed).count() as u32;

    let weak = weak_skills(records);
    let recommendations = weak
        .iter()
        .flat_map(|w| recommend_videos(&w.skill, w.score))
        .filter(|v| !completed_videos.contains(&v.video_id))
        .collect();

    LearningProgress {
        steps,
        current_step,
        progress_percent: (done * 100 / TOTAL_STEPS as u32) as u8,
        assessments_taken: records.len(),
        weak_skills: weak,
        completed_videos: completed_videos.to_vec(),
        recommendations,
    }
}

pub async fn load_progress(
    repo: &dyn Repository,
    user: &UserRecord,
) -> Result<LearningProgress, AppError> {
    let records = repo.list_assessment_records(Some(&user.id)).await?;
    let videos = repo.list_completed_videos(&user.id).await?;
    Ok(compute_progress(user, &records, &videos))
}

/// Logs a `WorkflowProgress` activity after `stage` was reached. Best-effort.
pub async fn record_workflow_progress(repo: &dyn Repository, user_id: &str, stage: WorkflowStage) {
    let user = match repo.get_user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!("Skipping workflow progress for {user_id}: {e}");
            return;
        }
    };
    let progress = match load_progress(repo, &user).await {
        Ok(progress) => progress,
        Err(e) => {
            tracing::warn!("Skipping workflow progress for {user_id}: {e}");
            return;
        }
    };

    let event = ActivityEvent::WorkflowProgress {
        step_name: stage.name().to_string(),
        step: stage.number(),
        total_steps: TOTAL_STEPS,
        progress: progress.progress_percent,
    };
    record_activity_logged(repo, NewActivity::now(user_id, event)).await;
}
