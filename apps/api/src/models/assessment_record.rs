use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::assessment::models::{Assessment, PerformanceBucket, ScoreResult};

/// A completed assessment, kept for progress tracking and admin metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub user_id: String,
    pub skill: String,
    pub title: String,
    pub difficulty: String,
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub elapsed_seconds: u64,
    pub performance: PerformanceBucket,
    pub completed_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn from_result(
        user_id: &str,
        assessment: &Assessment,
        result: &ScoreResult,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: assessment.id,
            user_id: user_id.to_string(),
            skill: result.skill.clone(),
            title: assessment.title.clone(),
            difficulty: assessment.difficulty.clone(),
            score: result.score,
            correct_answers: result.correct_answers,
            total_questions: result.total_questions,
            elapsed_seconds: result.elapsed_seconds,
            performance: result.performance,
            completed_at,
        }
    }
}
