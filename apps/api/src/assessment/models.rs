use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scores strictly below this flag the skill as weak.
/// Independent of the `PerformanceBucket` thresholds.
pub const WEAK_SKILL_THRESHOLD: u32 = 70;

/// Client-side countdown for one assessment session.
pub const ASSESSMENT_TIME_LIMIT_SECS: u32 = 600;

pub const DEFAULT_DIFFICULTY: &str = "intermediate";

/// A single multiple-choice question. `correct_answer` is always one of `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub skill: String,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

/// Where an assessment's questions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Curated,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub title: String,
    pub skill: String,
    pub difficulty: String,
    pub time_limit_secs: u32,
    pub source: QuestionSource,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// Question id → selected option text.
pub type AnswerSet = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBucket {
    Excellent,
    Good,
    NeedsImprovement,
}

impl PerformanceBucket {
    /// ≥80 excellent, 60–79 good, <60 needs improvement.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => PerformanceBucket::Excellent,
            s if s >= 60 => PerformanceBucket::Good,
            _ => PerformanceBucket::NeedsImprovement,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceBucket::Excellent => "excellent",
            PerformanceBucket::Good => "good",
            PerformanceBucket::NeedsImprovement => "needs_improvement",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "excellent" => Some(PerformanceBucket::Excellent),
            "good" => Some(PerformanceBucket::Good),
            "needs_improvement" => Some(PerformanceBucket::NeedsImprovement),
            _ => None,
        }
    }
}

pub fn is_weak_score(score: u32) -> bool {
    score < WEAK_SKILL_THRESHOLD
}

/// Per-question review line shown after submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub assessment_id: Uuid,
    pub skill: String,
    pub score: u32, // 0 – 100
    pub correct_answers: u32,
    pub total_questions: u32,
    pub elapsed_seconds: u64,
    pub performance: PerformanceBucket,
    pub outcomes: Vec<QuestionOutcome>,
}

impl ScoreResult {
    pub fn is_weak(&self) -> bool {
        is_weak_score(self.score)
    }
}
