//! Builds an assessment for a skill from the static question bank.
//!
//! Deterministic: the same skill always yields the same question ids in the
//! same order. Only the assessment id and timestamp are fresh per call.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::assessment::models::{
    Assessment, QuestionSource, ASSESSMENT_TIME_LIMIT_SECS, DEFAULT_DIFFICULTY,
};
use crate::assessment::question_bank::{curated_templates, GENERIC};

pub fn generate(skill: &str) -> Assessment {
    generate_at(skill, Utc::now())
}

/// Curated lookup is by exact skill name; anything else gets the generic pair.
pub fn generate_at(skill: &str, created_at: DateTime<Utc>) -> Assessment {
    let (templates, source) = match curated_templates(skill) {
        Some(templates) => (templates, QuestionSource::Curated),
        None => (GENERIC, QuestionSource::Generic),
    };

    Assessment {
        id: Uuid::new_v4(),
        title: format!("{skill} Skills Assessment"),
        skill: skill.to_string(),
        difficulty: DEFAULT_DIFFICULTY.to_string(),
        time_limit_secs: ASSESSMENT_TIME_LIMIT_SECS,
        source,
        questions: templates.iter().map(|t| t.render(skill)).collect(),
        created_at,
    }
}
