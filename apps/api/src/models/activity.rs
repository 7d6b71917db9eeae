//! User activity feed. Each event type carries only its own fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::models::PerformanceBucket;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "activity_type", rename_all = "snake_case")]
pub enum ActivityEvent {
    ResumeUploaded {
        file_name: String,
        file_size: u64,
        skill_count: u32,
        extraction_method: String,
    },
    SkillIdentified {
        skill: String,
    },
    SkillsUpdated {
        skills: Vec<String>,
    },
    AssessmentCompleted {
        skill: String,
        score: u32,
        correct_answers: u32,
        total_questions: u32,
        elapsed_seconds: u64,
        performance: PerformanceBucket,
        weak_skill_identified: bool,
    },
    WorkflowProgress {
        step_name: String,
        step: u8,
        total_steps: u8,
        progress: u8, // percent
    },
    VideoCompleted {
        video_id: String,
        skill: Option<String>,
    },
}

impl ActivityEvent {
    /// Matches the serialized `activity_type` tag.
    pub fn activity_type(&self) -> &'static str {
        match self {
            ActivityEvent::ResumeUploaded { .. } => "resume_uploaded",
            ActivityEvent::SkillIdentified { .. } => "skill_identified",
            ActivityEvent::SkillsUpdated { .. } => "skills_updated",
            ActivityEvent::AssessmentCompleted { .. } => "assessment_completed",
            ActivityEvent::WorkflowProgress { .. } => "workflow_progress",
            ActivityEvent::VideoCompleted { .. } => "video_completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<String>,
    pub event: ActivityEvent,
    pub at: DateTime<Utc>,
}

impl NewActivity {
    pub fn now(user_id: &str, event: ActivityEvent) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            event,
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: ActivityEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ActivityEvent::SkillIdentified {
            skill: "Rust".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["activity_type"], "skill_identified");
        assert_eq!(value["skill"], "Rust");
    }

    #[test]
    fn test_activity_type_matches_serde_tag() {
        let events = vec![
            ActivityEvent::ResumeUploaded {
                file_name: "cv.pdf".to_string(),
                file_size: 10,
                skill_count: 1,
                extraction_method: "content_based".to_string(),
            },
            ActivityEvent::SkillsUpdated { skills: vec![] },
            ActivityEvent::AssessmentCompleted {
                skill: "SQL".to_string(),
                score: 50,
                correct_answers: 1,
                total_questions: 2,
                elapsed_seconds: 30,
                performance: PerformanceBucket::NeedsImprovement,
                weak_skill_identified: true,
            },
            ActivityEvent::WorkflowProgress {
                step_name: "Skill Assessment".to_string(),
                step: 3,
                total_steps: 4,
                progress: 75,
            },
            ActivityEvent::VideoCompleted {
                video_id: "sql-beginner".to_string(),
                skill: None,
            },
        ];
        for event in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["activity_type"], event.activity_type());
            let back: ActivityEvent = serde_json::from_value(value).unwrap();
            assert_eq!(back, event);
        }
    }

    #[test]
    fn test_record_flattens_event_fields() {
        let record = ActivityRecord {
            id: 7,
            user_id: Some("u1".to_string()),
            created_at: Utc::now(),
            event: ActivityEvent::SkillIdentified {
                skill: "Docker".to_string(),
            },
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["activity_type"], "skill_identified");
        assert_eq!(value["skill"], "Docker");
    }
}
