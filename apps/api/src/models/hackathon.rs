use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Hackathon {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub skill_level: Option<String>,
    pub technologies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub participant_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHackathon {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub skill_level: Option<String>,
    pub technologies: Vec<String>,
}
