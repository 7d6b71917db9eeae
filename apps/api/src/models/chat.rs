use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One message/response exchange with the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ChatInteraction {
    pub id: i64,
    pub user_id: String,
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}
