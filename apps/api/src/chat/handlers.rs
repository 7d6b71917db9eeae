//! Axum route handler for the chat assistant.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::chat::responder::respond;
use crate::errors::AppError;
use crate::models::chat::ChatInteraction;
use crate::state::AppState;
use crate::users::auth::CurrentUser;

pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// POST /api/v1/chat
///
/// Answers from the keyword responder and stores the exchange.
pub async fn handle_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatInteraction>, AppError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "message exceeds {MAX_MESSAGE_CHARS} characters"
        )));
    }

    let response = respond(message);
    let interaction = state
        .repo
        .save_chat_interaction(&user.id, message, response, Utc::now())
        .await?;

    Ok(Json(interaction))
}
