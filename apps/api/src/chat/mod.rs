// Chat assistant: keyword responder, interaction history, and admin filtering.
pub mod handlers;
pub mod history;
pub mod responder;
