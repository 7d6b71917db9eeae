// Persisted records shared by the repository and the HTTP handlers.
pub mod activity;
pub mod assessment_record;
pub mod chat;
pub mod hackathon;
pub mod user;
