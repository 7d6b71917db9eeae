pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{analytics, assessment, chat, hackathons, progress, skills, users};

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users/login", post(users::handlers::handle_login))
        .route("/api/v1/users/me", get(users::handlers::handle_me))
        // Resume analysis
        .route(
            "/api/v1/resumes/analyze",
            post(skills::handlers::handle_analyze_resume)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Assessments
        .route(
            "/api/v1/assessments",
            post(assessment::handlers::handle_start_assessment),
        )
        .route(
            "/api/v1/assessments/batch",
            post(assessment::handlers::handle_start_batch),
        )
        .route(
            "/api/v1/assessments/:id/submit",
            post(assessment::handlers::handle_submit_assessment),
        )
        // Learning progress
        .route("/api/v1/progress", get(progress::handlers::handle_get_progress))
        .route(
            "/api/v1/progress/videos/:video_id/complete",
            post(progress::handlers::handle_complete_video),
        )
        // Hackathons
        .route(
            "/api/v1/hackathons",
            get(hackathons::handlers::handle_list_hackathons)
                .post(hackathons::handlers::handle_create_hackathon),
        )
        .route(
            "/api/v1/hackathons/:id",
            put(hackathons::handlers::handle_update_hackathon)
                .delete(hackathons::handlers::handle_delete_hackathon),
        )
        .route(
            "/api/v1/hackathons/:id/join",
            post(hackathons::handlers::handle_join_hackathon),
        )
        // Chat assistant
        .route("/api/v1/chat", post(chat::handlers::handle_chat))
        // Admin analytics
        .route("/api/v1/admin/metrics", get(analytics::handlers::handle_metrics))
        .route("/api/v1/admin/users", get(analytics::handlers::handle_list_users))
        .route(
            "/api/v1/admin/login-logs",
            get(analytics::handlers::handle_login_logs),
        )
        .route(
            "/api/v1/admin/activities",
            get(analytics::handlers::handle_activities),
        )
        .route(
            "/api/v1/admin/chat-interactions",
            get(analytics::handlers::handle_chat_interactions),
        )
        .with_state(state)
}
