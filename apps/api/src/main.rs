mod analytics;
mod assessment;
mod chat;
mod config;
mod db;
mod errors;
mod hackathons;
mod models;
mod progress;
mod repository;
mod routes;
mod skills;
mod state;
mod storage;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::cache::RedisAssessmentCache;
use crate::config::Config;
use crate::db::create_pool;
use crate::repository::PgRepository;
use crate::routes::build_router;
use crate::skills::catalog::SKILL_CATALOG;
use crate::skills::extractor::KeywordSkillExtractor;
use crate::state::AppState;
use crate::storage::S3ResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mavericks API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL (runs migrations)
    let pool = create_pool(&config.database_url).await?;
    let repo = Arc::new(PgRepository::new(pool));

    // Redis-backed assessment sessions
    let redis = redis::Client::open(config.redis_url.clone())?;
    let assessments = Arc::new(RedisAssessmentCache::new(redis, config.assessment_ttl_secs));
    info!(
        "Redis assessment cache initialized (ttl {}s)",
        config.assessment_ttl_secs
    );

    // S3 / MinIO resume storage
    let s3 = build_s3_client(&config).await;
    let resumes = Arc::new(S3ResumeStore::new(s3, config.s3_bucket.clone()));
    info!("S3 resume store initialized (bucket {})", config.s3_bucket);

    let extractor = Arc::new(KeywordSkillExtractor::default());
    info!("Keyword skill extractor loaded ({} catalog skills)", SKILL_CATALOG.len());

    let state = AppState {
        repo,
        assessments,
        resumes,
        extractor,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "mavericks-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
