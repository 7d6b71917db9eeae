use std::ops::RangeInclusive;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
    /// How long a generated assessment stays submittable.
    pub assessment_ttl_secs: u64,
    pub max_upload_bytes: usize,
    /// Users whose last login falls inside this window count as active.
    /// Bounded to `1..=MAX_ACTIVE_USER_WINDOW_DAYS`.
    pub active_user_window_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            port: optional_env("PORT", 8002)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            assessment_ttl_secs: optional_env("ASSESSMENT_TTL_SECS", 3600)?,
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            active_user_window_days: bounded(
                "ACTIVE_USER_WINDOW_DAYS",
                optional_env("ACTIVE_USER_WINDOW_DAYS", 30)?,
                1..=MAX_ACTIVE_USER_WINDOW_DAYS,
            )?,
        })
    }
}

pub const MAX_ACTIVE_USER_WINDOW_DAYS: i64 = 3650;

fn bounded<T>(key: &str, value: T, range: RangeInclusive<T>) -> Result<T>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        bail!(
            "Environment variable '{key}' must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests; none of the URLs are dialed.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/mavericks_test".to_string(),
            redis_url: "redis://localhost".to_string(),
            s3_bucket: "mavericks-test".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            port: 8002,
            rust_log: "debug".to_string(),
            assessment_ttl_secs: 3600,
            max_upload_bytes: 1024 * 1024,
            active_user_window_days: 30,
        }
    }
}
