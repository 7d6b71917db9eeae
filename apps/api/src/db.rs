use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates a PostgreSQL connection pool and applies pending migrations.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    info!("PostgreSQL connection pool established, migrations applied");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    const INIT_MIGRATION: &str = include_str!("../migrations/0001_init.sql");

    #[test]
    fn test_users_email_is_not_unique() {
        let email_column = INIT_MIGRATION
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with("email "))
            .unwrap();
        assert!(!email_column.to_uppercase().contains("UNIQUE"), "{email_column}");
        assert!(!INIT_MIGRATION.to_uppercase().contains("UNIQUE INDEX"));
    }
}
