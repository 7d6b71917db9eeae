//! Holds generated assessments between `start` and `submit`.
//!
//! Entries expire after the configured TTL; an expired assessment can no
//! longer be submitted. `take` is atomic, so an assessment is handed out to
//! at most one submission.

#[cfg(test)]
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
#[cfg(test)]
use tokio::{sync::RwLock, time::Instant};
use tracing::debug;
use uuid::Uuid;

use crate::assessment::models::Assessment;
use crate::errors::AppError;

#[async_trait]
pub trait AssessmentCache: Send + Sync {
    /// Stores (or re-stores) an assessment with a fresh TTL.
    async fn put(&self, assessment: &Assessment) -> Result<(), AppError>;
    /// Removes and returns the assessment in one step. `None` if absent or expired.
    async fn take(&self, id: Uuid) -> Result<Option<Assessment>, AppError>;
}

fn cache_key(id: Uuid) -> String {
    format!("assessment:{id}")
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisAssessmentCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisAssessmentCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Cache(format!("connect: {e}")))
    }
}

#[async_trait]
impl AssessmentCache for RedisAssessmentCache {
    async fn put(&self, assessment: &Assessment) -> Result<(), AppError> {
        let payload = serde_json::to_string(assessment)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize assessment: {e}")))?;
        let mut conn = self.connection().await?;

        redis::cmd("SET")
            .arg(cache_key(assessment.id))
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| AppError::Cache(format!("SET: {e}")))?;

        debug!("Cached assessment {} for {}s", assessment.id, self.ttl_secs);
        Ok(())
    }

    async fn take(&self, id: Uuid) -> Result<Option<Assessment>, AppError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = redis::cmd("GETDEL")
            .arg(cache_key(id))
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Cache(format!("GETDEL: {e}")))?;

        payload
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("corrupt cached assessment {id}: {e}"))
                })
            })
            .transpose()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub struct InMemoryAssessmentCache {
    ttl: Duration,
    entries: RwLock<HashMap<Uuid, (Assessment, Instant)>>,
}

#[cfg(test)]
impl InMemoryAssessmentCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl AssessmentCache for InMemoryAssessmentCache {
    async fn put(&self, assessment: &Assessment) -> Result<(), AppError> {
        let expires_at = Instant::now() + self.ttl;
        self.entries
            .write()
            .await
            .insert(assessment.id, (assessment.clone(), expires_at));
        Ok(())
    }

    async fn take(&self, id: Uuid) -> Result<Option<Assessment>, AppError> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(&id)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(assessment, _)| assessment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::generator::generate;

    #[tokio::test]
    async fn test_take_returns_stored_assessment_once() {
        let cache = InMemoryAssessmentCache::new(60);
        let assessment = generate("React");
        cache.put(&assessment).await.unwrap();

        let taken = cache.take(assessment.id).await.unwrap().unwrap();
        assert_eq!(taken, assessment);
        assert!(cache.take(assessment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_takes_hand_out_one_copy() {
        let cache = std::sync::Arc::new(InMemoryAssessmentCache::new(60));
        let assessment = generate("SQL");
        cache.put(&assessment).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let id = assessment.id;
                tokio::spawn(async move { cache.take(id).await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_put_after_take_makes_assessment_available_again() {
        let cache = InMemoryAssessmentCache::new(60);
        let assessment = generate("Java");
        cache.put(&assessment).await.unwrap();
        let taken = cache.take(assessment.id).await.unwrap().unwrap();

        cache.put(&taken).await.unwrap();
        assert!(cache.take(assessment.id).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = InMemoryAssessmentCache::new(10);
        let fresh = generate("Python");
        let stale = generate("Python");
        cache.put(&fresh).await.unwrap();
        cache.put(&stale).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(cache.take(fresh.id).await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.take(stale.id).await.unwrap().is_none());
    }

    #[test]
    fn test_cache_key_is_namespaced() {
        let id = Uuid::nil();
        assert_eq!(cache_key(id), format!("assessment:{id}"));
    }
}
