use std::sync::Arc;

use crate::assessment::cache::AssessmentCache;
use crate::config::Config;
use crate::repository::Repository;
use crate::skills::extractor::SkillExtractor;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    /// Assessments between generation and submission.
    pub assessments: Arc<dyn AssessmentCache>,
    pub resumes: Arc<dyn ResumeStore>,
    /// Pluggable skill extractor. Default: KeywordSkillExtractor over the full catalog.
    pub extractor: Arc<dyn SkillExtractor>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    /// Fully in-memory state for router and handler tests.
    pub fn in_memory() -> Self {
        Self::with_repo(Arc::new(crate::repository::InMemoryRepository::new()))
    }

    /// In-memory state around a repository the test keeps a handle to.
    pub fn with_repo(repo: Arc<crate::repository::InMemoryRepository>) -> Self {
        use crate::assessment::cache::InMemoryAssessmentCache;
        use crate::skills::extractor::KeywordSkillExtractor;
        use crate::storage::InMemoryResumeStore;

        let config = Config::for_tests();
        AppState {
            repo,
            assessments: Arc::new(InMemoryAssessmentCache::new(config.assessment_ttl_secs)),
            resumes: Arc::new(InMemoryResumeStore::new()),
            extractor: Arc::new(KeywordSkillExtractor::default()),
            config,
        }
    }
}
