//! Skill extraction: a pluggable, trait-based scanner that finds catalog skills in resume text.
//!
//! Default: `KeywordSkillExtractor` (pure, deterministic, substring based).
//!
//! `AppState` holds an `Arc<dyn SkillExtractor>`.

use std::collections::BTreeSet;

use crate::skills::catalog::SKILL_CATALOG;

/// Skills found in one document. Always a subset of the extractor's catalog.
/// Iteration order is alphabetical, which keeps API output stable.
pub type ExtractionResult = BTreeSet<String>;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The extractor trait. Implementations must be pure: same text, same result.
pub trait SkillExtractor: Send + Sync {
    fn extract(&self, text: &str) -> ExtractionResult;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordSkillExtractor (default implementation)
// ────────────────────────────────────────────────────────────────────────────

/// Substring scanner over a static catalog.
///
/// Algorithm, per catalog entry:
/// 1. lower-case the skill name (the text is lower-cased once up front)
/// 2. build four candidate forms: as-is, dots removed, whitespace removed,
///    hyphens removed
/// 3. the skill is present if any form is a substring of the text
///
/// No fallback skills are ever added: no match means an empty set.
pub struct KeywordSkillExtractor {
    patterns: Vec<SkillPattern>,
}

struct SkillPattern {
    canonical: &'static str,
    forms: Vec<String>,
}

impl KeywordSkillExtractor {
    pub fn with_catalog(catalog: &'static [&'static str]) -> Self {
        let patterns = catalog
            .iter()
            .map(|skill| SkillPattern {
                canonical: skill,
                forms: candidate_forms(skill),
            })
            .collect();
        Self { patterns }
    }
}

impl Default for KeywordSkillExtractor {
    fn default() -> Self {
        Self::with_catalog(SKILL_CATALOG)
    }
}

impl SkillExtractor for KeywordSkillExtractor {
    fn extract(&self, text: &str) -> ExtractionResult {
        let text_lower = text.to_lowercase();

        self.patterns
            .iter()
            .filter(|p| p.forms.iter().any(|form| text_lower.contains(form.as_str())))
            .map(|p| p.canonical.to_string())
            .collect()
    }
}

#[cfg(test)]
/// Convenience wrapper over the default catalog.
pub fn extract_skills(text: &str) -> ExtractionResult {
    KeywordSkillExtractor::default().extract(text)
}

/// The normalized spellings a skill may appear under, deduplicated.
/// Empty forms are dropped since they would match every text.
fn candidate_forms(skill: &str) -> Vec<String> {
    let lower = skill.to_lowercase();
    let candidates = [
        lower.clone(),
        lower.replace('.', ""),
        lower.split_whitespace().collect::<String>(),
        lower.replace('-', ""),
    ];

    let mut forms: Vec<String> = Vec::with_capacity(candidates.len());
    for form in candidates {
        if !form.is_empty() && !forms.contains(&form) {
            forms.push(form);
        }
    }
    forms
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
