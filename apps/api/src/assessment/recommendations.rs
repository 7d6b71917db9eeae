//! Post-assessment analysis: improvement plan, weak skills, and remedial videos.
//!
//! Video links point at YouTube searches so they never go stale.

use serde::Serialize;
use uuid::Uuid;

use crate::assessment::models::{PerformanceBucket, ScoreResult};

/// Below this score beginner material is listed before intermediate material.
pub const BEGINNER_FIRST_THRESHOLD: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoLevel {
    Beginner,
    Intermediate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRecommendation {
    pub video_id: String,
    pub skill: String,
    pub level: VideoLevel,
    pub video_title: String,
    pub video_url: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentAnalysis {
    pub assessment_id: Uuid,
    pub skill: String,
    pub score: u32,
    pub performance: PerformanceBucket,
    pub weak_skills: Vec<String>,
    pub recommendations: Vec<VideoRecommendation>,
    pub improvement_plan: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Curated video list
// ────────────────────────────────────────────────────────────────────────────

struct CuratedVideo {
    slug: &'static str,
    level: VideoLevel,
    title: &'static str,
    query: &'static str,
    description: &'static str,
}

const CURATED_VIDEOS: &[(&str, &[CuratedVideo])] = &[
    (
        "JavaScript",
        &[
            CuratedVideo {
                slug: "javascript-beginner",
                level: VideoLevel::Beginner,
                title: "JavaScript Crash Course for Beginners",
                query: "javascript crash course for beginners",
                description: "Variables, functions, scope and the DOM from scratch.",
            },
            CuratedVideo {
                slug: "javascript-intermediate",
                level: VideoLevel::Intermediate,
                title: "Modern JavaScript: ES6+ Features",
                query: "modern javascript es6 features tutorial",
                description: "Destructuring, spread, modules, promises and async/await.",
            },
        ],
    ),
    (
        "React",
        &[
            CuratedVideo {
                slug: "react-beginner",
                level: VideoLevel::Beginner,
                title: "React Tutorial for Beginners",
                query: "react tutorial for beginners",
                description: "Components, JSX, props and state.",
            },
            CuratedVideo {
                slug: "react-intermediate",
                level: VideoLevel::Intermediate,
                title: "React Hooks in Depth",
                query: "react hooks in depth useState useEffect",
                description: "useState, useEffect and custom hooks in real components.",
            },
        ],
    ),
    (
        "Node.js",
        &[
            CuratedVideo {
                slug: "nodejs-beginner",
                level: VideoLevel::Beginner,
                title: "Node.js Tutorial for Beginners",
                query: "node.js tutorial for beginners",
                description: "The runtime, npm and your first HTTP server.",
            },
            CuratedVideo {
                slug: "nodejs-intermediate",
                level: VideoLevel::Intermediate,
                title: "Building REST APIs with Node.js and Express",
                query: "node.js express rest api tutorial",
                description: "Routing, middleware and error handling.",
            },
        ],
    ),
    (
        "Python",
        &[
            CuratedVideo {
                slug: "python-beginner",
                level: VideoLevel::Beginner,
                title: "Python for Beginners",
                query: "python for beginners full course",
                description: "Syntax, data types, lists and control flow.",
            },
            CuratedVideo {
                slug: "python-intermediate",
                level: VideoLevel::Intermediate,
                title: "Intermediate Python: Comprehensions, Generators and Decorators",
                query: "intermediate python comprehensions generators decorators",
                description: "Idiomatic Python beyond the basics.",
            },
        ],
    ),
    (
        "Java",
        &[
            CuratedVideo {
                slug: "java-beginner",
                level: VideoLevel::Beginner,
                title: "Java Programming for Beginners",
                query: "java programming for beginners",
                description: "Classes, the main method and core syntax.",
            },
            CuratedVideo {
                slug: "java-intermediate",
                level: VideoLevel::Intermediate,
                title: "Java Collections and Streams",
                query: "java collections and streams tutorial",
                description: "Working with lists, maps and the Stream API.",
            },
        ],
    ),
    (
        "SQL",
        &[
            CuratedVideo {
                slug: "sql-beginner",
                level: VideoLevel::Beginner,
                title: "SQL Basics: SELECT, WHERE and ORDER BY",
                query: "sql basics select where order by",
                description: "Reading data from tables.",
            },
            CuratedVideo {
                slug: "sql-intermediate",
                level: VideoLevel::Intermediate,
                title: "SQL Joins and Aggregations",
                query: "sql joins group by aggregations tutorial",
                description: "Combining tables and summarising results.",
            },
        ],
    ),
];

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

pub fn improvement_plan(score: u32) -> &'static str {
    match PerformanceBucket::from_score(score) {
        PerformanceBucket::Excellent => "Excellent performance!",
        PerformanceBucket::Good => "Good foundation, keep practicing.",
        PerformanceBucket::NeedsImprovement => "Need improvement. Consider additional practice.",
    }
}

/// Videos for one weak skill. Beginner material leads when the score is very low,
/// otherwise intermediate material leads.
pub fn recommend_videos(skill: &str, score: u32) -> Vec<VideoRecommendation> {
    let mut videos: Vec<VideoRecommendation> = match CURATED_VIDEOS.iter().find(|(s, _)| *s == skill) {
        Some((_, curated)) => curated
            .iter()
            .map(|v| VideoRecommendation {
                video_id: v.slug.to_string(),
                skill: skill.to_string(),
                level: v.level,
                video_title: v.title.to_string(),
                video_url: search_url(v.query),
                description: v.description.to_string(),
            })
            .collect(),
        None => vec![fallback_video(skill)],
    };

    if score < BEGINNER_FIRST_THRESHOLD {
        videos.sort_by_key(|v| v.level != VideoLevel::Beginner);
    } else {
        videos.sort_by_key(|v| v.level != VideoLevel::Intermediate);
    }
    videos
}

/// Weak-skill list, videos and plan for one scored assessment.
pub fn analyze(result: &ScoreResult) -> AssessmentAnalysis {
    let weak_skills = if result.is_weak() {
        vec![result.skill.clone()]
    } else {
        Vec::new()
    };

    let recommendations = weak_skills
        .iter()
        .flat_map(|skill| recommend_videos(skill, result.score))
        .collect();

    AssessmentAnalysis {
        assessment_id: result.assessment_id,
        skill: result.skill.clone(),
        score: result.score,
        performance: result.performance,
        weak_skills,
        recommendations,
        improvement_plan: improvement_plan(result.score).to_string(),
    }
}

fn fallback_video(skill: &str) -> VideoRecommendation {
    VideoRecommendation {
        video_id: format!("{}-fundamentals", slugify(skill)),
        skill: skill.to_string(),
        level: VideoLevel::Beginner,
        video_title: format!("{skill} Fundamentals"),
        video_url: search_url(&format!("{skill} tutorial for beginners")),
        description: format!("Core concepts of {skill} explained step by step."),
    }
}

fn search_url(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(query)
    )
}

/// "Ruby on Rails" → "ruby-on-rails", "C++" → "c"
fn slugify(skill: &str) -> String {
    skill
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::generator::generate;
    use crate::assessment::models::AnswerSet;
    use crate::assessment::scorer::score;

    #[test]
    fn test_improvement_plan_tracks_buckets() {
        assert_eq!(improvement_plan(100), "Excellent performance!");
        assert_eq!(improvement_plan(60), "Good foundation, keep practicing.");
        assert_eq!(
            improvement_plan(59),
            "Need improvement. Consider additional practice."
        );
    }

    #[test]
    fn test_low_score_lists_beginner_videos_first() {
        let videos = recommend_videos("React", 10);
        assert_eq!(videos[0].level, VideoLevel::Beginner);
        assert_eq!(videos[1].level, VideoLevel::Intermediate);
    }

    #[test]
    fn test_middling_score_lists_intermediate_videos_first() {
        let videos = recommend_videos("React", 50);
        assert_eq!(videos[0].level, VideoLevel::Intermediate);
    }

    #[test]
    fn test_unknown_skill_gets_search_fallback() {
        let videos = recommend_videos("Ruby on Rails", 20);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "ruby-on-rails-fundamentals");
        assert!(videos[0]
            .video_url
            .starts_with("https://www.youtube.com/results?search_query=Ruby%20on%20Rails"));
    }

    #[test]
    fn test_curated_video_skills_have_question_sets() {
        for (skill, _) in CURATED_VIDEOS {
            assert!(
                crate::assessment::question_bank::curated_templates(skill).is_some(),
                "{skill}"
            );
        }
    }

    #[test]
    fn test_analysis_for_failed_assessment() {
        let assessment = generate("React");
        let analysis = analyze(&score(&assessment, &AnswerSet::new()));
        assert_eq!(analysis.weak_skills, vec!["React".to_string()]);
        assert_eq!(analysis.recommendations.len(), 2);
        assert_eq!(analysis.performance, PerformanceBucket::NeedsImprovement);
    }

    #[test]
    fn test_analysis_for_passed_assessment_has_no_videos() {
        let assessment = generate("SQL");
        let answers: AnswerSet = assessment
            .questions
            .iter()
            .map(|q| (q.id.clone(), q.correct_answer.clone()))
            .collect();
        let analysis = analyze(&score(&assessment, &answers));
        assert!(analysis.weak_skills.is_empty());
        assert!(analysis.recommendations.is_empty());
        assert_eq!(analysis.improvement_plan, "Excellent performance!");
    }
}
