//! Deterministic keyword responder. Rules are checked in order; first match wins.
//!
//! Matching is a case-insensitive substring test, so "this" triggers the
//! greeting through "hi".

struct Rule {
    keywords: &'static [&'static str],
    response: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["hello", "hi"],
        response: "Hello! How can I help you today?",
    },
    Rule {
        keywords: &["help", "doubt"],
        response: "I'm here to help! What specific question do you have about coding or the platform?",
    },
    Rule {
        keywords: &["code", "programming"],
        response: "Programming is a valuable skill! Are you looking for resources, tips, or help with a specific language?",
    },
    Rule {
        keywords: &["hackathon"],
        response: "We have several hackathons planned! You can view them in the Hackathons tab. Is there something specific you'd like to know?",
    },
    Rule {
        keywords: &["resume"],
        response: "You can upload and manage your resume in the Resume Builder section. Would you like tips on creating an effective tech resume?",
    },
];

pub const DEFAULT_RESPONSE: &str = "Thank you for your question. I'm here to help with coding questions, platform navigation, or learning resources. Could you provide more details about what you're looking for?";

pub fn respond(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map_or(DEFAULT_RESPONSE, |rule| rule.response)
}
