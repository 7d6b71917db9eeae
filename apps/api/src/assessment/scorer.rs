//! Scores submitted answers against an assessment by exact option equality.

use chrono::{DateTime, Utc};

use crate::assessment::models::{AnswerSet, Assessment, PerformanceBucket, QuestionOutcome, ScoreResult};

#[cfg(test)]
pub fn score(assessment: &Assessment, answers: &AnswerSet) -> ScoreResult {
    score_at(assessment, answers, Utc::now())
}

/// Scores as of `submitted_at`. Elapsed time is clamped at zero.
///
/// Panics if the assessment has no questions; the generator never produces one.
pub fn score_at(
    assessment: &Assessment,
    answers: &AnswerSet,
    submitted_at: DateTime<Utc>,
) -> ScoreResult {
    let total = assessment.questions.len();
    assert!(total > 0, "cannot score an assessment without questions");

    let outcomes: Vec<QuestionOutcome> = assessment
        .questions
        .iter()
        .map(|q| {
            let selected = answers.get(&q.id).cloned();
            let is_correct = selected.as_deref() == Some(q.correct_answer.as_str());
            QuestionOutcome {
                question_id: q.id.clone(),
                selected,
                correct_answer: q.correct_answer.clone(),
                is_correct,
                explanation: q.explanation.clone(),
            }
        })
        .collect();

    let correct = outcomes.iter().filter(|o| o.is_correct).count();
    let score = (100.0 * correct as f64 / total as f64).round() as u32;
    let elapsed_seconds = (submitted_at - assessment.created_at).num_seconds().max(0) as u64;

    ScoreResult {
        assessment_id: assessment.id,
        skill: assessment.skill.clone(),
        score,
        correct_answers: correct as u32,
        total_questions: total as u32,
        elapsed_seconds,
        performance: PerformanceBucket::from_score(score),
        outcomes,
    }
}
