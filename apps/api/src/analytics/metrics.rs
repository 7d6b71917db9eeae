use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::assessment_record::AssessmentRecord;
use crate::models::user::UserRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_users: usize,
    pub active_users: usize,
    pub assessments_completed: usize,
    /// Mean score rounded to one decimal; 0.0 when nothing was completed.
    pub average_score: f64,
    pub computed_at: DateTime<Utc>,
}

/// A user is active if their last login is within `active_window_days` of `now`.
/// A window reaching past the earliest representable time counts everyone.
pub fn compute_dashboard_metrics(
    users: &[UserRecord],
    records: &[AssessmentRecord],
    now: DateTime<Utc>,
    active_window_days: i64,
) -> DashboardMetrics {
    let cutoff = Duration::try_days(active_window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let active_users = users.iter().filter(|u| u.last_login >= cutoff).count();

    let average_score = if records.is_empty() {
        0.0
    } else {
        let total: u64 = records.iter().map(|r| u64::from(r.score)).sum();
        let mean = total as f64 / records.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    DashboardMetrics {
        total_users: users.len(),
        active_users,
        assessments_completed: records.len(),
        average_score,
        computed_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::models::PerformanceBucket;
    use crate::models::user::Role;
    use uuid::Uuid;

    fn user(days_since_login: i64, now: DateTime<Utc>) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4().to_string(),
            email: "someone@example.com".to_string(),
            display_name: None,
            role: Role::User,
            created_at: now - Duration::days(90),
            last_login: now - Duration::days(days_since_login),
            login_count: 1,
            skills: vec![],
            resume_uploaded: false,
        }
    }

    fn record(score: u32, now: DateTime<Utc>) -> AssessmentRecord {
        AssessmentRecord {
            id: Uuid::new_v4(),
            user_id: "u".to_string(),
            skill: "SQL".to_string(),
            title: "SQL Skills Assessment".to_string(),
            difficulty: "intermediate".to_string(),
            score,
            correct_answers: 0,
            total_questions: 1,
            elapsed_seconds: 1,
            performance: PerformanceBucket::from_score(score),
            completed_at: now,
        }
    }

    #[test]
    fn test_empty_platform() {
        let metrics = compute_dashboard_metrics(&[], &[], Utc::now(), 30);
        assert_eq!(metrics.total_users, 0);
        assert_eq!(metrics.assessments_completed, 0);
        assert_eq!(metrics.average_score, 0.0);
    }

    #[test]
    fn test_active_window() {
        let now = Utc::now();
        let users = vec![user(0, now), user(30, now), user(31, now)];
        let metrics = compute_dashboard_metrics(&users, &[], now, 30);
        assert_eq!(metrics.total_users, 3);
        assert_eq!(metrics.active_users, 2);
    }

    #[test]
    fn test_oversized_window_counts_everyone() {
        let now = Utc::now();
        let users = vec![user(0, now), user(4000, now)];
        assert_eq!(compute_dashboard_metrics(&users, &[], now, i64::MAX).active_users, 2);
        assert_eq!(compute_dashboard_metrics(&users, &[], now, 10_000_000_000).active_users, 2);
    }

    #[test]
    fn test_average_score_rounds_to_one_decimal() {
        let now = Utc::now();
        let records = vec![record(100, now), record(50, now), record(0, now)];
        let metrics = compute_dashboard_metrics(&[], &records, now, 30);
        assert_eq!(metrics.assessments_completed, 3);
        assert_eq!(metrics.average_score, 50.0);

        let records = vec![record(100, now), record(67, now), record(0, now)];
        assert_eq!(compute_dashboard_metrics(&[], &records, now, 30).average_score, 55.7);
    }
}
