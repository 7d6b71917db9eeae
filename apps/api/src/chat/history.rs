//! Admin view over stored chat interactions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::chat::ChatInteraction;

/// Query string for `GET /api/v1/admin/chat-interactions`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatHistoryQuery {
    pub search: Option<String>,
    pub user_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatFilter {
    pub search: Option<String>, // lower-cased
    pub user_id: Option<String>,
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound: the day after `end_date`.
    pub until: Option<DateTime<Utc>>,
}

impl TryFrom<ChatHistoryQuery> for ChatFilter {
    type Error = AppError;

    fn try_from(query: ChatHistoryQuery) -> Result<Self, Self::Error> {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if end < start {
                return Err(AppError::Validation(
                    "end_date must not be before start_date".to_string(),
                ));
            }
        }

        let until = match query.end_date {
            Some(end) => {
                let next_day = end.succ_opt().ok_or_else(|| {
                    AppError::Validation(format!("end_date {end} is out of range"))
                })?;
                Some(start_of_day(next_day))
            }
            None => None,
        };

        Ok(ChatFilter {
            search: query
                .search
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            user_id: query.user_id.filter(|u| !u.trim().is_empty()),
            from: query.start_date.map(start_of_day),
            until,
        })
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub fn filter_interactions(
    interactions: Vec<ChatInteraction>,
    filter: &ChatFilter,
) -> Vec<ChatInteraction> {
    interactions
        .into_iter()
        .filter(|c| filter.user_id.as_ref().map_or(true, |u| &c.user_id == u))
        .filter(|c| filter.from.map_or(true, |from| c.timestamp >= from))
        .filter(|c| filter.until.map_or(true, |until| c.timestamp < until))
        .filter(|c| match &filter.search {
            None => true,
            Some(term) => {
                c.message.to_lowercase().contains(term) || c.response.to_lowercase().contains(term)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn interaction(id: i64, user: &str, message: &str, at: DateTime<Utc>) -> ChatInteraction {
        ChatInteraction {
            id,
            user_id: user.to_string(),
            message: message.to_string(),
            response: crate::chat::responder::respond(message).to_string(),
            timestamp: at,
        }
    }

    fn sample() -> Vec<ChatInteraction> {
        vec![
            interaction(1, "u1", "hello", Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
            interaction(2, "u2", "resume tips", Utc.with_ymd_and_hms(2024, 3, 2, 23, 59, 0).unwrap()),
            interaction(3, "u1", "qwerty", Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap()),
        ]
    }

    fn ids(items: &[ChatInteraction]) -> Vec<i64> {
        items.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_search_covers_message_and_response() {
        let filter = ChatFilter {
            search: Some("resume builder".to_string()),
            ..ChatFilter::default()
        };
        assert_eq!(ids(&filter_interactions(sample(), &filter)), vec![2]);
    }

    #[test]
    fn test_user_filter() {
        let filter = ChatFilter {
            user_id: Some("u1".to_string()),
            ..ChatFilter::default()
        };
        assert_eq!(ids(&filter_interactions(sample(), &filter)), vec![1, 3]);
    }

    #[test]
    fn test_date_range_is_inclusive_of_whole_days() {
        let filter = ChatFilter::try_from(ChatHistoryQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            ..ChatHistoryQuery::default()
        })
        .unwrap();
        assert_eq!(ids(&filter_interactions(sample(), &filter)), vec![2]);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let result = ChatFilter::try_from(ChatHistoryQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 5),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..ChatHistoryQuery::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_last_representable_end_date_is_rejected() {
        let result = ChatFilter::try_from(ChatHistoryQuery {
            end_date: Some(NaiveDate::MAX),
            ..ChatHistoryQuery::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));

        let filter = ChatFilter::try_from(ChatHistoryQuery {
            start_date: Some(NaiveDate::MAX),
            ..ChatHistoryQuery::default()
        })
        .unwrap();
        assert!(filter_interactions(sample(), &filter).is_empty());
    }
}
