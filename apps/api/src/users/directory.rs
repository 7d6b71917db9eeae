//! Admin user directory: search, role filter, and sorting over user records.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::user::{Role, UserRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortKey {
    DisplayName,
    Email,
    Role,
    LoginCount,
    LastLogin,
    CreatedAt,
}

impl UserSortKey {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "display_name" => Some(UserSortKey::DisplayName),
            "email" => Some(UserSortKey::Email),
            "role" => Some(UserSortKey::Role),
            "login_count" => Some(UserSortKey::LoginCount),
            "last_login" => Some(UserSortKey::LastLogin),
            "created_at" => Some(UserSortKey::CreatedAt),
            _ => None,
        }
    }
}

/// Raw query string for `GET /api/v1/admin/users`.
#[derive(Debug, Default, Deserialize)]
pub struct UserDirectoryQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserFilter {
    pub search: Option<String>, // lower-cased
    pub role: Option<Role>,
    pub sort_by: UserSortKey,
    pub descending: bool,
}

impl Default for UserFilter {
    /// Most recent logins first.
    fn default() -> Self {
        Self {
            search: None,
            role: None,
            sort_by: UserSortKey::LastLogin,
            descending: true,
        }
    }
}

impl TryFrom<UserDirectoryQuery> for UserFilter {
    type Error = AppError;

    fn try_from(query: UserDirectoryQuery) -> Result<Self, Self::Error> {
        let defaults = UserFilter::default();

        let search = query
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let role = match query.role.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<Role>().map_err(AppError::Validation)?),
        };

        let sort_by = match query.sort_by.as_deref() {
            None => defaults.sort_by,
            Some(raw) => UserSortKey::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown sort key '{raw}'")))?,
        };

        let descending = match query.order.as_deref() {
            None => defaults.descending,
            Some("asc") => false,
            Some("desc") => true,
            Some(raw) => {
                return Err(AppError::Validation(format!(
                    "order must be 'asc' or 'desc', got '{raw}'"
                )))
            }
        };

        Ok(UserFilter {
            search,
            role,
            sort_by,
            descending,
        })
    }
}

pub fn filter_users(users: Vec<UserRecord>, filter: &UserFilter) -> Vec<UserRecord> {
    let mut matched: Vec<UserRecord> = users
        .into_iter()
        .filter(|u| filter.role.map_or(true, |role| u.role == role))
        .filter(|u| match &filter.search {
            None => true,
            Some(term) => {
                u.email.to_lowercase().contains(term)
                    || u
                        .display_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(term))
            }
        })
        .collect();

    matched.sort_by(|a, b| {
        let ordering = compare(a, b, filter.sort_by);
        if filter.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    matched
}

fn compare(a: &UserRecord, b: &UserRecord, key: UserSortKey) -> Ordering {
    match key {
        UserSortKey::DisplayName => {
            let name = |u: &UserRecord| u.display_name.as_deref().unwrap_or("").to_lowercase();
            name(a).cmp(&name(b))
        }
        UserSortKey::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        UserSortKey::Role => a.role.as_str().cmp(b.role.as_str()),
        UserSortKey::LoginCount => a.login_count.cmp(&b.login_count),
        UserSortKey::LastLogin => a.last_login.cmp(&b.last_login),
        UserSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}
