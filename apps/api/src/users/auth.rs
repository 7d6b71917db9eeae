//! Caller identity extractors.
//!
//! The auth gateway in front of this service verifies the session and sets
//! `x-user-id`. Authorization is decided from the stored user record only.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::models::user::UserRecord;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The `x-user-id` value, if present and non-blank.
pub fn caller_id(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// A known, logged-in user. 401 otherwise.
pub struct CurrentUser(pub UserRecord);

/// Like `CurrentUser`, but anonymous callers pass through as `None`.
/// A header naming an unknown user is still rejected.
pub struct MaybeUser(pub Option<UserRecord>);

/// A user whose record carries `Role::Admin`. 401 / 403 otherwise.
pub struct AdminUser(pub UserRecord);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(user_id) = caller_id(parts) else {
            return Ok(MaybeUser(None));
        };
        let user = state
            .repo
            .get_user(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(MaybeUser(Some(user)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(CurrentUser(user)),
            MaybeUser(None) => Err(AppError::Unauthorized),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!("User {} denied admin access", user.id);
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_caller_id_trims_and_rejects_blank() {
        assert_eq!(caller_id(&parts_with(Some(" u1 "))), Some("u1"));
        assert_eq!(caller_id(&parts_with(Some("   "))), None);
        assert_eq!(caller_id(&parts_with(None)), None);
    }

    #[tokio::test]
    async fn test_anonymous_caller_is_none_for_maybe_user() {
        let state = AppState::in_memory();
        let mut parts = parts_with(None);
        let MaybeUser(user) = MaybeUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_is_unauthorized() {
        let state = AppState::in_memory();
        let mut parts = parts_with(Some("ghost"));
        let result = CurrentUser::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
