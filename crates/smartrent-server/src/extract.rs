//! Request identity extraction.

use axum::{extract::FromRequestParts, http::request::Parts};
use smartrent::{Requester, UserRole};

use crate::error::ApiError;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the user's role; defaults to USER when absent
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Identity asserted by the upstream auth gateway
#[derive(Debug, Clone)]
pub struct Authenticated(pub Requester);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthenticated(format!("missing {USER_ID_HEADER} header")))?;
        let role = match header(parts, USER_ROLE_HEADER) {
            Some(raw) => raw
                .parse::<UserRole>()
                .map_err(|err| ApiError::Unauthenticated(err.to_string()))?,
            None => UserRole::User,
        };
        Ok(Self(Requester::new(id, role)))
    }
}
