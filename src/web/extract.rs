//! Request extractors.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;

use crate::auth::{AUTH_COOKIE, AUTH_HEADER};

use super::error::ApiError;
use super::handlers::AppState;

/// The authenticated account behind the current request.
///
/// Resolution order matches the session layer: the `auth` cookie wins,
/// the `X-Auth` header is the fallback. Requests with neither, or with a
/// token that fails verification, are rejected with 401 before the handler
/// runs.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(AUTH_COOKIE).map(|c| c.value().to_string());
        let header = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let account_id = state
            .sessions
            .extract(cookie.as_deref(), header.as_deref())?;
        Ok(CurrentUser(account_id))
    }
}
