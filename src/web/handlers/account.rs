//! Account handlers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::auth::AuthCookie;

use super::super::error::ApiError;
use super::super::extract::CurrentUser;
use super::AppState;

const X_AUTH: HeaderName = HeaderName::from_static("x-auth");

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login query parameters.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "oldPassword")]
    pub old_password: Option<String>,
}

/// Account as exposed over the API. The id never leaves the server; it only
/// travels inside the signed session token.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            email: account.email,
            name: account.name,
        }
    }
}

/// POST /api/account - Register a new account and log it in.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let account = state
        .accounts
        .register(
            req.name.as_deref(),
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    authenticated_response(&state, account)
}

/// GET /api/account/_login - Login with email and password.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<Response, ApiError> {
    let email = query.email.as_deref().unwrap_or_default();
    let password = query.password.as_deref().unwrap_or_default();
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let account = state.accounts.login(email, password).await?;
    authenticated_response(&state, account)
}

/// GET /api/account/_logout - Clear the session cookie.
///
/// Purely client-side: the token itself stays verifiable, there is no
/// server-side revocation.
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut response = StatusCode::NO_CONTENT.into_response();
    set_cookie(&mut response, &state.sessions.clear())?;
    Ok(response)
}

/// GET /api/account - Get the logged-in account.
pub async fn current(
    State(state): State<AppState>,
    CurrentUser(account_id): CurrentUser,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.get_account(account_id).await?;
    Ok(Json(account.into()))
}

/// PUT /api/account - Update the logged-in account.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(account_id): CurrentUser,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .accounts
        .update(
            account_id,
            req.name.as_deref(),
            req.email.as_deref(),
            req.password.as_deref(),
            req.old_password.as_deref(),
        )
        .await?;
    Ok(Json(account.into()))
}

/// Build an account response carrying a fresh session in both the cookie
/// and the `X-Auth` header, so cookie-less clients can pick the token up
/// from the header.
fn authenticated_response(state: &AppState, account: Account) -> Result<Response, ApiError> {
    let (token, cookie) = state.sessions.issue(account.id);

    let mut response = Json(AccountResponse::from(account)).into_response();
    set_cookie(&mut response, &cookie)?;
    response.headers_mut().insert(
        X_AUTH,
        HeaderValue::from_str(&token)
            .map_err(|_| ApiError::internal("failed to encode session token"))?,
    );
    Ok(response)
}

fn set_cookie(response: &mut Response, cookie: &AuthCookie) -> Result<(), ApiError> {
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie.header_value())
            .map_err(|_| ApiError::internal("failed to encode session cookie"))?,
    );
    Ok(())
}
