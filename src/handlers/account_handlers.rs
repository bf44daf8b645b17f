use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::ValidateEmail;

use crate::db::DbPool;
use crate::dto::{FormatQuery, LoginDto, LogoutDto, RegisterDto, ResponseFormat, StatusMessage};
use crate::errors::ApiError;
use crate::extract::{Payload, QueryParams};
use crate::repo::{self, AccountError};
use crate::session;
use crate::util::redirect_path;

/// Turns a failed registration into the message the form shows
fn registration_error(err: anyhow::Error) -> ApiError {
    match err.downcast_ref::<AccountError>() {
        Some(AccountError::DuplicateField { field: "email" }) => {
            ApiError::failed("Email already exists.")
        }
        Some(AccountError::DuplicateField { .. }) => ApiError::failed("Username already exists."),
        Some(other) => ApiError::failed(other.to_string()),
        None => ApiError::Database(err),
    }
}

/// JSON clients get a confirmation, browsers are sent back where they came from
fn success_or_redirect(
    jar: CookieJar,
    format: ResponseFormat,
    message: &'static str,
    redirect_url: Option<&str>,
) -> Response {
    match format {
        ResponseFormat::Json => (jar, Json(StatusMessage::success(message))).into_response(),
        ResponseFormat::Html => (jar, Redirect::to(&redirect_path(redirect_url))).into_response(),
    }
}

/// Handler for registering a new account
///
/// This function handles POST requests to `/register`. On success the new
/// user is logged in.
#[instrument(skip_all)]
pub async fn register_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    QueryParams(query): QueryParams<FormatQuery>,
    Payload(payload): Payload<RegisterDto>,
) -> Result<Response, ApiError> {
    let username = payload
        .username
        .ok_or_else(|| ApiError::invalid("Can not register user. Missing username."))?;
    let password = payload
        .password
        .ok_or_else(|| ApiError::invalid("Can not register user. Missing password."))?;
    let password_confirm = payload
        .password_confirm
        .ok_or_else(|| ApiError::invalid("Can not register user. Missing password confirmation."))?;
    let email = payload
        .email
        .ok_or_else(|| ApiError::invalid("Can not register user. Missing email."))?;

    if password != password_confirm {
        return Err(ApiError::invalid("Can not register user. Passwords don't match."));
    }
    if !email.validate_email() {
        return Err(ApiError::invalid("Can not register user. Invalid email."));
    }

    let user = repo::add_user(&pool, &username, &email, &password).map_err(registration_error)?;
    let jar = session::start_session(&pool, jar, &user)?;

    info!("Registered and logged in {}", user.get_username());
    Ok(success_or_redirect(
        jar,
        query.format_or(ResponseFormat::Html),
        "User registered.",
        payload.redirect_url.as_deref(),
    ))
}

/// Handler for logging in
///
/// This function handles POST requests to `/login`.
#[instrument(skip_all)]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    QueryParams(query): QueryParams<FormatQuery>,
    Payload(payload): Payload<LoginDto>,
) -> Result<Response, ApiError> {
    let username = payload
        .username
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::invalid("Can not login user. Missing username."))?;
    let password = payload
        .password
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::invalid("Can not login user. Missing password."))?;

    let user = repo::login_user(&pool, &username, &password).map_err(|err| {
        match err.downcast_ref::<AccountError>() {
            Some(account_error) => ApiError::failed(account_error.to_string()),
            None => ApiError::Database(err),
        }
    })?;
    let jar = session::start_session(&pool, jar, &user)?;

    Ok(success_or_redirect(
        jar,
        query.format_or(ResponseFormat::Html),
        "Login successful.",
        payload.redirect_url.as_deref(),
    ))
}

/// Handler for logging out
///
/// This function handles POST requests to `/logout`.
#[instrument(skip_all)]
pub async fn logout_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    Payload(payload): Payload<LogoutDto>,
) -> Result<Response, ApiError> {
    let jar = session::end_session(&pool, jar)?;
    info!("Logged out");
    Ok((jar, Redirect::to(&redirect_path(payload.redirect_url.as_deref()))).into_response())
}
