use axum::{
    Json,
    extract::{Query, Request},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::dto::{FormatQuery, ResponseFormat, StatusMessage};
use crate::views;

/// Shown when the real cause must stay in the logs
pub const GENERIC_ERROR_MESSAGE: &str =
    "There was an error loading this page. Please try again later.";

/// Every way a route can fail
///
/// All variants answer with a 500: clients tell failures apart by message,
/// not by status code.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required field is missing or malformed
    #[error("{0}")]
    Invalid(String),
    /// The requested image or user does not exist
    #[error("{0}")]
    NotFound(String),
    /// A store operation failed; the message is safe to show
    #[error("{0}")]
    Failed(String),
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl ApiError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::Invalid(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        ApiError::Failed(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// The text shown to the client
    pub fn message(&self) -> String {
        match self {
            ApiError::Invalid(msg) | ApiError::NotFound(msg) | ApiError::Failed(msg) => msg.clone(),
            ApiError::Database(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Renders the error page regardless of the requested format
    pub fn into_html_response(self) -> Response {
        self.log();
        (self.status(), Html(views::error_page(&self.message()))).into_response()
    }

    fn log(&self) {
        if let ApiError::Database(err) = self {
            error!("Request failed: {:#}", err);
        }
    }
}

/// Marks a response as an [`ApiError`] so [`render_error_pages`] can swap
/// the JSON body for an HTML page
#[derive(Debug, Clone)]
pub struct ErrorMessage(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let message = self.message();
        let mut response = (self.status(), Json(StatusMessage::error(message.clone()))).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

/// Middleware: errors are JSON only for `?type=json`, otherwise the HTML
/// error page with the same status
pub async fn render_error_pages(req: Request, next: Next) -> Response {
    let format = Query::<FormatQuery>::try_from_uri(req.uri())
        .map(|Query(query)| query.format_or(ResponseFormat::Html))
        .unwrap_or(ResponseFormat::Html);

    let mut response = next.run(req).await;
    let Some(ErrorMessage(message)) = response.extensions_mut().remove::<ErrorMessage>() else {
        return response;
    };

    match format {
        ResponseFormat::Json => response,
        ResponseFormat::Html => (response.status(), Html(views::error_page(&message))).into_response(),
    }
}
