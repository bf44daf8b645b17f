/// Web route handlers
///
/// Each handler validates what the request carries, resolves the session when
/// the response depends on who is asking, delegates to the repository and
/// shapes the result as an HTML page, an HTML fragment, a JSON envelope or a
/// redirect.

mod page_handlers;
mod image_handlers;
mod user_handlers;
mod comment_handlers;
mod account_handlers;

// Re-export all handlers
pub use page_handlers::*;
pub use image_handlers::*;
pub use user_handlers::*;
pub use comment_handlers::*;
pub use account_handlers::*;

use axum::http::Uri;

/// Path and query of the current request, used to come back after login
pub(crate) fn from_url(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string())
}
