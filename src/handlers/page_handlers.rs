use axum::{
    extract::State,
    http::Uri,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::from_url;
use crate::db::DbPool;
use crate::dto::FromUrlQuery;
use crate::extract::QueryParams;
use crate::session::handle_session;
use crate::views;

/// Handler for the landing page
///
/// This function handles GET requests to `/`, `/index.html` and `/index.htm`.
/// The page is always HTML, including when something goes wrong.
#[instrument(skip_all, fields(uri = %uri))]
pub async fn index_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    uri: Uri,
) -> Response {
    match handle_session(&pool, jar) {
        Ok((jar, user)) => {
            debug!("Rendering index for {:?}", user.as_ref().map(|u| &u.username));
            (jar, Html(views::index(user.as_ref(), &from_url(&uri)))).into_response()
        }
        Err(err) => err.into_html_response(),
    }
}

/// Handler for the registration form
///
/// This function handles GET requests to `/register`.
pub async fn register_page_handler(QueryParams(query): QueryParams<FromUrlQuery>) -> Html<String> {
    let from_url = query.from_url.unwrap_or_else(|| "home".to_string());
    Html(views::register_view(&from_url))
}

/// Handler for the login form
///
/// This function handles GET requests to `/login`.
pub async fn login_page_handler(QueryParams(query): QueryParams<FromUrlQuery>) -> Html<String> {
    let from_url = query.from_url.unwrap_or_else(|| "home".to_string());
    Html(views::login_view(&from_url))
}
