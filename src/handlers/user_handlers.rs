use axum::{
    Json,
    extract::{Path, State},
    http::Uri,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::from_url;
use crate::db::DbPool;
use crate::dto::{CommentInfo, FormatQuery, ResponseFormat, StatusMessage};
use crate::errors::ApiError;
use crate::extract::QueryParams;
use crate::repo;
use crate::session::handle_session;
use crate::util::mime_type_to_ext;
use crate::views::{self, ImageLink};

/// Handler for a user's profile
///
/// This function handles GET requests to `/users/{username}`. With
/// `?type=json` it only confirms that the user exists.
#[instrument(skip(pool, jar, uri, query))]
pub async fn user_page_handler(
    State(pool): State<Arc<DbPool>>,
    Path(username): Path<String>,
    QueryParams(query): QueryParams<FormatQuery>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, ApiError> {
    let (jar, session_user) = handle_session(&pool, jar)?;

    let not_found = || ApiError::not_found(format!("Could not find user {}.", username));
    let user = repo::find_user(&pool, &username)
        .map_err(|e| {
            warn!("User lookup failed: {:#}", e);
            not_found()
        })?
        .ok_or_else(not_found)?;

    info!("Served user page of user {}", user.get_username());
    let response = match query.format_or(ResponseFormat::Html) {
        ResponseFormat::Json => (jar, Json(StatusMessage::success(user.get_username()))).into_response(),
        ResponseFormat::Html => {
            let username = user.get_username();
            let load_failed = |e: anyhow::Error| {
                warn!("Loading profile of {} failed: {:#}", username, e);
                ApiError::failed(format!("Could not load comments for user {}.", username))
            };
            let uploads: Vec<ImageLink> = repo::find_images_for_user(&pool, &username)
                .map_err(load_failed)?
                .into_iter()
                .filter_map(|(id, mimetype)| {
                    mime_type_to_ext(&mimetype).map(|ext| ImageLink {
                        id,
                        image_src: format!("{}.{}", id, ext),
                    })
                })
                .collect();
            let comments: Vec<CommentInfo> = repo::find_comments_for_user(&pool, &username)
                .map_err(load_failed)?
                .iter()
                .map(CommentInfo::from)
                .collect();

            let page = views::user_view(
                &username,
                &uploads,
                &comments,
                session_user.as_ref(),
                &from_url(&uri),
            );
            (jar, Html(page)).into_response()
        }
    };
    Ok(response)
}
