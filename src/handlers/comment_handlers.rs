use axum::{
    Json,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::comments::{CommentContext, NO_COMMENTS_MESSAGE, comment_html, comments_section};
use crate::db::DbPool;
use crate::dto::{
    CommentInfo, CommentList, CommentResponseQuery, FormatQuery, PostCommentDto, ResponseFormat,
    StatusMessage,
};
use crate::errors::ApiError;
use crate::extract::{Payload, QueryParams};
use crate::models::Comment;
use crate::repo;
use crate::session;
use crate::util::id_from_param;

/// Shapes a comment listing as an HTML fragment or a JSON envelope
fn comment_listing(comments: &[Comment], format: ResponseFormat, context: CommentContext) -> Response {
    let infos: Vec<CommentInfo> = comments.iter().map(CommentInfo::from).collect();

    match format {
        ResponseFormat::Html => Html(comments_section(&infos, context)).into_response(),
        ResponseFormat::Json if infos.is_empty() => {
            Json(StatusMessage::success(NO_COMMENTS_MESSAGE)).into_response()
        }
        ResponseFormat::Json => Json(CommentList::new(infos)).into_response(),
    }
}

/// Handler for listing the comments on an image
///
/// This function handles GET requests to `/images/{id}/comments`. JSON is the
/// default; `?type=html` returns the rendered fragment.
#[instrument(skip(pool, query))]
pub async fn image_comments_handler(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<String>,
    QueryParams(query): QueryParams<FormatQuery>,
) -> Result<Response, ApiError> {
    let id = id_from_param(&id)
        .ok_or_else(|| ApiError::not_found("Image of this ID does not exist on the database."))?;

    let comments = repo::find_comments_for_image(&pool, id).map_err(|e| {
        warn!("Loading comments failed: {:#}", e);
        ApiError::failed(format!("Could not load comments for image of image ID {}.", id))
    })?;

    Ok(comment_listing(&comments, query.format_or(ResponseFormat::Json), CommentContext::Image))
}

/// Handler for listing the comments a user has written
///
/// This function handles GET requests to `/users/{username}/comments`.
#[instrument(skip(pool, query))]
pub async fn user_comments_handler(
    State(pool): State<Arc<DbPool>>,
    Path(username): Path<String>,
    QueryParams(query): QueryParams<FormatQuery>,
) -> Result<Response, ApiError> {
    let comments = repo::find_comments_for_user(&pool, &username).map_err(|e| {
        warn!("Loading comments failed: {:#}", e);
        ApiError::failed(format!("Could not load comments for user {}.", username))
    })?;

    Ok(comment_listing(&comments, query.format_or(ResponseFormat::Json), CommentContext::User))
}

/// Handler for posting a comment
///
/// This function handles POST requests to `/comment`. The body carries
/// `imageID` and `comment`; `?response=html` returns the new comment rendered
/// the way the image page shows it.
#[instrument(skip_all)]
pub async fn post_comment_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    QueryParams(query): QueryParams<CommentResponseQuery>,
    Payload(payload): Payload<PostCommentDto>,
) -> Result<Response, ApiError> {
    let user_id = session::session_user_id(&pool, &jar)?
        .ok_or_else(|| ApiError::invalid("Can not post comment. Currently not logged in."))?;
    let image_id = payload
        .image_id
        .ok_or_else(|| ApiError::invalid("Can not post comment. Missing image ID."))?;
    let text = payload
        .comment
        .ok_or_else(|| ApiError::invalid("Can not post comment. Missing comment."))?;
    let image_id = image_id
        .as_image_id()
        .ok_or_else(|| ApiError::invalid("Can not post comment. Invalid image ID."))?;

    let comment = repo::add_comment(&pool, &user_id, image_id, &text).map_err(|e| {
        warn!("Posting comment failed: {:#}", e);
        ApiError::failed("Could not post comment.")
    })?;

    let user = repo::find_user_by_hidden_id(&pool, &user_id)
        .ok()
        .flatten()
        .ok_or_else(|| {
            ApiError::failed(
                "Comment has been posted but could not be displayed at this time. Please refresh the page.",
            )
        })?;

    info!("Posted comment {} on image {}", comment.get_id(), image_id);
    let info = CommentInfo {
        username: user.get_username(),
        image_id: comment.get_image_id(),
        comment: comment.get_comment(),
        posted_date: comment.get_posted_date(),
    };

    let response = if query.response.as_deref() == Some("html") {
        Json(StatusMessage::success(comment_html(Some(&info), CommentContext::Image))).into_response()
    } else {
        Json(StatusMessage::success(info)).into_response()
    };
    Ok(response)
}
