//! HTML fragments for comments.
//!
//! The same comment is shown two ways: under an image, where the interesting
//! part is who wrote it, and on a user's profile, where it is which image it
//! was left on.

use chrono::{DateTime, Utc};

use crate::dto::CommentInfo;
use crate::util::escape_output;

/// Where a comment is being displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentContext {
    /// Listed under an image; links to the author
    Image,
    /// Listed on a user's profile; links to the image
    User,
}

pub const UNAVAILABLE_COMMENT_HTML: &str =
    "<div id='comment'>Comment data could not be loaded.</div>";

pub const NO_COMMENTS_MESSAGE: &str = "There are currently no comments to display.";

/// Formats a date the way HTTP headers do (`Mon, 19 Oct 2026 10:30:00 GMT`)
pub fn format_posted_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Renders one comment
pub fn comment_html(comment: Option<&CommentInfo>, context: CommentContext) -> String {
    let Some(comment) = comment else {
        return UNAVAILABLE_COMMENT_HTML.to_string();
    };

    let username = escape_output(&comment.username);
    let text = escape_output(comment.comment.as_deref().unwrap_or("NULL"));
    let time = format_posted_date(&comment.posted_date);

    match context {
        CommentContext::Image => format!(
            "<div id='comment'><a href='/users/{username}'>{username} (<span class='time'>{time}</span>)</a>: {text}</div>"
        ),
        CommentContext::User => format!(
            "<div id='comment'><a href='/images/{id}'>Comment on {id} (<span class='time'>{time}</span>)</a>: {text}</div>",
            id = comment.image_id,
        ),
    }
}

/// Renders a whole listing, wrapped in the `comments` container
pub fn comments_html(comments: &[CommentInfo], context: CommentContext) -> String {
    let mut html = String::from("<div id='comments'>");
    for comment in comments {
        html.push_str(&comment_html(Some(comment), context));
    }
    html.push_str("</div>");
    html
}

/// Like [`comments_html`], but an empty listing says so
pub fn comments_section(comments: &[CommentInfo], context: CommentContext) -> String {
    if comments.is_empty() {
        format!("<div id='comments'>{}</div>", NO_COMMENTS_MESSAGE)
    } else {
        comments_html(comments, context)
    }
}
