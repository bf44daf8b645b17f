use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Comment;

/// How a handler should shape its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

/// The `type` query parameter most routes accept
#[derive(Deserialize, Debug, Default)]
pub struct FormatQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl FormatQuery {
    /// Resolves the requested format, falling back to the route's default
    /// when the parameter is absent or unrecognised
    pub fn format_or(&self, default: ResponseFormat) -> ResponseFormat {
        match self.kind.as_deref() {
            Some("json") => ResponseFormat::Json,
            Some("html") => ResponseFormat::Html,
            _ => default,
        }
    }
}

/// Query parameters of `POST /comment`
#[derive(Deserialize, Debug, Default)]
pub struct CommentResponseQuery {
    /// `html` asks for the posted comment as a rendered fragment
    pub response: Option<String>,
}

/// Query parameters of the login and registration forms
#[derive(Deserialize, Debug, Default)]
pub struct FromUrlQuery {
    #[serde(rename = "fromUrl")]
    pub from_url: Option<String>,
}

/// A form value that JSON clients may send as a number
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

impl Scalar {
    /// Interprets the value as an image id
    pub fn as_image_id(&self) -> Option<i32> {
        match self {
            Scalar::Int(n) => i32::try_from(*n).ok(),
            Scalar::Text(s) => s.trim().parse::<i32>().ok(),
        }
    }
}

/// Body of `POST /comment`
///
/// Every field is optional so that a missing one can be reported by name.
#[derive(Deserialize, Debug, Default)]
pub struct PostCommentDto {
    #[serde(rename = "imageID")]
    pub image_id: Option<Scalar>,
    pub comment: Option<String>,
}

/// Body of `POST /register`
#[derive(Deserialize, Debug, Default)]
pub struct RegisterDto {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "redirectUrl")]
    pub redirect_url: Option<String>,
}

/// Body of `POST /login`
#[derive(Deserialize, Debug, Default)]
pub struct LoginDto {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "redirectUrl")]
    pub redirect_url: Option<String>,
}

/// Body of `POST /logout`
#[derive(Deserialize, Debug, Default)]
pub struct LogoutDto {
    #[serde(rename = "redirectUrl")]
    pub redirect_url: Option<String>,
}

/// The `{status, message}` envelope
#[derive(Serialize, Debug)]
pub struct StatusMessage<T: Serialize> {
    pub status: &'static str,
    pub message: T,
}

impl<T: Serialize> StatusMessage<T> {
    pub fn success(message: T) -> Self {
        Self { status: "success", message }
    }

    pub fn error(message: T) -> Self {
        Self { status: "error", message }
    }
}

/// One comment as listed by the comment endpoints
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CommentInfo {
    pub username: String,
    #[serde(rename = "imageID")]
    pub image_id: i32,
    pub comment: Option<String>,
    #[serde(rename = "postedDate")]
    pub posted_date: DateTime<Utc>,
}

impl From<&Comment> for CommentInfo {
    fn from(comment: &Comment) -> Self {
        Self {
            username: comment.get_username(),
            image_id: comment.get_image_id(),
            comment: comment.get_comment(),
            posted_date: comment.get_posted_date(),
        }
    }
}

/// Response of the comment listing endpoints when there are comments
#[derive(Serialize, Debug)]
pub struct CommentList {
    pub status: &'static str,
    pub result_count: usize,
    pub results: Vec<CommentInfo>,
}

impl CommentList {
    pub fn new(results: Vec<CommentInfo>) -> Self {
        Self {
            status: "success",
            result_count: results.len(),
            results,
        }
    }
}

/// Response of `POST /upload`
#[derive(Serialize, Debug)]
pub struct UploadResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub id: i32,
}
