use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{Uri, header},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::from_url;
use crate::comments::format_posted_date;
use crate::db::DbPool;
use crate::dto::{CommentInfo, UploadResponse};
use crate::errors::ApiError;
use crate::models::NewImage;
use crate::repo;
use crate::session::{self, handle_session};
use crate::util::{ext_to_mime_type, id_from_param, mime_type_to_ext};
use crate::views::{self, ImagePage};

const IMAGE_MISSING: &str = "Image of this ID does not exist on the database.";

fn image_missing() -> ApiError {
    ApiError::not_found(IMAGE_MISSING)
}

/// Handler for `/images/{id}`
///
/// This function handles GET requests for both `/images/5.png`, which serves
/// the image bytes, and `/images/5`, which renders the image page.
#[instrument(skip(pool, jar, uri))]
pub async fn image_file_handler(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<String>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, ApiError> {
    match id.rsplit_once('.') {
        Some((id, ext)) if !ext.is_empty() => serve_image_file(&pool, id, ext),
        _ => render_image_page(&pool, &id, jar, &uri),
    }
}

/// Handler for the image page
///
/// This function handles GET requests to `/images/{id}/`.
#[instrument(skip(pool, jar, uri))]
pub async fn image_page_handler(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<String>,
    jar: CookieJar,
    uri: Uri,
) -> Result<Response, ApiError> {
    render_image_page(&pool, &id, jar, &uri)
}

/// Sends the raw image, provided the extension matches the stored type
fn serve_image_file(pool: &DbPool, id: &str, ext: &str) -> Result<Response, ApiError> {
    let id = id_from_param(id).ok_or_else(image_missing)?;
    let image = repo::find_image(pool, id)
        .map_err(|e| {
            warn!("Image lookup failed: {:#}", e);
            image_missing()
        })?
        .ok_or_else(image_missing)?;

    let mimetype = image.get_mimetype();
    if !ext_to_mime_type(ext).is_some_and(|expected| expected.eq_ignore_ascii_case(&mimetype)) {
        debug!("Extension {} does not match stored type {}", ext, mimetype);
        return Err(image_missing());
    }

    info!("Served image {} by direct link", id);
    Ok(([(header::CONTENT_TYPE, mimetype)], image.into_data()).into_response())
}

fn render_image_page(pool: &DbPool, id: &str, jar: CookieJar, uri: &Uri) -> Result<Response, ApiError> {
    if id.ends_with('.') {
        return Err(ApiError::invalid("Malformed url"));
    }

    let (jar, user) = handle_session(pool, jar)?;

    let id = id_from_param(id).ok_or_else(image_missing)?;
    let image = repo::find_image(pool, id)
        .map_err(|e| {
            warn!("Image lookup failed: {:#}", e);
            image_missing()
        })?
        .ok_or_else(image_missing)?;

    let ext = mime_type_to_ext(&image.get_mimetype())
        .ok_or_else(|| ApiError::failed("Image has an unsupported type."))?;
    let page = ImagePage {
        id,
        image_src: format!("{}.{}", id, ext),
        uploaded_date: format_posted_date(&image.get_uploaded_date()),
        author: image.get_username(),
    };

    let comments: Vec<CommentInfo> = repo::find_comments_for_image(pool, id)
        .map_err(|e| {
            warn!("Loading comments failed: {:#}", e);
            ApiError::failed(format!("Could not load comments for image of image ID {}.", id))
        })?
        .iter()
        .map(CommentInfo::from)
        .collect();

    info!("Served image {} via image page", id);
    let html = views::image_view(&page, &comments, user.as_ref(), &from_url(uri));
    Ok((jar, Html(html)).into_response())
}

/// Handler for uploading an image
///
/// This function handles multipart POST requests to `/upload`. The first
/// file part is stored, attributed to the logged-in user if there is one.
#[instrument(skip_all)]
pub async fn upload_handler(
    State(pool): State<Arc<DbPool>>,
    jar: CookieJar,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let username = match session::session_user_id(&pool, &jar)? {
        Some(hidden_id) => {
            let user = repo::find_user_by_hidden_id(&pool, &hidden_id)?
                .ok_or_else(|| ApiError::failed("Could not find the logged-in user."))?;
            Some(user.get_username())
        }
        None => None,
    };

    let mut multipart = multipart.map_err(|rejection| ApiError::invalid(rejection.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid(e.body_text()))?
    {
        // Browsers send an empty, nameless file part when nothing was picked
        let Some(filename) = field.file_name().filter(|name| !name.is_empty()).map(str::to_owned) else {
            continue;
        };
        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let encoding = field
            .headers()
            .get("content-transfer-encoding")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("7bit")
            .to_owned();
        let data = field.bytes().await.map_err(|e| ApiError::invalid(e.body_text()))?;
        upload = Some((filename, mimetype, encoding, data));
        break;
    }

    let Some((filename, mimetype, encoding, data)) = upload else {
        return Err(ApiError::invalid("Nothing was selected to upload."));
    };
    if mime_type_to_ext(&mimetype).is_none() {
        return Err(ApiError::invalid("Only image files can be uploaded."));
    }

    let image = NewImage::new(&data, &filename, &mimetype, &encoding, username.as_deref());
    let id = repo::add_image(&pool, &image).map_err(|e| {
        warn!("Storing upload failed: {:#}", e);
        ApiError::failed("Image upload failed.")
    })?;

    info!("Image upload successful, id {}", id);
    Ok(Json(UploadResponse {
        status: "success",
        message: "Image uploaded successfully.",
        id,
    }))
}
