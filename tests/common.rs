//! Common test utilities for imageshare integration tests
//!
//! This file contains shared functions for all integration tests: test
//! application setup, request helpers, and helpers for registering users,
//! uploading images and posting comments through the HTTP interface.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use imageshare::{
    create_app,
    db::{DbPool, init_pool},
};
use serde_json::Value;
use std::sync::Arc;
use tower::Service;

/// Boundary used for hand-built multipart bodies
pub const BOUNDARY: &str = "imageshare-test-boundary";

/// A tiny PNG signature, enough to stand in for image bytes
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

/// Creates a test application with an in-memory SQLite database
///
/// Every call gets its own shared-cache in-memory database so that all pool
/// connections see the same schema and tests stay isolated from each other.
pub fn create_test_app() -> Router {
    create_test_app_with_pool().0
}

/// Like [`create_test_app`], also returning the pool so a test can change
/// the database behind the application's back
pub fn create_test_app_with_pool() -> (Router, Arc<DbPool>) {
    let database_url = format!("file:test_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url).unwrap());

    let conn = &mut pool.get().unwrap();
    imageshare::run_migrations(conn).unwrap();

    (create_app(pool.clone()), pool)
}

/// Sends a request through the application
pub async fn send(app: &mut Router, request: Request<Body>) -> Response<Body> {
    app.call(request).await.unwrap()
}

/// Sends a GET request, with the session cookie if one is given
pub async fn get(app: &mut Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// Sends a urlencoded form
pub async fn post_form(
    app: &mut Router,
    uri: &str,
    fields: &[(&str, &str)],
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = serde_html_form::to_string(fields).unwrap();
    send(app, builder.body(Body::from(body)).unwrap()).await
}

/// Sends a JSON body
pub async fn post_json(
    app: &mut Router,
    uri: &str,
    body: Value,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// Builds a multipart body holding a single file part
pub fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Posts a multipart body to `/upload?type=json`
pub async fn post_upload(app: &mut Router, body: Vec<u8>, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder()
        .uri("/upload?type=json")
        .method("POST")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

/// Uploads a PNG and returns its id
pub async fn upload_png(app: &mut Router, cookie: Option<&str>) -> i64 {
    let response = post_upload(app, multipart_body("cat.png", "image/png", PNG_BYTES), cookie).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    json["id"].as_i64().unwrap()
}

/// Registers a user through the JSON flow and returns the session cookie
pub async fn register(app: &mut Router, username: &str, email: &str, password: &str) -> String {
    let response = post_form(
        app,
        "/register?type=json",
        &[
            ("username", username),
            ("email", email),
            ("password", password),
            ("passwordConfirm", password),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response).expect("registration should set a session cookie")
}

/// Registers `alice` and returns her session cookie
pub async fn register_alice(app: &mut Router) -> String {
    register(app, "alice", "alice@example.com", "hunter22").await
}

/// Posts a comment through the JSON flow
pub async fn post_comment(app: &mut Router, cookie: &str, image_id: i64, text: &str) -> Value {
    let image_id = image_id.to_string();
    let response = post_form(
        app,
        "/comment?type=json",
        &[("imageID", image_id.as_str()), ("comment", text)],
        Some(cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// The `sid=<id>` pair from a response's `Set-Cookie`, if it sets a session
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with("sid=") && pair.len() > "sid=".len())
        .map(str::to_string)
}

/// Every `Set-Cookie` header of a response, joined
pub fn set_cookie_headers(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Asserts the JSON error envelope and returns its message
pub async fn error_message(response: Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    json["message"].as_str().unwrap().to_string()
}

/// Asserts the HTML error page and returns its body
pub async fn error_page(response: Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "got {}", content_type);
    let html = body_text(response).await;
    assert!(html.contains("<div id='error'>"));
    html
}
