/// imageshare: an image sharing web application
///
/// Visitors upload images, anyone can view them by id, and registered users
/// can log in and comment. Pages are rendered on the server; most routes also
/// answer in JSON when asked with `?type=json`.
///
/// ### Modules
///
/// - `db`: Database connection management
/// - `models`: Users, sessions, images and comments
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions
/// - `handlers`: Route handlers
/// - `session`: Cookie sessions
/// - `comments`: HTML fragments for comments
/// - `views`: Server-rendered pages
/// - `config`: Layered configuration
///
/// ### Web routes
///
/// - `GET /`, `/index.html`, `/index.htm`: Landing page with the upload form
/// - `GET /images/{id}`: Image page, or the raw image for `/images/{id}.{ext}`
/// - `GET /images/{id}/`: Image page
/// - `GET /images/{id}/comments`: Comments on an image
/// - `GET /users/{username}`: User profile
/// - `GET /users/{username}/comments`: Comments written by a user
/// - `GET|POST /register`, `GET|POST /login`, `POST /logout`: Accounts
/// - `POST /upload`: Upload an image
/// - `POST /comment`: Comment on an image
/// - `GET /assets/*`: Static files

/// Password hashing
pub mod auth;

/// Comment HTML fragments
pub mod comments;

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects
pub mod dto;

/// Error handling
pub mod errors;

/// Request body extraction
pub mod extract;

/// Route handlers
pub mod handlers;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Cookie sessions
pub mod session;

/// Shared helpers
pub mod util;

/// Server-rendered pages
pub mod views;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::{Config, DEFAULT_MAX_UPLOAD_BYTES};
use crate::errors::render_error_pages;
use crate::handlers::*;

/// Embedded database migrations
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates the application router with default settings
///
/// Uploads are capped at the default limit and static files are served from
/// `./assets`.
pub fn create_app(pool: Arc<db::DbPool>) -> Router {
    build_router(pool, DEFAULT_MAX_UPLOAD_BYTES, Path::new("assets"))
}

/// Creates the application router from a loaded configuration
pub fn create_app_with_config(pool: Arc<db::DbPool>, config: &Config) -> Router {
    build_router(pool, config.max_upload_bytes, &config.assets_dir)
}

fn build_router(pool: Arc<db::DbPool>, max_upload_bytes: usize, assets_dir: &Path) -> Router {
    Router::new()
        // Landing page
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/index.htm", get(index_handler))
        // Image page, or the raw image when the id carries an extension
        .route("/images/{id}", get(image_file_handler))
        .route("/images/{id}/", get(image_page_handler))
        .route("/images/{id}/comments", get(image_comments_handler))
        // User profiles
        .route("/users/{username}", get(user_page_handler))
        .route("/users/{username}/comments", get(user_comments_handler))
        // Accounts
        .route("/register", get(register_page_handler).post(register_handler))
        .route("/login", get(login_page_handler).post(login_handler))
        .route("/logout", post(logout_handler))
        // Uploading and commenting
        .route("/upload", post(upload_handler))
        .route("/comment", post(post_comment_handler))
        // Static files for the front end
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(render_error_pages))
        .layer(TraceLayer::new_for_http())
        // Add the database pool to the application state
        .with_state(pool)
}

/// Runs the embedded migrations
///
/// This function applies all pending database migrations to set up the schema.
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    Ok(())
}
