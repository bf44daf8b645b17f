/// Repository module
///
/// This module provides the data access layer for the application: users and
/// their sessions, images and comments. Every function takes the connection
/// pool and returns an `anyhow::Result`; failures the route layer has to tell
/// apart are typed as [`AccountError`] inside the `anyhow::Error`.

mod user_repo;
mod session_repo;
mod image_repo;
mod comment_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use session_repo::*;
pub use image_repo::*;
pub use comment_repo::*;
