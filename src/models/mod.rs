/// Data models module
///
/// This module defines the records that move between the route layer and the
/// store: users, their login sessions, uploaded images and comments.

mod user;
pub use user::User;

mod session;
pub use session::Session;

mod image;
pub use image::{Image, NewImage};

mod comment;
pub use comment::{Comment, NewComment};
