use crate::db::DbPool;
use crate::models::{Comment, NewComment};
use crate::schema::{comments, users};
use anyhow::{Result, anyhow};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Posts a comment on an image
///
/// The author's username is copied onto the comment so listings for a user
/// need no join.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - Hidden id of the author
/// * `image_id` - The image being commented on
/// * `text` - The comment text
///
/// ### Errors
///
/// Returns an error if the author does not exist, the image does not exist
/// (foreign key), or the insert fails.
#[instrument(skip(pool, user_id, text))]
pub fn add_comment(pool: &DbPool, user_id: &str, image_id: i32, text: &str) -> Result<Comment> {
    let conn = &mut pool.get()?;

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        let username = users::table
            .find(user_id)
            .select(users::username)
            .first::<String>(conn)
            .optional()?
            .ok_or_else(|| anyhow!("Comment author does not exist"))?;

        let comment = diesel::insert_into(comments::table)
            .values(&NewComment::new(user_id, &username, image_id, text))
            .returning(Comment::as_returning())
            .get_result(conn)?;

        info!("User {} commented on image {}", username, image_id);
        Ok(comment)
    })
}

/// Lists the comments on an image, oldest first
#[instrument(skip(pool))]
pub fn find_comments_for_image(pool: &DbPool, image_id: i32) -> Result<Vec<Comment>> {
    let conn = &mut pool.get()?;
    let result = comments::table
        .filter(comments::image_id.eq(image_id))
        .order((comments::posted_date.asc(), comments::id.asc()))
        .select(Comment::as_select())
        .load(conn)?;
    debug!("Found {} comments", result.len());
    Ok(result)
}

/// Lists the comments written by a user, oldest first
#[instrument(skip(pool))]
pub fn find_comments_for_user(pool: &DbPool, username: &str) -> Result<Vec<Comment>> {
    let conn = &mut pool.get()?;
    let result = comments::table
        .filter(comments::username.eq(username))
        .order((comments::posted_date.asc(), comments::id.asc()))
        .select(Comment::as_select())
        .load(conn)?;
    debug!("Found {} comments", result.len());
    Ok(result)
}
