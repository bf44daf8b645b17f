use crate::db::DbPool;
use crate::models::{Image, NewImage};
use crate::schema::images;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Stores an uploaded image
///
/// ### Returns
///
/// The id the store assigned to the image
#[instrument(skip(pool, image))]
pub fn add_image(pool: &DbPool, image: &NewImage<'_>) -> Result<i32> {
    let conn = &mut pool.get()?;
    let id = diesel::insert_into(images::table)
        .values(image)
        .returning(images::id)
        .get_result::<i32>(conn)?;
    info!("Stored image {}", id);
    Ok(id)
}

/// Retrieves an image, bytes included
#[instrument(skip(pool))]
pub fn find_image(pool: &DbPool, image_id: i32) -> Result<Option<Image>> {
    let conn = &mut pool.get()?;
    let image = images::table
        .find(image_id)
        .select(Image::as_select())
        .first(conn)
        .optional()?;
    if image.is_none() {
        debug!("No image with id {}", image_id);
    }
    Ok(image)
}

/// Lists the images a user uploaded as `(id, mimetype)`, oldest first
///
/// Only the columns needed to link to each image are loaded.
#[instrument(skip(pool))]
pub fn find_images_for_user(pool: &DbPool, username: &str) -> Result<Vec<(i32, String)>> {
    let conn = &mut pool.get()?;
    let result = images::table
        .filter(images::username.eq(username))
        .order(images::id.asc())
        .select((images::id, images::mimetype))
        .load::<(i32, String)>(conn)?;
    debug!("Found {} images", result.len());
    Ok(result)
}
