use crate::db::DbPool;
use crate::models::Session;
use crate::schema::sessions;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, instrument};

/// Starts a session for the user with the given hidden id
#[instrument(skip(pool))]
pub fn create_session(pool: &DbPool, user_id: &str) -> Result<Session> {
    let conn = &mut pool.get()?;
    let session = Session::new(user_id);
    diesel::insert_into(sessions::table)
        .values(&session)
        .execute(conn)?;
    debug!("Created session for user");
    Ok(session)
}

/// Looks up a session by cookie value
#[instrument(skip(pool, session_id))]
pub fn get_session(pool: &DbPool, session_id: &str) -> Result<Option<Session>> {
    let conn = &mut pool.get()?;
    let session = sessions::table
        .find(session_id)
        .select(Session::as_select())
        .first(conn)
        .optional()?;
    Ok(session)
}

/// Ends a session
///
/// ### Returns
///
/// Whether a session with that id existed
#[instrument(skip(pool, session_id))]
pub fn delete_session(pool: &DbPool, session_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;
    let deleted = diesel::delete(sessions::table.find(session_id)).execute(conn)?;
    Ok(deleted > 0)
}
