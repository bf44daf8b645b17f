//! Cookie sessions.
//!
//! The browser holds only a random session id in the `sid` cookie; the
//! `sessions` table maps it to the user's hidden id. A session exists only
//! while someone is logged in.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use crate::db::DbPool;
use crate::errors::ApiError;
use crate::models::User;
use crate::repo;

pub const SESSION_COOKIE: &str = "sid";

/// The logged-in user as seen by handlers and views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Never rendered; used to attribute comments
    pub hidden_id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            hidden_id: user.get_id(),
            username: user.get_username(),
            email: user.get_email(),
        }
    }
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Hidden id of the user the request's session belongs to, without checking
/// that the user still exists
pub fn session_user_id(pool: &DbPool, jar: &CookieJar) -> Result<Option<String>, ApiError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let session = repo::get_session(pool, cookie.value())?;
    Ok(session.map(|s| s.get_user_id()))
}

/// Resolves the request's session to a user
///
/// A session whose user has disappeared is discarded: the row is deleted,
/// the cookie is cleared and the request carries on anonymously. Only store
/// failures are errors.
pub fn handle_session(
    pool: &DbPool,
    jar: CookieJar,
) -> Result<(CookieJar, Option<SessionUser>), ApiError> {
    let Some(session_id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Ok((jar, None));
    };

    let Some(session) = repo::get_session(pool, &session_id)? else {
        debug!("Unknown session id, clearing cookie");
        return Ok((jar.remove(removal_cookie()), None));
    };

    match repo::find_user_by_hidden_id(pool, &session.get_user_id())? {
        Some(user) => Ok((jar, Some(SessionUser::from(&user)))),
        None => {
            warn!("Session points at a missing user, discarding it");
            repo::delete_session(pool, &session_id)?;
            Ok((jar.remove(removal_cookie()), None))
        }
    }
}

/// Logs `user` in, replacing any session the request already had
pub fn start_session(pool: &DbPool, jar: CookieJar, user: &User) -> Result<CookieJar, ApiError> {
    if let Some(previous) = jar.get(SESSION_COOKIE) {
        repo::delete_session(pool, previous.value())?;
    }

    let session = repo::create_session(pool, &user.get_id())?;
    let cookie = Cookie::build((SESSION_COOKIE, session.get_id()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    Ok(jar.add(cookie))
}

/// Logs out: deletes the session row and clears the cookie
pub fn end_session(pool: &DbPool, jar: CookieJar) -> Result<CookieJar, ApiError> {
    let Some(session_id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Ok(jar);
    };
    repo::delete_session(pool, &session_id)?;
    Ok(jar.remove(removal_cookie()))
}
