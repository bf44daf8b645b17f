use crate::auth;
use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;
use anyhow::Result;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Account failures the route layer reports by kind
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// A unique column (`username` or `email`) already holds the value
    #[error("Duplicate value for field {field}")]
    DuplicateField { field: &'static str },

    #[error("User {0} does not exist.")]
    UnknownUser(String),

    #[error("Incorrect password.")]
    IncorrectPassword,
}

/// Registers a new user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `username` - The requested username
/// * `email` - The user's email address
/// * `password` - The plaintext password; only its hash is stored
///
/// ### Returns
///
/// The stored user, including the freshly generated hidden id
///
/// ### Errors
///
/// Returns [`AccountError::DuplicateField`] if the username or email is taken,
/// or an untyped error if hashing or the insert fails.
#[instrument(skip(pool, password), fields(username = %username))]
pub fn add_user(pool: &DbPool, username: &str, email: &str, password: &str) -> Result<User> {
    let password_hash = auth::hash_password(password)?;
    let user = User::new(username.to_string(), email.to_string(), password_hash);

    let conn = &mut pool.get()?;
    match diesel::insert_into(users::table).values(&user).execute(conn) {
        Ok(_) => {
            info!("Registered user {}", user.get_username());
            Ok(user)
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)) => {
            // SQLite reports "UNIQUE constraint failed: users.<column>"
            let field = if info.message().contains("users.email") {
                "email"
            } else {
                "username"
            };
            debug!("Registration rejected, {} already taken", field);
            Err(AccountError::DuplicateField { field }.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Looks up a user by public username
#[instrument(skip(pool))]
pub fn find_user(pool: &DbPool, username: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;
    let user = users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?;
    Ok(user)
}

/// Looks up a user by hidden id
#[instrument(skip(pool))]
pub fn find_user_by_hidden_id(pool: &DbPool, hidden_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;
    let user = users::table
        .find(hidden_id)
        .select(User::as_select())
        .first(conn)
        .optional()?;
    Ok(user)
}

/// Checks a username/password pair
///
/// ### Errors
///
/// Returns [`AccountError::UnknownUser`] or [`AccountError::IncorrectPassword`]
/// for bad credentials.
#[instrument(skip(pool, password))]
pub fn login_user(pool: &DbPool, username: &str, password: &str) -> Result<User> {
    let user = find_user(pool, username)?
        .ok_or_else(|| AccountError::UnknownUser(username.to_string()))?;

    if !auth::verify_password(password, user.get_password_hash())? {
        debug!("Wrong password for {}", username);
        return Err(AccountError::IncorrectPassword.into());
    }

    info!("User {} logged in", username);
    Ok(user)
}
