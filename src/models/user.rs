use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// A registered user
///
/// The `id` is the user's hidden identifier. It is what a session points at
/// and is never rendered into a page or a JSON response.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    /// Hidden identifier (UUID v4 as string)
    id: String,

    /// Public, unique name
    username: String,

    /// Unique email address
    email: String,

    /// Argon2 PHC string
    password_hash: String,

    /// When the account was registered
    created_at: NaiveDateTime,
}

impl User {
    /// Creates a new user with a fresh hidden id
    ///
    /// ### Arguments
    ///
    /// * `username` - The public name
    /// * `email` - The email address
    /// * `password_hash` - An already-hashed password
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Gets the hidden id
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the username
    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    /// Gets the email address
    pub fn get_email(&self) -> String {
        self.email.clone()
    }

    /// Gets the stored password hash
    pub fn get_password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Gets the registration time
    pub fn get_created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}
