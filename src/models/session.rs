use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// A login session
///
/// The `id` is the value of the session cookie. A row exists only while a
/// user is logged in.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    id: String,
    user_id: String,
    created_at: NaiveDateTime,
}

impl Session {
    /// Creates a new session for the user with the given hidden id
    pub fn new(user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Hidden id of the logged-in user
    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}
