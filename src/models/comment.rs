use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

/// A comment left by a user on an image
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Comment {
    id: i32,

    /// Hidden id of the author
    user_id: String,

    /// Author's username at the time of posting
    username: String,

    /// The image commented on
    image_id: i32,

    /// Comment text; rows imported from older data may have none
    comment: Option<String>,

    posted_date: NaiveDateTime,
}

impl Comment {
    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    pub fn get_image_id(&self) -> i32 {
        self.image_id
    }

    pub fn get_comment(&self) -> Option<String> {
        self.comment.clone()
    }

    pub fn get_posted_date(&self) -> DateTime<Utc> {
        self.posted_date.and_utc()
    }
}

/// A comment about to be stored
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment<'a> {
    user_id: &'a str,
    username: &'a str,
    image_id: i32,
    comment: &'a str,
    posted_date: NaiveDateTime,
}

impl<'a> NewComment<'a> {
    /// Creates a new comment stamped with the current time
    pub fn new(user_id: &'a str, username: &'a str, image_id: i32, comment: &'a str) -> Self {
        Self {
            user_id,
            username,
            image_id,
            comment,
            posted_date: Utc::now().naive_utc(),
        }
    }
}
