use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

/// An uploaded image, including its bytes
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::images)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Image {
    /// Numeric id assigned by the store
    id: i32,

    /// Raw file contents
    data: Vec<u8>,

    /// Name of the file on the uploader's machine
    filename: String,

    /// MIME type reported by the upload
    mimetype: String,

    /// Transfer encoding reported by the upload
    encoding: String,

    /// Uploader, or `None` for anonymous uploads
    username: Option<String>,

    /// When the image was uploaded
    uploaded_date: NaiveDateTime,
}

impl Image {
    pub fn get_id(&self) -> i32 {
        self.id
    }

    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image, returning its bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn get_filename(&self) -> String {
        self.filename.clone()
    }

    pub fn get_mimetype(&self) -> String {
        self.mimetype.clone()
    }

    pub fn get_encoding(&self) -> String {
        self.encoding.clone()
    }

    pub fn get_username(&self) -> Option<String> {
        self.username.clone()
    }

    pub fn get_uploaded_date(&self) -> DateTime<Utc> {
        self.uploaded_date.and_utc()
    }
}

/// An image about to be stored; the store assigns the id
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::images)]
pub struct NewImage<'a> {
    data: &'a [u8],
    filename: &'a str,
    mimetype: &'a str,
    encoding: &'a str,
    username: Option<&'a str>,
    uploaded_date: NaiveDateTime,
}

impl<'a> NewImage<'a> {
    /// Creates a new image record stamped with the current time
    ///
    /// ### Arguments
    ///
    /// * `data` - The file contents
    /// * `filename` - The original filename
    /// * `mimetype` - The MIME type
    /// * `encoding` - The transfer encoding
    /// * `username` - The uploader, if logged in
    pub fn new(
        data: &'a [u8],
        filename: &'a str,
        mimetype: &'a str,
        encoding: &'a str,
        username: Option<&'a str>,
    ) -> Self {
        Self {
            data,
            filename,
            mimetype,
            encoding,
            username,
            uploaded_date: Utc::now().naive_utc(),
        }
    }
}
