//! Server-rendered pages.
//!
//! Pages are plain format strings around a shared layout. Every value that
//! comes from a user or a request goes through [`escape_output`].

use crate::comments::{CommentContext, comments_section};
use crate::dto::CommentInfo;
use crate::session::SessionUser;
use crate::util::escape_output;

/// What the image page needs to know about an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePage {
    pub id: i32,
    /// File name the `<img>` loads, `<id>.<ext>`
    pub image_src: String,
    pub uploaded_date: String,
    /// Uploader, `None` for anonymous uploads
    pub author: Option<String>,
}

/// An upload listed on its owner's profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    pub id: i32,
    /// `<id>.<ext>`
    pub image_src: String,
}

fn layout(title: &str, user: Option<&SessionUser>, from_url: &str, body: &str) -> String {
    let from_url = escape_output(from_url);
    let account = match user {
        Some(user) => format!(
            "<span class='account'>Logged in as <a href='/users/{name}'>{name}</a></span>\
             <form class='logout' action='/logout' method='post'>\
             <input type='hidden' name='redirectUrl' value='{from_url}'>\
             <button type='submit'>Log out</button></form>",
            name = escape_output(&user.username),
        ),
        None => format!(
            "<form class='login' action='/login' method='get'>\
             <input type='hidden' name='fromUrl' value='{from_url}'>\
             <button type='submit'>Log in</button></form>\
             <form class='register' action='/register' method='get'>\
             <input type='hidden' name='fromUrl' value='{from_url}'>\
             <button type='submit'>Register</button></form>"
        ),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>\n<title>{title}</title>\n\
         <script src='/assets/js/selectable-actions.js' defer></script>\n\
         <script src='/assets/js/comments.js' defer></script>\n</head>\n<body>\n\
         <header><a href='/'>imageshare</a>{account}</header>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape_output(title),
    )
}

/// The landing page with the upload form
pub fn index(user: Option<&SessionUser>, from_url: &str) -> String {
    let greeting = match user {
        Some(user) => format!("<p>Welcome back, {}.</p>", escape_output(&user.username)),
        None => "<p>Uploading anonymously. Log in to keep track of your images.</p>".to_string(),
    };
    let body = format!(
        "{greeting}\n\
         <form id='upload' action='/upload' method='post' enctype='multipart/form-data'>\
         <input type='file' name='image' accept='image/*'>\
         <button type='submit'>Upload</button></form>"
    );
    layout("imageshare", user, from_url, &body)
}

/// A single image with its comments
pub fn image_view(
    image: &ImagePage,
    comments: &[CommentInfo],
    user: Option<&SessionUser>,
    from_url: &str,
) -> String {
    let author = match &image.author {
        Some(name) => {
            let name = escape_output(name);
            format!("<a href='/users/{name}'>{name}</a>")
        }
        None => "Anonymous".to_string(),
    };
    let comment_form = match user {
        Some(_) => format!(
            "<form id='comment-form' action='/comment?response=html&amp;type=json' method='post'>\
             <input type='hidden' name='imageID' value='{id}'>\
             <textarea name='comment'></textarea>\
             <button type='submit'>Post comment</button></form>",
            id = image.id,
        ),
        None => "<p>Log in to leave a comment.</p>".to_string(),
    };
    let body = format!(
        "<figure><img src='/images/{src}' alt='Image {id}'>\
         <figcaption>Uploaded by {author} on {date}</figcaption></figure>\n\
         <section id='comments-container'>{comments}</section>\n\
         {comment_form}",
        src = escape_output(&image.image_src),
        id = image.id,
        date = escape_output(&image.uploaded_date),
        comments = comments_section(comments, CommentContext::Image),
    );
    layout(&format!("Image {}", image.id), user, from_url, &body)
}

/// A user's profile: their uploads, selectable, and their comments
pub fn user_view(
    username: &str,
    uploads: &[ImageLink],
    comments: &[CommentInfo],
    session_user: Option<&SessionUser>,
    from_url: &str,
) -> String {
    let name = escape_output(username);
    let uploads = if uploads.is_empty() {
        "<p>No uploads yet.</p>".to_string()
    } else {
        uploads
            .iter()
            .map(|image| {
                format!(
                    "<div class='selectable-block' data-image-id='{id}'>\
                     <a href='/images/{id}/'><img src='/images/{src}' alt='Image {id}'></a>\
                     <button type='button' class='checkmark-button'>&#x2713;</button></div>",
                    id = image.id,
                    src = escape_output(&image.image_src),
                )
            })
            .collect::<String>()
    };
    let body = format!(
        "<h1>{name}</h1>\n\
         <section class='selectables-container'>{uploads}</section>\n\
         <section id='comments-container'>{comments}</section>",
        comments = comments_section(comments, CommentContext::User),
    );
    layout(username, session_user, from_url, &body)
}

/// The registration form
pub fn register_view(from_url: &str) -> String {
    let body = format!(
        "<form id='register' action='/register' method='post'>\
         <input type='hidden' name='redirectUrl' value='{from_url}'>\
         <label>Username <input type='text' name='username'></label>\
         <label>Email <input type='email' name='email'></label>\
         <label>Password <input type='password' name='password'></label>\
         <label>Confirm password <input type='password' name='passwordConfirm'></label>\
         <button type='submit'>Register</button></form>",
        from_url = escape_output(from_url),
    );
    layout("Register", None, from_url, &body)
}

/// The login form
pub fn login_view(from_url: &str) -> String {
    let body = format!(
        "<form id='login' action='/login' method='post'>\
         <input type='hidden' name='redirectUrl' value='{from_url}'>\
         <label>Username <input type='text' name='username'></label>\
         <label>Password <input type='password' name='password'></label>\
         <button type='submit'>Log in</button></form>",
        from_url = escape_output(from_url),
    );
    layout("Log in", None, from_url, &body)
}

/// The error page
pub fn error_page(message: &str) -> String {
    let body = format!("<div id='error'>{}</div>", escape_output(message));
    layout("Error", None, "home", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> SessionUser {
        SessionUser {
            hidden_id: "secret-id".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    fn comment(text: &str) -> CommentInfo {
        CommentInfo {
            username: "alice".to_string(),
            image_id: 4,
            comment: Some(text.to_string()),
            posted_date: chrono::DateTime::parse_from_rfc3339("2026-10-19T10:30:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        }
    }

    #[test]
    fn test_index_anonymous_and_logged_in() {
        let anonymous = index(None, "/");
        assert!(anonymous.contains("action='/login'"));
        assert!(anonymous.contains("enctype='multipart/form-data'"));

        let logged_in = index(Some(&alice()), "/");
        assert!(logged_in.contains("Welcome back, alice."));
        assert!(logged_in.contains("action='/logout'"));
        assert!(!logged_in.contains("secret-id"));
    }

    #[test]
    fn test_image_view() {
        let page = ImagePage {
            id: 4,
            image_src: "4.png".to_string(),
            uploaded_date: "Mon, 19 Oct 2026 10:30:00 GMT".to_string(),
            author: None,
        };

        let html = image_view(&page, &[], None, "/images/4/");

        assert!(html.contains("src='/images/4.png'"));
        assert!(html.contains("Uploaded by Anonymous on Mon, 19 Oct 2026 10:30:00 GMT"));
        assert!(html.contains("Log in to leave a comment."));
        assert!(html.contains("There are currently no comments to display."));
        assert!(image_view(&page, &[], Some(&alice()), "/").contains("name='imageID' value='4'"));
    }

    #[test]
    fn test_image_view_lists_comments() {
        let page = ImagePage {
            id: 4,
            image_src: "4.png".to_string(),
            uploaded_date: "Mon, 19 Oct 2026 10:30:00 GMT".to_string(),
            author: Some("alice".to_string()),
        };

        let html = image_view(&page, &[comment("nice shot")], None, "/");

        assert!(html.contains("<a href='/users/alice'>alice (<span class='time'>"));
        assert!(html.contains(": nice shot</div>"));
        assert!(!html.contains("There are currently no comments"));
    }

    #[test]
    fn test_user_view() {
        let uploads = [ImageLink { id: 7, image_src: "7.gif".to_string() }];

        let html = user_view("alice", &uploads, &[comment("hi")], None, "/users/alice");

        assert!(html.contains("<h1>alice</h1>"));
        assert!(html.contains("class='selectables-container'"));
        assert!(html.contains("<div class='selectable-block' data-image-id='7'>"));
        assert!(html.contains("<img src='/images/7.gif' alt='Image 7'>"));
        assert!(html.contains("class='checkmark-button'"));
        assert!(html.contains("<a href='/images/4'>Comment on 4 ("));

        let empty = user_view("bob", &[], &[], None, "/");
        assert!(empty.contains("No uploads yet."));
        assert!(!empty.contains("selectable-block"));
    }

    #[test]
    fn test_views_escape_request_values() {
        let html = register_view("'><script>x</script>");
        assert!(!html.contains("<script>x"));

        let html = user_view("<i>bob</i>", &[], &[], None, "/");
        assert!(!html.contains("<i>bob"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page("User does not exist.");
        assert!(html.contains("<div id='error'>User does not exist.</div>"));
    }
}
