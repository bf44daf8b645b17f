//! Small helpers shared by the handlers: escaping, image id parsing, file
//! extension / MIME type mapping and post-login redirect targets.

/// Known image formats as (extension, MIME type). The first extension listed
/// for a MIME type is the canonical one.
///
/// SVG is left out: it can carry script and direct links serve images from
/// this origin.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tiff", "image/tiff"),
    ("tif", "image/tiff"),
    ("ico", "image/x-icon"),
];

/// Escapes text for inclusion in HTML element content or a quoted attribute
pub fn escape_output(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Maps a file extension (case-insensitive) to an image MIME type
pub fn ext_to_mime_type(ext: &str) -> Option<&'static str> {
    let ext = ext.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Maps an image MIME type to its canonical file extension
pub fn mime_type_to_ext(mime: &str) -> Option<&'static str> {
    IMAGE_TYPES
        .iter()
        .find(|(_, m)| m.eq_ignore_ascii_case(mime))
        .map(|(ext, _)| *ext)
}

/// Parses an image id from a path segment
///
/// Only plain positive decimal integers are ids; anything else (signs,
/// whitespace, trailing text, zero) is rejected.
pub fn id_from_param(param: &str) -> Option<i32> {
    if param.is_empty() || !param.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    param.parse::<i32>().ok().filter(|id| *id > 0)
}

/// Resolves where to send the browser after login, logout or registration
///
/// Only local absolute paths made of visible ASCII are honored: the value
/// ends up in a `Location` header and must not point off-site.
pub fn redirect_path(redirect_url: Option<&str>) -> String {
    match redirect_url.map(str::trim) {
        None | Some("") | Some("home") => "/".to_string(),
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && path.chars().all(|c| c.is_ascii_graphic()) =>
        {
            path.to_string()
        }
        Some(_) => "/".to_string(),
    }
}


#[cfg(test)]
mod prop_tests;
