//! Image URL construction.

/// Default image base URL (w500 rendition).
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Joins the image base URL with a poster or profile path returned by the API.
///
/// Returns `None` when the API gave no path.
#[must_use]
pub fn image_url(image_base: &str, path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    Some(format!(
        "{}/{}",
        image_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}
