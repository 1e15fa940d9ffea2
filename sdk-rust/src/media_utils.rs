use crate::ChatImage;

/// Resolve a backend-relative media path against the API origin.
///
/// Absolute URLs pass through untouched. Anything else is joined onto the
/// base with exactly one slash between them. An empty path resolves to an
/// empty string so callers can skip rendering.
#[must_use]
pub fn resolve_media_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Pick the displayable URL for a chat image, preferring an explicit URL
/// over a backend-relative path.
#[must_use]
pub fn resolve_image_url(base_url: &str, image: &ChatImage) -> String {
    let source = image
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .or(image.path.as_deref())
        .unwrap_or_default();

    resolve_media_url(base_url, source)
}
