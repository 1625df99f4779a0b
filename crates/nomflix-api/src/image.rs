//! Image path resolver.
//!
//! TMDB list responses carry partial image paths such as `/abc123.jpg`.
//! A full URL is `{base}/{size}/{path}` where `size` is a token like
//! `w500` or `original`.

/// Default TMDB image CDN base.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Size token used when none is given.
pub const ORIGINAL_SIZE: &str = "original";

/// Builds fully qualified image URLs against a configurable base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    /// Base URL without a trailing slash.
    base_url: String,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl ImageResolver {
    /// Creates a resolver for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: String::from(base_url.trim_end_matches('/')),
        }
    }

    /// Resolves `path` at `size` (default: `original`).
    #[must_use]
    pub fn url(&self, path: &str, size: Option<&str>) -> String {
        let size = size.unwrap_or(ORIGINAL_SIZE);
        let path = path.trim_start_matches('/');
        format!("{}/{size}/{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_with_size() {
        // Arrange & Act
        let url = ImageResolver::default().url("/8rpDcsfLJypbO6vREc0547VKqEv.jpg", Some("w500"));

        // Assert
        assert_eq!(
            url,
            "https://image.tmdb.org/t/p/w500/8rpDcsfLJypbO6vREc0547VKqEv.jpg"
        );
    }

    #[test]
    fn test_image_url_defaults_to_original() {
        // Arrange & Act
        let url = ImageResolver::default().url("/abc.jpg", None);

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/original/abc.jpg");
    }

    #[test]
    fn test_custom_base_trailing_slash_is_trimmed() {
        // Arrange
        let resolver = ImageResolver::new("http://localhost:9000/img/");

        // Act
        let url = resolver.url("poster.png", Some("w92"));

        // Assert
        assert_eq!(url, "http://localhost:9000/img/w92/poster.png");
    }
}
