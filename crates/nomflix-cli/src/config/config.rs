//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use nomflix_api::image::DEFAULT_IMAGE_BASE_URL;
use nomflix_api::tmdb::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_REGION};
use nomflix_core::section::{DEFAULT_MOVIE_OFFSET, DEFAULT_SEARCH_COLUMNS, DEFAULT_TV_OFFSET};
use nomflix_core::slide::DEFAULT_TRANSITION;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB request settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Carousel and start-up settings.
    #[serde(default)]
    pub browse: BrowseConfig,
    /// Image URL settings.
    #[serde(default)]
    pub images: ImagesConfig,
}

/// TMDB request configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Response language (ISO 639-1 with region, e.g. `ko-KR`).
    pub language: String,
    /// Release region for movie lists; empty to omit.
    pub region: String,
    /// TMDB v3 base URL.
    pub base_url: String,
    /// Minimum interval between requests in milliseconds.
    pub min_interval_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            language: String::from(DEFAULT_LANGUAGE),
            region: String::from(DEFAULT_REGION),
            base_url: String::from(DEFAULT_BASE_URL),
            min_interval_ms: 25,
        }
    }
}

impl ApiConfig {
    /// Region to send, `None` when unset.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        Some(self.region.as_str()).filter(|r| !r.is_empty())
    }

    /// Minimum request interval.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// Browsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowseConfig {
    /// Items per carousel page in the movies section.
    pub movie_offset: usize,
    /// Items per carousel page in the TV section.
    pub tv_offset: usize,
    /// Columns of the search results grid.
    pub search_columns: usize,
    /// Page slide duration in milliseconds; 0 disables the animation.
    pub transition_ms: u64,
    /// Route opened when `browse` is run without `--route`.
    pub start_route: String,
}

impl Default for BrowseConfig {
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn default() -> Self {
        Self {
            movie_offset: DEFAULT_MOVIE_OFFSET,
            tv_offset: DEFAULT_TV_OFFSET,
            search_columns: DEFAULT_SEARCH_COLUMNS,
            transition_ms: DEFAULT_TRANSITION.as_millis() as u64,
            start_route: String::from("/"),
        }
    }
}

impl BrowseConfig {
    /// Page slide duration.
    #[must_use]
    pub const fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

/// Image URL configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImagesConfig {
    /// Image CDN base URL.
    pub base_url: String,
    /// Size segment for row cards.
    pub row_size: String,
    /// Size segment for banners and the detail card.
    pub detail_size: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_IMAGE_BASE_URL),
            row_size: String::from("w500"),
            detail_size: String::from("original"),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.api.language, "ko-KR");
        assert_eq!(config.api.region(), Some("kr"));
        assert_eq!(config.browse.movie_offset, 6);
        assert_eq!(config.browse.tv_offset, 5);
        assert_eq!(config.browse.search_columns, 5);
        assert_eq!(config.browse.transition_ms, 1500);
        assert_eq!(config.images.row_size, "w500");
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            api: ApiConfig {
                language: String::from("en-US"),
                region: String::new(),
                ..ApiConfig::default()
            },
            browse: BrowseConfig {
                tv_offset: 4,
                transition_ms: 0,
                ..BrowseConfig::default()
            },
            images: ImagesConfig::default(),
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
        assert_eq!(loaded.api.region(), None);
        assert_eq!(loaded.browse.transition(), Duration::ZERO);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse]\nmovie_offset = 3\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.browse.movie_offset, 3);
        assert_eq!(config.browse.tv_offset, DEFAULT_TV_OFFSET);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }
}
