//! URL-shaped routes.
//!
//! | Path                     | Section | Item |
//! |--------------------------|---------|------|
//! | `/`                      | Movies  | -    |
//! | `/movies/{id}`           | Movies  | id   |
//! | `/tv`                    | Tv      | -    |
//! | `/tv/{id}`               | Tv      | id   |
//! | `/search?keyword=k`      | Search  | -    |
//! | `/search/{id}?keyword=k` | Search  | id   |

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::section::Section;

const KEYWORD_PARAM: &str = "keyword";

/// A navigable location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Section shown.
    pub section: Section,
    /// Item whose detail overlay is open.
    pub item_id: Option<u64>,
    /// Search keyword; only meaningful in [`Section::Search`].
    pub keyword: Option<String>,
}

/// Route parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// First path segment names no section.
    UnknownSection(String),
    /// Item segment is not a non-negative integer.
    InvalidItemId(String),
    /// More than two path segments.
    TooManySegments(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSection(segment) => write!(f, "unknown section '{segment}'"),
            Self::InvalidItemId(segment) => write!(f, "invalid item id '{segment}'"),
            Self::TooManySegments(path) => write!(f, "too many path segments in '{path}'"),
        }
    }
}

impl std::error::Error for RouteError {}

impl Route {
    /// `/`
    #[must_use]
    pub const fn movies() -> Self {
        Self {
            section: Section::Movies,
            item_id: None,
            keyword: None,
        }
    }

    /// `/tv`
    #[must_use]
    pub const fn tv() -> Self {
        Self {
            section: Section::Tv,
            item_id: None,
            keyword: None,
        }
    }

    /// `/search?keyword={keyword}`
    #[must_use]
    pub fn search(keyword: impl Into<String>) -> Self {
        Self {
            section: Section::Search,
            item_id: None,
            keyword: Some(keyword.into()),
        }
    }

    /// Section root without an item.
    #[must_use]
    pub const fn for_section(section: Section) -> Self {
        Self {
            section,
            item_id: None,
            keyword: None,
        }
    }

    /// Same route with `item_id` selected.
    #[must_use]
    pub fn with_item(&self, item_id: u64) -> Self {
        Self {
            item_id: Some(item_id),
            ..self.clone()
        }
    }

    /// Same route with no item selected.
    #[must_use]
    pub fn without_item(&self) -> Self {
        Self {
            item_id: None,
            ..self.clone()
        }
    }

    /// Parses a route path with an optional query.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the path does not match a known form.
    pub fn parse(input: &str) -> Result<Self, RouteError> {
        let (path, query) = input.split_once('?').unwrap_or((input, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let (section, id_segment) = match segments.as_slice() {
            [] => (Section::Movies, None),
            [head, rest @ ..] => {
                if rest.len() > 1 {
                    return Err(RouteError::TooManySegments(String::from(path)));
                }
                let section = match *head {
                    "movies" => Section::Movies,
                    "tv" => Section::Tv,
                    "search" => Section::Search,
                    other => return Err(RouteError::UnknownSection(String::from(other))),
                };
                (section, rest.first().copied())
            }
        };

        let item_id = id_segment
            .map(|segment| {
                segment
                    .parse::<u64>()
                    .map_err(|_| RouteError::InvalidItemId(String::from(segment)))
            })
            .transpose()?;

        let keyword = if section == Section::Search {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == KEYWORD_PARAM)
                .map(|(_, value)| value.into_owned())
        } else {
            None
        };

        Ok(Self {
            section,
            item_id,
            keyword,
        })
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::movies()
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segment = self.section.detail_segment();
        match (self.section, self.item_id) {
            (Section::Movies, None) => f.write_str("/")?,
            (_, None) => write!(f, "/{segment}")?,
            (_, Some(id)) => write!(f, "/{segment}/{id}")?,
        }
        if self.section == Section::Search
            && let Some(keyword) = &self.keyword
        {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair(KEYWORD_PARAM, keyword)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_known_forms() {
        // Arrange
        let cases = [
            ("/", Route::movies()),
            ("/movies/550", Route::movies().with_item(550)),
            ("/tv", Route::tv()),
            ("/tv/1399", Route::tv().with_item(1399)),
            ("/search?keyword=fight", Route::search("fight")),
            (
                "/search/550?keyword=fight",
                Route::search("fight").with_item(550),
            ),
        ];

        // Act & Assert
        for (input, expected) in cases {
            let route = Route::parse(input).unwrap();
            assert_eq!(route, expected, "parsing {input}");
            assert_eq!(route.to_string(), input, "displaying {input}");
        }
    }

    #[test]
    fn test_keyword_is_form_encoded() {
        // Arrange
        let route = Route::search("파이트 클럽&co");

        // Act
        let text = route.to_string();
        let parsed: Route = text.parse().unwrap();

        // Assert
        assert!(!text.contains(' '));
        assert!(text.starts_with("/search?keyword="));
        assert_eq!(parsed, route);
    }

    #[test]
    fn test_keyword_ignored_outside_search() {
        // Arrange & Act
        let route = Route::parse("/tv?keyword=x").unwrap();

        // Assert
        assert_eq!(route, Route::tv());
    }

    #[test]
    fn test_parse_errors() {
        // Arrange & Act & Assert
        assert_eq!(
            Route::parse("/people/1"),
            Err(RouteError::UnknownSection(String::from("people")))
        );
        assert_eq!(
            Route::parse("/movies/abc"),
            Err(RouteError::InvalidItemId(String::from("abc")))
        );
        assert_eq!(
            Route::parse("/tv/1/2"),
            Err(RouteError::TooManySegments(String::from("/tv/1/2")))
        );
    }

    #[test]
    fn test_with_and_without_item() {
        // Arrange
        let route = Route::search("x");

        // Act
        let opened = route.with_item(7);

        // Assert
        assert_eq!(opened.keyword.as_deref(), Some("x"));
        assert_eq!(opened.without_item(), route);
    }
}
