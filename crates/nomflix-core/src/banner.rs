//! Section banner built from the first item of the banner row.

use crate::catalog::CatalogItem;

/// Overviews longer than this many characters are abbreviated.
pub const ABBREVIATE_OVER: usize = 100;

/// Banner overview rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewStyle {
    /// Long overviews are cut to a fifth of their length plus `...`.
    Abbreviated,
    /// The overview is shown as is.
    Full,
}

/// Banner content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Item title.
    pub title: String,
    /// Overview, possibly abbreviated.
    pub overview: String,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl Banner {
    /// Builds the banner for `item`.
    #[must_use]
    pub fn from_item(item: &CatalogItem, style: OverviewStyle) -> Self {
        let overview = match style {
            OverviewStyle::Abbreviated => abbreviate_overview(&item.overview),
            OverviewStyle::Full => item.overview.clone(),
        };
        Self {
            title: item.title.clone(),
            overview,
            backdrop_path: item.backdrop_path.clone(),
        }
    }
}

/// Keeps the first `len / 5` characters of an overview longer than
/// [`ABBREVIATE_OVER`] characters and appends `...`.
#[must_use]
pub fn abbreviate_overview(text: &str) -> String {
    let count = text.chars().count();
    if count <= ABBREVIATE_OVER {
        return String::from(text);
    }
    let mut short: String = text.chars().take(count / 5).collect();
    short.push_str("...");
    short
}
