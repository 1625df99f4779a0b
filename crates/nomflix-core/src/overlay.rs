//! Detail overlay controller.
//!
//! The selected item is never stored. It lives only in the current route's
//! `item_id` and is resolved against whatever lists are loaded each time the
//! view is drawn, so back/forward navigation opens and closes the overlay
//! without any extra bookkeeping.

use crate::catalog::CatalogItem;
use crate::history::History;
use crate::route::Route;

/// Whether the detail overlay is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayState {
    /// No item selected.
    Closed,
    /// An item is selected.
    Open {
        /// Selected item id.
        item_id: u64,
        /// Card key the overlay morphs from.
        layout_key: String,
    },
}

impl OverlayState {
    /// Derives the overlay state from `route`.
    #[must_use]
    pub fn from_route(route: &Route) -> Self {
        route.item_id.map_or(Self::Closed, |item_id| Self::Open {
            item_id,
            layout_key: item_id.to_string(),
        })
    }

    /// Whether the overlay is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Finds the first item with `navigation_id` across `candidate_lists`, in order.
#[must_use]
pub fn resolve_selection<'a>(
    navigation_id: Option<u64>,
    candidate_lists: &[&'a [CatalogItem]],
) -> Option<&'a CatalogItem> {
    let id = navigation_id?;
    candidate_lists
        .iter()
        .find_map(|list| list.iter().find(|item| item.id == id))
}

/// Owns the navigation history and exposes open/close over it.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    history: History,
}

impl Navigator {
    /// Starts at `initial`.
    #[must_use]
    pub const fn new(initial: Route) -> Self {
        Self {
            history: History::new(initial),
        }
    }

    /// Current route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        self.history.current()
    }

    /// Overlay state of the current route.
    #[must_use]
    pub fn overlay(&self) -> OverlayState {
        OverlayState::from_route(self.route())
    }

    /// Opens the detail overlay for `item_id` by pushing a detail route.
    ///
    /// Returns `false` when an overlay is already open.
    pub fn open(&mut self, item_id: u64) -> bool {
        if self.route().item_id.is_some() {
            return false;
        }
        let route = self.route().with_item(item_id);
        tracing::debug!(%route, "opening detail");
        self.history.push(route);
        true
    }

    /// Closes the overlay by going back.
    ///
    /// A deep-linked detail route with nothing behind it is replaced by its
    /// section root. Returns `false` when no overlay is open.
    pub fn close(&mut self) -> bool {
        if self.route().item_id.is_none() {
            return false;
        }
        if !self.history.back() {
            let root = self.route().without_item();
            tracing::debug!(%root, "closing deep-linked detail");
            self.history.replace(root);
        }
        true
    }

    /// Navigates to `route` unless it is already current.
    pub fn navigate(&mut self, route: Route) {
        if self.route() != &route {
            self.history.push(route);
        }
    }

    /// History back.
    pub fn back(&mut self) -> bool {
        self.history.back()
    }

    /// History forward.
    pub fn forward(&mut self) -> bool {
        self.history.forward()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::catalog::tests::items;
    use crate::section::Section;

    #[test]
    fn test_resolve_without_id_is_none() {
        // Arrange
        let list = items(1, 3);

        // Act & Assert
        assert!(resolve_selection(None, &[&list]).is_none());
    }

    #[test]
    fn test_resolve_finds_item_in_one_list() {
        // Arrange
        let first = items(1, 3);
        let second = items(10, 3);

        // Act
        let found = resolve_selection(Some(11), &[&first, &second]);

        // Assert
        assert_eq!(found.unwrap().id, 11);
    }

    #[test]
    fn test_resolve_missing_id_is_none() {
        // Arrange
        let first = items(1, 3);
        let empty: Vec<CatalogItem> = Vec::new();

        // Act & Assert
        assert!(resolve_selection(Some(99), &[&first, &empty]).is_none());
    }

    #[test]
    fn test_resolve_prefers_earlier_list() {
        // Arrange
        let mut first = items(5, 1);
        first[0].title = String::from("from now playing");
        let second = items(5, 1);

        // Act
        let found = resolve_selection(Some(5), &[&first, &second]);

        // Assert
        assert_eq!(found.unwrap().title, "from now playing");
    }

    #[test]
    fn test_open_then_close_returns_to_prior_route() {
        // Arrange
        let mut navigator = Navigator::new(Route::movies());
        let list = items(549, 3);

        // Act
        let opened = navigator.open(550);
        let while_open = resolve_selection(navigator.route().item_id, &[&list]).map(|i| i.id);
        let closed = navigator.close();

        // Assert
        assert!(opened);
        assert!(closed);
        assert_eq!(while_open, Some(550));
        assert_eq!(navigator.route(), &Route::movies());
        assert_eq!(navigator.overlay(), OverlayState::Closed);
        assert!(resolve_selection(navigator.route().item_id, &[&list]).is_none());
    }

    #[test]
    fn test_open_encodes_section_segment() {
        // Arrange
        let mut tv = Navigator::new(Route::tv());
        let mut search = Navigator::new(Route::search("fight"));

        // Act
        tv.open(1399);
        search.open(550);

        // Assert
        assert_eq!(tv.route().to_string(), "/tv/1399");
        assert_eq!(search.route().to_string(), "/search/550?keyword=fight");
        assert_eq!(
            tv.overlay(),
            OverlayState::Open {
                item_id: 1399,
                layout_key: String::from("1399")
            }
        );
    }

    #[test]
    fn test_close_deep_link_replaces_with_section_root() {
        // Arrange
        let mut navigator = Navigator::new(Route::parse("/tv/1399").unwrap());

        // Act
        let closed = navigator.close();

        // Assert
        assert!(closed);
        assert_eq!(navigator.route(), &Route::for_section(Section::Tv));
        assert!(!navigator.back());
    }

    #[test]
    fn test_back_and_forward_toggle_overlay() {
        // Arrange
        let mut navigator = Navigator::default();
        navigator.open(550);

        // Act
        navigator.back();
        let after_back = navigator.overlay().is_open();
        navigator.forward();
        let after_forward = navigator.overlay().is_open();

        // Assert
        assert!(!after_back);
        assert!(after_forward);
    }

    #[test]
    fn test_open_while_open_and_close_while_closed_are_noops() {
        // Arrange
        let mut navigator = Navigator::default();
        navigator.open(1);

        // Act
        let reopened = navigator.open(2);
        navigator.close();
        let closed_again = navigator.close();

        // Assert
        assert!(!reopened);
        assert!(!closed_again);
        assert_eq!(navigator.route(), &Route::movies());
    }

    #[test]
    fn test_navigate_skips_duplicate_route() {
        // Arrange
        let mut navigator = Navigator::default();

        // Act
        navigator.navigate(Route::movies());
        navigator.navigate(Route::tv());

        // Assert
        assert!(navigator.back());
        assert!(!navigator.back());
    }
}
