//! Browser-like navigation history.

use crate::route::Route;

/// Stack of visited routes with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    back_stack: Vec<Route>,
    current: Route,
    forward_stack: Vec<Route>,
}

impl History {
    /// Starts at `initial` with nothing behind or ahead.
    #[must_use]
    pub const fn new(initial: Route) -> Self {
        Self {
            back_stack: Vec::new(),
            current: initial,
            forward_stack: Vec::new(),
        }
    }

    /// Current route.
    #[must_use]
    pub const fn current(&self) -> &Route {
        &self.current
    }

    /// Navigates to `route`, dropping forward entries.
    pub fn push(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.current, route);
        self.back_stack.push(previous);
        self.forward_stack.clear();
    }

    /// Replaces the current entry in place.
    pub fn replace(&mut self, route: Route) {
        self.current = route;
    }

    /// Goes back one entry. Returns `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.back_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.forward_stack.push(current);
        true
    }

    /// Goes forward one entry. Returns `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        let Some(next) = self.forward_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.back_stack.push(current);
        true
    }

    /// Whether an earlier entry exists.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    /// Whether a later entry exists.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        !self.forward_stack.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_and_forward() {
        // Arrange
        let mut history = History::default();
        history.push(Route::tv());

        // Act
        let went_back = history.back();
        let at_oldest = history.back();
        let went_forward = history.forward();

        // Assert
        assert!(went_back);
        assert!(!at_oldest);
        assert!(went_forward);
        assert_eq!(history.current(), &Route::tv());
        assert!(!history.forward());
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        // Arrange
        let mut history = History::default();
        history.push(Route::tv());
        history.back();

        // Act
        history.push(Route::search("x"));

        // Assert
        assert!(!history.can_go_forward());
        assert!(history.back());
        assert_eq!(history.current(), &Route::movies());
    }

    #[test]
    fn test_replace_keeps_depth() {
        // Arrange
        let mut history = History::new(Route::tv().with_item(1));

        // Act
        history.replace(Route::tv());

        // Assert
        assert_eq!(history.current(), &Route::tv());
        assert!(!history.can_go_back());
    }
}
