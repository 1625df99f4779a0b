//! Carousel engine.
//!
//! Each mounted row owns a [`CarouselState`]. `advance` moves the row to its
//! next page and marks it transitioning; further advances are dropped, not
//! queued, until the presentation layer calls
//! [`Carousel::acknowledge_transition_complete`].

use std::collections::HashMap;
use std::fmt;

use crate::section::RowId;

/// Paging state of one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarouselState {
    /// Displayed page, always `<= max_page_index`.
    pub current_page_index: usize,
    /// A page transition is in flight.
    pub is_transitioning: bool,
}

/// Result of an advance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Row is not mounted or its data has not loaded.
    NotLoaded,
    /// A transition is already in flight; the request was dropped.
    Suppressed,
    /// The row has at most one full page.
    SinglePage,
    /// The page changed and a transition started.
    Advanced {
        /// Outgoing page.
        from: usize,
        /// Incoming page.
        to: usize,
    },
}

/// Carousel errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// A row cannot show zero items per page.
    ZeroOffset(RowId),
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroOffset(row) => write!(f, "row {row} must show at least one item per page"),
        }
    }
}

impl std::error::Error for CarouselError {}

/// Number of full pages for `total_items` at `offset` items per page.
#[must_use]
pub const fn page_count(total_items: usize, offset: usize) -> usize {
    match total_items.checked_div(offset) {
        Some(pages) => pages,
        None => 0,
    }
}

/// `floor(total_items / offset) - 1`, or `None` when there is no full page.
#[must_use]
pub const fn max_page_index(total_items: usize, offset: usize) -> Option<usize> {
    page_count(total_items, offset).checked_sub(1)
}

/// The `index`-th window of `offset` items; empty when out of range.
#[must_use]
pub fn page_window<T>(all_items: &[T], offset: usize, index: usize) -> &[T] {
    let start = offset.saturating_mul(index);
    let end = start.saturating_add(offset).min(all_items.len());
    all_items.get(start..end).unwrap_or(&[])
}

#[derive(Debug, Clone)]
struct RowEntry {
    offset: usize,
    total_items: Option<usize>,
    state: CarouselState,
}

/// Keyed table of per-row paging state.
#[derive(Debug, Default)]
pub struct Carousel {
    rows: HashMap<RowId, RowEntry>,
}

impl Carousel {
    /// Creates an empty carousel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts `row` at page 0. Mounting again resets the row.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::ZeroOffset`] if `offset` is 0.
    pub fn mount(&mut self, row: RowId, offset: usize) -> Result<(), CarouselError> {
        if offset == 0 {
            return Err(CarouselError::ZeroOffset(row));
        }
        self.rows.insert(
            row,
            RowEntry {
                offset,
                total_items: None,
                state: CarouselState::default(),
            },
        );
        Ok(())
    }

    /// Discards the state of `row`.
    pub fn unmount(&mut self, row: RowId) -> Option<CarouselState> {
        self.rows.remove(&row).map(|entry| entry.state)
    }

    /// Whether `row` is mounted.
    #[must_use]
    pub fn is_mounted(&self, row: RowId) -> bool {
        self.rows.contains_key(&row)
    }

    /// Records that `row` now has `total_items` pageable items.
    ///
    /// An index past the new last page is reset to 0.
    pub fn load(&mut self, row: RowId, total_items: usize) {
        let Some(entry) = self.rows.get_mut(&row) else {
            tracing::debug!(%row, "load ignored for unmounted row");
            return;
        };
        entry.total_items = Some(total_items);
        let last = max_page_index(total_items, entry.offset).unwrap_or(0);
        if entry.state.current_page_index > last {
            entry.state.current_page_index = 0;
        }
    }

    /// Current state of `row`.
    #[must_use]
    pub fn state(&self, row: RowId) -> Option<CarouselState> {
        self.rows.get(&row).map(|entry| entry.state)
    }

    /// Last page index of `row`, if it is loaded and has a full page.
    #[must_use]
    pub fn max_page_index(&self, row: RowId) -> Option<usize> {
        let entry = self.rows.get(&row)?;
        max_page_index(entry.total_items?, entry.offset)
    }

    /// Moves `row` to its next page, wrapping to 0 after the last one.
    pub fn advance(&mut self, row: RowId) -> AdvanceOutcome {
        let Some(entry) = self.rows.get_mut(&row) else {
            return AdvanceOutcome::NotLoaded;
        };
        let Some(total_items) = entry.total_items else {
            return AdvanceOutcome::NotLoaded;
        };
        if entry.state.is_transitioning {
            tracing::debug!(%row, "advance suppressed while transitioning");
            return AdvanceOutcome::Suppressed;
        }

        let pages = page_count(total_items, entry.offset);
        if pages < 2 {
            return AdvanceOutcome::SinglePage;
        }

        let from = entry.state.current_page_index;
        let to = from.saturating_add(1).checked_rem(pages).unwrap_or(0);
        entry.state.is_transitioning = true;
        entry.state.current_page_index = to;
        tracing::debug!(%row, from, to, "carousel advanced");
        AdvanceOutcome::Advanced { from, to }
    }

    /// Clears the transitioning flag of `row`.
    pub fn acknowledge_transition_complete(&mut self, row: RowId) {
        if let Some(entry) = self.rows.get_mut(&row) {
            entry.state.is_transitioning = false;
        }
    }

    /// The visible slice of `all_items` for `row`.
    #[must_use]
    pub fn window_for<'a, T>(&self, row: RowId, all_items: &'a [T]) -> &'a [T] {
        self.rows
            .get(&row)
            .map(|entry| page_window(all_items, entry.offset, entry.state.current_page_index))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    const ROW: RowId = RowId::PopularTv;

    fn loaded(offset: usize, total: usize) -> Carousel {
        let mut carousel = Carousel::new();
        carousel.mount(ROW, offset).unwrap();
        carousel.load(ROW, total);
        carousel
    }

    fn advance_and_ack(carousel: &mut Carousel) -> usize {
        carousel.advance(ROW);
        carousel.acknowledge_transition_complete(ROW);
        carousel.state(ROW).unwrap().current_page_index
    }

    #[test]
    fn test_twelve_items_offset_five_cycles_one_zero_one() {
        // Arrange
        let mut carousel = loaded(5, 12);

        // Act
        let indices: Vec<usize> = (0..3).map(|_| advance_and_ack(&mut carousel)).collect();

        // Assert
        assert_eq!(carousel.max_page_index(ROW), Some(1));
        assert_eq!(indices, vec![1, 0, 1]);
    }

    #[test]
    fn test_advance_at_max_wraps_to_zero() {
        // Arrange
        let mut carousel = loaded(6, 18);
        advance_and_ack(&mut carousel);
        advance_and_ack(&mut carousel);

        // Act
        let outcome = carousel.advance(ROW);

        // Assert
        assert_eq!(outcome, AdvanceOutcome::Advanced { from: 2, to: 0 });
    }

    #[test]
    fn test_second_advance_before_ack_is_dropped() {
        // Arrange
        let mut carousel = loaded(5, 20);

        // Act
        let first = carousel.advance(ROW);
        let second = carousel.advance(ROW);

        // Assert
        assert_eq!(first, AdvanceOutcome::Advanced { from: 0, to: 1 });
        assert_eq!(second, AdvanceOutcome::Suppressed);
        assert_eq!(carousel.state(ROW).unwrap().current_page_index, 1);
        assert!(carousel.state(ROW).unwrap().is_transitioning);
    }

    #[test]
    fn test_fewer_items_than_offset_never_advances() {
        // Arrange
        let mut carousel = loaded(5, 3);

        // Act
        let outcome = carousel.advance(ROW);

        // Assert
        assert_eq!(outcome, AdvanceOutcome::SinglePage);
        assert_eq!(carousel.max_page_index(ROW), None);
        assert_eq!(carousel.state(ROW), Some(CarouselState::default()));
    }

    #[test]
    fn test_exactly_one_page_does_not_start_transition() {
        // Arrange
        let mut carousel = loaded(5, 9);

        // Act
        let outcome = carousel.advance(ROW);

        // Assert
        assert_eq!(outcome, AdvanceOutcome::SinglePage);
        assert!(!carousel.state(ROW).unwrap().is_transitioning);
    }

    #[test]
    fn test_advance_before_load_is_noop() {
        // Arrange
        let mut carousel = Carousel::new();
        carousel.mount(ROW, 5).unwrap();

        // Act & Assert
        assert_eq!(carousel.advance(ROW), AdvanceOutcome::NotLoaded);
        assert_eq!(
            carousel.advance(RowId::OnTheAirTv),
            AdvanceOutcome::NotLoaded
        );
    }

    #[test]
    fn test_index_stays_within_bounds() {
        // Arrange
        let mut carousel = loaded(6, 19);
        let max = carousel.max_page_index(ROW).unwrap();

        // Act & Assert
        for _ in 0..20 {
            let index = advance_and_ack(&mut carousel);
            assert!(index <= max);
        }
    }

    #[test]
    fn test_window_lengths() {
        // Arrange
        let items: Vec<u32> = (0..12).collect();
        let mut carousel = loaded(5, items.len());

        // Act
        let first = carousel.window_for(ROW, &items).to_vec();
        advance_and_ack(&mut carousel);
        let second = carousel.window_for(ROW, &items).to_vec();

        // Assert
        assert_eq!(first, vec![0, 1, 2, 3, 4]);
        assert_eq!(second, vec![5, 6, 7, 8, 9]);
        assert_eq!(page_window(&items, 5, 2), &[10, 11]);
        assert!(page_window(&items, 5, 7).is_empty());
        assert!(carousel.window_for(RowId::TopRatedTv, &items).is_empty());
    }

    #[test]
    fn test_reload_with_fewer_items_resets_index() {
        // Arrange
        let mut carousel = loaded(5, 15);
        advance_and_ack(&mut carousel);
        advance_and_ack(&mut carousel);

        // Act
        carousel.load(ROW, 6);

        // Assert
        assert_eq!(carousel.state(ROW).unwrap().current_page_index, 0);
    }

    #[test]
    fn test_zero_offset_is_rejected() {
        // Arrange
        let mut carousel = Carousel::new();

        // Act
        let result = carousel.mount(ROW, 0);

        // Assert
        assert_eq!(result, Err(CarouselError::ZeroOffset(ROW)));
        assert!(!carousel.is_mounted(ROW));
    }

    #[test]
    fn test_unmount_discards_state() {
        // Arrange
        let mut carousel = loaded(5, 15);
        advance_and_ack(&mut carousel);

        // Act
        let discarded = carousel.unmount(ROW);
        carousel.mount(ROW, 5).unwrap();

        // Assert
        assert_eq!(discarded.unwrap().current_page_index, 1);
        assert_eq!(carousel.state(ROW), Some(CarouselState::default()));
    }

    #[test]
    fn test_rows_are_independent() {
        // Arrange
        let mut carousel = loaded(5, 15);
        carousel.mount(RowId::TopRatedTv, 5).unwrap();
        carousel.load(RowId::TopRatedTv, 15);

        // Act
        carousel.advance(ROW);
        let other = carousel.advance(RowId::TopRatedTv);

        // Assert
        assert_eq!(other, AdvanceOutcome::Advanced { from: 0, to: 1 });
    }
}
