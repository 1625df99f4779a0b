//! Presentation-independent browsing logic for nomflix.
//!
//! Everything here is synchronous and operates over already-fetched data:
//! the carousel engine windows rows and guards page transitions, the overlay
//! navigator keeps the detail selection in the navigation history, and the
//! fetch guard discards stale responses.

/// Banner derivation for the top of a section.
pub mod banner;
/// Carousel engine: per-row paging state.
pub mod carousel;
/// Catalog items as displayed.
pub mod catalog;
/// Request tokens and loadable slots.
pub mod fetch;
/// Navigation history stack.
pub mod history;
/// Detail overlay navigation and selection.
pub mod overlay;
/// URL-shaped routes.
pub mod route;
/// Sections and their rows.
pub mod section;
/// Slide transition geometry and timing.
pub mod slide;
