//! Horizontal slide between two carousel pages.

use std::time::{Duration, Instant};

/// Default length of a page transition.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(1500);

/// Column offsets of the outgoing and incoming pages at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideFrame {
    /// Offset of the outgoing page; starts at 0 and ends at `-width`.
    pub outgoing: i32,
    /// Offset of the incoming page; starts at `width` and ends at 0.
    pub incoming: i32,
}

impl SlideFrame {
    /// Frame at `progress` (clamped to `0.0..=1.0`) across a row `width` columns wide.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn at(progress: f64, width: u16) -> Self {
        let eased = ease_in_out(progress.clamp(0.0, 1.0));
        let width = f64::from(width);
        let travelled = (width * eased).round();
        Self {
            outgoing: -travelled as i32,
            incoming: (width - travelled) as i32,
        }
    }
}

/// Smoothstep easing.
fn ease_in_out(t: f64) -> f64 {
    t * t * 2.0f64.mul_add(-t, 3.0)
}

/// An in-flight page transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Page that is sliding out.
    pub from_page: usize,
    /// When the transition started.
    pub started: Instant,
    /// Total duration.
    pub duration: Duration,
}

impl Transition {
    /// Starts a transition away from `from_page`.
    #[must_use]
    pub const fn new(from_page: usize, started: Instant, duration: Duration) -> Self {
        Self {
            from_page,
            started,
            duration,
        }
    }

    /// Fraction of the transition elapsed at `now`.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Whether the transition has finished at `now`.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_endpoints() {
        // Arrange & Act
        let start = SlideFrame::at(0.0, 80);
        let end = SlideFrame::at(1.0, 80);

        // Assert
        assert_eq!(
            start,
            SlideFrame {
                outgoing: 0,
                incoming: 80
            }
        );
        assert_eq!(
            end,
            SlideFrame {
                outgoing: -80,
                incoming: 0
            }
        );
    }

    #[test]
    fn test_frame_halfway_is_symmetric() {
        // Arrange & Act
        let mid = SlideFrame::at(0.5, 80);

        // Assert
        assert_eq!(mid.outgoing, -40);
        assert_eq!(mid.incoming, 40);
    }

    #[test]
    fn test_progress_is_clamped() {
        // Arrange & Act & Assert
        assert_eq!(SlideFrame::at(-1.0, 10), SlideFrame::at(0.0, 10));
        assert_eq!(SlideFrame::at(3.0, 10), SlideFrame::at(1.0, 10));
    }

    #[test]
    fn test_transition_progress() {
        // Arrange
        let started = Instant::now();
        let transition = Transition::new(0, started, Duration::from_millis(1000));

        // Act
        let half = transition.progress(started + Duration::from_millis(500));
        let over = transition.progress(started + Duration::from_millis(2000));

        // Assert
        assert!((half - 0.5).abs() < 1e-9);
        assert!((over - 1.0).abs() < f64::EPSILON);
        assert!(!transition.is_complete(started + Duration::from_millis(999)));
        assert!(transition.is_complete(started + Duration::from_millis(1000)));
    }

    #[test]
    fn test_zero_duration_is_complete_immediately() {
        // Arrange
        let started = Instant::now();
        let transition = Transition::new(1, started, Duration::ZERO);

        // Act & Assert
        assert!(transition.is_complete(started));
        assert!((transition.progress(started) - 1.0).abs() < f64::EPSILON);
    }
}
