//! Latest-request guard for asynchronously filled slots.
//!
//! Fetches are never cancelled. Each request carries a [`RequestToken`], and a
//! response is applied only if its token is the most recently issued one, so a
//! slow response for an old search keyword cannot overwrite a newer result.

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Sequence number of the request.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing tokens.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    /// Creates a tracker that has issued nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issues a token newer than every earlier one.
    pub const fn issue(&mut self) -> RequestToken {
        self.latest = self.latest.saturating_add(1);
        RequestToken(self.latest)
    }

    /// Whether `token` is the most recently issued one.
    #[must_use]
    pub const fn is_latest(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Like [`Self::is_latest`], logging rejected tokens.
    pub fn accept(&self, token: RequestToken) -> bool {
        let latest = self.is_latest(token);
        if !latest {
            tracing::debug!(
                token = token.0,
                latest = self.latest,
                "discarding stale response"
            );
        }
        latest
    }
}

/// Data that is being fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Loadable<T> {
    /// Not yet available.
    #[default]
    Loading,
    /// Fetched.
    Ready(T),
    /// The fetch failed with this message.
    Failed(String),
}

impl<T> Loadable<T> {
    /// The data, if fetched.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    /// Whether the data is still unavailable, either loading or failed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !matches!(self, Self::Ready(_))
    }
}

impl<T> From<Result<T, String>> for Loadable<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(message) => Self::Failed(message),
        }
    }
}

/// A keyed slot that only accepts the response to its newest request.
#[derive(Debug, Clone)]
pub struct LatestSlot<K, T> {
    key: Option<K>,
    tracker: RequestTracker,
    value: Loadable<T>,
}

impl<K, T> Default for LatestSlot<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            tracker: RequestTracker::new(),
            value: Loadable::Loading,
        }
    }
}

impl<K: PartialEq, T> LatestSlot<K, T> {
    /// Starts a request for `key` and returns its token.
    pub fn begin(&mut self, key: K) -> RequestToken {
        self.key = Some(key);
        self.value = Loadable::Loading;
        self.tracker.issue()
    }

    /// Applies a response; returns `false` if it was stale and discarded.
    pub fn complete(&mut self, token: RequestToken, result: Result<T, String>) -> bool {
        if !self.tracker.accept(token) {
            return false;
        }
        self.value = Loadable::from(result);
        true
    }

    /// Whether the newest request was for `key`.
    #[must_use]
    pub fn is_for(&self, key: &K) -> bool {
        self.key.as_ref() == Some(key)
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> &Loadable<T> {
        &self.value
    }
}
