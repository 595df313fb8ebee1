//! State types for the catalog controller

use std::fmt;

/// Version stamp of the active filter. Bumped on every filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// Next page to request for the active generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    next: u32,
}

impl PageCursor {
    pub const FIRST_PAGE: u32 = 1;

    pub fn new() -> Self {
        Self {
            next: Self::FIRST_PAGE,
        }
    }

    pub fn next_page(&self) -> u32 {
        self.next
    }

    pub fn advance(&mut self) {
        self.next += 1;
    }

    pub fn reset(&mut self) {
        self.next = Self::FIRST_PAGE;
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Observable loading state of the active generation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing in flight; more pages may exist
    #[default]
    Idle,
    /// A page fetch is in flight
    Loading { page: u32 },
    /// The last page fetch failed; a new request retries it.
    /// `retryable` is false when the same request is expected to fail again.
    Failed {
        page: u32,
        message: String,
        retryable: bool,
    },
    /// The server has no further pages for this filter
    Exhausted,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, LoadState::Exhausted)
    }

    /// Whether the last failure is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LoadState::Failed {
                retryable: true,
                ..
            }
        )
    }
}
