//! Request generations for ordering page loads.
//!
//! Every load takes the next generation before it starts. When the load
//! completes it may only commit if its generation is still the latest one
//! handed out; otherwise a newer load owns the page and the result is
//! dropped.

use std::sync::atomic::{AtomicU64, Ordering};

/// A point in a page's load history. Larger is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Monotonic source of [`Generation`]s for one page.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier one.
    pub fn next(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest() == generation
    }
}
