//! Observable state of one mounted page.

use chrono::Utc;
use fintra_core::Timestamp;

/// Where the currently displayed snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Cache,
    Remote,
}

/// Page-level fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Nothing to show; the page renders only the error.
    Blocking(String),
    /// Older data is still displayed with this message alongside.
    Stale(String),
}

impl PageError {
    pub fn message(&self) -> &str {
        match self {
            PageError::Blocking(message) | PageError::Stale(message) => message,
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, PageError::Blocking(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Error,
    Warning,
    Success,
}

/// Dismissable message shown next to the list a mutation touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
    pub created_at: Timestamp,
}

impl Banner {
    pub fn new(level: BannerLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(BannerLevel::Error, message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageState<S> {
    pub data: Option<S>,
    pub source: Option<DataSource>,
    /// Blocking spinner: set only while there is nothing to show.
    pub loading: bool,
    /// Forced reload in flight with data still on screen.
    pub refreshing: bool,
    pub fetch_error: Option<PageError>,
    pub banner: Option<Banner>,
    /// Number of remote snapshots committed so far.
    pub revision: u64,
    pub synced_at: Option<Timestamp>,
}

impl<S> Default for PageState<S> {
    fn default() -> Self {
        Self {
            data: None,
            source: None,
            loading: false,
            refreshing: false,
            fetch_error: None,
            banner: None,
            revision: 0,
            synced_at: None,
        }
    }
}

impl<S> PageState<S> {
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.refreshing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_and_idle() {
        let state = PageState::<Vec<u8>>::default();
        assert!(!state.has_data());
        assert!(!state.is_busy());
        assert_eq!(state.revision, 0);
    }

    #[test]
    fn test_page_error_message() {
        let err = PageError::Stale("Accounts: offline".to_string());
        assert_eq!(err.message(), "Accounts: offline");
        assert!(!err.is_blocking());
        assert!(PageError::Blocking(String::new()).is_blocking());
    }
}
