//! The fetch collaborator the gate polls.
//!
//! Implementations talk to a hosting platform; the gate only sees raw
//! reports. In-memory implementations live in [`crate::fakes`].

use async_trait::async_trait;

use crate::error::FetchError;
use crate::report::{CheckRunReport, RawReport};

/// Result type for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Source of commit statuses and check runs for a revision.
///
/// Both calls are made fresh on every polling attempt; implementations
/// must not cache across calls.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Every commit status reported for `revision`, in feed order.
    async fn fetch_commit_statuses(&self, revision: &str) -> FetchResult<Vec<RawReport>>;

    /// Every check run reported for `revision`, in feed order.
    async fn fetch_check_runs(&self, revision: &str) -> FetchResult<Vec<CheckRunReport>>;
}
