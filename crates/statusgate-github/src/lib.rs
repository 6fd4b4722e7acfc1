//! statusgate-github: GitHub as a status source
//!
//! Implements [`statusgate_core::StatusSource`] on top of the GitHub REST
//! API, listing the commit statuses and check runs of a revision.

pub mod client;
pub mod payload;

pub use client::{GithubClient, GithubConfig, MAX_PAGES, PER_PAGE};
pub use payload::{CheckRun, CheckRunsPage, CheckSuiteRef, CommitStatus};
