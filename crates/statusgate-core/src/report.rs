//! Raw reports as fetched from the hosting platform, and the keyed
//! observations derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::status::NormalizedStatus;

/// One observation of a commit status or check run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawReport {
    /// Context name (commit statuses) or check name (check runs).
    pub name: String,

    /// State in the source's own vocabulary.
    pub state: String,

    /// Observation time. `None` when the platform gave neither a
    /// completion nor a start time.
    pub observed_at: Option<DateTime<Utc>>,

    /// Link to the report's details page, if any.
    pub url: Option<String>,
}

impl RawReport {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            observed_at: None,
            url: None,
        }
    }

    pub fn at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A check run report together with the suite that owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckRunReport {
    pub report: RawReport,
    pub suite_id: u64,
}

impl CheckRunReport {
    pub fn new(report: RawReport, suite_id: u64) -> Self {
        Self { report, suite_id }
    }
}

/// Identity under which reports are deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregationKey {
    /// Commit statuses collapse by context name alone.
    Context { name: String },
    /// Check runs collapse by name within one check suite.
    Check { name: String, suite_id: u64 },
}

impl AggregationKey {
    pub fn name(&self) -> &str {
        match self {
            AggregationKey::Context { name } => name,
            AggregationKey::Check { name, .. } => name,
        }
    }
}

impl fmt::Display for AggregationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationKey::Context { name } => write!(f, "{}", name),
            AggregationKey::Check { name, suite_id } => write!(f, "{} (suite {})", name, suite_id),
        }
    }
}

/// A report filed under its deduplication key, not yet classified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyedReport {
    pub key: AggregationKey,
    /// State in the source's own vocabulary.
    pub state: String,
    pub observed_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

impl From<RawReport> for KeyedReport {
    fn from(report: RawReport) -> Self {
        KeyedReport {
            key: AggregationKey::Context { name: report.name },
            state: report.state,
            observed_at: report.observed_at,
            url: report.url,
        }
    }
}

impl From<CheckRunReport> for KeyedReport {
    fn from(check: CheckRunReport) -> Self {
        KeyedReport {
            key: AggregationKey::Check {
                name: check.report.name,
                suite_id: check.suite_id,
            },
            state: check.report.state,
            observed_at: check.report.observed_at,
            url: check.report.url,
        }
    }
}

/// A classified report that survived deduplication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Observation {
    pub key: AggregationKey,
    pub observed_at: Option<DateTime<Utc>>,
    pub status: NormalizedStatus,
    pub url: Option<String>,
}
