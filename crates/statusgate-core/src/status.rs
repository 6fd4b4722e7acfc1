//! Normalized per-report statuses and per-source aggregates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single report after classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NormalizedStatus {
    Unknown,
    Failure,
    Canceled,
    Skipped,
    Pending,
    Success,
}

impl NormalizedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizedStatus::Unknown => "unknown",
            NormalizedStatus::Failure => "failure",
            NormalizedStatus::Canceled => "canceled",
            NormalizedStatus::Skipped => "skipped",
            NormalizedStatus::Pending => "pending",
            NormalizedStatus::Success => "success",
        }
    }
}

impl fmt::Display for NormalizedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduced verdict for one reporting source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AggregateStatus {
    Pending,
    Success,
    Failure,
    Unknown,
}

impl AggregateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateStatus::Pending => "pending",
            AggregateStatus::Success => "success",
            AggregateStatus::Failure => "failure",
            AggregateStatus::Unknown => "unknown",
        }
    }

    /// Whether this aggregate settles the gate on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AggregateStatus::Success | AggregateStatus::Failure)
    }
}

impl fmt::Display for AggregateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two reporting mechanisms a revision can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Legacy commit statuses, keyed by context.
    Statuses,
    /// Check runs, keyed by (name, check suite).
    Checks,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Statuses => "statuses",
            SourceKind::Checks => "checks",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
