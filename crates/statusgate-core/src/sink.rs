//! Reporting side effects of the gate, as an injected capability.
//!
//! The engine never logs directly: it hands every warning, progress line
//! and summary to a [`ReportSink`]. [`TracingSink`] forwards them to
//! `tracing`; tests use [`crate::fakes::RecordingSink`] to assert on them.

use tracing::{debug, info, warn};

use crate::evaluate::SourceEvaluation;
use crate::report::AggregationKey;
use crate::status::{AggregateStatus, NormalizedStatus, SourceKind};
use crate::summary::render_summary;

/// Something the gate wants surfaced to a human.
#[derive(Debug, Clone, PartialEq)]
pub enum GateEvent {
    /// A raw state string fell outside the classifier's vocabulary.
    UnrecognizedState {
        source: SourceKind,
        name: String,
        state: String,
    },
    /// A report had no timestamp and was dropped.
    MissingTimestamp {
        source: SourceKind,
        key: AggregationKey,
    },
    /// A source reduced to `Unknown`; carries the full per-key breakdown.
    UnknownAggregate {
        source: SourceKind,
        breakdown: Vec<(AggregationKey, NormalizedStatus)>,
    },
    /// One source finished evaluating for this attempt.
    Evaluated(SourceEvaluation),
    /// One attempt finished: `attempt <n>: checks=<status>, statuses=<status>`.
    Attempt {
        attempt: u32,
        checks: AggregateStatus,
        statuses: AggregateStatus,
    },
    Succeeded {
        attempts: u32,
    },
    Failed {
        attempts: u32,
        checks: AggregateStatus,
        statuses: AggregateStatus,
    },
    TimedOut {
        attempts: u32,
    },
}

/// Receiver for gate events.
pub trait ReportSink: Send + Sync {
    fn emit(&self, event: &GateEvent);
}

/// Sink that writes every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&self, event: &GateEvent) {
        match event {
            GateEvent::UnrecognizedState {
                source,
                name,
                state,
            } => {
                warn!(
                    event = "classify.unrecognized",
                    source = %source,
                    name = %name,
                    state = %state,
                    "unrecognized {} state '{}' for '{}', treating as unknown",
                    source, state, name
                );
            }
            GateEvent::MissingTimestamp { source, key } => {
                warn!(
                    event = "dedup.missing_timestamp",
                    source = %source,
                    key = %key,
                    "dropping {} report '{}': no timestamp to order it by",
                    source, key
                );
            }
            GateEvent::UnknownAggregate { source, breakdown } => {
                let detail = breakdown
                    .iter()
                    .map(|(key, status)| format!("{}={}", key, status))
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(
                    event = "reduce.unknown",
                    source = %source,
                    breakdown = %detail,
                    "{} aggregate is unknown: [{}]",
                    source, detail
                );
            }
            GateEvent::Evaluated(evaluation) => {
                debug!(
                    event = "source.evaluated",
                    source = %evaluation.source,
                    aggregate = %evaluation.aggregate,
                    entries = evaluation.entries.len(),
                    "\n{}",
                    render_summary(evaluation)
                );
            }
            GateEvent::Attempt {
                attempt,
                checks,
                statuses,
            } => {
                info!(
                    event = "poll.attempt",
                    attempt = attempt,
                    "attempt {}: checks={}, statuses={}",
                    attempt, checks, statuses
                );
            }
            GateEvent::Succeeded { attempts } => {
                info!(event = "poll.succeeded", attempts = attempts, "all checks passed");
            }
            GateEvent::Failed {
                attempts,
                checks,
                statuses,
            } => {
                warn!(
                    event = "poll.failed",
                    attempts = attempts,
                    "checks failed (checks={}, statuses={})",
                    checks, statuses
                );
            }
            GateEvent::TimedOut { attempts } => {
                warn!(
                    event = "poll.timed_out",
                    attempts = attempts,
                    "timed out after {} attempts without a final verdict",
                    attempts
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_accepts_every_event() {
        // No subscriber installed; this only checks nothing panics.
        let sink = TracingSink;
        sink.emit(&GateEvent::UnknownAggregate {
            source: SourceKind::Checks,
            breakdown: vec![(
                AggregationKey::Check {
                    name: "build".to_string(),
                    suite_id: 1,
                },
                NormalizedStatus::Unknown,
            )],
        });
        sink.emit(&GateEvent::TimedOut { attempts: 3 });
    }
}
