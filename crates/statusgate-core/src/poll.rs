//! Polling state machine.
//!
//! Each attempt fetches and reduces both sources concurrently, then
//! decides whether the gate has settled:
//!
//! - both aggregates `Success` → `Succeeded`
//! - either aggregate `Failure` → `Failed`
//! - otherwise keep `Running`, or `TimedOut` when the attempt budget is spent
//!
//! `Unknown` never settles the gate; it is retried like `Pending`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::config::{DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_MAX_ATTEMPTS};
use crate::error::Result;
use crate::evaluate::{evaluate_checks, evaluate_statuses};
use crate::ignore::IgnoreRule;
use crate::sink::{GateEvent, ReportSink};
use crate::source::StatusSource;
use crate::status::AggregateStatus;

/// Timing and budget of a polling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    pub check_interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// States of the polling state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Running,
    Succeeded,
    Failed,
    TimedOut,
}

/// Decide the state after `attempt` (1-based) produced these aggregates.
pub fn next_state(
    checks: AggregateStatus,
    statuses: AggregateStatus,
    attempt: u32,
    max_attempts: u32,
) -> PollState {
    if checks == AggregateStatus::Success && statuses == AggregateStatus::Success {
        PollState::Succeeded
    } else if checks == AggregateStatus::Failure || statuses == AggregateStatus::Failure {
        PollState::Failed
    } else if attempt >= max_attempts {
        PollState::TimedOut
    } else {
        PollState::Running
    }
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    Succeeded,
    Failed,
    TimedOut,
}

/// Final verdict of a polling session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult {
    /// `true` only when both sources reduced to `Success`.
    pub success: bool,
    pub outcome: PollOutcome,
    /// Attempts made, including the last.
    pub attempts: u32,
    /// Aggregates observed on the last attempt.
    pub checks: AggregateStatus,
    pub statuses: AggregateStatus,
}

/// Repeatedly evaluates a revision until the gate settles.
pub struct Poller {
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn ReportSink>,
    ignore: IgnoreRule,
    config: PollConfig,
}

impl Poller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn ReportSink>,
        ignore: IgnoreRule,
        config: PollConfig,
    ) -> Self {
        Self {
            source,
            sink,
            ignore,
            config,
        }
    }

    /// Poll `revision` to a verdict.
    ///
    /// A fetch error ends the session immediately with no verdict.
    pub async fn run(&self, revision: &str) -> Result<PollResult> {
        let session_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "statusgate.poll",
            session_id = %session_id,
            revision = %revision
        );
        self.poll(revision).instrument(span).await
    }

    async fn poll(&self, revision: &str) -> Result<PollResult> {
        let source = self.source.as_ref();
        let sink = self.sink.as_ref();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let (checks, statuses) = futures::try_join!(
                evaluate_checks(source, revision, &self.ignore, sink),
                evaluate_statuses(source, revision, &self.ignore, sink),
            )?;

            let (checks_status, statuses_status) = (checks.aggregate, statuses.aggregate);
            sink.emit(&GateEvent::Evaluated(checks));
            sink.emit(&GateEvent::Evaluated(statuses));
            sink.emit(&GateEvent::Attempt {
                attempt,
                checks: checks_status,
                statuses: statuses_status,
            });

            let state = next_state(
                checks_status,
                statuses_status,
                attempt,
                self.config.max_attempts,
            );
            let outcome = match state {
                PollState::Running => {
                    debug!(
                        attempt = attempt,
                        interval_secs = self.config.check_interval.as_secs(),
                        "gate not settled, waiting"
                    );
                    tokio::time::sleep(self.config.check_interval).await;
                    continue;
                }
                PollState::Succeeded => {
                    sink.emit(&GateEvent::Succeeded { attempts: attempt });
                    PollOutcome::Succeeded
                }
                PollState::Failed => {
                    sink.emit(&GateEvent::Failed {
                        attempts: attempt,
                        checks: checks_status,
                        statuses: statuses_status,
                    });
                    PollOutcome::Failed
                }
                PollState::TimedOut => {
                    sink.emit(&GateEvent::TimedOut { attempts: attempt });
                    PollOutcome::TimedOut
                }
            };

            return Ok(PollResult {
                success: outcome == PollOutcome::Succeeded,
                outcome,
                attempts: attempt,
                checks: checks_status,
                statuses: statuses_status,
            });
        }
    }
}
