//! In-memory fakes for the gate's collaborators (testing only)
//!
//! Provides `ScriptedSource`, a [`StatusSource`] that replays scripted
//! responses attempt by attempt, and `RecordingSink`, a [`ReportSink`]
//! that keeps every event it receives.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::report::{CheckRunReport, RawReport};
use crate::sink::{GateEvent, ReportSink};
use crate::source::{FetchResult, StatusSource};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// ScriptedSource
// ---------------------------------------------------------------------------

/// Source that answers the n-th fetch with the n-th scripted response.
///
/// Once a script runs out, its last response repeats. An empty script
/// answers with no reports.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    statuses: Vec<Vec<RawReport>>,
    checks: Vec<Vec<CheckRunReport>>,
    fail_checks_on: Option<u32>,
    status_calls: AtomicU32,
    check_calls: AtomicU32,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the response for the next commit-status fetch.
    pub fn then_statuses(mut self, reports: Vec<RawReport>) -> Self {
        self.statuses.push(reports);
        self
    }

    /// Append the response for the next check-run fetch.
    pub fn then_checks(mut self, reports: Vec<CheckRunReport>) -> Self {
        self.checks.push(reports);
        self
    }

    /// Make the `call`-th check-run fetch (1-based) fail.
    pub fn failing_checks_on(mut self, call: u32) -> Self {
        self.fail_checks_on = Some(call);
        self
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn check_calls(&self) -> u32 {
        self.check_calls.load(Ordering::SeqCst)
    }
}

fn scripted<T: Clone>(script: &[Vec<T>], call: u32) -> Vec<T> {
    let index = (call as usize).saturating_sub(1);
    script
        .get(index)
        .or_else(|| script.last())
        .cloned()
        .unwrap_or_default()
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_commit_statuses(&self, _revision: &str) -> FetchResult<Vec<RawReport>> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(scripted(&self.statuses, call))
    }

    async fn fetch_check_runs(&self, _revision: &str) -> FetchResult<Vec<CheckRunReport>> {
        let call = self.check_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_checks_on == Some(call) {
            return Err(FetchError::Status {
                status: 401,
                url: "fake://check-runs".to_string(),
                body: "Bad credentials".to_string(),
            });
        }
        Ok(scripted(&self.checks, call))
    }
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// Sink that stores every emitted event in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GateEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<GateEvent> {
        lock(&self.events).clone()
    }

    /// `attempt <n>: checks=<status>, statuses=<status>` lines emitted so far.
    pub fn attempt_lines(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                GateEvent::Attempt {
                    attempt,
                    checks,
                    statuses,
                } => Some(format!(
                    "attempt {}: checks={}, statuses={}",
                    attempt, checks, statuses
                )),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn emit(&self, event: &GateEvent) {
        lock(&self.events).push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_scripted_response_repeats() {
        let source = ScriptedSource::new()
            .then_statuses(vec![RawReport::new("ci", "pending")])
            .then_statuses(vec![RawReport::new("ci", "success")]);

        let first = source.fetch_commit_statuses("abc").await.unwrap();
        let second = source.fetch_commit_statuses("abc").await.unwrap();
        let third = source.fetch_commit_statuses("abc").await.unwrap();

        assert_eq!(first[0].state, "pending");
        assert_eq!(second[0].state, "success");
        assert_eq!(third[0].state, "success");
        assert_eq!(source.status_calls(), 3);
    }

    #[tokio::test]
    async fn empty_script_answers_nothing() {
        let source = ScriptedSource::new();
        assert!(source.fetch_check_runs("abc").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn scripted_failure() {
        let source = ScriptedSource::new().failing_checks_on(2);
        assert!(source.fetch_check_runs("abc").await.is_ok());
        assert!(source.fetch_check_runs("abc").await.is_err());
        assert!(source.fetch_check_runs("abc").await.is_ok());
    }
}
