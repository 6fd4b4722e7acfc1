//! Sink that logs through tracing and keeps the latest per-source tables.

use std::sync::Mutex;

use statusgate_core::{
    render_summary, GateEvent, ReportSink, SourceEvaluation, SourceKind, TracingSink,
};

/// Forwards every event to [`TracingSink`] and remembers the most recent
/// evaluation of each source for the step summary.
#[derive(Debug, Default)]
pub struct SummarySink {
    inner: TracingSink,
    checks: Mutex<Option<SourceEvaluation>>,
    statuses: Mutex<Option<SourceEvaluation>>,
}

impl SummarySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markdown for the last attempt: check runs first, then commit statuses.
    pub fn render(&self) -> String {
        [&self.checks, &self.statuses]
            .iter()
            .filter_map(|slot| {
                slot.lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .as_ref()
                    .map(render_summary)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ReportSink for SummarySink {
    fn emit(&self, event: &GateEvent) {
        self.inner.emit(event);

        if let GateEvent::Evaluated(evaluation) = event {
            let slot = match evaluation.source {
                SourceKind::Checks => &self.checks,
                SourceKind::Statuses => &self.statuses,
            };
            *slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(evaluation.clone());
        }
    }
}
