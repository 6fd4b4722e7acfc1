//! Raw state vocabularies mapped onto [`NormalizedStatus`].

use crate::sink::{GateEvent, ReportSink};
use crate::status::{NormalizedStatus, SourceKind};

/// Classify `raw` with the vocabulary of `source`. Unrecognized input
/// becomes [`NormalizedStatus::Unknown`] and is reported to `sink`.
pub fn classify(
    source: SourceKind,
    name: &str,
    raw: &str,
    sink: &dyn ReportSink,
) -> NormalizedStatus {
    let classified = match source {
        SourceKind::Statuses => classify_status(raw),
        SourceKind::Checks => classify_check(raw),
    };
    classified.unwrap_or_else(|| {
        sink.emit(&GateEvent::UnrecognizedState {
            source,
            name: name.to_string(),
            state: raw.to_string(),
        });
        NormalizedStatus::Unknown
    })
}

/// Classify a commit status `state`. Returns `None` for anything outside
/// the platform's vocabulary; callers surface that and fall back to
/// [`NormalizedStatus::Unknown`].
pub fn classify_status(raw: &str) -> Option<NormalizedStatus> {
    match raw {
        "success" => Some(NormalizedStatus::Success),
        "failure" => Some(NormalizedStatus::Failure),
        "pending" => Some(NormalizedStatus::Pending),
        _ => None,
    }
}

/// Classify a check run by its conclusion if it has one, else by its status.
pub fn classify_check(raw: &str) -> Option<NormalizedStatus> {
    match raw {
        "success" | "neutral" => Some(NormalizedStatus::Success),
        "failure" | "timed_out" => Some(NormalizedStatus::Failure),
        "pending" | "action_required" | "queued" | "in_progress" => {
            Some(NormalizedStatus::Pending)
        }
        "skipped" => Some(NormalizedStatus::Skipped),
        "canceled" | "cancelled" => Some(NormalizedStatus::Canceled),
        _ => None,
    }
}
