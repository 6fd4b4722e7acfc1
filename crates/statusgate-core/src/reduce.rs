//! Reduction of per-key statuses into one aggregate per source.

use crate::report::Observation;
use crate::sink::{GateEvent, ReportSink};
use crate::status::{AggregateStatus, NormalizedStatus, SourceKind};

/// Combine statuses by precedence, first match wins:
///
/// 1. any `Failure` or `Canceled` → `Failure`
/// 2. any `Pending` → `Pending`
/// 3. only `Success` / `Skipped`, or nothing at all → `Success`
/// 4. otherwise → `Unknown`
pub fn reduce_statuses<I>(statuses: I) -> AggregateStatus
where
    I: IntoIterator<Item = NormalizedStatus>,
{
    let mut pending = false;
    let mut unknown = false;

    for status in statuses {
        match status {
            NormalizedStatus::Failure | NormalizedStatus::Canceled => {
                return AggregateStatus::Failure
            }
            NormalizedStatus::Pending => pending = true,
            NormalizedStatus::Unknown => unknown = true,
            NormalizedStatus::Success | NormalizedStatus::Skipped => {}
        }
    }

    if pending {
        AggregateStatus::Pending
    } else if unknown {
        AggregateStatus::Unknown
    } else {
        AggregateStatus::Success
    }
}

/// Reduce deduplicated observations, reporting the per-key breakdown to
/// `sink` when the result is `Unknown`.
pub fn reduce(
    source: SourceKind,
    observations: &[Observation],
    sink: &dyn ReportSink,
) -> AggregateStatus {
    let aggregate = reduce_statuses(observations.iter().map(|o| o.status));

    if aggregate == AggregateStatus::Unknown {
        sink.emit(&GateEvent::UnknownAggregate {
            source,
            breakdown: observations
                .iter()
                .map(|o| (o.key.clone(), o.status))
                .collect(),
        });
    }

    aggregate
}
