//! Per-source evaluation: fetch, filter, deduplicate, classify, reduce.

use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::dedup::deduplicate;
use crate::error::FetchError;
use crate::ignore::IgnoreRule;
use crate::reduce::reduce;
use crate::report::{CheckRunReport, KeyedReport, Observation, RawReport};
use crate::sink::ReportSink;
use crate::source::StatusSource;
use crate::status::{AggregateStatus, SourceKind};

/// Outcome of evaluating one source for one attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceEvaluation {
    pub source: SourceKind,
    pub aggregate: AggregateStatus,
    /// Surviving observations, one per key.
    pub entries: Vec<Observation>,
}

/// Reduce already-fetched commit statuses.
pub fn evaluate_status_reports(
    reports: Vec<RawReport>,
    ignore: &IgnoreRule,
    sink: &dyn ReportSink,
) -> SourceEvaluation {
    let keyed = reports
        .into_iter()
        .filter(|r| !ignore.matches(&r.name))
        .map(KeyedReport::from);

    finish(SourceKind::Statuses, keyed, sink)
}

/// Reduce already-fetched check runs.
pub fn evaluate_check_reports(
    reports: Vec<CheckRunReport>,
    ignore: &IgnoreRule,
    sink: &dyn ReportSink,
) -> SourceEvaluation {
    let keyed = reports
        .into_iter()
        .filter(|c| !ignore.matches(&c.report.name))
        .map(KeyedReport::from);

    finish(SourceKind::Checks, keyed, sink)
}

/// Fetch and reduce the commit statuses of `revision`.
pub async fn evaluate_statuses(
    source: &dyn StatusSource,
    revision: &str,
    ignore: &IgnoreRule,
    sink: &dyn ReportSink,
) -> Result<SourceEvaluation, FetchError> {
    let reports = source.fetch_commit_statuses(revision).await?;
    Ok(evaluate_status_reports(reports, ignore, sink))
}

/// Fetch and reduce the check runs of `revision`.
pub async fn evaluate_checks(
    source: &dyn StatusSource,
    revision: &str,
    ignore: &IgnoreRule,
    sink: &dyn ReportSink,
) -> Result<SourceEvaluation, FetchError> {
    let reports = source.fetch_check_runs(revision).await?;
    Ok(evaluate_check_reports(reports, ignore, sink))
}

/// Only reports that survive deduplication are classified, so a
/// superseded report never raises a classification warning.
fn finish(
    source: SourceKind,
    keyed: impl Iterator<Item = KeyedReport>,
    sink: &dyn ReportSink,
) -> SourceEvaluation {
    let entries: Vec<Observation> = deduplicate(source, keyed, sink)
        .into_iter()
        .map(|r| Observation {
            status: classify(source, r.key.name(), &r.state, sink),
            key: r.key,
            observed_at: r.observed_at,
            url: r.url,
        })
        .collect();
    let aggregate = reduce(source, &entries, sink);
    SourceEvaluation {
        source,
        aggregate,
        entries,
    }
}
