//! Collapse repeated reports for one key down to the latest.

use std::collections::HashMap;

use crate::report::KeyedReport;
use crate::sink::{GateEvent, ReportSink};
use crate::status::SourceKind;

/// Keep one report per [`AggregationKey`](crate::report::AggregationKey):
/// the one with the latest timestamp.
///
/// - Reports without a timestamp are dropped and reported.
/// - On equal timestamps the first-seen report wins.
/// - Output is in order of each key's first surviving appearance.
pub fn deduplicate(
    source: SourceKind,
    reports: impl IntoIterator<Item = KeyedReport>,
    sink: &dyn ReportSink,
) -> Vec<KeyedReport> {
    let mut latest: Vec<KeyedReport> = Vec::new();
    let mut index = HashMap::new();

    for report in reports {
        let Some(observed_at) = report.observed_at else {
            sink.emit(&GateEvent::MissingTimestamp {
                source,
                key: report.key.clone(),
            });
            continue;
        };

        match index.get(&report.key) {
            Some(&slot) => {
                let current: &mut KeyedReport = &mut latest[slot];
                if current.observed_at.map_or(true, |t| observed_at > t) {
                    *current = report;
                }
            }
            None => {
                index.insert(report.key.clone(), latest.len());
                latest.push(report);
            }
        }
    }

    latest
}
