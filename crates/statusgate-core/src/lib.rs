//! statusgate core
//!
//! Reduces the commit statuses and check runs reported for a revision
//! into one merge verdict, polling until the verdict settles.
//!
//! Per attempt, each source runs:
//! ignore filter → deduplicator → classifier → reducer.
//! The poller combines both aggregates and decides whether to stop.

pub mod classify;
pub mod config;
pub mod dedup;
pub mod error;
pub mod evaluate;
pub mod fakes;
pub mod ignore;
pub mod poll;
pub mod reduce;
pub mod report;
pub mod sink;
pub mod source;
pub mod status;
pub mod summary;
pub mod telemetry;

pub use classify::{classify, classify_check, classify_status};
pub use config::{GateConfig, GateInputs, Repository};
pub use dedup::deduplicate;
pub use error::{ConfigError, FetchError, GateError, Result};
pub use evaluate::{
    evaluate_check_reports, evaluate_checks, evaluate_status_reports, evaluate_statuses,
    SourceEvaluation,
};
pub use ignore::{should_ignore, IgnoreRule};
pub use poll::{next_state, PollConfig, PollOutcome, PollResult, PollState, Poller};
pub use reduce::{reduce, reduce_statuses};
pub use report::{AggregationKey, CheckRunReport, KeyedReport, Observation, RawReport};
pub use sink::{GateEvent, ReportSink, TracingSink};
pub use source::{FetchResult, StatusSource};
pub use status::{AggregateStatus, NormalizedStatus, SourceKind};
pub use summary::render_summary;
pub use telemetry::init_tracing;
