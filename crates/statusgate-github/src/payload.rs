//! GitHub REST payloads and their mapping onto raw reports.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use statusgate_core::{CheckRunReport, RawReport};

/// One entry of `GET /repos/{owner}/{repo}/commits/{ref}/statuses`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitStatus {
    pub context: String,
    pub state: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub target_url: Option<String>,
}

impl From<CommitStatus> for RawReport {
    fn from(status: CommitStatus) -> Self {
        RawReport {
            name: status.context,
            state: status.state,
            observed_at: status.updated_at,
            url: status.target_url,
        }
    }
}

/// One page of `GET /repos/{owner}/{repo}/commits/{ref}/check-runs`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRunsPage {
    pub total_count: u64,
    pub check_runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckRun {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub check_suite: Option<CheckSuiteRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckSuiteRef {
    pub id: u64,
}

impl From<CheckRun> for CheckRunReport {
    /// The conclusion only exists once a run has finished; until then the
    /// status is what gets classified. Likewise the completion time takes
    /// precedence over the start time.
    fn from(run: CheckRun) -> Self {
        let suite_id = run.check_suite.map(|s| s.id).unwrap_or_default();
        CheckRunReport {
            report: RawReport {
                name: run.name,
                state: run.conclusion.unwrap_or(run.status),
                observed_at: run.completed_at.or(run.started_at),
                url: run.html_url,
            },
            suite_id,
        }
    }
}
