//! statusgate - wait for a revision's checks to settle
//!
//! Polls the commit statuses and check runs of a revision and reports one
//! verdict, for use as a merge gate in CI.
//!
//! ## Commands
//!
//! - `wait`: poll until every check succeeds, one fails, or attempts run out
//! - `check`: evaluate once and print the per-source tables

mod sink;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use statusgate_core::{
    GateConfig, GateInputs, PollConfig, PollOutcome, PollResult, Poller, StatusSource,
};
use statusgate_github::{GithubClient, GithubConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};

use crate::sink::SummarySink;

#[derive(Parser)]
#[command(name = "statusgate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Merge gate over commit statuses and check runs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll a revision until its checks settle
    Wait {
        #[command(flatten)]
        inputs: InputArgs,

        /// Append the final per-source tables to this Markdown file
        #[arg(long, env = "GITHUB_STEP_SUMMARY")]
        summary_file: Option<PathBuf>,

        /// Append `success=<bool>` to this file
        #[arg(long, env = "GITHUB_OUTPUT")]
        output_file: Option<PathBuf>,
    },

    /// Evaluate a revision once and print the per-source tables
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

/// Gate inputs. Numbers are taken as text so that a malformed value is
/// reported as a configuration error rather than a usage error.
#[derive(Args, Debug, Clone, Default)]
struct InputArgs {
    /// API token (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Revision to check (falls back to GITHUB_SHA)
    #[arg(long, env = "INPUT_COMMIT")]
    commit: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Checks to ignore: comma-separated names or a /regex/
    #[arg(long, env = "INPUT_IGNORED_CHECKS")]
    ignored_checks: Option<String>,

    /// Seconds between attempts (default 10)
    #[arg(long, env = "INPUT_CHECK_INTERVAL")]
    check_interval: Option<String>,

    /// Attempts before giving up (default 1000)
    #[arg(long, env = "INPUT_MAX_ATTEMPTS")]
    max_attempts: Option<String>,
}

impl InputArgs {
    /// Fill the runner-provided fallbacks from `env` and hand over raw inputs.
    fn into_inputs(self, env: impl Fn(&str) -> Option<String>) -> GateInputs {
        GateInputs {
            token: self.token.or_else(|| env("GITHUB_TOKEN")),
            commit: self.commit.or_else(|| env("GITHUB_SHA")),
            repository: self.repository,
            api_url: self.api_url,
            ignored_checks: self.ignored_checks,
            check_interval: self.check_interval,
            max_attempts: self.max_attempts,
        }
    }

    fn into_config(self) -> Result<GateConfig> {
        let inputs = self.into_inputs(|name| std::env::var(name).ok());
        GateConfig::from_inputs(inputs).context("Invalid configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    statusgate_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Wait {
            inputs,
            summary_file,
            output_file,
        } => {
            cmd_wait(
                inputs.into_config()?,
                summary_file.as_deref(),
                output_file.as_deref(),
            )
            .await
        }
        Commands::Check { inputs } => cmd_check(inputs.into_config()?).await,
    }
}

fn github_source(config: &GateConfig) -> Result<Arc<dyn StatusSource>> {
    let client = GithubClient::new(GithubConfig::from_gate(config))
        .context("Failed to create GitHub client")?;
    Ok(Arc::new(client))
}

/// Poll until the gate settles, then publish the verdict.
async fn cmd_wait(
    config: GateConfig,
    summary_file: Option<&Path>,
    output_file: Option<&Path>,
) -> Result<()> {
    info!(
        repository = %config.repository,
        revision = %config.revision,
        interval_secs = config.poll.check_interval.as_secs(),
        max_attempts = config.poll.max_attempts,
        "waiting for checks"
    );

    let sink = Arc::new(SummarySink::new());
    let poller = Poller::new(
        github_source(&config)?,
        sink.clone(),
        config.ignore.clone(),
        config.poll,
    );
    let result = poller
        .run(&config.revision)
        .await
        .context("Polling aborted")?;

    if let Some(path) = summary_file {
        append(path, &sink.render()).context("Failed to write step summary")?;
    }
    publish(&result, output_file)
}

/// Evaluate once and print the tables; never waits.
async fn cmd_check(config: GateConfig) -> Result<()> {
    let sink = Arc::new(SummarySink::new());
    let poller = Poller::new(
        github_source(&config)?,
        sink.clone(),
        config.ignore.clone(),
        PollConfig {
            check_interval: Duration::ZERO,
            max_attempts: 1,
        },
    );
    let result = poller
        .run(&config.revision)
        .await
        .context("Evaluation aborted")?;

    println!("{}", sink.render());
    println!(
        "checks={}, statuses={}",
        result.checks, result.statuses
    );
    Ok(())
}

/// Print `success=<bool>`, append it to `output_file`, and turn a negative
/// verdict into a failing exit.
fn publish(result: &PollResult, output_file: Option<&Path>) -> Result<()> {
    let line = output_line(result);
    println!("{}", line);
    if let Some(path) = output_file {
        append(path, &format!("{}\n", line)).context("Failed to write step output")?;
    }

    match result.outcome {
        PollOutcome::Succeeded => Ok(()),
        PollOutcome::Failed => anyhow::bail!(
            "Checks failed after {} attempt(s) (checks={}, statuses={})",
            result.attempts,
            result.checks,
            result.statuses
        ),
        PollOutcome::TimedOut => anyhow::bail!(
            "Timed out after {} attempt(s) waiting for checks (checks={}, statuses={})",
            result.attempts,
            result.checks,
            result.statuses
        ),
    }
}

fn output_line(result: &PollResult) -> String {
    format!("success={}", result.success)
}

fn append(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusgate_core::AggregateStatus;

    fn result(outcome: PollOutcome) -> PollResult {
        PollResult {
            success: outcome == PollOutcome::Succeeded,
            outcome,
            attempts: 3,
            checks: AggregateStatus::Pending,
            statuses: AggregateStatus::Success,
        }
    }

    #[test]
    fn runner_fallbacks_fill_missing_inputs() {
        let args = InputArgs {
            repository: Some("o/r".to_string()),
            ..Default::default()
        };
        let inputs = args.into_inputs(|name| match name {
            "GITHUB_TOKEN" => Some("ghs_fallback".to_string()),
            "GITHUB_SHA" => Some("deadbeef".to_string()),
            _ => None,
        });
        assert_eq!(inputs.token.as_deref(), Some("ghs_fallback"));
        assert_eq!(inputs.commit.as_deref(), Some("deadbeef"));
    }

    #[test]
    fn explicit_inputs_win_over_fallbacks() {
        let args = InputArgs {
            token: Some("explicit".to_string()),
            commit: Some("cafe".to_string()),
            ..Default::default()
        };
        let inputs = args.into_inputs(|_| Some("fallback".to_string()));
        assert_eq!(inputs.token.as_deref(), Some("explicit"));
        assert_eq!(inputs.commit.as_deref(), Some("cafe"));
    }

    #[test]
    fn cli_parses_wait_flags() {
        let cli = Cli::try_parse_from([
            "statusgate",
            "wait",
            "--token",
            "t",
            "--commit",
            "abc",
            "--repository",
            "o/r",
            "--check-interval",
            "soon",
        ])
        .unwrap();
        match cli.command {
            Commands::Wait { inputs, .. } => {
                assert_eq!(inputs.check_interval.as_deref(), Some("soon"));
            }
            Commands::Check { .. } => panic!("expected wait"),
        }
    }

    #[test]
    fn success_publishes_and_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("output");
        std::fs::write(&output, "previous=1\n").unwrap();

        publish(&result(PollOutcome::Succeeded), Some(&output)).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "previous=1\nsuccess=true\n");
    }

    #[test]
    fn failure_and_timeout_are_distinguished() {
        let failed = publish(&result(PollOutcome::Failed), None).unwrap_err();
        assert!(failed.to_string().starts_with("Checks failed"));

        let timed_out = publish(&result(PollOutcome::TimedOut), None).unwrap_err();
        assert!(timed_out.to_string().starts_with("Timed out"));
    }

    #[test]
    fn output_line_reports_false_for_timeout() {
        assert_eq!(output_line(&result(PollOutcome::TimedOut)), "success=false");
    }
}
