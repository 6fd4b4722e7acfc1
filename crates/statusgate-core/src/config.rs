//! Gate configuration, validated before polling starts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::ignore::IgnoreRule;
use crate::poll::PollConfig;

/// Default seconds between attempts.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 10;

/// Default attempt budget.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Default REST endpoint of the hosting platform.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Inputs exactly as a CI step hands them over: optional strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateInputs {
    pub token: Option<String>,
    pub commit: Option<String>,
    pub repository: Option<String>,
    pub api_url: Option<String>,
    pub ignored_checks: Option<String>,
    pub check_interval: Option<String>,
    pub max_attempts: Option<String>,
}

/// `owner/name` of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRepository(raw.to_string())),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Fully validated gate configuration.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub token: String,
    pub revision: String,
    pub repository: Repository,
    pub api_url: String,
    pub ignore: IgnoreRule,
    pub poll: PollConfig,
}

impl GateConfig {
    /// Validate raw inputs. Any error here is fatal and happens before
    /// the first attempt.
    pub fn from_inputs(inputs: GateInputs) -> Result<Self, ConfigError> {
        let token = non_empty(inputs.token).ok_or(ConfigError::MissingToken)?;
        let revision = non_empty(inputs.commit).ok_or(ConfigError::MissingRevision)?;
        let repository = non_empty(inputs.repository)
            .ok_or(ConfigError::MissingRepository)
            .and_then(|r| Repository::parse(&r))?;
        let api_url = non_empty(inputs.api_url)
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let ignore = IgnoreRule::parse(inputs.ignored_checks.as_deref().unwrap_or(""))?;

        let interval_secs: u64 = parse_number(
            "check_interval",
            inputs.check_interval,
            DEFAULT_CHECK_INTERVAL_SECS,
        )?;
        let max_attempts: u32 =
            parse_number("max_attempts", inputs.max_attempts, DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(ConfigError::NonPositive {
                field: "max_attempts",
            });
        }

        Ok(Self {
            token,
            revision,
            repository,
            api_url,
            ignore,
            poll: PollConfig {
                check_interval: Duration::from_secs(interval_secs),
                max_attempts,
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            if value.bytes().all(|b| b.is_ascii_digit()) {
                ConfigError::OutOfRange { field, value }
            } else {
                ConfigError::InvalidNumber { field, value }
            }
        }),
    }
}
