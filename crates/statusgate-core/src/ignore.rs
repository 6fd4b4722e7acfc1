//! Exclusion of named statuses and checks from aggregation.
//!
//! A rule is one of:
//! - empty: nothing is ignored
//! - `/pattern/`: a regular expression, matched anywhere in the name
//! - `a,b,c`: a comma-separated list of exact names

use regex::Regex;

use crate::error::ConfigError;

/// A parsed ignore rule. Patterns are compiled once, at parse time.
#[derive(Debug, Clone, Default)]
pub enum IgnoreRule {
    #[default]
    Nothing,
    Pattern(Regex),
    Names(Vec<String>),
}

impl IgnoreRule {
    /// Parse a raw rule. Fails only when a `/.../` pattern does not compile.
    pub fn parse(rule: &str) -> Result<Self, ConfigError> {
        if rule.is_empty() {
            return Ok(IgnoreRule::Nothing);
        }

        if let Some(pattern) = regex_body(rule) {
            let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidIgnorePattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(IgnoreRule::Pattern(regex));
        }

        Ok(IgnoreRule::Names(
            rule.split(',').map(str::to_string).collect(),
        ))
    }

    /// Whether `name` must be left out of aggregation.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            IgnoreRule::Nothing => false,
            IgnoreRule::Pattern(regex) => regex.is_match(name),
            IgnoreRule::Names(names) => names.iter().any(|n| n == name),
        }
    }
}

/// One-shot form of [`IgnoreRule::matches`] for an unparsed rule.
///
/// A pattern that does not compile ignores nothing; configuration
/// loading rejects such rules before polling starts.
pub fn should_ignore(rule: &str, name: &str) -> bool {
    IgnoreRule::parse(rule)
        .map(|r| r.matches(name))
        .unwrap_or(false)
}

fn regex_body(rule: &str) -> Option<&str> {
    if rule.len() >= 2 && rule.starts_with('/') && rule.ends_with('/') {
        Some(&rule[1..rule.len() - 1])
    } else {
        None
    }
}
