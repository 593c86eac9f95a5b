//! Behavior errors.
//!
//! Configuration problems are collected rather than reported one at a time:
//! [`ConfigError`] carries every [`ConfigIssue`] found while reading a
//! behavior element, so a profile author sees the whole list at once.

use crate::escort::BehaviorState;

/// A single problem found in a behavior element.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigIssue {
    /// A required attribute was absent.
    #[error("attribute {name} is required")]
    Missing { name: String },

    /// An attribute value could not be converted to its type.
    #[error("attribute {name}=\"{value}\" is not a valid {expected}")]
    Unparsable {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// An attribute parsed but falls outside its allowed domain.
    #[error("attribute {name}={value} is outside the allowed range {domain}")]
    OutOfRange {
        name: String,
        value: String,
        domain: String,
    },

    /// A search-path hotspot is malformed; the remaining ones are still read.
    #[error("search path hotspot #{index} ({element}): {problem}")]
    Waypoint {
        index: usize,
        element: String,
        problem: String,
    },

    /// Individually valid attributes that do not make sense together.
    #[error("{0}")]
    Incoherent(String),
}

/// Every problem found in a behavior element; the behavior does not start.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("invalid EscortGroup configuration ({} problem(s)):\n{}", .issues.len(), render_issues(.issues))]
pub struct ConfigError {
    pub issues: Vec<ConfigIssue>,
}

impl ConfigError {
    pub fn new(issues: Vec<ConfigIssue>) -> Self {
        Self { issues }
    }

    /// `Ok(())` for an empty issue list.
    pub fn check(issues: Vec<ConfigIssue>) -> Result<(), Self> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self::new(issues))
        }
    }
}

fn render_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fatal escort failures.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EscortError {
    /// The state machine reached a state it has no handler for.
    #[error("maintenance problem: BehaviorState({0}) is unhandled")]
    UnhandledState(BehaviorState),

    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_every_issue() {
        let err = ConfigError::new(vec![
            ConfigIssue::Missing {
                name: "EscortNpcId".into(),
            },
            ConfigIssue::Incoherent("EscortMaxFightDistance must be >= EscortMaxFollowDistance".into()),
        ]);
        let text = err.to_string();
        assert!(text.contains("2 problem(s)"));
        assert!(text.contains("attribute EscortNpcId is required"));
        assert!(text.contains("EscortMaxFightDistance"));
    }

    #[test]
    fn empty_issue_list_is_ok() {
        assert!(ConfigError::check(Vec::new()).is_ok());
    }
}
