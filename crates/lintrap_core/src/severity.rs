//! Lint severities.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity level of a lint.
///
/// The severity-action table in the configuration decides whether a severity
/// fails a run, warns, or neither, so any name is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    /// Error - fails the run with the default table.
    #[default]
    Error,
    /// Warning - reported but does not fail with the default table.
    Warning,
    /// Info - informational message.
    Info,
    /// Any other configured severity name.
    Other(String),
}

impl Severity {
    /// Returns the severity name as written in configuration.
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Other(name) => name,
        }
    }
}

impl From<&str> for Severity {
    fn from(name: &str) -> Self {
        match name {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            "info" => Severity::Info,
            other => Severity::Other(other.to_string()),
        }
    }
}

impl From<String> for Severity {
    fn from(name: String) -> Self {
        Severity::from(name.as_str())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl FromStr for Severity {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Severity::from(s))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
