//! Structured events produced while normalizing assets and building the denom map.
//!
//! Nothing in the core logs directly. Callers drain a [`Diagnostics`] collector and decide how
//! to report each event and whether any severity should fail the run.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// A single reported condition. `subject` is the asset name for normalization events and the
/// colliding map key for collisions.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub chain: String,
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}/{}: {}", self.severity, self.chain, self.subject, self.message)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        severity: Severity,
        chain: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.events.push(Diagnostic {
            severity,
            chain: chain.into(),
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn info(&mut self, chain: &str, subject: &str, message: impl Into<String>) {
        self.push(Severity::Info, chain, subject, message);
    }

    pub fn warning(&mut self, chain: &str, subject: &str, message: impl Into<String>) {
        self.push(Severity::Warning, chain, subject, message);
    }

    pub fn error(&mut self, chain: &str, subject: &str, message: impl Into<String>) {
        self.push(Severity::Error, chain, subject, message);
    }

    /// Appends every event of `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.events.extend(other.events);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.events.iter().filter(|d| d.severity == severity).count()
    }

    /// Highest severity reported so far, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.events.iter().map(|d| d.severity).max()
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.events
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
