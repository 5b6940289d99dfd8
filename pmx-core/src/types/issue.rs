use serde::{Deserialize, Serialize};

use super::Severity;

/// A single health problem detected during analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Severity level
    pub severity: Severity,

    /// Topical category (e.g., "memory", "storage", "security")
    pub category: String,

    /// One-line description including the measured value
    pub message: String,

    /// Actionable next step
    pub recommendation: String,

    /// The command the finding came from, or the raw-output key if no
    /// header marker was present
    pub source_command: String,

    /// Raw output lines substantiating the finding, header markers stripped
    pub evidence: Vec<String>,
}

impl Issue {
    /// Create a new issue
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            recommendation: recommendation.into(),
            source_command: "unknown".to_string(),
            evidence: Vec::new(),
        }
    }

    /// Attach the originating command
    pub fn with_source(mut self, source_command: impl Into<String>) -> Self {
        self.source_command = source_command.into();
        self
    }

    /// Attach evidence lines
    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }
}
