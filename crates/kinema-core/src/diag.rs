use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity. Warnings record skipped entries and fallbacks;
/// errors record per-entry failures. Neither is fatal to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// The pipeline stage a diagnostic originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Load,
    Build,
    Animate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Build => write!(f, "build"),
            Stage::Animate => write!(f, "animate"),
        }
    }
}

/// One structured diagnostic: severity, originating stage, message, and
/// the offending entry's identifier when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
    pub entry: Option<String>,
}

impl Diagnostic {
    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            stage,
            message: message.into(),
            entry: None,
        }
    }

    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            stage,
            message: message.into(),
            entry: None,
        }
    }

    /// Attach the identifier of the entry this diagnostic refers to.
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            Some(entry) => write!(f, "[{}] {} ({})", self.stage, self.message, entry),
            None => write!(f, "[{}] {}", self.stage, self.message),
        }
    }
}

/// Accumulating diagnostics sink for one render pass. Library code
/// records; the surrounding CLI renders.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn warn(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Diagnostic::warning(stage, message));
    }

    pub fn error(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Diagnostic::error(stage, message));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}
