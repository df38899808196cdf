// Error types for the composition engine.
//
// Two classes of failure exist: bad configuration (caught up front, before
// any generation runs) and invariant violations (beat-budget mismatches,
// scale indices that escape the table, output requested before generation).
// Both are unrecoverable — generation is deterministic given a seed, so an
// invariant failure is a bug, never something to retry.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MusicError>;

/// All failure modes of the composition engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MusicError {
    /// A configuration field is missing, out of range, or inconsistent.
    /// Reported at construction, before any notes are generated.
    Configuration {
        field: &'static str,
        reason: String,
    },
    /// A numeric invariant failed mid-generation, or output was requested
    /// before any generation ran. Always indicates a bug or corrupt state.
    InvariantViolation(String),
}

impl fmt::Display for MusicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MusicError::Configuration { field, reason } => {
                write!(f, "invalid configuration: {field}: {reason}")
            }
            MusicError::InvariantViolation(msg) => {
                write!(f, "invariant violation: {msg}")
            }
        }
    }
}

impl std::error::Error for MusicError {}

impl MusicError {
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        MusicError::Configuration {
            field,
            reason: reason.into(),
        }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        MusicError::InvariantViolation(msg.into())
    }
}
