//! Error types for the hornet agent

use std::path::PathBuf;

use burn::record::RecorderError;

/// Errors surfaced by the decision and learning engine.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Invalid dimensions, counts or hyperparameters at construction
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A state vector does not match the configured state dimension
    #[error("state shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A transition names a move or action outside its channel
    #[error("{channel} index {index} out of range (count {count})")]
    IndexOutOfRange {
        channel: &'static str,
        index: usize,
        count: usize,
    },

    /// Numerical failure inside a forward or backward pass
    #[error("approximator failure: {0}")]
    Approximator(String),

    /// Recorder failure while writing or reading a checkpoint artifact
    #[error("checkpoint error at {path}: {source}")]
    Checkpoint {
        path: PathBuf,
        source: RecorderError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = AgentError::ShapeMismatch {
            expected: 8,
            actual: 5,
        };
        assert_eq!(
            err.to_string(),
            "state shape mismatch: expected 8 features, got 5"
        );
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = AgentError::IndexOutOfRange {
            channel: "action",
            index: 9,
            count: 7,
        };
        assert_eq!(err.to_string(), "action index 9 out of range (count 7)");
    }

    #[test]
    fn test_configuration_display() {
        let err = AgentError::Configuration("move_count must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: move_count must be > 0"
        );
    }
}
