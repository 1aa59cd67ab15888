//! Error types for the filter engine

use thiserror::Error;

/// Main error type for the filter engine
#[derive(Error, Debug)]
pub enum FilterError {
    /// A tree-editing operation was given a target node that is not part of
    /// the tree it was asked to edit. The caller is expected to obtain edit
    /// targets from the tree itself, so this surfaces an editor bug.
    #[error("target filter is not part of the edited tree")]
    TargetNotFound,

    #[error("filter serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the filter engine
pub type Result<T> = std::result::Result<T, FilterError>;
