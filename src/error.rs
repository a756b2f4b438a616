use thiserror::Error;

/// Result alias for `potts`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by graph construction, detection and IO.
#[derive(Debug, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// A structural precondition was violated (programmer error).
    #[error("precondition violated: {0}")]
    Precondition(&'static str),

    /// Partition length does not match the node count.
    #[error("partition length mismatch: expected {expected}, found {found}")]
    PartitionLength {
        /// Expected length (node count).
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// Partition group ids are not dense `0..groups`.
    #[error("partition is not dense: group {group} outside 0..{groups}")]
    PartitionNotDense {
        /// Offending group id.
        group: usize,
        /// Number of distinct groups.
        groups: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Malformed edge list or partition input.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A raw id was not part of the graph's normalization.
    #[error("unknown node id {0}")]
    UnknownNode(usize),

    /// The worker pool could not be built.
    #[error("scheduler error: {0}")]
    Scheduler(String),

    /// Underlying IO failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
