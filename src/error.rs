use thiserror::Error as ThisError;

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error<K> {
    /// Malformed input, like a command with missing or unparsable
    /// arguments, or a bad configuration value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Key is not present in the table.
    #[error("key not found")]
    NotFound,
    /// Rank outside `[0, size)`.
    #[error("rank {rank} out of range for size {size}")]
    OutOfRange { rank: i64, size: usize },
    /// Fatal case, a red node with a red child.
    #[error("consecutive red links")]
    ConsecutiveReds,
    /// Fatal case, a red link leaning right.
    #[error("right leaning red link")]
    RightLeaningRed,
    /// Fatal case, black height differs between siblings. The String
    /// component of this variant can be used for debugging.
    #[error("unbalanced blacks, {0}")]
    UnbalancedBlacks(String),
    /// Fatal case, entries are not in sort-order.
    #[error("sort error, {0:?} against {1:?}")]
    SortError(K, K),
    /// Fatal case, cached subtree size is stale.
    #[error("subtree size mismatch, expected {expected} found {found}")]
    SizeMismatch { expected: usize, found: usize },
    /// Failure while reading fixtures or writing responses.
    #[error("io error: {0}")]
    Io(String),
}

impl<K> From<std::io::Error> for Error<K> {
    fn from(err: std::io::Error) -> Error<K> {
        Error::Io(err.to_string())
    }
}
