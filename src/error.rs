/// Precondition errors. Every fallible entry point fails before producing
/// any output; there is no partial-result or retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A variadic hash or noise call received zero coordinates.
    #[error("at least one coordinate is required")]
    EmptyCoordinates,

    /// A bounded-random call received a nonpositive exclusive upper bound.
    #[error("bound must be positive")]
    InvalidBound,

    /// An inclusive-range call received lo > hi.
    #[error("range lower bound exceeds upper bound")]
    InvalidRange,

    /// A noise evaluator was called with an unsupported coordinate count.
    #[error("noise supports 1, 2, or 3 coordinates, got {0}")]
    InvalidDimensionCount(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
