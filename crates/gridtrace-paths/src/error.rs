use gridtrace_core::MatrixIndex;
use thiserror::Error;

/// Failure modes of a path trace.
///
/// Both are expected, recoverable outcomes returned as values; the engine
/// never panics on them and never retries (the search is deterministic, so
/// a retry with the same inputs reproduces the same failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The supplied source or target lies outside the projection bounds.
    #[error("index {index} lies outside the {height}x{width} surface projection")]
    OutOfDomain {
        index: MatrixIndex,
        height: usize,
        width: usize,
    },

    /// The frontier was exhausted without finalizing the target: no path
    /// exists under the projector's traversability rules.
    #[error("no path to {target} from the source")]
    Unreachable { target: MatrixIndex },
}
