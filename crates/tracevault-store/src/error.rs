use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The query's search depth must be in (0, max_traces].
    #[error("search depth must be in (0, {max_traces}], got {depth}")]
    InvalidSearchDepth { depth: usize, max_traces: usize },
}
