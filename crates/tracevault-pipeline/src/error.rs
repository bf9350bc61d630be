use thiserror::Error;

/// Pipeline submission and shutdown errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The bounded queue refused the batch; the sender should retry with
    /// backoff.
    #[error("span queue is full")]
    QueueFull,

    /// The pipeline has been closed; no further submissions are accepted.
    #[error("pipeline is closed")]
    Closed,

    /// The submission context was cancelled while waiting for queue space.
    #[error("submission cancelled")]
    Cancelled,
}
