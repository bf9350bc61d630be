use thiserror::Error;

/// Errors produced while normalizing wire formats into the internal model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("trace id must be at most 16 bytes, got {0}")]
    InvalidTraceId(usize),

    #[error("span id must be at most 8 bytes, got {0}")]
    InvalidSpanId(usize),

    #[error("batch is missing its process descriptor")]
    MissingProcess,

    #[error("zipkin span is missing an id")]
    MissingZipkinId,

    #[error("failed to decode {format} payload: {reason}")]
    Decode { format: &'static str, reason: String },
}

impl ModelError {
    pub fn decode(format: &'static str, reason: impl ToString) -> Self {
        Self::Decode {
            format,
            reason: reason.to_string(),
        }
    }
}
