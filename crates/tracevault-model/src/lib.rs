// tracevault-model - Internal trace data model and wire-format normalizers
//
// Every ingestion protocol is normalized here into a single internal
// representation before it reaches the processing pipeline. Conversions are
// pure functions of their inputs; nothing in this crate performs I/O.

mod batch;
mod error;
mod ids;
mod span;

pub mod convert;

pub use batch::{InboundTransport, SpanFormat, TraceBatch};
pub use error::ModelError;
pub use ids::{SpanId, TraceId};
pub use span::{
    KeyValue, Process, Span, SpanKind, SpanLog, SpanRef, SpanRefType, SpanStatus, TagValue,
};

/// Service name recorded for OTLP resources that carry no `service.name`
/// attribute (or an empty one).
pub const NO_SERVICE_NAME: &str = "OTLPResourceNoServiceName";

/// Resource attribute key identifying the emitting service.
pub const SERVICE_NAME_KEY: &str = "service.name";
