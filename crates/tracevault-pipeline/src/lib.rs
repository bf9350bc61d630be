// tracevault-pipeline - bounded span processing pipeline
//
// A fixed worker pool drains a single FIFO queue of spans. Backpressure is
// explicit: in the default non-blocking mode an overflowing submission fails
// with QueueFull and the transport layer translates that into a retryable
// busy signal. The queue capacity is either fixed or derived from a memory
// budget and the observed average span size.

mod error;
mod ewma;
mod processor;
mod queue;
mod sanitizer;
mod writer;

pub use error::PipelineError;
pub use ewma::SpanSizeEwma;
pub use processor::{
    DroppedSpanHook, PreSaveHook, ProcessorConfig, SpanFilter, SpanProcessor,
    SpanProcessorBuilder,
};
pub use queue::BoundedQueue;
pub use sanitizer::{default_sanitizers, sanitize_chain, Sanitizer};
pub use writer::{NoopSpanWriter, SpanWriter};
