// Wire-format normalizers. One module per source family; each conversion is
// a pure function from the decoded wire type to the internal model.

pub mod jaeger;
pub mod otlp;
pub mod zipkin;
