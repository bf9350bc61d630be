use opentelemetry_proto::tonic::trace::v1::ResourceSpans;

use crate::convert::otlp;
use crate::{Process, Span};

/// Network protocol a batch arrived over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundTransport {
    Grpc,
    Http,
    Unknown,
}

impl InboundTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            InboundTransport::Grpc => "grpc",
            InboundTransport::Http => "http",
            InboundTransport::Unknown => "unknown",
        }
    }
}

/// Wire encoding the spans arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanFormat {
    Jaeger,
    Zipkin,
    Proto,
    Otlp,
}

impl SpanFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanFormat::Jaeger => "jaeger",
            SpanFormat::Zipkin => "zipkin",
            SpanFormat::Proto => "proto",
            SpanFormat::Otlp => "otlp",
        }
    }
}

#[derive(Debug, Clone)]
enum BatchPayload {
    /// v1 shape: a flat span list with an optional batch-level process.
    Spans {
        spans: Vec<Span>,
        process: Option<Process>,
    },
    /// v2 shape: the native OTLP resource tree, kept unconverted.
    Otlp(Vec<ResourceSpans>),
}

/// The uniform batch representation every front-end produces.
///
/// Two concrete shapes exist behind one interface: consumers either iterate
/// the batch as v1 model spans (`into_v1_spans`) or materialize the OTLP
/// resource tree (`into_otlp`); both directions convert lazily when the
/// payload is of the other shape.
#[derive(Debug, Clone)]
pub struct TraceBatch {
    payload: BatchPayload,
    transport: InboundTransport,
    format: SpanFormat,
    tenant: String,
}

impl TraceBatch {
    pub fn v1(
        spans: Vec<Span>,
        process: Option<Process>,
        transport: InboundTransport,
        format: SpanFormat,
    ) -> Self {
        Self {
            payload: BatchPayload::Spans { spans, process },
            transport,
            format,
            tenant: String::new(),
        }
    }

    pub fn otlp(resource_spans: Vec<ResourceSpans>, transport: InboundTransport) -> Self {
        Self {
            payload: BatchPayload::Otlp(resource_spans),
            transport,
            format: SpanFormat::Otlp,
            tenant: String::new(),
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn set_tenant(&mut self, tenant: impl Into<String>) {
        self.tenant = tenant.into();
    }

    pub fn transport(&self) -> InboundTransport {
        self.transport
    }

    pub fn format(&self) -> SpanFormat {
        self.format
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// The batch-level process, if this is a v1 batch that carries one.
    pub fn process(&self) -> Option<&Process> {
        match &self.payload {
            BatchPayload::Spans { process, .. } => process.as_ref(),
            BatchPayload::Otlp(_) => None,
        }
    }

    pub fn span_count(&self) -> usize {
        match &self.payload {
            BatchPayload::Spans { spans, .. } => spans.len(),
            BatchPayload::Otlp(resource_spans) => resource_spans
                .iter()
                .flat_map(|rs| rs.scope_spans.iter())
                .map(|ss| ss.spans.len())
                .sum(),
        }
    }

    /// Iterate-as-v1: the span list, converting the OTLP tree when needed.
    pub fn into_v1_spans(self) -> (Vec<Span>, Option<Process>) {
        match self.payload {
            BatchPayload::Spans { spans, process } => (spans, process),
            BatchPayload::Otlp(resource_spans) => {
                (otlp::otlp_to_model_spans(&resource_spans), None)
            }
        }
    }

    /// Iterate-as-v2: the OTLP resource tree, converting v1 spans when needed.
    pub fn into_otlp(self) -> Vec<ResourceSpans> {
        match self.payload {
            BatchPayload::Otlp(resource_spans) => resource_spans,
            BatchPayload::Spans { spans, .. } => {
                spans.iter().map(otlp::model_span_to_resource_spans).collect()
            }
        }
    }
}
