use crate::{SpanId, TraceId};

/// A typed tag value. The wire formats disagree on their value systems; this
/// is the superset the internal model carries.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    String(String),
    Bool(bool),
    Int64(i64),
    Float64(f64),
    Binary(Vec<u8>),
}

impl TagValue {
    /// String rendering used for attribute-equality queries. Binary values
    /// render as lower-case hex.
    pub fn coerce_to_string(&self) -> String {
        match self {
            TagValue::String(s) => s.clone(),
            TagValue::Bool(b) => b.to_string(),
            TagValue::Int64(i) => i.to_string(),
            TagValue::Float64(f) => f.to_string(),
            TagValue::Binary(b) => hex::encode(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: TagValue,
}

impl KeyValue {
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: TagValue::String(value.into()),
        }
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self {
            key: key.into(),
            value: TagValue::Bool(value),
        }
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value: TagValue::Int64(value),
        }
    }
}

/// A timestamped set of fields attached to a span.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanLog {
    /// Unix nanos.
    pub timestamp: u64,
    pub fields: Vec<KeyValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanRefType {
    ChildOf,
    FollowsFrom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpanRef {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub ref_type: SpanRefType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpanKind {
    #[default]
    Unspecified,
    Internal,
    Server,
    Client,
    Producer,
    Consumer,
}

impl SpanKind {
    /// Lower-case form used in operation records and `span.kind` tags;
    /// empty for unspecified.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Unspecified => "",
            SpanKind::Internal => "internal",
            SpanKind::Server => "server",
            SpanKind::Client => "client",
            SpanKind::Producer => "producer",
            SpanKind::Consumer => "consumer",
        }
    }

    pub fn from_tag_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "internal" => Some(SpanKind::Internal),
            "server" => Some(SpanKind::Server),
            "client" => Some(SpanKind::Client),
            "producer" => Some(SpanKind::Producer),
            "consumer" => Some(SpanKind::Consumer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpanStatus {
    #[default]
    Unset,
    Ok,
    Error,
}

/// The process (service instance) a span was emitted by.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Process {
    pub service_name: String,
    pub tags: Vec<KeyValue>,
}

impl Process {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            tags: Vec::new(),
        }
    }
}

/// The internal span representation all v1 wire formats normalize to.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub parent_span_id: Option<SpanId>,
    pub operation_name: String,
    pub process: Process,
    /// Unix nanos.
    pub start_time: u64,
    /// Nanos.
    pub duration: u64,
    pub tags: Vec<KeyValue>,
    pub logs: Vec<SpanLog>,
    pub references: Vec<SpanRef>,
    pub kind: SpanKind,
    pub status: SpanStatus,
    pub warnings: Vec<String>,
}

impl Span {
    pub fn end_time(&self) -> u64 {
        self.start_time.saturating_add(self.duration)
    }

    /// Parent span id, falling back to the first child-of reference within
    /// the same trace.
    pub fn parent_id(&self) -> Option<SpanId> {
        if let Some(parent) = self.parent_span_id {
            if !parent.is_zero() {
                return Some(parent);
            }
        }
        self.references
            .iter()
            .find(|r| r.ref_type == SpanRefType::ChildOf && r.trace_id == self.trace_id)
            .map(|r| r.span_id)
    }

    /// A coarse wire-size estimate used by the dynamic queue sizing. Counts
    /// the variable-length payload; fixed fields are a flat overhead.
    pub fn approx_size_bytes(&self) -> usize {
        const FIXED: usize = 16 + 8 + 8 + 8 + 8 + 4;
        let tag_bytes = |tags: &[KeyValue]| -> usize {
            tags.iter()
                .map(|kv| {
                    kv.key.len()
                        + match &kv.value {
                            TagValue::String(s) => s.len(),
                            TagValue::Binary(b) => b.len(),
                            _ => 8,
                        }
                })
                .sum()
        };
        FIXED
            + self.operation_name.len()
            + self.process.service_name.len()
            + tag_bytes(&self.process.tags)
            + tag_bytes(&self.tags)
            + self
                .logs
                .iter()
                .map(|l| 8 + tag_bytes(&l.fields))
                .sum::<usize>()
            + self.references.len() * 25
            + self.warnings.iter().map(String::len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_with_refs(parent: Option<SpanId>, refs: Vec<SpanRef>) -> Span {
        Span {
            trace_id: TraceId::from_high_low(0, 1),
            span_id: SpanId::from_u64(2),
            parent_span_id: parent,
            operation_name: "op".into(),
            process: Process::new("svc"),
            start_time: 100,
            duration: 50,
            tags: vec![],
            logs: vec![],
            references: refs,
            kind: SpanKind::default(),
            status: SpanStatus::default(),
            warnings: vec![],
        }
    }

    #[test]
    fn parent_prefers_explicit_field() {
        let span = span_with_refs(
            Some(SpanId::from_u64(9)),
            vec![SpanRef {
                trace_id: TraceId::from_high_low(0, 1),
                span_id: SpanId::from_u64(3),
                ref_type: SpanRefType::ChildOf,
            }],
        );
        assert_eq!(span.parent_id(), Some(SpanId::from_u64(9)));
    }

    #[test]
    fn parent_falls_back_to_child_of_ref() {
        let span = span_with_refs(
            None,
            vec![
                SpanRef {
                    trace_id: TraceId::from_high_low(9, 9),
                    span_id: SpanId::from_u64(5),
                    ref_type: SpanRefType::ChildOf,
                },
                SpanRef {
                    trace_id: TraceId::from_high_low(0, 1),
                    span_id: SpanId::from_u64(3),
                    ref_type: SpanRefType::ChildOf,
                },
            ],
        );
        // The cross-trace reference is not a parent candidate.
        assert_eq!(span.parent_id(), Some(SpanId::from_u64(3)));
    }

    #[test]
    fn tag_value_coercion() {
        assert_eq!(TagValue::String("x".into()).coerce_to_string(), "x");
        assert_eq!(TagValue::Bool(true).coerce_to_string(), "true");
        assert_eq!(TagValue::Int64(-3).coerce_to_string(), "-3");
        assert_eq!(TagValue::Binary(vec![0xde, 0xad]).coerce_to_string(), "dead");
    }

    #[test]
    fn span_size_grows_with_payload() {
        let small = span_with_refs(None, vec![]);
        let mut big = small.clone();
        big.tags.push(KeyValue::string("key", "a".repeat(100)));
        assert!(big.approx_size_bytes() > small.approx_size_bytes() + 100);
    }
}
