//! Jaeger proto (api_v2) and Jaeger Thrift conversions.
//!
//! Both wire models are structurally close to the internal one. Span kind
//! and status travel as the `span.kind` / `error` / `otel.status_code` tags
//! on the wire; conversion lifts them into the typed fields and the reverse
//! direction writes them back, so a model batch survives a wire round trip.

use tracevault_proto::jaeger::api_v2;
use tracevault_thrift::jaeger as jthrift;
use tracevault_thrift::thrift::OrderedFloat;

use crate::{
    KeyValue, Process, Span, SpanId, SpanKind, SpanLog, SpanRef, SpanRefType, SpanStatus,
    TagValue, TraceId,
};

pub const SPAN_KIND_TAG: &str = "span.kind";
pub const ERROR_TAG: &str = "error";
pub const STATUS_CODE_TAG: &str = "otel.status_code";

/// Splits the wire tag list into plain tags and the kind/status they encode.
fn lift_kind_and_status(tags: Vec<KeyValue>) -> (Vec<KeyValue>, SpanKind, SpanStatus) {
    let mut kind = SpanKind::Unspecified;
    let mut status = SpanStatus::Unset;
    let mut rest = Vec::with_capacity(tags.len());
    for tag in tags {
        match tag.key.as_str() {
            SPAN_KIND_TAG => {
                if let Some(parsed) = SpanKind::from_tag_value(&tag.value.coerce_to_string()) {
                    kind = parsed;
                } else {
                    rest.push(tag);
                }
            }
            ERROR_TAG => {
                if matches!(tag.value, TagValue::Bool(true))
                    || tag.value.coerce_to_string() == "true"
                {
                    status = SpanStatus::Error;
                } else {
                    // error=false is kept verbatim; it does not assert a status.
                    rest.push(tag);
                }
            }
            STATUS_CODE_TAG => match tag.value.coerce_to_string().as_str() {
                "OK" => status = SpanStatus::Ok,
                "ERROR" => status = SpanStatus::Error,
                _ => rest.push(tag),
            },
            _ => rest.push(tag),
        }
    }
    (rest, kind, status)
}

/// The inverse of [`lift_kind_and_status`]: re-encodes kind and status as tags.
fn lower_kind_and_status(span: &Span) -> Vec<KeyValue> {
    let mut tags = span.tags.clone();
    if span.kind != SpanKind::Unspecified {
        tags.push(KeyValue::string(SPAN_KIND_TAG, span.kind.as_str()));
    }
    match span.status {
        SpanStatus::Unset => {}
        SpanStatus::Ok => tags.push(KeyValue::string(STATUS_CODE_TAG, "OK")),
        SpanStatus::Error => tags.push(KeyValue::bool(ERROR_TAG, true)),
    }
    tags
}

// ---------------------------------------------------------------------------
// proto
// ---------------------------------------------------------------------------

fn timestamp_to_nanos(ts: Option<&prost_types::Timestamp>) -> u64 {
    match ts {
        Some(ts) if ts.seconds >= 0 => {
            (ts.seconds as u64) * 1_000_000_000 + ts.nanos.max(0) as u64
        }
        _ => 0,
    }
}

fn nanos_to_timestamp(nanos: u64) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: (nanos / 1_000_000_000) as i64,
        nanos: (nanos % 1_000_000_000) as i32,
    }
}

fn duration_to_nanos(duration: Option<&prost_types::Duration>) -> u64 {
    match duration {
        Some(d) if d.seconds >= 0 => (d.seconds as u64) * 1_000_000_000 + d.nanos.max(0) as u64,
        _ => 0,
    }
}

fn nanos_to_duration(nanos: u64) -> prost_types::Duration {
    prost_types::Duration {
        seconds: (nanos / 1_000_000_000) as i64,
        nanos: (nanos % 1_000_000_000) as i32,
    }
}

fn proto_keyvalue_to_model(kv: &api_v2::KeyValue) -> KeyValue {
    let value = match api_v2::ValueType::try_from(kv.v_type) {
        Ok(api_v2::ValueType::Bool) => TagValue::Bool(kv.v_bool),
        Ok(api_v2::ValueType::Int64) => TagValue::Int64(kv.v_int64),
        Ok(api_v2::ValueType::Float64) => TagValue::Float64(kv.v_float64),
        Ok(api_v2::ValueType::Binary) => TagValue::Binary(kv.v_binary.clone()),
        _ => TagValue::String(kv.v_str.clone()),
    };
    KeyValue {
        key: kv.key.clone(),
        value,
    }
}

fn model_keyvalue_to_proto(kv: &KeyValue) -> api_v2::KeyValue {
    let mut out = api_v2::KeyValue {
        key: kv.key.clone(),
        ..Default::default()
    };
    match &kv.value {
        TagValue::String(s) => {
            out.v_type = api_v2::ValueType::String as i32;
            out.v_str = s.clone();
        }
        TagValue::Bool(b) => {
            out.v_type = api_v2::ValueType::Bool as i32;
            out.v_bool = *b;
        }
        TagValue::Int64(i) => {
            out.v_type = api_v2::ValueType::Int64 as i32;
            out.v_int64 = *i;
        }
        TagValue::Float64(f) => {
            out.v_type = api_v2::ValueType::Float64 as i32;
            out.v_float64 = *f;
        }
        TagValue::Binary(b) => {
            out.v_type = api_v2::ValueType::Binary as i32;
            out.v_binary = b.clone();
        }
    }
    out
}

fn proto_process_to_model(process: &api_v2::Process) -> Process {
    Process {
        service_name: process.service_name.clone(),
        tags: process.tags.iter().map(proto_keyvalue_to_model).collect(),
    }
}

fn model_process_to_proto(process: &Process) -> api_v2::Process {
    api_v2::Process {
        service_name: process.service_name.clone(),
        tags: process.tags.iter().map(model_keyvalue_to_proto).collect(),
    }
}

/// Converts a Jaeger proto span. `default_process` is the batch-level
/// process substituted when the span carries none.
pub fn proto_span_to_model(span: &api_v2::Span, default_process: Option<&Process>) -> Span {
    let process = span
        .process
        .as_ref()
        .map(proto_process_to_model)
        .or_else(|| default_process.cloned())
        .unwrap_or_default();

    let tags: Vec<KeyValue> = span.tags.iter().map(proto_keyvalue_to_model).collect();
    let (tags, kind, status) = lift_kind_and_status(tags);

    let references = span
        .references
        .iter()
        .map(|r| SpanRef {
            trace_id: TraceId::from_bytes(&r.trace_id).unwrap_or_default(),
            span_id: SpanId::from_bytes(&r.span_id).unwrap_or_default(),
            ref_type: match api_v2::SpanRefType::try_from(r.ref_type) {
                Ok(api_v2::SpanRefType::FollowsFrom) => SpanRefType::FollowsFrom,
                _ => SpanRefType::ChildOf,
            },
        })
        .collect();

    let logs = span
        .logs
        .iter()
        .map(|log| SpanLog {
            timestamp: timestamp_to_nanos(log.timestamp.as_ref()),
            fields: log.fields.iter().map(proto_keyvalue_to_model).collect(),
        })
        .collect();

    Span {
        trace_id: TraceId::from_bytes(&span.trace_id).unwrap_or_default(),
        span_id: SpanId::from_bytes(&span.span_id).unwrap_or_default(),
        parent_span_id: None,
        operation_name: span.operation_name.clone(),
        process,
        start_time: timestamp_to_nanos(span.start_time.as_ref()),
        duration: duration_to_nanos(span.duration.as_ref()),
        tags,
        logs,
        references,
        kind,
        status,
        warnings: span.warnings.clone(),
    }
}

/// Converts a whole Jaeger proto batch, filling spans that carry no process
/// with the batch-level one.
pub fn proto_batch_to_model(batch: &api_v2::Batch) -> (Vec<Span>, Option<Process>) {
    let batch_process = batch.process.as_ref().map(proto_process_to_model);
    let spans = batch
        .spans
        .iter()
        .map(|span| proto_span_to_model(span, batch_process.as_ref()))
        .collect();
    (spans, batch_process)
}

/// Encodes a model span back into the Jaeger proto shape.
pub fn model_span_to_proto(span: &Span) -> api_v2::Span {
    let mut references: Vec<api_v2::SpanRef> = span
        .references
        .iter()
        .map(|r| api_v2::SpanRef {
            trace_id: r.trace_id.to_vec(),
            span_id: r.span_id.to_vec(),
            ref_type: match r.ref_type {
                SpanRefType::ChildOf => api_v2::SpanRefType::ChildOf as i32,
                SpanRefType::FollowsFrom => api_v2::SpanRefType::FollowsFrom as i32,
            },
        })
        .collect();
    // The explicit parent becomes a leading child-of reference on the wire.
    if let Some(parent) = span.parent_span_id {
        let already = references.iter().any(|r| {
            r.span_id == parent.to_vec() && r.ref_type == api_v2::SpanRefType::ChildOf as i32
        });
        if !already && !parent.is_zero() {
            references.insert(
                0,
                api_v2::SpanRef {
                    trace_id: span.trace_id.to_vec(),
                    span_id: parent.to_vec(),
                    ref_type: api_v2::SpanRefType::ChildOf as i32,
                },
            );
        }
    }

    api_v2::Span {
        trace_id: span.trace_id.to_vec(),
        span_id: span.span_id.to_vec(),
        operation_name: span.operation_name.clone(),
        references,
        flags: 0,
        start_time: Some(nanos_to_timestamp(span.start_time)),
        duration: Some(nanos_to_duration(span.duration)),
        tags: lower_kind_and_status(span)
            .iter()
            .map(model_keyvalue_to_proto)
            .collect(),
        logs: span
            .logs
            .iter()
            .map(|log| api_v2::Log {
                timestamp: Some(nanos_to_timestamp(log.timestamp)),
                fields: log.fields.iter().map(model_keyvalue_to_proto).collect(),
            })
            .collect(),
        process: Some(model_process_to_proto(&span.process)),
        process_id: String::new(),
        warnings: span.warnings.clone(),
    }
}

// ---------------------------------------------------------------------------
// thrift
// ---------------------------------------------------------------------------

fn thrift_tag_to_model(tag: &jthrift::Tag) -> KeyValue {
    let value = match tag.v_type {
        jthrift::TagType::DOUBLE => {
            TagValue::Float64(tag.v_double.map(|d| d.into_inner()).unwrap_or_default())
        }
        jthrift::TagType::BOOL => TagValue::Bool(tag.v_bool.unwrap_or_default()),
        jthrift::TagType::LONG => TagValue::Int64(tag.v_long.unwrap_or_default()),
        jthrift::TagType::BINARY => TagValue::Binary(tag.v_binary.clone().unwrap_or_default()),
        _ => TagValue::String(tag.v_str.clone().unwrap_or_default()),
    };
    KeyValue {
        key: tag.key.clone(),
        value,
    }
}

fn model_keyvalue_to_thrift(kv: &KeyValue) -> jthrift::Tag {
    let mut tag = jthrift::Tag {
        key: kv.key.clone(),
        v_type: jthrift::TagType::STRING,
        v_str: None,
        v_double: None,
        v_bool: None,
        v_long: None,
        v_binary: None,
    };
    match &kv.value {
        TagValue::String(s) => {
            tag.v_type = jthrift::TagType::STRING;
            tag.v_str = Some(s.clone());
        }
        TagValue::Bool(b) => {
            tag.v_type = jthrift::TagType::BOOL;
            tag.v_bool = Some(*b);
        }
        TagValue::Int64(i) => {
            tag.v_type = jthrift::TagType::LONG;
            tag.v_long = Some(*i);
        }
        TagValue::Float64(f) => {
            tag.v_type = jthrift::TagType::DOUBLE;
            tag.v_double = Some(OrderedFloat::from(*f));
        }
        TagValue::Binary(b) => {
            tag.v_type = jthrift::TagType::BINARY;
            tag.v_binary = Some(b.clone());
        }
    }
    tag
}

fn thrift_process_to_model(process: &jthrift::Process) -> Process {
    Process {
        service_name: process.service_name.clone(),
        tags: process
            .tags
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(thrift_tag_to_model)
            .collect(),
    }
}

const MICROS_PER_NANO: u64 = 1_000;

fn micros_to_nanos(micros: i64) -> u64 {
    micros.max(0) as u64 * MICROS_PER_NANO
}

/// Converts a Jaeger Thrift span. Thrift spans never carry their own
/// process; the batch-level one is always substituted.
pub fn thrift_span_to_model(span: &jthrift::Span, batch_process: &Process) -> Span {
    let tags: Vec<KeyValue> = span
        .tags
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(thrift_tag_to_model)
        .collect();
    let (tags, kind, status) = lift_kind_and_status(tags);

    let references = span
        .references
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|r| SpanRef {
            trace_id: TraceId::from_high_low(r.trace_id_high as u64, r.trace_id_low as u64),
            span_id: SpanId::from_u64(r.span_id as u64),
            ref_type: if r.ref_type == jthrift::SpanRefType::FOLLOWS_FROM {
                SpanRefType::FollowsFrom
            } else {
                SpanRefType::ChildOf
            },
        })
        .collect();

    let logs = span
        .logs
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|log| SpanLog {
            timestamp: micros_to_nanos(log.timestamp),
            fields: log.fields.iter().map(thrift_tag_to_model).collect(),
        })
        .collect();

    let parent = SpanId::from_u64(span.parent_span_id as u64);

    Span {
        trace_id: TraceId::from_high_low(span.trace_id_high as u64, span.trace_id_low as u64),
        span_id: SpanId::from_u64(span.span_id as u64),
        parent_span_id: if parent.is_zero() { None } else { Some(parent) },
        operation_name: span.operation_name.clone(),
        process: batch_process.clone(),
        start_time: micros_to_nanos(span.start_time),
        duration: micros_to_nanos(span.duration),
        tags,
        logs,
        references,
        kind,
        status,
        warnings: Vec::new(),
    }
}

/// Converts a whole Jaeger Thrift batch into v1 model spans.
pub fn thrift_batch_to_model(batch: &jthrift::Batch) -> Vec<Span> {
    let process = thrift_process_to_model(&batch.process);
    batch
        .spans
        .iter()
        .map(|span| thrift_span_to_model(span, &process))
        .collect()
}

/// Encodes a model span back into the Jaeger Thrift shape. Sub-microsecond
/// precision is truncated; everything else survives.
pub fn model_span_to_thrift(span: &Span) -> jthrift::Span {
    let (trace_id_high, trace_id_low) = span.trace_id.high_low();
    let references: Vec<jthrift::SpanRef> = span
        .references
        .iter()
        .map(|r| {
            let (high, low) = r.trace_id.high_low();
            jthrift::SpanRef {
                ref_type: match r.ref_type {
                    SpanRefType::ChildOf => jthrift::SpanRefType::CHILD_OF,
                    SpanRefType::FollowsFrom => jthrift::SpanRefType::FOLLOWS_FROM,
                },
                trace_id_low: low as i64,
                trace_id_high: high as i64,
                span_id: r.span_id.as_u64() as i64,
            }
        })
        .collect();

    let tags = lower_kind_and_status(span);
    let logs: Vec<jthrift::Log> = span
        .logs
        .iter()
        .map(|log| jthrift::Log {
            timestamp: (log.timestamp / MICROS_PER_NANO) as i64,
            fields: log.fields.iter().map(model_keyvalue_to_thrift).collect(),
        })
        .collect();

    jthrift::Span {
        trace_id_low: trace_id_low as i64,
        trace_id_high: trace_id_high as i64,
        span_id: span.span_id.as_u64() as i64,
        parent_span_id: span.parent_span_id.map(|p| p.as_u64()).unwrap_or(0) as i64,
        operation_name: span.operation_name.clone(),
        references: if references.is_empty() {
            None
        } else {
            Some(references)
        },
        flags: 0,
        start_time: (span.start_time / MICROS_PER_NANO) as i64,
        duration: (span.duration / MICROS_PER_NANO) as i64,
        tags: if tags.is_empty() {
            None
        } else {
            Some(tags.iter().map(model_keyvalue_to_thrift).collect())
        },
        logs: if logs.is_empty() { None } else { Some(logs) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proto_batch() -> api_v2::Batch {
        api_v2::Batch {
            process: Some(api_v2::Process {
                service_name: "batch-svc".to_owned(),
                tags: vec![],
            }),
            spans: vec![api_v2::Span {
                trace_id: {
                    let mut id = vec![0u8; 16];
                    id[15] = 1;
                    id
                },
                span_id: vec![0, 0, 0, 0, 0, 0, 0, 2],
                operation_name: "op".to_owned(),
                start_time: Some(prost_types::Timestamp {
                    seconds: 1,
                    nanos: 500,
                }),
                duration: Some(prost_types::Duration {
                    seconds: 0,
                    nanos: 250,
                }),
                tags: vec![
                    api_v2::KeyValue {
                        key: "span.kind".to_owned(),
                        v_type: api_v2::ValueType::String as i32,
                        v_str: "server".to_owned(),
                        ..Default::default()
                    },
                    api_v2::KeyValue {
                        key: "error".to_owned(),
                        v_type: api_v2::ValueType::Bool as i32,
                        v_bool: true,
                        ..Default::default()
                    },
                    api_v2::KeyValue {
                        key: "http.status_code".to_owned(),
                        v_type: api_v2::ValueType::Int64 as i32,
                        v_int64: 500,
                        ..Default::default()
                    },
                ],
                process: None,
                ..Default::default()
            }],
        }
    }

    #[test]
    fn proto_batch_process_is_inherited() {
        let (spans, process) = proto_batch_to_model(&proto_batch());
        assert_eq!(process.unwrap().service_name, "batch-svc");
        assert_eq!(spans[0].process.service_name, "batch-svc");
    }

    #[test]
    fn proto_span_lifts_kind_and_status() {
        let (spans, _) = proto_batch_to_model(&proto_batch());
        let span = &spans[0];
        assert_eq!(span.kind, SpanKind::Server);
        assert_eq!(span.status, SpanStatus::Error);
        assert_eq!(span.start_time, 1_000_000_500);
        assert_eq!(span.duration, 250);
        // Lifted tags are removed; unrelated ones remain.
        assert_eq!(span.tags.len(), 1);
        assert_eq!(span.tags[0].key, "http.status_code");
    }

    #[test]
    fn proto_model_round_trip() {
        let (spans, _) = proto_batch_to_model(&proto_batch());
        let wire = model_span_to_proto(&spans[0]);
        let back = proto_span_to_model(&wire, None);
        assert_eq!(back, spans[0]);
    }

    #[test]
    fn thrift_span_inherits_batch_process() {
        let batch = jthrift::Batch {
            process: jthrift::Process {
                service_name: "web".to_owned(),
                tags: None,
            },
            spans: vec![jthrift::Span {
                trace_id_low: 5,
                trace_id_high: 0,
                span_id: 6,
                parent_span_id: 0,
                operation_name: "load".to_owned(),
                references: None,
                flags: 0,
                start_time: 2_000,
                duration: 10,
                tags: None,
                logs: None,
            }],
            seq_no: None,
            stats: None,
        };
        let spans = thrift_batch_to_model(&batch);
        assert_eq!(spans[0].process.service_name, "web");
        assert_eq!(spans[0].start_time, 2_000_000);
        assert_eq!(spans[0].duration, 10_000);
        assert_eq!(spans[0].parent_span_id, None);
    }

    #[test]
    fn thrift_model_round_trip() {
        let process = Process::new("web");
        let original = jthrift::Span {
            trace_id_low: 5,
            trace_id_high: 1,
            span_id: 6,
            parent_span_id: 3,
            operation_name: "load".to_owned(),
            references: Some(vec![jthrift::SpanRef {
                ref_type: jthrift::SpanRefType::FOLLOWS_FROM,
                trace_id_low: 5,
                trace_id_high: 1,
                span_id: 9,
            }]),
            flags: 0,
            start_time: 2_000,
            duration: 10,
            tags: Some(vec![jthrift::Tag {
                key: "region".to_owned(),
                v_type: jthrift::TagType::STRING,
                v_str: Some("us-east".to_owned()),
                v_double: None,
                v_bool: None,
                v_long: None,
                v_binary: None,
            }]),
            logs: None,
        };
        let model = thrift_span_to_model(&original, &process);
        let wire = model_span_to_thrift(&model);
        assert_eq!(wire, original);
    }
}
