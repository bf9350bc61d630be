//! Zipkin normalization: v1 JSON, v2 JSON, Thrift and protobuf all funnel
//! into [`ZipkinSpan`], a neutral intermediate, which a sanitizer chain
//! repairs before conversion to the internal model.
//!
//! A single v1 span that carries both client ("cs"/"cr") and server
//! ("sr"/"ss") core annotations describes two units of work sharing one span
//! id; conversion splits it into two model spans. The returned source map
//! links every model span back to the index of the Zipkin span it came from
//! so transport responses can AND the per-span results together.

use std::collections::BTreeMap;

use serde::Deserialize;

use tracevault_proto::zipkin::proto3;
use tracevault_thrift::zipkincore;

use crate::{
    KeyValue, ModelError, Process, Span, SpanId, SpanKind, SpanLog, SpanStatus, TraceId,
};

const PEER_SERVICE_TAG: &str = "peer.service";
const EVENT_FIELD: &str = "event";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZipkinKind {
    Client,
    Server,
    Producer,
    Consumer,
}

impl ZipkinKind {
    fn to_model(self) -> SpanKind {
        match self {
            ZipkinKind::Client => SpanKind::Client,
            ZipkinKind::Server => SpanKind::Server,
            ZipkinKind::Producer => SpanKind::Producer,
            ZipkinKind::Consumer => SpanKind::Consumer,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "CLIENT" => Some(ZipkinKind::Client),
            "SERVER" => Some(ZipkinKind::Server),
            "PRODUCER" => Some(ZipkinKind::Producer),
            "CONSUMER" => Some(ZipkinKind::Consumer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZipkinAnnotation {
    pub timestamp_micros: u64,
    pub value: String,
}

/// Neutral Zipkin span all four decoders produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipkinSpan {
    pub trace_id: TraceId,
    pub id: SpanId,
    pub parent_id: Option<SpanId>,
    pub name: String,
    pub kind: Option<ZipkinKind>,
    pub timestamp_micros: u64,
    pub duration_micros: u64,
    pub local_service: String,
    pub remote_service: String,
    pub annotations: Vec<ZipkinAnnotation>,
    pub tags: Vec<(String, String)>,
    pub debug: bool,
    pub shared: bool,
    /// (start, end) of the v1 client-side core annotations, when present.
    pub client_window: Option<(u64, u64)>,
    /// (start, end) of the v1 server-side core annotations, when present.
    pub server_window: Option<(u64, u64)>,
}

impl ZipkinSpan {
    fn empty(trace_id: TraceId, id: SpanId) -> Self {
        Self {
            trace_id,
            id,
            parent_id: None,
            name: String::new(),
            kind: None,
            timestamp_micros: 0,
            duration_micros: 0,
            local_service: String::new(),
            remote_service: String::new(),
            annotations: Vec::new(),
            tags: Vec::new(),
            debug: false,
            shared: false,
            client_window: None,
            server_window: None,
        }
    }
}

// ---------------------------------------------------------------------------
// sanitizers
// ---------------------------------------------------------------------------

pub type ZipkinSanitizer = fn(ZipkinSpan) -> ZipkinSpan;

/// A span must not be its own parent.
pub fn normalize_parent_id(mut span: ZipkinSpan) -> ZipkinSpan {
    if span.parent_id == Some(span.id) {
        span.parent_id = None;
    }
    span
}

pub fn default_span_name(mut span: ZipkinSpan) -> ZipkinSpan {
    if span.name.is_empty() {
        span.name = "unknown".to_owned();
    }
    span
}

/// Spans reported without a timestamp inherit the earliest annotation time.
pub fn fix_missing_timestamp(mut span: ZipkinSpan) -> ZipkinSpan {
    if span.timestamp_micros == 0 {
        span.timestamp_micros = span
            .annotations
            .iter()
            .map(|a| a.timestamp_micros)
            .filter(|&t| t > 0)
            .min()
            .unwrap_or(0);
    }
    span
}

pub fn default_sanitizers() -> Vec<ZipkinSanitizer> {
    vec![normalize_parent_id, default_span_name, fix_missing_timestamp]
}

fn sanitize(mut span: ZipkinSpan, chain: &[ZipkinSanitizer]) -> ZipkinSpan {
    for sanitizer in chain {
        span = sanitizer(span);
    }
    span
}

// ---------------------------------------------------------------------------
// id parsing
// ---------------------------------------------------------------------------

fn parse_trace_id(value: &str) -> Result<TraceId, ModelError> {
    let padded = pad_even(value);
    let bytes = hex::decode(&padded).map_err(|_| ModelError::InvalidTraceId(value.len()))?;
    TraceId::from_bytes(&bytes)
}

fn parse_span_id(value: &str) -> Result<SpanId, ModelError> {
    let padded = pad_even(value);
    let bytes = hex::decode(&padded).map_err(|_| ModelError::InvalidSpanId(value.len()))?;
    SpanId::from_bytes(&bytes)
}

fn pad_even(value: &str) -> String {
    if value.len() % 2 == 1 {
        format!("0{value}")
    } else {
        value.to_owned()
    }
}

// ---------------------------------------------------------------------------
// JSON v2
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonEndpoint {
    #[serde(default)]
    service_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonAnnotation {
    #[serde(default)]
    timestamp: u64,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonSpanV2 {
    trace_id: String,
    id: String,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    timestamp: Option<u64>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    shared: bool,
    #[serde(default)]
    local_endpoint: Option<JsonEndpoint>,
    #[serde(default)]
    remote_endpoint: Option<JsonEndpoint>,
    #[serde(default)]
    annotations: Vec<JsonAnnotation>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// Decodes a Zipkin v2 JSON span array.
pub fn decode_json_v2(body: &[u8]) -> Result<Vec<ZipkinSpan>, ModelError> {
    let wire: Vec<JsonSpanV2> =
        serde_json::from_slice(body).map_err(|e| ModelError::decode("zipkin v2 json", e))?;
    wire.into_iter()
        .map(|s| {
            let mut span = ZipkinSpan::empty(parse_trace_id(&s.trace_id)?, parse_span_id(&s.id)?);
            if let Some(parent) = s.parent_id.as_deref() {
                let parent = parse_span_id(parent)?;
                span.parent_id = (!parent.is_zero()).then_some(parent);
            }
            span.name = s.name.unwrap_or_default();
            span.kind = s.kind.as_deref().and_then(ZipkinKind::parse);
            span.timestamp_micros = s.timestamp.unwrap_or(0);
            span.duration_micros = s.duration.unwrap_or(0);
            span.debug = s.debug;
            span.shared = s.shared;
            span.local_service = s
                .local_endpoint
                .and_then(|e| e.service_name)
                .unwrap_or_default();
            span.remote_service = s
                .remote_endpoint
                .and_then(|e| e.service_name)
                .unwrap_or_default();
            span.annotations = s
                .annotations
                .into_iter()
                .map(|a| ZipkinAnnotation {
                    timestamp_micros: a.timestamp,
                    value: a.value,
                })
                .collect();
            span.tags = s.tags.into_iter().collect();
            Ok(span)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON v1
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonAnnotationV1 {
    #[serde(default)]
    timestamp: u64,
    #[serde(default)]
    value: String,
    #[serde(default)]
    endpoint: Option<JsonEndpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonBinaryAnnotationV1 {
    key: String,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    endpoint: Option<JsonEndpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonSpanV1 {
    trace_id: String,
    id: String,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    timestamp: Option<u64>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    annotations: Vec<JsonAnnotationV1>,
    #[serde(default)]
    binary_annotations: Vec<JsonBinaryAnnotationV1>,
}

fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decodes a Zipkin v1 JSON span array.
pub fn decode_json_v1(body: &[u8]) -> Result<Vec<ZipkinSpan>, ModelError> {
    let wire: Vec<JsonSpanV1> =
        serde_json::from_slice(body).map_err(|e| ModelError::decode("zipkin v1 json", e))?;
    wire.into_iter()
        .map(|s| {
            let mut span = ZipkinSpan::empty(parse_trace_id(&s.trace_id)?, parse_span_id(&s.id)?);
            if let Some(parent) = s.parent_id.as_deref() {
                let parent = parse_span_id(parent)?;
                span.parent_id = (!parent.is_zero()).then_some(parent);
            }
            span.name = s.name.unwrap_or_default();
            span.timestamp_micros = s.timestamp.unwrap_or(0);
            span.duration_micros = s.duration.unwrap_or(0);
            span.debug = s.debug;

            let annotations: Vec<(u64, String, String)> = s
                .annotations
                .into_iter()
                .map(|a| {
                    let service = a
                        .endpoint
                        .and_then(|e| e.service_name)
                        .unwrap_or_default();
                    (a.timestamp, a.value, service)
                })
                .collect();
            apply_v1_annotations(&mut span, annotations);

            for ba in s.binary_annotations {
                let service = ba.endpoint.and_then(|e| e.service_name).unwrap_or_default();
                apply_v1_binary_annotation(&mut span, &ba.key, json_value_to_string(&ba.value), service);
            }
            Ok(span)
        })
        .collect()
}

/// Folds v1 core annotations into kind windows; everything else is kept as a
/// plain annotation.
fn apply_v1_annotations(span: &mut ZipkinSpan, annotations: Vec<(u64, String, String)>) {
    let mut cs = 0u64;
    let mut cr = 0u64;
    let mut sr = 0u64;
    let mut ss = 0u64;
    for (timestamp, value, service) in annotations {
        if span.local_service.is_empty() && !service.is_empty() {
            span.local_service = service;
        }
        match value.as_str() {
            zipkincore::CLIENT_SEND => cs = timestamp,
            zipkincore::CLIENT_RECV => cr = timestamp,
            zipkincore::SERVER_RECV => sr = timestamp,
            zipkincore::SERVER_SEND => ss = timestamp,
            zipkincore::MESSAGE_SEND => span.kind = Some(ZipkinKind::Producer),
            zipkincore::MESSAGE_RECV => span.kind = Some(ZipkinKind::Consumer),
            _ => span.annotations.push(ZipkinAnnotation {
                timestamp_micros: timestamp,
                value,
            }),
        }
    }
    if cs > 0 || cr > 0 {
        span.client_window = Some((cs, cr));
    }
    if sr > 0 || ss > 0 {
        span.server_window = Some((sr, ss));
    }
    match (span.client_window.is_some(), span.server_window.is_some()) {
        (true, false) => span.kind = Some(ZipkinKind::Client),
        (false, true) => span.kind = Some(ZipkinKind::Server),
        _ => {}
    }
}

fn apply_v1_binary_annotation(span: &mut ZipkinSpan, key: &str, value: String, service: String) {
    match key {
        // Server/client/message address annotations carry the remote peer.
        "sa" | "ca" | "ma" => {
            if !service.is_empty() {
                span.remote_service = service;
            }
        }
        zipkincore::LOCAL_COMPONENT => {
            if span.local_service.is_empty() && !service.is_empty() {
                span.local_service = service.clone();
            }
            span.tags.push((key.to_owned(), value));
        }
        _ => {
            if span.local_service.is_empty() && !service.is_empty() {
                span.local_service = service;
            }
            span.tags.push((key.to_owned(), value));
        }
    }
}

// ---------------------------------------------------------------------------
// Thrift v1
// ---------------------------------------------------------------------------

/// Converts decoded `zipkincore` Thrift spans.
pub fn from_thrift(spans: Vec<zipkincore::Span>) -> Result<Vec<ZipkinSpan>, ModelError> {
    spans
        .into_iter()
        .map(|s| {
            let id = SpanId::from_u64(s.id.ok_or(ModelError::MissingZipkinId)? as u64);
            let trace_id = TraceId::from_high_low(
                s.trace_id_high.unwrap_or(0) as u64,
                s.trace_id.unwrap_or(0) as u64,
            );
            let mut span = ZipkinSpan::empty(trace_id, id);
            if let Some(parent) = s.parent_id {
                let parent = SpanId::from_u64(parent as u64);
                span.parent_id = (!parent.is_zero()).then_some(parent);
            }
            span.name = s.name.unwrap_or_default();
            span.timestamp_micros = s.timestamp.unwrap_or(0).max(0) as u64;
            span.duration_micros = s.duration.unwrap_or(0).max(0) as u64;
            span.debug = s.debug.unwrap_or(false);

            let annotations: Vec<(u64, String, String)> = s
                .annotations
                .unwrap_or_default()
                .into_iter()
                .map(|a| {
                    let service = a
                        .host
                        .and_then(|h| h.service_name)
                        .unwrap_or_default();
                    (
                        a.timestamp.unwrap_or(0).max(0) as u64,
                        a.value.unwrap_or_default(),
                        service,
                    )
                })
                .collect();
            apply_v1_annotations(&mut span, annotations);

            for ba in s.binary_annotations.unwrap_or_default() {
                let key = ba.key.unwrap_or_default();
                let service = ba
                    .host
                    .and_then(|h| h.service_name)
                    .unwrap_or_default();
                let value = thrift_binary_annotation_value(
                    ba.annotation_type.unwrap_or(zipkincore::AnnotationType::STRING),
                    ba.value.unwrap_or_default(),
                );
                apply_v1_binary_annotation(&mut span, &key, value, service);
            }
            Ok(span)
        })
        .collect()
}

fn thrift_binary_annotation_value(kind: zipkincore::AnnotationType, raw: Vec<u8>) -> String {
    fn be_int(raw: &[u8], width: usize) -> Option<i64> {
        if raw.len() != width {
            return None;
        }
        let mut value: i64 = 0;
        for byte in raw {
            value = (value << 8) | i64::from(*byte);
        }
        Some(value)
    }
    match kind {
        zipkincore::AnnotationType::BOOL => (!raw.is_empty() && raw[0] != 0).to_string(),
        zipkincore::AnnotationType::I16 => {
            be_int(&raw, 2).map(|v| v.to_string()).unwrap_or_default()
        }
        zipkincore::AnnotationType::I32 => {
            be_int(&raw, 4).map(|v| v.to_string()).unwrap_or_default()
        }
        zipkincore::AnnotationType::I64 => {
            be_int(&raw, 8).map(|v| v.to_string()).unwrap_or_default()
        }
        zipkincore::AnnotationType::DOUBLE => {
            if raw.len() == 8 {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(&raw);
                f64::from_be_bytes(bytes).to_string()
            } else {
                String::new()
            }
        }
        zipkincore::AnnotationType::BYTES => hex::encode(raw),
        _ => String::from_utf8_lossy(&raw).into_owned(),
    }
}

// ---------------------------------------------------------------------------
// proto v2
// ---------------------------------------------------------------------------

/// Converts a decoded `zipkin.proto3` span list.
pub fn from_proto(list: proto3::ListOfSpans) -> Result<Vec<ZipkinSpan>, ModelError> {
    list.spans
        .into_iter()
        .map(|s| {
            if s.id.is_empty() {
                return Err(ModelError::MissingZipkinId);
            }
            let mut span = ZipkinSpan::empty(
                TraceId::from_bytes(&s.trace_id)?,
                SpanId::from_bytes(&s.id)?,
            );
            if !s.parent_id.is_empty() {
                let parent = SpanId::from_bytes(&s.parent_id)?;
                span.parent_id = (!parent.is_zero()).then_some(parent);
            }
            span.name = s.name;
            span.kind = match proto3::span::Kind::try_from(s.kind) {
                Ok(proto3::span::Kind::Client) => Some(ZipkinKind::Client),
                Ok(proto3::span::Kind::Server) => Some(ZipkinKind::Server),
                Ok(proto3::span::Kind::Producer) => Some(ZipkinKind::Producer),
                Ok(proto3::span::Kind::Consumer) => Some(ZipkinKind::Consumer),
                _ => None,
            };
            span.timestamp_micros = s.timestamp;
            span.duration_micros = s.duration;
            span.debug = s.debug;
            span.shared = s.shared;
            span.local_service = s
                .local_endpoint
                .map(|e| e.service_name)
                .unwrap_or_default();
            span.remote_service = s
                .remote_endpoint
                .map(|e| e.service_name)
                .unwrap_or_default();
            span.annotations = s
                .annotations
                .into_iter()
                .map(|a| ZipkinAnnotation {
                    timestamp_micros: a.timestamp,
                    value: a.value,
                })
                .collect();
            span.tags = s.tags.into_iter().collect();
            span.tags.sort();
            Ok(span)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// model conversion
// ---------------------------------------------------------------------------

/// Sanitizes and converts Zipkin spans to model spans. Returns the spans and
/// a map from each model span to the index of its source Zipkin span.
pub fn zipkin_to_model(spans: Vec<ZipkinSpan>) -> (Vec<Span>, Vec<usize>) {
    let chain = default_sanitizers();
    let mut out = Vec::with_capacity(spans.len());
    let mut source = Vec::with_capacity(spans.len());
    for (index, span) in spans.into_iter().enumerate() {
        let span = sanitize(span, &chain);
        match (span.client_window, span.server_window) {
            (Some(client), Some(server)) => {
                // One shared v1 span describing both sides of an RPC.
                out.push(build_model_span(&span, SpanKind::Client, Some(client)));
                out.push(build_model_span(&span, SpanKind::Server, Some(server)));
                source.push(index);
                source.push(index);
            }
            _ => {
                let kind = span
                    .kind
                    .map(ZipkinKind::to_model)
                    .unwrap_or(if span.shared {
                        SpanKind::Server
                    } else {
                        SpanKind::Unspecified
                    });
                out.push(build_model_span(&span, kind, None));
                source.push(index);
            }
        }
    }
    (out, source)
}

fn build_model_span(span: &ZipkinSpan, kind: SpanKind, window: Option<(u64, u64)>) -> Span {
    let (start_micros, duration_micros) = match window {
        Some((start, end)) if start > 0 && end > start => (start, end - start),
        Some((start, _)) if start > 0 => (start, span.duration_micros),
        _ => (span.timestamp_micros, span.duration_micros),
    };

    let mut tags: Vec<KeyValue> = span
        .tags
        .iter()
        .map(|(k, v)| KeyValue::string(k.clone(), v.clone()))
        .collect();
    if !span.remote_service.is_empty() {
        tags.push(KeyValue::string(PEER_SERVICE_TAG, span.remote_service.clone()));
    }

    let status = if span.tags.iter().any(|(k, _)| k == "error") {
        SpanStatus::Error
    } else {
        SpanStatus::Unset
    };

    let logs = span
        .annotations
        .iter()
        .map(|a| SpanLog {
            timestamp: a.timestamp_micros * 1_000,
            fields: vec![KeyValue::string(EVENT_FIELD, a.value.clone())],
        })
        .collect();

    Span {
        trace_id: span.trace_id,
        span_id: span.id,
        parent_span_id: span.parent_id,
        operation_name: span.name.clone(),
        process: Process::new(span.local_service.clone()),
        start_time: start_micros * 1_000,
        duration: duration_micros * 1_000,
        tags,
        logs,
        references: Vec::new(),
        kind,
        status,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_v2_json_span() {
        let body = br#"[{
            "traceId": "000000000000007b",
            "id": "0000000000000001",
            "parentId": "0000000000000002",
            "kind": "CLIENT",
            "name": "get /users",
            "timestamp": 1000,
            "duration": 200,
            "localEndpoint": {"serviceName": "frontend"},
            "remoteEndpoint": {"serviceName": "users"},
            "tags": {"http.method": "GET"}
        }]"#;
        let spans = decode_json_v2(body).unwrap();
        assert_eq!(spans.len(), 1);
        let (model, source) = zipkin_to_model(spans);
        assert_eq!(source, vec![0]);
        let span = &model[0];
        assert_eq!(span.kind, SpanKind::Client);
        assert_eq!(span.operation_name, "get /users");
        assert_eq!(span.process.service_name, "frontend");
        assert_eq!(span.start_time, 1_000_000);
        assert_eq!(span.duration, 200_000);
        assert!(span
            .tags
            .iter()
            .any(|t| t.key == PEER_SERVICE_TAG && t.value.coerce_to_string() == "users"));
    }

    #[test]
    fn v1_span_with_both_sides_splits() {
        let body = br#"[{
            "traceId": "000000000000007b",
            "id": "0000000000000001",
            "name": "rpc",
            "annotations": [
                {"timestamp": 100, "value": "cs", "endpoint": {"serviceName": "caller"}},
                {"timestamp": 400, "value": "cr"},
                {"timestamp": 150, "value": "sr"},
                {"timestamp": 350, "value": "ss"}
            ]
        }]"#;
        let spans = decode_json_v1(body).unwrap();
        let (model, source) = zipkin_to_model(spans);
        assert_eq!(model.len(), 2);
        assert_eq!(source, vec![0, 0]);
        assert_eq!(model[0].kind, SpanKind::Client);
        assert_eq!(model[0].start_time, 100_000);
        assert_eq!(model[0].duration, 300_000);
        assert_eq!(model[1].kind, SpanKind::Server);
        assert_eq!(model[1].start_time, 150_000);
        assert_eq!(model[1].duration, 200_000);
        // Both halves share ids.
        assert_eq!(model[0].span_id, model[1].span_id);
    }

    #[test]
    fn parent_id_pointing_at_self_is_cleared() {
        let body = br#"[{
            "traceId": "000000000000007b",
            "id": "0000000000000001",
            "parentId": "0000000000000001",
            "name": "loop"
        }]"#;
        let spans = decode_json_v1(body).unwrap();
        let (model, _) = zipkin_to_model(spans);
        assert_eq!(model[0].parent_span_id, None);
    }

    #[test]
    fn missing_timestamp_falls_back_to_annotations() {
        let mut span = ZipkinSpan::empty(TraceId::from_high_low(0, 1), SpanId::from_u64(2));
        span.annotations.push(ZipkinAnnotation {
            timestamp_micros: 777,
            value: "boot".into(),
        });
        let (model, _) = zipkin_to_model(vec![span]);
        assert_eq!(model[0].start_time, 777_000);
        // The unnamed span also picks up the default name.
        assert_eq!(model[0].operation_name, "unknown");
    }

    #[test]
    fn thrift_server_span_converts() {
        let spans = vec![zipkincore::Span {
            trace_id: Some(0x7b),
            name: Some("handle".into()),
            id: Some(9),
            parent_id: Some(1),
            annotations: Some(vec![
                zipkincore::Annotation {
                    timestamp: Some(50),
                    value: Some(zipkincore::SERVER_RECV.into()),
                    host: Some(zipkincore::Endpoint {
                        ipv4: None,
                        port: None,
                        service_name: Some("backend".into()),
                        ipv6: None,
                    }),
                },
                zipkincore::Annotation {
                    timestamp: Some(90),
                    value: Some(zipkincore::SERVER_SEND.into()),
                    host: None,
                },
            ]),
            binary_annotations: Some(vec![zipkincore::BinaryAnnotation {
                key: Some("error".into()),
                value: Some(b"timeout".to_vec()),
                annotation_type: Some(zipkincore::AnnotationType::STRING),
                host: None,
            }]),
            debug: None,
            timestamp: None,
            duration: None,
            trace_id_high: None,
        }];
        let (model, _) = zipkin_to_model(from_thrift(spans).unwrap());
        assert_eq!(model.len(), 1);
        let span = &model[0];
        assert_eq!(span.kind, SpanKind::Server);
        assert_eq!(span.process.service_name, "backend");
        assert_eq!(span.status, SpanStatus::Error);
        assert_eq!(span.start_time, 50_000);
        assert_eq!(span.duration, 40_000);
    }

    #[test]
    fn proto_span_converts() {
        let list = proto3::ListOfSpans {
            spans: vec![proto3::Span {
                trace_id: vec![0, 0, 0, 0, 0, 0, 0, 0x7b],
                id: vec![0, 0, 0, 0, 0, 0, 0, 1],
                kind: proto3::span::Kind::Consumer as i32,
                name: "poll".into(),
                timestamp: 12,
                duration: 34,
                local_endpoint: Some(proto3::Endpoint {
                    service_name: "worker".into(),
                    ..Default::default()
                }),
                ..Default::default()
            }],
        };
        let (model, _) = zipkin_to_model(from_proto(list).unwrap());
        assert_eq!(model[0].kind, SpanKind::Consumer);
        assert_eq!(model[0].process.service_name, "worker");
    }
}
