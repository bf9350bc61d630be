//! Conversions between the internal model and the OTLP trace tree.
//!
//! OTLP batches are kept in their native resource→scope→span shape (the v2
//! batch payload); these functions bridge the two shapes where a consumer
//! insists on the other one. Scope identity survives the v1 detour through
//! the `otel.scope.name` / `otel.scope.version` span tags.

use opentelemetry_proto::tonic::common::v1::{
    any_value, AnyValue, InstrumentationScope, KeyValue as OtlpKeyValue,
};
use opentelemetry_proto::tonic::resource::v1::Resource;
use opentelemetry_proto::tonic::trace::v1::span::{Event, Link, SpanKind as OtlpSpanKind};
use opentelemetry_proto::tonic::trace::v1::status::StatusCode;
use opentelemetry_proto::tonic::trace::v1::{
    ResourceSpans, ScopeSpans, Span as OtlpSpan, Status as OtlpStatus,
};

use crate::{
    KeyValue, Process, Span, SpanId, SpanKind, SpanLog, SpanRef, SpanRefType, SpanStatus,
    TagValue, TraceId, NO_SERVICE_NAME, SERVICE_NAME_KEY,
};

pub const SCOPE_NAME_TAG: &str = "otel.scope.name";
pub const SCOPE_VERSION_TAG: &str = "otel.scope.version";
const EVENT_NAME_FIELD: &str = "event";
const STATUS_MESSAGE_TAG: &str = "otel.status_description";

/// Service name of a resource, or the reserved placeholder when the
/// `service.name` attribute is missing or empty.
pub fn resource_service_name(resource: Option<&Resource>) -> String {
    resource
        .and_then(|r| r.attributes.iter().find(|kv| kv.key == SERVICE_NAME_KEY))
        .and_then(|kv| kv.value.as_ref())
        .map(any_value_to_string)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_SERVICE_NAME.to_owned())
}

/// Recursive string rendering of an OTLP value, used for attribute-equality
/// queries.
pub fn any_value_to_string(value: &AnyValue) -> String {
    match value.value.as_ref() {
        None => String::new(),
        Some(any_value::Value::StringValue(s)) => s.clone(),
        Some(any_value::Value::BoolValue(b)) => b.to_string(),
        Some(any_value::Value::IntValue(i)) => i.to_string(),
        Some(any_value::Value::DoubleValue(d)) => d.to_string(),
        Some(any_value::Value::BytesValue(b)) => hex::encode(b),
        Some(any_value::Value::ArrayValue(arr)) => {
            let parts: Vec<String> = arr.values.iter().map(any_value_to_string).collect();
            format!("[{}]", parts.join(","))
        }
        Some(any_value::Value::KvlistValue(kvs)) => {
            let parts: Vec<String> = kvs
                .values
                .iter()
                .map(|kv| {
                    format!(
                        "{}={}",
                        kv.key,
                        kv.value.as_ref().map(any_value_to_string).unwrap_or_default()
                    )
                })
                .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

fn any_value_to_tag_value(value: &AnyValue) -> TagValue {
    match value.value.as_ref() {
        Some(any_value::Value::StringValue(s)) => TagValue::String(s.clone()),
        Some(any_value::Value::BoolValue(b)) => TagValue::Bool(*b),
        Some(any_value::Value::IntValue(i)) => TagValue::Int64(*i),
        Some(any_value::Value::DoubleValue(d)) => TagValue::Float64(*d),
        Some(any_value::Value::BytesValue(b)) => TagValue::Binary(b.clone()),
        // Composite values flatten to their string rendering.
        other => TagValue::String(
            other
                .map(|v| {
                    any_value_to_string(&AnyValue {
                        value: Some(v.clone()),
                    })
                })
                .unwrap_or_default(),
        ),
    }
}

fn tag_value_to_any_value(value: &TagValue) -> AnyValue {
    let value = match value {
        TagValue::String(s) => any_value::Value::StringValue(s.clone()),
        TagValue::Bool(b) => any_value::Value::BoolValue(*b),
        TagValue::Int64(i) => any_value::Value::IntValue(*i),
        TagValue::Float64(d) => any_value::Value::DoubleValue(*d),
        TagValue::Binary(b) => any_value::Value::BytesValue(b.clone()),
    };
    AnyValue { value: Some(value) }
}

fn otlp_attributes_to_tags(attributes: &[OtlpKeyValue]) -> Vec<KeyValue> {
    attributes
        .iter()
        .map(|kv| KeyValue {
            key: kv.key.clone(),
            value: kv
                .value
                .as_ref()
                .map(any_value_to_tag_value)
                .unwrap_or(TagValue::String(String::new())),
        })
        .collect()
}

fn tags_to_otlp_attributes(tags: &[KeyValue]) -> Vec<OtlpKeyValue> {
    tags.iter()
        .map(|kv| OtlpKeyValue {
            key: kv.key.clone(),
            value: Some(tag_value_to_any_value(&kv.value)),
        })
        .collect()
}

fn otlp_kind_to_model(kind: i32) -> SpanKind {
    match OtlpSpanKind::try_from(kind) {
        Ok(OtlpSpanKind::Internal) => SpanKind::Internal,
        Ok(OtlpSpanKind::Server) => SpanKind::Server,
        Ok(OtlpSpanKind::Client) => SpanKind::Client,
        Ok(OtlpSpanKind::Producer) => SpanKind::Producer,
        Ok(OtlpSpanKind::Consumer) => SpanKind::Consumer,
        _ => SpanKind::Unspecified,
    }
}

fn model_kind_to_otlp(kind: SpanKind) -> OtlpSpanKind {
    match kind {
        SpanKind::Unspecified => OtlpSpanKind::Unspecified,
        SpanKind::Internal => OtlpSpanKind::Internal,
        SpanKind::Server => OtlpSpanKind::Server,
        SpanKind::Client => OtlpSpanKind::Client,
        SpanKind::Producer => OtlpSpanKind::Producer,
        SpanKind::Consumer => OtlpSpanKind::Consumer,
    }
}

/// Status of an OTLP span as the model enum.
pub fn otlp_status_to_model(status: Option<&OtlpStatus>) -> SpanStatus {
    match status.map(|s| s.code) {
        Some(code) if code == StatusCode::Ok as i32 => SpanStatus::Ok,
        Some(code) if code == StatusCode::Error as i32 => SpanStatus::Error,
        _ => SpanStatus::Unset,
    }
}

/// Flattens an OTLP resource tree into v1 model spans.
pub fn otlp_to_model_spans(resource_spans: &[ResourceSpans]) -> Vec<Span> {
    let mut out = Vec::new();
    for rs in resource_spans {
        let service_name = resource_service_name(rs.resource.as_ref());
        let process_tags: Vec<KeyValue> = rs
            .resource
            .as_ref()
            .map(|r| {
                otlp_attributes_to_tags(
                    &r.attributes
                        .iter()
                        .filter(|kv| kv.key != SERVICE_NAME_KEY)
                        .cloned()
                        .collect::<Vec<_>>(),
                )
            })
            .unwrap_or_default();
        let process = Process {
            service_name: service_name.clone(),
            tags: process_tags,
        };

        for ss in &rs.scope_spans {
            let mut scope_tags = Vec::new();
            if let Some(scope) = &ss.scope {
                if !scope.name.is_empty() {
                    scope_tags.push(KeyValue::string(SCOPE_NAME_TAG, scope.name.clone()));
                }
                if !scope.version.is_empty() {
                    scope_tags.push(KeyValue::string(SCOPE_VERSION_TAG, scope.version.clone()));
                }
            }

            for span in &ss.spans {
                out.push(otlp_span_to_model(span, &process, &scope_tags));
            }
        }
    }
    out
}

fn otlp_span_to_model(span: &OtlpSpan, process: &Process, scope_tags: &[KeyValue]) -> Span {
    let trace_id = TraceId::from_bytes(&span.trace_id).unwrap_or_default();
    let parent = SpanId::from_bytes(&span.parent_span_id).unwrap_or_default();

    let mut tags = otlp_attributes_to_tags(&span.attributes);
    tags.extend_from_slice(scope_tags);
    if let Some(status) = &span.status {
        if !status.message.is_empty() {
            tags.push(KeyValue::string(STATUS_MESSAGE_TAG, status.message.clone()));
        }
    }

    let logs = span
        .events
        .iter()
        .map(|event| {
            let mut fields = Vec::with_capacity(event.attributes.len() + 1);
            if !event.name.is_empty() {
                fields.push(KeyValue::string(EVENT_NAME_FIELD, event.name.clone()));
            }
            fields.extend(otlp_attributes_to_tags(&event.attributes));
            SpanLog {
                timestamp: event.time_unix_nano,
                fields,
            }
        })
        .collect();

    let references = span
        .links
        .iter()
        .map(|link| SpanRef {
            trace_id: TraceId::from_bytes(&link.trace_id).unwrap_or_default(),
            span_id: SpanId::from_bytes(&link.span_id).unwrap_or_default(),
            ref_type: SpanRefType::FollowsFrom,
        })
        .collect();

    Span {
        trace_id,
        span_id: SpanId::from_bytes(&span.span_id).unwrap_or_default(),
        parent_span_id: if parent.is_zero() { None } else { Some(parent) },
        operation_name: span.name.clone(),
        process: process.clone(),
        start_time: span.start_time_unix_nano,
        duration: span
            .end_time_unix_nano
            .saturating_sub(span.start_time_unix_nano),
        tags,
        logs,
        references,
        kind: otlp_kind_to_model(span.kind),
        status: otlp_status_to_model(span.status.as_ref()),
        warnings: Vec::new(),
    }
}

/// Wraps a single v1 span into a one-resource OTLP tree. The store merges
/// these under the span's trace id.
pub fn model_span_to_resource_spans(span: &Span) -> ResourceSpans {
    let mut resource_attributes = Vec::with_capacity(span.process.tags.len() + 1);
    if !span.process.service_name.is_empty() {
        resource_attributes.push(OtlpKeyValue {
            key: SERVICE_NAME_KEY.to_owned(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(
                    span.process.service_name.clone(),
                )),
            }),
        });
    }
    resource_attributes.extend(tags_to_otlp_attributes(&span.process.tags));

    let mut scope = InstrumentationScope::default();
    let mut span_tags = Vec::with_capacity(span.tags.len());
    for tag in &span.tags {
        match tag.key.as_str() {
            SCOPE_NAME_TAG => scope.name = tag.value.coerce_to_string(),
            SCOPE_VERSION_TAG => scope.version = tag.value.coerce_to_string(),
            _ => span_tags.push(tag.clone()),
        }
    }

    let parent = span.parent_id();
    let links = span
        .references
        .iter()
        .filter(|r| Some(r.span_id) != parent || r.trace_id != span.trace_id)
        .map(|r| Link {
            trace_id: r.trace_id.to_vec(),
            span_id: r.span_id.to_vec(),
            ..Default::default()
        })
        .collect();

    let events = span
        .logs
        .iter()
        .map(|log| {
            let mut name = String::new();
            let mut attributes = Vec::with_capacity(log.fields.len());
            for field in &log.fields {
                if field.key == EVENT_NAME_FIELD && name.is_empty() {
                    name = field.value.coerce_to_string();
                } else {
                    attributes.push(OtlpKeyValue {
                        key: field.key.clone(),
                        value: Some(tag_value_to_any_value(&field.value)),
                    });
                }
            }
            Event {
                time_unix_nano: log.timestamp,
                name,
                attributes,
                ..Default::default()
            }
        })
        .collect();

    let status = match span.status {
        SpanStatus::Unset => None,
        SpanStatus::Ok => Some(OtlpStatus {
            code: StatusCode::Ok as i32,
            ..Default::default()
        }),
        SpanStatus::Error => Some(OtlpStatus {
            code: StatusCode::Error as i32,
            ..Default::default()
        }),
    };

    let otlp_span = OtlpSpan {
        trace_id: span.trace_id.to_vec(),
        span_id: span.span_id.to_vec(),
        parent_span_id: parent.map(|p| p.to_vec()).unwrap_or_default(),
        name: span.operation_name.clone(),
        kind: model_kind_to_otlp(span.kind) as i32,
        start_time_unix_nano: span.start_time,
        end_time_unix_nano: span.end_time(),
        attributes: tags_to_otlp_attributes(&span_tags),
        events,
        links,
        status,
        ..Default::default()
    };

    ResourceSpans {
        resource: Some(Resource {
            attributes: resource_attributes,
            ..Default::default()
        }),
        scope_spans: vec![ScopeSpans {
            scope: Some(scope),
            spans: vec![otlp_span],
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn otlp_tree(service: Option<&str>) -> Vec<ResourceSpans> {
        let resource = service.map(|name| Resource {
            attributes: vec![OtlpKeyValue {
                key: SERVICE_NAME_KEY.to_owned(),
                value: Some(AnyValue {
                    value: Some(any_value::Value::StringValue(name.to_owned())),
                }),
            }],
            ..Default::default()
        });
        vec![ResourceSpans {
            resource,
            scope_spans: vec![ScopeSpans {
                scope: Some(InstrumentationScope {
                    name: "io.lib".to_owned(),
                    version: "1.2".to_owned(),
                    ..Default::default()
                }),
                spans: vec![OtlpSpan {
                    trace_id: vec![1; 16],
                    span_id: vec![2; 8],
                    name: "op-a".to_owned(),
                    kind: OtlpSpanKind::Server as i32,
                    start_time_unix_nano: 1_000,
                    end_time_unix_nano: 3_000,
                    status: Some(OtlpStatus {
                        code: StatusCode::Error as i32,
                        ..Default::default()
                    }),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }]
    }

    #[test]
    fn missing_service_name_uses_placeholder() {
        let spans = otlp_to_model_spans(&otlp_tree(None));
        assert_eq!(spans[0].process.service_name, NO_SERVICE_NAME);
        let spans = otlp_to_model_spans(&otlp_tree(Some("")));
        assert_eq!(spans[0].process.service_name, NO_SERVICE_NAME);
    }

    #[test]
    fn otlp_span_maps_structurally() {
        let spans = otlp_to_model_spans(&otlp_tree(Some("checkout")));
        let span = &spans[0];
        assert_eq!(span.process.service_name, "checkout");
        assert_eq!(span.operation_name, "op-a");
        assert_eq!(span.kind, SpanKind::Server);
        assert_eq!(span.status, SpanStatus::Error);
        assert_eq!(span.start_time, 1_000);
        assert_eq!(span.duration, 2_000);
        // Scope identity is preserved as tags.
        assert!(span
            .tags
            .iter()
            .any(|t| t.key == SCOPE_NAME_TAG && t.value.coerce_to_string() == "io.lib"));
    }

    #[test]
    fn model_round_trip_restores_scope_and_status() {
        let spans = otlp_to_model_spans(&otlp_tree(Some("checkout")));
        let tree = model_span_to_resource_spans(&spans[0]);
        let scope = tree.scope_spans[0].scope.as_ref().unwrap();
        assert_eq!(scope.name, "io.lib");
        assert_eq!(scope.version, "1.2");
        let span = &tree.scope_spans[0].spans[0];
        assert_eq!(span.end_time_unix_nano, 3_000);
        assert_eq!(
            span.status.as_ref().map(|s| s.code),
            Some(StatusCode::Error as i32)
        );
        assert_eq!(resource_service_name(tree.resource.as_ref()), "checkout");
        // The scope tags do not leak back into span attributes.
        assert!(span.attributes.iter().all(|a| a.key != SCOPE_NAME_TAG));
    }
}
