use opentelemetry_proto::tonic::common::v1::InstrumentationScope;
use opentelemetry_proto::tonic::resource::v1::Resource;
use opentelemetry_proto::tonic::trace::v1::span::SpanKind;
use opentelemetry_proto::tonic::trace::v1::status::StatusCode;
use opentelemetry_proto::tonic::trace::v1::Span;

use tracevault_model::convert::otlp::{any_value_to_string, resource_service_name};

/// Parameters of `find_traces` / `find_trace_ids`.
#[derive(Debug, Clone, Default)]
pub struct TraceQuery {
    /// Required resource service; empty matches any.
    pub service_name: String,
    /// Required span name; empty matches any.
    pub operation_name: String,
    /// Attribute equality constraints; values are compared after string
    /// coercion. A handful of keys query typed span fields instead, see
    /// [`span_matches`].
    pub attributes: Vec<(String, String)>,
    pub start_time_min: Option<u64>,
    pub start_time_max: Option<u64>,
    pub duration_min: Option<u64>,
    pub duration_max: Option<u64>,
    /// Bound on matches returned; must be in (0, max_traces].
    pub search_depth: usize,
}

impl TraceQuery {
    pub fn for_service(service: impl Into<String>, search_depth: usize) -> Self {
        Self {
            service_name: service.into(),
            search_depth,
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

/// Does the resource satisfy the query's service constraint?
pub fn resource_matches(query: &TraceQuery, resource: Option<&Resource>) -> bool {
    query.service_name.is_empty() || resource_service_name(resource) == query.service_name
}

/// Does a single span (with its scope and resource context) satisfy every
/// conjunct of the query?
pub fn span_matches(
    query: &TraceQuery,
    span: &Span,
    scope: Option<&InstrumentationScope>,
    resource: Option<&Resource>,
) -> bool {
    if !query.operation_name.is_empty() && span.name != query.operation_name {
        return false;
    }
    if let Some(min) = query.start_time_min {
        if span.start_time_unix_nano < min {
            return false;
        }
    }
    if let Some(max) = query.start_time_max {
        if span.start_time_unix_nano > max {
            return false;
        }
    }
    let duration = span
        .end_time_unix_nano
        .saturating_sub(span.start_time_unix_nano);
    if let Some(min) = query.duration_min {
        if duration < min {
            return false;
        }
    }
    if let Some(max) = query.duration_max {
        if duration > max {
            return false;
        }
    }

    query
        .attributes
        .iter()
        .all(|(key, value)| attribute_matches(key, value, span, scope, resource))
}

fn attribute_matches(
    key: &str,
    value: &str,
    span: &Span,
    scope: Option<&InstrumentationScope>,
    resource: Option<&Resource>,
) -> bool {
    let status_code = span.status.as_ref().map(|s| s.code);
    match key {
        "error" => match value {
            "true" => status_code == Some(StatusCode::Error as i32),
            "false" => status_code == Some(StatusCode::Ok as i32),
            _ => any_attribute_matches(key, value, span, scope, resource),
        },
        "span.status" => match value {
            "OK" => status_code == Some(StatusCode::Ok as i32),
            "ERROR" => status_code == Some(StatusCode::Error as i32),
            "UNSET" => {
                status_code.is_none() || status_code == Some(StatusCode::Unset as i32)
            }
            _ => false,
        },
        "span.kind" => {
            let expected = match value {
                "CLIENT" => SpanKind::Client,
                "SERVER" => SpanKind::Server,
                "PRODUCER" => SpanKind::Producer,
                "CONSUMER" => SpanKind::Consumer,
                "INTERNAL" => SpanKind::Internal,
                _ => return false,
            };
            span.kind == expected as i32
        }
        "scope.name" => scope.map(|s| s.name.as_str()) == Some(value),
        "scope.version" => scope.map(|s| s.version.as_str()) == Some(value),
        _ => {
            if let Some(resource_key) = key.strip_prefix("resource.") {
                return resource
                    .map(|r| attributes_contain(&r.attributes, resource_key, value))
                    .unwrap_or(false);
            }
            any_attribute_matches(key, value, span, scope, resource)
        }
    }
}

/// Generic key: matched against span, scope, resource, event and link
/// attributes, in that order.
fn any_attribute_matches(
    key: &str,
    value: &str,
    span: &Span,
    scope: Option<&InstrumentationScope>,
    resource: Option<&Resource>,
) -> bool {
    if attributes_contain(&span.attributes, key, value) {
        return true;
    }
    if scope
        .map(|s| attributes_contain(&s.attributes, key, value))
        .unwrap_or(false)
    {
        return true;
    }
    if resource
        .map(|r| attributes_contain(&r.attributes, key, value))
        .unwrap_or(false)
    {
        return true;
    }
    if span
        .events
        .iter()
        .any(|e| attributes_contain(&e.attributes, key, value))
    {
        return true;
    }
    span.links
        .iter()
        .any(|l| attributes_contain(&l.attributes, key, value))
}

fn attributes_contain(
    attributes: &[opentelemetry_proto::tonic::common::v1::KeyValue],
    key: &str,
    value: &str,
) -> bool {
    attributes.iter().any(|kv| {
        kv.key == key
            && kv
                .value
                .as_ref()
                .map(|v| any_value_to_string(v) == value)
                .unwrap_or(false)
    })
}
