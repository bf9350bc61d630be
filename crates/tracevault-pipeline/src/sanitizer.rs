use std::sync::Arc;

use tracevault_model::{Span, SpanKind, TagValue, NO_SERVICE_NAME};

/// A pure per-span transform applied by workers before the pre-save hook.
pub type Sanitizer = Arc<dyn Fn(Span) -> Span + Send + Sync>;

/// Applies a sanitizer chain in order.
pub fn sanitize_chain(mut span: Span, chain: &[Sanitizer]) -> Span {
    for sanitizer in chain {
        span = sanitizer(span);
    }
    span
}

/// The standard chain: UTF-8 repair, span-kind inference, service-name
/// fill-in.
pub fn default_sanitizers() -> Vec<Sanitizer> {
    vec![
        Arc::new(utf8_sanitizer),
        Arc::new(span_kind_sanitizer),
        Arc::new(service_name_sanitizer),
    ]
}

/// Binary tag values that are in fact valid UTF-8 become string values;
/// genuinely binary payloads are left alone.
fn utf8_sanitizer(mut span: Span) -> Span {
    for tag in span
        .tags
        .iter_mut()
        .chain(span.process.tags.iter_mut())
        .chain(span.logs.iter_mut().flat_map(|l| l.fields.iter_mut()))
    {
        if let TagValue::Binary(bytes) = &tag.value {
            if let Ok(text) = std::str::from_utf8(bytes) {
                tag.value = TagValue::String(text.to_owned());
            }
        }
    }
    span
}

/// Populates the span kind from a `span.kind` tag when the typed field is
/// still unspecified. The tag is consumed.
fn span_kind_sanitizer(mut span: Span) -> Span {
    if span.kind != SpanKind::Unspecified {
        return span;
    }
    if let Some(pos) = span.tags.iter().position(|t| t.key == "span.kind") {
        if let Some(kind) = SpanKind::from_tag_value(&span.tags[pos].value.coerce_to_string()) {
            span.kind = kind;
            span.tags.remove(pos);
        }
    }
    span
}

/// Spans without a service name get the reserved placeholder so every stored
/// span satisfies the non-empty-service invariant.
fn service_name_sanitizer(mut span: Span) -> Span {
    if span.process.service_name.is_empty() {
        span.process.service_name = NO_SERVICE_NAME.to_owned();
    }
    span
}
