use std::collections::HashMap;

use opentelemetry_proto::tonic::trace::v1::{ResourceSpans, ScopeSpans};

use tracevault_model::TraceId;

/// Regroups an incoming resource tree so that every group holds exactly one
/// trace id, preserving the (resource, scope) grouping of each span.
///
/// A resource-spans entry whose spans belong to several traces is split into
/// one entry per trace id, and likewise for scope-spans. This is a pure
/// rearrangement: no span is duplicated or lost. Group order follows first
/// appearance in the input.
pub fn reshuffle_by_trace_id(batch: Vec<ResourceSpans>) -> Vec<(TraceId, Vec<ResourceSpans>)> {
    let mut order: Vec<TraceId> = Vec::new();
    let mut groups: HashMap<TraceId, Vec<ResourceSpans>> = HashMap::new();

    for resource_spans in batch {
        // trace id -> scope spans for this resource entry
        let mut per_trace: Vec<(TraceId, Vec<ScopeSpans>)> = Vec::new();

        for scope_spans in resource_spans.scope_spans {
            let mut spans_by_trace: Vec<(TraceId, Vec<_>)> = Vec::new();
            for span in scope_spans.spans {
                let trace_id = TraceId::from_bytes(&span.trace_id).unwrap_or_default();
                match spans_by_trace.iter_mut().find(|(id, _)| *id == trace_id) {
                    Some((_, spans)) => spans.push(span),
                    None => spans_by_trace.push((trace_id, vec![span])),
                }
            }
            for (trace_id, spans) in spans_by_trace {
                let split = ScopeSpans {
                    scope: scope_spans.scope.clone(),
                    spans,
                    schema_url: scope_spans.schema_url.clone(),
                };
                match per_trace.iter_mut().find(|(id, _)| *id == trace_id) {
                    Some((_, scopes)) => scopes.push(split),
                    None => per_trace.push((trace_id, vec![split])),
                }
            }
        }

        for (trace_id, scope_spans) in per_trace {
            let entry = ResourceSpans {
                resource: resource_spans.resource.clone(),
                scope_spans,
                schema_url: resource_spans.schema_url.clone(),
            };
            if !groups.contains_key(&trace_id) {
                order.push(trace_id);
            }
            groups.entry(trace_id).or_default().push(entry);
        }
    }

    order
        .into_iter()
        .map(|id| {
            let group = groups.remove(&id).unwrap_or_default();
            (id, group)
        })
        .collect()
}
