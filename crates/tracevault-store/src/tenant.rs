use std::collections::{HashMap, HashSet};

use opentelemetry_proto::tonic::trace::v1::span::SpanKind;
use opentelemetry_proto::tonic::trace::v1::ResourceSpans;
use parking_lot::RwLock;
use tracing::debug;

use tracevault_model::convert::otlp::resource_service_name;
use tracevault_model::TraceId;

use crate::query::{resource_matches, span_matches, TraceQuery};
use crate::reshuffle::reshuffle_by_trace_id;
use crate::StoreError;

/// An operation observed for a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Operation {
    pub name: String,
    /// Lower-case span kind; empty for unspecified.
    pub span_kind: String,
}

/// A service-to-service call edge derived from stored traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLink {
    pub parent: String,
    pub child: String,
    pub call_count: u64,
    pub source: String,
}

/// A trace as stored: the merged resource tree plus its time range.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTrace {
    pub trace_id: TraceId,
    pub resource_spans: Vec<ResourceSpans>,
    /// Min span start across the trace, unix nanos.
    pub start_time: u64,
    /// Max span end across the trace, unix nanos.
    pub end_time: u64,
}

struct TenantState {
    /// Fixed-size ring of trace records; `None` slots have not been filled
    /// yet (only possible before the first wrap).
    traces: Vec<Option<StoredTrace>>,
    /// Trace id -> ring slot.
    ids: HashMap<TraceId, usize>,
    /// Most recently inserted slot; `None` until the first insert.
    most_recent: Option<usize>,
    services: HashSet<String>,
    operations: HashMap<String, HashSet<Operation>>,
}

/// Per-tenant trace storage. All state sits behind one read/write lock;
/// reads clone what they return so no reader ever observes a partial
/// mutation.
pub struct TenantStore {
    max_traces: usize,
    state: RwLock<TenantState>,
}

impl TenantStore {
    /// `max_traces` bounds the ring; it must be positive.
    pub fn new(max_traces: usize) -> Self {
        assert!(max_traces > 0, "max_traces must be positive");
        Self {
            max_traces,
            state: RwLock::new(TenantState {
                traces: (0..max_traces).map(|_| None).collect(),
                ids: HashMap::new(),
                most_recent: None,
                services: HashSet::new(),
                operations: HashMap::new(),
            }),
        }
    }

    pub fn max_traces(&self) -> usize {
        self.max_traces
    }

    /// Ingests a resource tree: reshuffles it into per-trace groups, then
    /// merges each group into the ring.
    pub fn write_traces(&self, batch: Vec<ResourceSpans>) {
        let groups = reshuffle_by_trace_id(batch);
        if groups.is_empty() {
            return;
        }
        let mut state = self.state.write();
        for (trace_id, group) in groups {
            state.upsert(trace_id, group, self.max_traces);
        }
    }

    /// Looks up traces by id; missing ids are omitted.
    pub fn get_traces(&self, ids: &[TraceId]) -> Vec<StoredTrace> {
        let state = self.state.read();
        ids.iter()
            .filter_map(|id| {
                state
                    .ids
                    .get(id)
                    .and_then(|&slot| state.traces[slot].clone())
            })
            .collect()
    }

    /// Snapshot of all observed service names, sorted.
    pub fn get_services(&self) -> Vec<String> {
        let state = self.state.read();
        let mut services: Vec<String> = state.services.iter().cloned().collect();
        services.sort();
        services
    }

    /// Snapshot of a service's operations, optionally filtered by kind.
    pub fn get_operations(&self, service: &str, span_kind: Option<&str>) -> Vec<Operation> {
        let state = self.state.read();
        let mut operations: Vec<Operation> = state
            .operations
            .get(service)
            .map(|ops| {
                ops.iter()
                    .filter(|op| span_kind.map(|k| op.span_kind == k).unwrap_or(true))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        operations.sort();
        operations
    }

    /// Matching traces, newest first, bounded by the query's search depth.
    pub fn find_traces(&self, query: &TraceQuery) -> Result<Vec<StoredTrace>, StoreError> {
        self.scan(query, |trace| trace.clone())
    }

    /// Like [`find_traces`], returning only `{trace id, start, end}` triples.
    pub fn find_trace_ids(
        &self,
        query: &TraceQuery,
    ) -> Result<Vec<(TraceId, u64, u64)>, StoreError> {
        self.scan(query, |trace| {
            (trace.trace_id, trace.start_time, trace.end_time)
        })
    }

    fn scan<T>(
        &self,
        query: &TraceQuery,
        mut project: impl FnMut(&StoredTrace) -> T,
    ) -> Result<Vec<T>, StoreError> {
        if query.search_depth == 0 || query.search_depth > self.max_traces {
            return Err(StoreError::InvalidSearchDepth {
                depth: query.search_depth,
                max_traces: self.max_traces,
            });
        }
        let state = self.state.read();
        let Some(most_recent) = state.most_recent else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        // Reverse chronological walk starting at the most recent slot,
        // wrapping modulo capacity.
        for offset in 0..self.max_traces {
            let slot = (most_recent + self.max_traces - offset) % self.max_traces;
            match &state.traces[slot] {
                // A gap means the ring has not wrapped yet; nothing older
                // exists beyond it.
                None => break,
                Some(trace) => {
                    if trace_matches(query, trace) {
                        results.push(project(trace));
                        if results.len() == query.search_depth {
                            break;
                        }
                    }
                }
            }
        }
        Ok(results)
    }

    /// Service dependency links across stored traces whose time range falls
    /// inside (start, end). `end == 0` means unbounded.
    pub fn get_dependencies(&self, start: u64, end: u64) -> Vec<DependencyLink> {
        let state = self.state.read();
        let mut counts: HashMap<(String, String), u64> = HashMap::new();

        for trace in state.traces.iter().flatten() {
            if start >= trace.start_time {
                continue;
            }
            if end != 0 && trace.end_time >= end {
                continue;
            }

            // span id -> owning service, within this trace
            let mut span_service: HashMap<&[u8], String> = HashMap::new();
            for rs in &trace.resource_spans {
                let service = resource_service_name(rs.resource.as_ref());
                for ss in &rs.scope_spans {
                    for span in &ss.spans {
                        span_service
                            .entry(span.span_id.as_slice())
                            .or_insert_with(|| service.clone());
                    }
                }
            }

            for rs in &trace.resource_spans {
                let child_service = resource_service_name(rs.resource.as_ref());
                for ss in &rs.scope_spans {
                    for span in &ss.spans {
                        if span.parent_span_id.is_empty() {
                            continue;
                        }
                        if let Some(parent_service) =
                            span_service.get(span.parent_span_id.as_slice())
                        {
                            if *parent_service != child_service {
                                *counts
                                    .entry((parent_service.clone(), child_service.clone()))
                                    .or_insert(0) += 1;
                            }
                        }
                    }
                }
            }
        }

        let mut links: Vec<DependencyLink> = counts
            .into_iter()
            .map(|((parent, child), call_count)| DependencyLink {
                parent,
                child,
                call_count,
                source: String::new(),
            })
            .collect();
        links.sort_by(|a, b| (&a.parent, &a.child).cmp(&(&b.parent, &b.child)));
        links
    }
}

fn trace_matches(query: &TraceQuery, trace: &StoredTrace) -> bool {
    trace.resource_spans.iter().any(|rs| {
        resource_matches(query, rs.resource.as_ref())
            && rs.scope_spans.iter().any(|ss| {
                ss.spans
                    .iter()
                    .any(|span| span_matches(query, span, ss.scope.as_ref(), rs.resource.as_ref()))
            })
    })
}

impl TenantState {
    fn upsert(&mut self, trace_id: TraceId, group: Vec<ResourceSpans>, max_traces: usize) {
        let (mut start, mut end) = (u64::MAX, 0u64);
        for rs in &group {
            let service = resource_service_name(rs.resource.as_ref());
            self.services.insert(service.clone());
            let operations = self.operations.entry(service).or_default();
            for ss in &rs.scope_spans {
                for span in &ss.spans {
                    operations.insert(Operation {
                        name: span.name.clone(),
                        span_kind: kind_label(span.kind),
                    });
                    start = start.min(span.start_time_unix_nano);
                    end = end.max(span.end_time_unix_nano);
                }
            }
        }
        if start == u64::MAX {
            return; // empty group
        }

        if let Some(&slot) = self.ids.get(&trace_id) {
            let record = self.traces[slot]
                .as_mut()
                .expect("indexed slot must be occupied");
            record.resource_spans.extend(group);
            record.start_time = record.start_time.min(start);
            record.end_time = record.end_time.max(end);
            return;
        }

        let slot = match self.most_recent {
            Some(current) => (current + 1) % max_traces,
            None => 0,
        };
        if let Some(evicted) = self.traces[slot].take() {
            debug!(trace_id = %evicted.trace_id, "evicting oldest trace");
            self.ids.remove(&evicted.trace_id);
        }
        self.ids.insert(trace_id, slot);
        self.traces[slot] = Some(StoredTrace {
            trace_id,
            resource_spans: group,
            start_time: start,
            end_time: end,
        });
        self.most_recent = Some(slot);
    }
}

fn kind_label(kind: i32) -> String {
    match SpanKind::try_from(kind) {
        Ok(SpanKind::Internal) => "internal",
        Ok(SpanKind::Server) => "server",
        Ok(SpanKind::Client) => "client",
        Ok(SpanKind::Producer) => "producer",
        Ok(SpanKind::Consumer) => "consumer",
        _ => "",
    }
    .to_owned()
}
