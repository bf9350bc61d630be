use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use tracevault_model::convert::otlp::model_span_to_resource_spans;
use tracevault_model::Span;
use tracevault_pipeline::SpanWriter;

use crate::tenant::TenantStore;

/// In-memory store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Ring capacity per tenant.
    pub max_traces: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { max_traces: 50_000 }
    }
}

/// Top-level dispatcher: maps tenant ids to their stores, creating each
/// lazily from the default configuration on first use.
///
/// The tenant map is read-frequent and write-rare; the write lock is taken
/// only to install a new tenant.
pub struct InMemoryStore {
    config: StoreConfig,
    tenants: RwLock<HashMap<String, Arc<TenantStore>>>,
}

impl InMemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            tenants: RwLock::new(HashMap::new()),
        }
    }

    /// The store for `tenant`, created on first use. The empty string is the
    /// single-tenant default.
    pub fn tenant(&self, tenant: &str) -> Arc<TenantStore> {
        if let Some(store) = self.tenants.read().get(tenant) {
            return Arc::clone(store);
        }
        let mut tenants = self.tenants.write();
        Arc::clone(tenants.entry(tenant.to_owned()).or_insert_with(|| {
            info!(tenant, max_traces = self.config.max_traces, "creating tenant store");
            Arc::new(TenantStore::new(self.config.max_traces))
        }))
    }

    pub fn tenant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tenants.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drops a tenant's data entirely.
    pub fn purge(&self, tenant: &str) {
        self.tenants.write().remove(tenant);
    }
}

#[async_trait]
impl SpanWriter for InMemoryStore {
    async fn write_span(&self, span: &Span, tenant: &str) -> anyhow::Result<()> {
        let tree = model_span_to_resource_spans(span);
        self.tenant(tenant).write_traces(vec![tree]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::DependencyLink;
    use crate::{StoreError, TraceQuery};
    use opentelemetry_proto::tonic::common::v1::{any_value, AnyValue, KeyValue};
    use opentelemetry_proto::tonic::resource::v1::Resource;
    use opentelemetry_proto::tonic::trace::v1::span::{Event, SpanKind};
    use opentelemetry_proto::tonic::trace::v1::{
        ResourceSpans, ScopeSpans, Span as OtlpSpan,
    };
    use tracevault_model::TraceId;

    fn string_attr(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_owned(),
            value: Some(AnyValue {
                value: Some(any_value::Value::StringValue(value.to_owned())),
            }),
        }
    }

    fn trace_id(byte: u8) -> TraceId {
        let mut id = [0u8; 16];
        id[15] = byte;
        TraceId::new(id)
    }

    struct SpanSpec {
        trace_byte: u8,
        span_byte: u8,
        parent_byte: u8,
        name: &'static str,
        start: u64,
        end: u64,
        kind: SpanKind,
    }

    fn make_tree(service: &str, specs: &[SpanSpec]) -> ResourceSpans {
        let spans = specs
            .iter()
            .map(|s| OtlpSpan {
                trace_id: trace_id(s.trace_byte).to_vec(),
                span_id: vec![0, 0, 0, 0, 0, 0, 0, s.span_byte],
                parent_span_id: if s.parent_byte == 0 {
                    vec![]
                } else {
                    vec![0, 0, 0, 0, 0, 0, 0, s.parent_byte]
                },
                name: s.name.to_owned(),
                kind: s.kind as i32,
                start_time_unix_nano: s.start,
                end_time_unix_nano: s.end,
                ..Default::default()
            })
            .collect();
        ResourceSpans {
            resource: Some(Resource {
                attributes: vec![string_attr("service.name", service)],
                ..Default::default()
            }),
            scope_spans: vec![ScopeSpans {
                spans,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn simple_span(trace_byte: u8, name: &'static str, start: u64) -> SpanSpec {
        SpanSpec {
            trace_byte,
            span_byte: trace_byte,
            parent_byte: 0,
            name,
            start,
            end: start + 100,
            kind: SpanKind::Server,
        }
    }

    #[test]
    fn ring_evicts_oldest_whole_trace() {
        let store = TenantStore::new(3);
        for byte in 1..=4u8 {
            store.write_traces(vec![make_tree(
                "svc",
                &[simple_span(byte, "op", byte as u64 * 10)],
            )]);
        }

        assert!(store.get_traces(&[trace_id(1)]).is_empty());
        for byte in 2..=4u8 {
            assert_eq!(store.get_traces(&[trace_id(byte)]).len(), 1, "trace {byte}");
        }
        // Observed services survive eviction.
        assert_eq!(store.get_services(), vec!["svc".to_owned()]);
    }

    #[test]
    fn reingestion_appends_to_existing_trace() {
        let store = TenantStore::new(8);
        store.write_traces(vec![make_tree("a", &[simple_span(1, "one", 100)])]);
        store.write_traces(vec![make_tree(
            "b",
            &[SpanSpec {
                trace_byte: 1,
                span_byte: 9,
                parent_byte: 0,
                name: "two",
                start: 50,
                end: 500,
                kind: SpanKind::Client,
            }],
        )]);

        let traces = store.get_traces(&[trace_id(1)]);
        assert_eq!(traces.len(), 1);
        let trace = &traces[0];
        assert_eq!(trace.resource_spans.len(), 2);
        // Time range is the min/max merge across both writes.
        assert_eq!(trace.start_time, 50);
        assert_eq!(trace.end_time, 500);
    }

    #[test]
    fn find_traces_returns_newest_first() {
        let store = TenantStore::new(10);
        for byte in 1..=9u8 {
            store.write_traces(vec![make_tree(
                "s",
                &[simple_span(byte, "op", byte as u64)],
            )]);
        }

        let found = store
            .find_traces(&TraceQuery::for_service("s", 5))
            .unwrap();
        let bytes: Vec<u8> = found.iter().map(|t| t.trace_id.as_bytes()[15]).collect();
        assert_eq!(bytes, vec![9, 8, 7, 6, 5]);
    }

    #[test]
    fn find_trace_ids_matches_find_traces_order() {
        let store = TenantStore::new(10);
        for byte in 1..=4u8 {
            store.write_traces(vec![make_tree(
                "s",
                &[simple_span(byte, "op", byte as u64)],
            )]);
        }
        let ids = store
            .find_trace_ids(&TraceQuery::for_service("s", 10))
            .unwrap();
        let bytes: Vec<u8> = ids.iter().map(|(id, _, _)| id.as_bytes()[15]).collect();
        assert_eq!(bytes, vec![4, 3, 2, 1]);
        let (_, start, end) = ids[0];
        assert_eq!((start, end), (4, 104));
    }

    #[test]
    fn search_depth_bounds_are_enforced() {
        let store = TenantStore::new(4);
        assert_eq!(
            store.find_traces(&TraceQuery::for_service("s", 0)),
            Err(StoreError::InvalidSearchDepth {
                depth: 0,
                max_traces: 4
            })
        );
        assert_eq!(
            store.find_traces(&TraceQuery::for_service("s", 5)),
            Err(StoreError::InvalidSearchDepth {
                depth: 5,
                max_traces: 4
            })
        );
        assert!(store.find_traces(&TraceQuery::for_service("s", 4)).is_ok());
    }

    #[test]
    fn service_filter_excludes_other_services() {
        let store = TenantStore::new(4);
        store.write_traces(vec![make_tree("a", &[simple_span(1, "op", 1)])]);
        store.write_traces(vec![make_tree("b", &[simple_span(2, "op", 2)])]);

        let found = store
            .find_traces(&TraceQuery::for_service("a", 4))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].trace_id, trace_id(1));

        // Empty service matches everything.
        let all = store.find_traces(&TraceQuery::for_service("", 4)).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn event_attributes_are_searchable() {
        let store = TenantStore::new(4);
        let mut tree = make_tree("svc", &[simple_span(1, "op", 1)]);
        tree.scope_spans[0].spans[0].events = vec![Event {
            name: "exception".to_owned(),
            attributes: vec![string_attr("k", "v")],
            ..Default::default()
        }];
        store.write_traces(vec![tree]);

        let query = TraceQuery {
            search_depth: 4,
            ..Default::default()
        }
        .with_attribute("k", "v");
        let found = store.find_traces(&query).unwrap();
        assert_eq!(found.len(), 1);

        let miss = TraceQuery {
            search_depth: 4,
            ..Default::default()
        }
        .with_attribute("k", "other");
        assert!(store.find_traces(&miss).unwrap().is_empty());
    }

    #[test]
    fn operations_are_recorded_per_service_and_kind() {
        let store = TenantStore::new(4);
        store.write_traces(vec![make_tree(
            "svc",
            &[
                SpanSpec {
                    trace_byte: 1,
                    span_byte: 1,
                    parent_byte: 0,
                    name: "read",
                    start: 1,
                    end: 2,
                    kind: SpanKind::Server,
                },
                SpanSpec {
                    trace_byte: 1,
                    span_byte: 2,
                    parent_byte: 0,
                    name: "write",
                    start: 1,
                    end: 2,
                    kind: SpanKind::Client,
                },
            ],
        )]);

        let all = store.get_operations("svc", None);
        assert_eq!(all.len(), 2);
        let servers = store.get_operations("svc", Some("server"));
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "read");
        assert!(store.get_operations("absent", None).is_empty());
    }

    #[test]
    fn dependencies_count_cross_service_edges() {
        let store = TenantStore::new(4);
        // Span B (service Y) is the root; span A (service X) is its child.
        store.write_traces(vec![
            make_tree(
                "Y",
                &[SpanSpec {
                    trace_byte: 1,
                    span_byte: 2,
                    parent_byte: 0,
                    name: "root",
                    start: 100,
                    end: 400,
                    kind: SpanKind::Server,
                }],
            ),
            make_tree(
                "X",
                &[SpanSpec {
                    trace_byte: 1,
                    span_byte: 1,
                    parent_byte: 2,
                    name: "child",
                    start: 150,
                    end: 300,
                    kind: SpanKind::Server,
                }],
            ),
        ]);

        let links = store.get_dependencies(50, 500);
        assert_eq!(
            links,
            vec![DependencyLink {
                parent: "Y".to_owned(),
                child: "X".to_owned(),
                call_count: 1,
                source: String::new(),
            }]
        );

        // Out-of-window traces are excluded; end == 0 is unbounded.
        assert!(store.get_dependencies(100, 0).is_empty());
        assert_eq!(store.get_dependencies(50, 0).len(), 1);
        assert!(store.get_dependencies(50, 400).is_empty());
    }

    #[test]
    fn same_service_edges_are_not_links() {
        let store = TenantStore::new(4);
        store.write_traces(vec![make_tree(
            "same",
            &[
                SpanSpec {
                    trace_byte: 1,
                    span_byte: 1,
                    parent_byte: 0,
                    name: "root",
                    start: 10,
                    end: 20,
                    kind: SpanKind::Server,
                },
                SpanSpec {
                    trace_byte: 1,
                    span_byte: 2,
                    parent_byte: 1,
                    name: "inner",
                    start: 11,
                    end: 19,
                    kind: SpanKind::Internal,
                },
            ],
        )]);
        assert!(store.get_dependencies(1, 0).is_empty());
    }

    #[test]
    fn duplicate_write_is_query_equivalent_to_concatenation() {
        let tree = make_tree("svc", &[simple_span(1, "op", 10)]);

        let twice = TenantStore::new(4);
        twice.write_traces(vec![tree.clone()]);
        twice.write_traces(vec![tree.clone()]);

        let concat = TenantStore::new(4);
        concat.write_traces(vec![tree.clone(), tree]);

        let query = TraceQuery::for_service("svc", 4);
        let a = twice.find_traces(&query).unwrap();
        let b = concat.find_traces(&query).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a[0].start_time, b[0].start_time);
        assert_eq!(a[0].end_time, b[0].end_time);
        assert_eq!(twice.get_services(), concat.get_services());
    }

    #[test]
    fn dispatcher_creates_tenants_lazily() {
        let store = InMemoryStore::new(StoreConfig { max_traces: 4 });
        assert!(store.tenant_ids().is_empty());
        let acme = store.tenant("acme");
        acme.write_traces(vec![make_tree("svc", &[simple_span(1, "op", 1)])]);
        assert_eq!(store.tenant_ids(), vec!["acme".to_owned()]);
        // Same instance on repeat lookups.
        assert_eq!(store.tenant("acme").get_services(), vec!["svc".to_owned()]);
        // Other tenants see nothing.
        assert!(store.tenant("wonka").get_services().is_empty());
        store.purge("acme");
        assert!(store.tenant("acme").get_services().is_empty());
    }

    #[tokio::test]
    async fn span_writer_impl_merges_into_trace() {
        use tracevault_model::{Process, SpanId, SpanStatus};

        let store = InMemoryStore::new(StoreConfig { max_traces: 4 });
        let span = tracevault_model::Span {
            trace_id: trace_id(7),
            span_id: SpanId::from_u64(1),
            parent_span_id: None,
            operation_name: "written".to_owned(),
            process: Process::new("writer-svc"),
            start_time: 5,
            duration: 10,
            tags: vec![],
            logs: vec![],
            references: vec![],
            kind: tracevault_model::SpanKind::Client,
            status: SpanStatus::Unset,
            warnings: vec![],
        };
        store.write_span(&span, "acme").await.unwrap();

        let tenant = store.tenant("acme");
        let traces = tenant.get_traces(&[trace_id(7)]);
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].start_time, 5);
        assert_eq!(traces[0].end_time, 15);
        assert_eq!(
            tenant.get_operations("writer-svc", Some("client"))[0].name,
            "written"
        );
    }
}
