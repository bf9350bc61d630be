//! Jaeger gRPC front-end: `jaeger.api_v2.CollectorService/PostSpans`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio_util::sync::CancellationToken;
use tonic::codec::CompressionEncoding;
use tonic::transport::server::TcpIncoming;
use tonic::{Request, Response, Status};
use tracing::info;

use tracevault_config::GrpcServerOptions;
use tracevault_model::convert::jaeger::proto_batch_to_model;
use tracevault_model::{InboundTransport, SpanFormat, TraceBatch};
use tracevault_proto::jaeger::api_v2::collector_service_server::{
    CollectorService, CollectorServiceServer,
};
use tracevault_proto::jaeger::api_v2::{PostSpansRequest, PostSpansResponse};

use crate::consumer::BatchConsumer;
use crate::status::to_grpc_status;

pub struct JaegerCollectorService {
    consumer: Arc<BatchConsumer>,
}

impl JaegerCollectorService {
    pub fn new(consumer: Arc<BatchConsumer>) -> Self {
        Self { consumer }
    }
}

#[tonic::async_trait]
impl CollectorService for JaegerCollectorService {
    async fn post_spans(
        &self,
        request: Request<PostSpansRequest>,
    ) -> Result<Response<PostSpansResponse>, Status> {
        let tenant_values: Vec<String> = request
            .metadata()
            .get_all(self.consumer.tenancy().header())
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_owned))
            .collect();

        let wire_batch = request
            .into_inner()
            .batch
            .ok_or_else(|| Status::invalid_argument("batch field missing"))?;
        let (spans, process) = proto_batch_to_model(&wire_batch);
        let batch = TraceBatch::v1(spans, process, InboundTransport::Grpc, SpanFormat::Proto);

        self.consumer
            .consume(tenant_values.iter().map(String::as_str), batch)
            .await
            .map_err(|err| to_grpc_status(&err))?;

        Ok(Response::new(PostSpansResponse::default()))
    }
}

/// Binds and serves the Jaeger gRPC collector until shutdown.
pub async fn serve(
    options: &GrpcServerOptions,
    consumer: Arc<BatchConsumer>,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = options
        .host_port
        .parse()
        .with_context(|| format!("invalid grpc host_port {:?}", options.host_port))?;
    let incoming = TcpIncoming::new(addr, true, None)
        .map_err(|err| anyhow!("failed to bind jaeger grpc listener on {addr}: {err}"))?;
    info!("jaeger grpc collector listening on {}", addr);

    let service = CollectorServiceServer::new(JaegerCollectorService::new(consumer))
        .accept_compressed(CompressionEncoding::Gzip)
        .max_decoding_message_size(options.max_message_size);

    tonic::transport::Server::builder()
        .add_service(service)
        .serve_with_incoming_shutdown(incoming, shutdown.cancelled_owned())
        .await
        .context("jaeger grpc server error")?;

    info!("jaeger grpc collector stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tonic::metadata::MetadataValue;
    use tracevault_pipeline::{ProcessorConfig, SpanProcessor};
    use tracevault_proto::jaeger::api_v2;
    use tracevault_store::{InMemoryStore, StoreConfig, TraceQuery};
    use tracevault_tenancy::{TenancyManager, TenancyOptions};

    fn setup(tenancy: TenancyOptions) -> (JaegerCollectorService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new(StoreConfig { max_traces: 16 }));
        let processor = SpanProcessor::builder(ProcessorConfig {
            num_workers: 1,
            queue_size: 16,
            ..ProcessorConfig::default()
        })
        .build(store.clone());
        let consumer = Arc::new(BatchConsumer::new(
            processor,
            TenancyManager::new(&tenancy),
            vec![],
        ));
        (JaegerCollectorService::new(consumer), store)
    }

    fn request_with_batch() -> Request<PostSpansRequest> {
        Request::new(PostSpansRequest {
            batch: Some(api_v2::Batch {
                process: Some(api_v2::Process {
                    service_name: "batch-svc".to_owned(),
                    tags: vec![],
                }),
                spans: vec![api_v2::Span {
                    trace_id: {
                        let mut id = vec![0u8; 16];
                        id[15] = 0x42;
                        id
                    },
                    span_id: vec![0, 0, 0, 0, 0, 0, 0, 1],
                    operation_name: "op".to_owned(),
                    start_time: Some(prost_types::Timestamp {
                        seconds: 10,
                        nanos: 0,
                    }),
                    duration: Some(prost_types::Duration {
                        seconds: 0,
                        nanos: 5_000,
                    }),
                    process: None,
                    ..Default::default()
                }],
            }),
        })
    }

    #[tokio::test]
    async fn post_spans_stores_with_batch_process() {
        let (service, store) = setup(TenancyOptions::default());
        service.post_spans(request_with_batch()).await.unwrap();

        // The pipeline is asynchronous; poll the store until the span lands.
        let tenant = store.tenant("");
        for _ in 0..200 {
            if !tenant.get_services().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(tenant.get_services(), vec!["batch-svc".to_owned()]);
        let found = tenant
            .find_traces(&TraceQuery::for_service("batch-svc", 16))
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn missing_batch_is_invalid_argument() {
        let (service, _) = setup(TenancyOptions::default());
        let err = service
            .post_spans(Request::new(PostSpansRequest { batch: None }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn unknown_tenant_is_permission_denied() {
        let (service, store) = setup(TenancyOptions {
            enabled: true,
            tenants: vec!["acme".to_owned()],
            ..TenancyOptions::default()
        });
        let mut request = request_with_batch();
        request.metadata_mut().insert(
            "x-tenant",
            MetadataValue::try_from("wonka").unwrap(),
        );
        let err = service.post_spans(request).await.unwrap_err();
        assert_eq!(err.code(), tonic::Code::PermissionDenied);
        // Nothing was written.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.tenant("wonka").get_services().is_empty());
    }

    #[tokio::test]
    async fn accepted_tenant_lands_in_its_own_store() {
        let (service, store) = setup(TenancyOptions {
            enabled: true,
            tenants: vec!["acme".to_owned()],
            ..TenancyOptions::default()
        });
        let mut request = request_with_batch();
        request
            .metadata_mut()
            .insert("x-tenant", MetadataValue::try_from("acme").unwrap());
        service.post_spans(request).await.unwrap();

        let tenant = store.tenant("acme");
        for _ in 0..200 {
            if !tenant.get_services().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(tenant.get_services(), vec!["batch-svc".to_owned()]);
        assert!(store.tenant("").get_services().is_empty());
    }
}
