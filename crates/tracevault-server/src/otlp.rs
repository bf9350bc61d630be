//! OTLP front-ends: the standard gRPC `TraceService` plus the HTTP binding
//! on `/v1/traces`. Accepted trace trees stay in their native v2 shape and
//! are tagged with `unknown` transport.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use opentelemetry_proto::tonic::collector::trace::v1::trace_service_server::{
    TraceService, TraceServiceServer,
};
use opentelemetry_proto::tonic::collector::trace::v1::{
    ExportTraceServiceRequest, ExportTraceServiceResponse,
};
use prost::Message;
use tokio_util::sync::CancellationToken;
use tonic::codec::CompressionEncoding;
use tonic::transport::server::TcpIncoming;
use tonic::{Request, Status};
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use tracevault_config::OtlpOptions;
use tracevault_model::{InboundTransport, TraceBatch};

use crate::consumer::BatchConsumer;
use crate::status::{to_grpc_status, to_http_status};

const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

pub struct OtlpTraceReceiver {
    consumer: Arc<BatchConsumer>,
}

impl OtlpTraceReceiver {
    pub fn new(consumer: Arc<BatchConsumer>) -> Self {
        Self { consumer }
    }
}

#[tonic::async_trait]
impl TraceService for OtlpTraceReceiver {
    async fn export(
        &self,
        request: Request<ExportTraceServiceRequest>,
    ) -> Result<tonic::Response<ExportTraceServiceResponse>, Status> {
        let tenant_values: Vec<String> = request
            .metadata()
            .get_all(self.consumer.tenancy().header())
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_owned))
            .collect();

        let batch = TraceBatch::otlp(
            request.into_inner().resource_spans,
            InboundTransport::Unknown,
        );
        self.consumer
            .consume(tenant_values.iter().map(String::as_str), batch)
            .await
            .map_err(|err| to_grpc_status(&err))?;

        Ok(tonic::Response::new(ExportTraceServiceResponse {
            partial_success: None,
        }))
    }
}

/// Serves OTLP over gRPC until shutdown.
pub async fn serve_grpc(
    options: &OtlpOptions,
    consumer: Arc<BatchConsumer>,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = options
        .grpc_host_port
        .parse()
        .with_context(|| format!("invalid otlp grpc host_port {:?}", options.grpc_host_port))?;
    let incoming = TcpIncoming::new(addr, true, None)
        .map_err(|err| anyhow!("failed to bind otlp grpc listener on {addr}: {err}"))?;
    info!("otlp grpc receiver listening on {}", addr);

    let service = TraceServiceServer::new(OtlpTraceReceiver::new(consumer))
        .accept_compressed(CompressionEncoding::Gzip);

    tonic::transport::Server::builder()
        .add_service(service)
        .serve_with_incoming_shutdown(incoming, shutdown.cancelled_owned())
        .await
        .context("otlp grpc server error")?;

    info!("otlp grpc receiver stopped");
    Ok(())
}

/// Router for the OTLP/HTTP binding.
pub fn http_router(consumer: Arc<BatchConsumer>) -> Router {
    Router::new()
        .route("/v1/traces", post(export_http))
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(consumer)
}

async fn export_http(
    State(consumer): State<Arc<BatchConsumer>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    if media_type != PROTOBUF_CONTENT_TYPE {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported content type: {content_type:?}"),
        )
            .into_response();
    }

    let request = match ExportTraceServiceRequest::decode(body.as_ref()) {
        Ok(request) => request,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Unable to process request body: {err}"),
            )
                .into_response();
        }
    };

    let tenant_values: Vec<&str> = headers
        .get_all(consumer.tenancy().header())
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    let batch = TraceBatch::otlp(request.resource_spans, InboundTransport::Unknown);

    match consumer.consume(tenant_values, batch).await {
        Ok(_) => {
            let response = ExportTraceServiceResponse {
                partial_success: None,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)],
                response.encode_to_vec(),
            )
                .into_response()
        }
        Err(err) => to_http_status(&err).into_response(),
    }
}

/// Serves the OTLP/HTTP binding until shutdown.
pub async fn serve_http(
    options: &OtlpOptions,
    consumer: Arc<BatchConsumer>,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = options
        .http_host_port
        .parse()
        .with_context(|| format!("invalid otlp http host_port {:?}", options.http_host_port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind otlp http listener on {addr}"))?;
    info!("otlp http receiver listening on {}", addr);

    axum::serve(listener, http_router(consumer))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("otlp http server error")?;

    info!("otlp http receiver stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use opentelemetry_proto::tonic::common::v1::{any_value, AnyValue, KeyValue};
    use opentelemetry_proto::tonic::resource::v1::Resource;
    use opentelemetry_proto::tonic::trace::v1::{ResourceSpans, ScopeSpans, Span};
    use std::time::Duration;
    use tower::ServiceExt;
    use tracevault_pipeline::{ProcessorConfig, SpanProcessor};
    use tracevault_store::{InMemoryStore, StoreConfig};
    use tracevault_tenancy::{TenancyManager, TenancyOptions};

    fn consumer_with_store() -> (Arc<BatchConsumer>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new(StoreConfig { max_traces: 16 }));
        let processor = SpanProcessor::builder(ProcessorConfig {
            num_workers: 1,
            queue_size: 16,
            ..ProcessorConfig::default()
        })
        .build(store.clone());
        let consumer = Arc::new(BatchConsumer::new(
            processor,
            TenancyManager::new(&TenancyOptions::default()),
            vec![],
        ));
        (consumer, store)
    }

    fn sample_request() -> ExportTraceServiceRequest {
        ExportTraceServiceRequest {
            resource_spans: vec![ResourceSpans {
                resource: Some(Resource {
                    attributes: vec![KeyValue {
                        key: "service.name".to_owned(),
                        value: Some(AnyValue {
                            value: Some(any_value::Value::StringValue("otlp-svc".to_owned())),
                        }),
                    }],
                    ..Default::default()
                }),
                scope_spans: vec![ScopeSpans {
                    spans: vec![Span {
                        trace_id: vec![9; 16],
                        span_id: vec![1; 8],
                        name: "export".to_owned(),
                        start_time_unix_nano: 100,
                        end_time_unix_nano: 200,
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        }
    }

    async fn wait_for_service(store: &InMemoryStore, tenant: &str) {
        let tenant = store.tenant(tenant);
        for _ in 0..200 {
            if !tenant.get_services().is_empty() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("span did not reach the store");
    }

    #[tokio::test]
    async fn grpc_export_reaches_store() {
        let (consumer, store) = consumer_with_store();
        let receiver = OtlpTraceReceiver::new(consumer);
        receiver
            .export(Request::new(sample_request()))
            .await
            .unwrap();
        wait_for_service(&store, "").await;
        assert_eq!(store.tenant("").get_services(), vec!["otlp-svc".to_owned()]);
    }

    #[tokio::test]
    async fn http_export_accepts_protobuf() {
        let (consumer, store) = consumer_with_store();
        let app = http_router(consumer);

        let body = sample_request().encode_to_vec();
        let response = app
            .oneshot(
                HttpRequest::post("/v1/traces")
                    .header(header::CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        wait_for_service(&store, "").await;
    }

    #[tokio::test]
    async fn http_export_rejects_other_content_types() {
        let (consumer, _) = consumer_with_store();
        let app = http_router(consumer);
        let response = app
            .oneshot(
                HttpRequest::post("/v1/traces")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn http_export_rejects_garbage_body() {
        let (consumer, _) = consumer_with_store();
        let app = http_router(consumer);
        let response = app
            .oneshot(
                HttpRequest::post("/v1/traces")
                    .header(header::CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
                    .body(Body::from(vec![0xff, 0xff, 0xff]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
