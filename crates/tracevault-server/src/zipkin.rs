//! Zipkin HTTP front-end: `POST /`, `/api/v1/spans` and `/api/v2/spans`,
//! with the decoder chosen by content type (JSON v1/v2, Thrift, protobuf).

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use prost::Message;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use tracevault_config::{CorsOptions, ZipkinOptions};
use tracevault_model::convert::zipkin::{
    self, decode_json_v1, decode_json_v2, zipkin_to_model,
};
use tracevault_model::{InboundTransport, ModelError, SpanFormat, TraceBatch};
use tracevault_proto::zipkin::proto3;
use tracevault_thrift::decode_zipkin_spans;

use crate::consumer::BatchConsumer;
use crate::status::to_http_status;

#[derive(Clone, Copy, PartialEq)]
enum ZipkinPath {
    Root,
    V1,
    V2,
}

pub fn router(consumer: Arc<BatchConsumer>, options: &ZipkinOptions) -> Router {
    let mut router = Router::new()
        .route("/", post(post_root))
        .route("/api/v1/spans", post(post_v1))
        .route("/api/v2/spans", post(post_v2))
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&options.cors))
        .with_state(consumer);

    if !options.keep_alive {
        // HTTP/1.1 peers honor Connection: close, which is how the
        // keep-alive disable flag is realized.
        router = router.layer(map_response(set_connection_close));
    }
    router
}

async fn set_connection_close(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

fn cors_layer(options: &CorsOptions) -> CorsLayer {
    let mut layer = CorsLayer::new();
    if !options.allowed_origins.is_empty() {
        let origins: Vec<HeaderValue> = options
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        layer = layer.allow_origin(origins);
    }
    if !options.allowed_headers.is_empty() {
        let headers: Vec<HeaderName> = options
            .allowed_headers
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect();
        layer = layer.allow_headers(headers);
    }
    layer
}

async fn post_root(
    State(consumer): State<Arc<BatchConsumer>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle_spans(consumer, headers, body, ZipkinPath::Root).await
}

async fn post_v1(
    State(consumer): State<Arc<BatchConsumer>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle_spans(consumer, headers, body, ZipkinPath::V1).await
}

async fn post_v2(
    State(consumer): State<Arc<BatchConsumer>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle_spans(consumer, headers, body, ZipkinPath::V2).await
}

async fn handle_spans(
    consumer: Arc<BatchConsumer>,
    headers: HeaderMap,
    body: Bytes,
    path: ZipkinPath,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json");
    let media_type = content_type.split(';').next().unwrap_or("").trim();

    let decoded = match media_type {
        "application/json" | "" => match path {
            // The bare endpoint and /api/v2/spans speak the v2 JSON model.
            ZipkinPath::Root | ZipkinPath::V2 => decode_json_v2(&body),
            ZipkinPath::V1 => decode_json_v1(&body),
        },
        "application/x-thrift" => match decode_zipkin_spans(&body) {
            Ok(spans) => zipkin::from_thrift(spans),
            Err(err) => Err(ModelError::decode("zipkin thrift", err)),
        },
        "application/x-protobuf" => match proto3::ListOfSpans::decode(body.as_ref()) {
            Ok(list) => zipkin::from_proto(list),
            Err(err) => Err(ModelError::decode("zipkin protobuf", err)),
        },
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Unsupported content type: {content_type:?}"),
            )
                .into_response();
        }
    };

    let zipkin_spans = match decoded {
        Ok(spans) => spans,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Unable to process request body: {err}"),
            )
                .into_response();
        }
    };

    // A shared v1 span can split into two model spans; the source map keeps
    // the per-span results attributable to the wire spans.
    let (spans, _source) = zipkin_to_model(zipkin_spans);
    let batch = TraceBatch::v1(spans, None, InboundTransport::Http, SpanFormat::Zipkin);

    let tenant_values: Vec<&str> = headers
        .get_all(consumer.tenancy().header())
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    match consumer.consume(tenant_values, batch).await {
        Ok(_) => StatusCode::ACCEPTED.into_response(),
        Err(err) => to_http_status(&err).into_response(),
    }
}

/// Binds and serves the Zipkin HTTP receiver until shutdown.
pub async fn serve(
    options: &ZipkinOptions,
    consumer: Arc<BatchConsumer>,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = options
        .host_port
        .parse()
        .with_context(|| format!("invalid zipkin host_port {:?}", options.host_port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind zipkin listener on {addr}"))?;
    info!("zipkin http receiver listening on {}", addr);

    axum::serve(listener, router(consumer, options))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("zipkin server error")?;

    info!("zipkin http receiver stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;
    use tracevault_pipeline::{ProcessorConfig, SpanProcessor};
    use tracevault_store::{InMemoryStore, StoreConfig, TraceQuery};
    use tracevault_tenancy::{TenancyManager, TenancyOptions};
    use tracevault_thrift::{encode_zipkin_spans, zipkincore};

    fn app(options: &ZipkinOptions) -> (Router, Arc<InMemoryStore>) {
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
        (router(consumer, options), store)
    }

    async fn wait_for_service(store: &InMemoryStore, service: &str) {
        let tenant = store.tenant("");
        for _ in 0..200 {
            if tenant.get_services().iter().any(|s| s == service) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("service {service} never appeared in the store");
    }

    #[tokio::test]
    async fn v2_json_is_accepted_and_stored() {
        let (app, store) = app(&ZipkinOptions::default());
        let body = r#"[{
            "traceId": "000000000000000a",
            "id": "0000000000000001",
            "kind": "SERVER",
            "name": "get",
            "timestamp": 1000,
            "duration": 50,
            "localEndpoint": {"serviceName": "zipkin-svc"}
        }]"#;
        let response = app
            .oneshot(
                Request::post("/api/v2/spans")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        wait_for_service(&store, "zipkin-svc").await;

        let found = store
            .tenant("")
            .find_traces(&TraceQuery::for_service("zipkin-svc", 16))
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn v1_json_on_v1_path() {
        let (app, store) = app(&ZipkinOptions::default());
        let body = r#"[{
            "traceId": "000000000000000b",
            "id": "0000000000000002",
            "name": "legacy",
            "timestamp": 2000,
            "duration": 10,
            "annotations": [
                {"timestamp": 2000, "value": "sr", "endpoint": {"serviceName": "legacy-svc"}}
            ]
        }]"#;
        let response = app
            .oneshot(
                Request::post("/api/v1/spans")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        wait_for_service(&store, "legacy-svc").await;
    }

    #[tokio::test]
    async fn thrift_content_type_uses_thrift_decoder() {
        let (app, store) = app(&ZipkinOptions::default());
        let body = encode_zipkin_spans(&[zipkincore::Span {
            trace_id: Some(0xc),
            name: Some("thrifted".into()),
            id: Some(3),
            parent_id: None,
            annotations: Some(vec![zipkincore::Annotation {
                timestamp: Some(5_000),
                value: Some(zipkincore::SERVER_RECV.into()),
                host: Some(zipkincore::Endpoint {
                    ipv4: None,
                    port: None,
                    service_name: Some("thrift-zipkin".into()),
                    ipv6: None,
                }),
            }]),
            binary_annotations: Some(vec![]),
            debug: None,
            timestamp: Some(5_000),
            duration: Some(80),
            trace_id_high: None,
        }])
        .unwrap();

        let response = app
            .oneshot(
                Request::post("/api/v1/spans")
                    .header(header::CONTENT_TYPE, "application/x-thrift")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        wait_for_service(&store, "thrift-zipkin").await;
    }

    #[tokio::test]
    async fn protobuf_content_type_uses_proto_decoder() {
        let (app, store) = app(&ZipkinOptions::default());
        let list = proto3::ListOfSpans {
            spans: vec![proto3::Span {
                trace_id: vec![0, 0, 0, 0, 0, 0, 0, 0xd],
                id: vec![0, 0, 0, 0, 0, 0, 0, 4],
                name: "protoed".into(),
                timestamp: 9_000,
                duration: 70,
                local_endpoint: Some(proto3::Endpoint {
                    service_name: "proto-zipkin".into(),
                    ..Default::default()
                }),
                ..Default::default()
            }],
        };
        let response = app
            .oneshot(
                Request::post("/api/v2/spans")
                    .header(header::CONTENT_TYPE, "application/x-protobuf")
                    .body(Body::from(list.encode_to_vec()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        wait_for_service(&store, "proto-zipkin").await;
    }

    #[tokio::test]
    async fn bad_json_is_bad_request() {
        let (app, _) = app(&ZipkinOptions::default());
        let response = app
            .oneshot(
                Request::post("/api/v2/spans")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn keep_alive_disable_sets_connection_close() {
        let options = ZipkinOptions {
            keep_alive: false,
            ..ZipkinOptions::default()
        };
        let (app, _) = app(&options);
        let response = app
            .oneshot(
                Request::post("/api/v2/spans")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("[]"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::CONNECTION),
            Some(&HeaderValue::from_static("close"))
        );
    }
}
