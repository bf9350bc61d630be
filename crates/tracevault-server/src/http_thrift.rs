//! Jaeger HTTP front-end: Thrift batches on `POST /api/traces`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use tracevault_config::HttpServerOptions;
use tracevault_model::convert::jaeger::thrift_batch_to_model;
use tracevault_model::{InboundTransport, SpanFormat, TraceBatch};
use tracevault_thrift::decode_jaeger_batch;

use crate::consumer::BatchConsumer;
use crate::status::to_http_status;

const THRIFT_CONTENT_TYPES: &[&str] = &[
    "application/x-thrift",
    "application/vnd.apache.thrift.binary",
];

pub fn router(consumer: Arc<BatchConsumer>) -> Router {
    Router::new()
        .route("/api/traces", post(post_traces))
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(consumer)
}

async fn post_traces(
    State(consumer): State<Arc<BatchConsumer>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    // "; charset=..." suffixes are tolerated.
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    if !THRIFT_CONTENT_TYPES.contains(&media_type) {
        return (
            StatusCode::BAD_REQUEST,
            format!("Unsupported content type: {content_type:?}"),
        )
            .into_response();
    }

    let wire_batch = match decode_jaeger_batch(&body) {
        Ok(batch) => batch,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Unable to process request body: {err}"),
            )
                .into_response();
        }
    };

    // Thrift conversion substitutes the batch process into every span.
    let spans = thrift_batch_to_model(&wire_batch);
    let batch = TraceBatch::v1(spans, None, InboundTransport::Http, SpanFormat::Jaeger);

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

/// Binds and serves the Jaeger HTTP collector until shutdown.
pub async fn serve(
    options: &HttpServerOptions,
    consumer: Arc<BatchConsumer>,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = options
        .host_port
        .parse()
        .with_context(|| format!("invalid http host_port {:?}", options.host_port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind jaeger http listener on {addr}"))?;
    info!("jaeger http collector listening on {}", addr);

    axum::serve(listener, router(consumer))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("jaeger http server error")?;

    info!("jaeger http collector stopped");
    Ok(())
}
