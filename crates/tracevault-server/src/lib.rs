// tracevault-server - ingestion front-ends and server lifecycle
//
// Wires the four ingestion protocols (Jaeger gRPC, Jaeger HTTP Thrift,
// OTLP gRPC/HTTP, Zipkin HTTP) to the shared batch consumer, the bounded
// pipeline, and the in-memory trace store. Shutdown is cooperative and
// top-down: stop accepting, drain in-flight requests, drain the queue,
// close the writer.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use axum::Router;
use tokio::signal;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use tracevault_config::{AdminOptions, CollectorConfig};
use tracevault_model::KeyValue;
use tracevault_pipeline::{ProcessorConfig, SpanProcessor};
use tracevault_store::{InMemoryStore, StoreConfig};
use tracevault_tenancy::TenancyManager;

mod consumer;
mod grpc;
mod health;
mod http_thrift;
mod init;
mod otlp;
mod status;
mod zipkin;

pub use consumer::{BatchConsumer, ConsumeError};
pub use health::HealthCheck;
pub use init::init_tracing;

/// Runs the collector until a termination signal or a fatal server error.
pub async fn run_with_config(config: CollectorConfig) -> Result<()> {
    init_tracing(&config.log);
    info!("starting tracevault collector");

    let store = Arc::new(InMemoryStore::new(StoreConfig {
        max_traces: config.storage.max_traces,
    }));
    let processor = SpanProcessor::builder(ProcessorConfig {
        num_workers: config.pipeline.num_workers,
        queue_size: config.pipeline.queue_size,
        dyn_queue_size_memory: config.pipeline.dyn_queue_size_memory_bytes(),
        blocking_submit: config.pipeline.blocking_submit,
        span_size_metrics_enabled: config.pipeline.span_size_metrics_enabled,
        ..ProcessorConfig::default()
    })
    .build(store.clone());

    let collector_tags: Vec<KeyValue> = config
        .pipeline
        .collector_tags
        .iter()
        .map(|(key, value)| KeyValue::string(key.clone(), value.clone()))
        .collect();
    let consumer = Arc::new(BatchConsumer::new(
        Arc::clone(&processor),
        TenancyManager::new(&config.tenancy),
        collector_tags,
    ));

    let health = HealthCheck::new();
    let shutdown = CancellationToken::new();

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            info!("termination signal received, starting graceful shutdown");
            shutdown.cancel();
        });
    }

    let mut servers: JoinSet<Result<()>> = JoinSet::new();

    {
        let options = config.grpc.clone();
        let consumer = Arc::clone(&consumer);
        let shutdown = shutdown.clone();
        servers.spawn(async move { grpc::serve(&options, consumer, shutdown).await });
    }
    {
        let options = config.http.clone();
        let consumer = Arc::clone(&consumer);
        let shutdown = shutdown.clone();
        servers.spawn(async move { http_thrift::serve(&options, consumer, shutdown).await });
    }
    if config.otlp.enabled {
        let options = config.otlp.clone();
        let consumer_grpc = Arc::clone(&consumer);
        let shutdown_grpc = shutdown.clone();
        servers.spawn(async move { otlp::serve_grpc(&options, consumer_grpc, shutdown_grpc).await });

        let options = config.otlp.clone();
        let consumer = Arc::clone(&consumer);
        let shutdown = shutdown.clone();
        servers.spawn(async move { otlp::serve_http(&options, consumer, shutdown).await });
    }
    if config.zipkin.enabled() {
        let options = config.zipkin.clone();
        let consumer = Arc::clone(&consumer);
        let shutdown = shutdown.clone();
        servers.spawn(async move { zipkin::serve(&options, consumer, shutdown).await });
    }
    {
        let options = config.admin.clone();
        let router = health::admin_router(health.clone());
        let shutdown = shutdown.clone();
        servers.spawn(async move { serve_admin(&options, router, shutdown).await });
    }

    health.set_ready();
    info!("collector ready");

    let outcome: Result<()> = tokio::select! {
        _ = shutdown.cancelled() => Ok(()),
        Some(joined) = servers.join_next() => {
            // A front-end died while we were supposed to be serving.
            health.set_unavailable();
            match joined {
                Ok(Ok(())) => Err(anyhow!("server task exited unexpectedly")),
                Ok(Err(err)) => Err(err),
                Err(err) => Err(err.into()),
            }
        }
    };

    shutdown.cancel();
    while let Some(joined) = servers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!(error = %err, "server error during shutdown"),
            Err(err) => error!(error = %err, "server task panicked"),
        }
    }

    processor
        .close()
        .await
        .context("failed to close processing pipeline")?;
    health.set_stopped();
    info!("collector shutdown complete");
    outcome
}

async fn serve_admin(
    options: &AdminOptions,
    router: Router,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr: SocketAddr = options
        .host_port
        .parse()
        .with_context(|| format!("invalid admin host_port {:?}", options.host_port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind admin listener on {addr}"))?;
    info!("admin endpoint listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("admin server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
