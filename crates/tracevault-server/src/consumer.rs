use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use tracevault_model::{KeyValue, TraceBatch};
use tracevault_pipeline::{PipelineError, SpanProcessor};
use tracevault_tenancy::{TenancyError, TenancyManager};

/// Front-end-facing ingestion entry point: tenancy validation, process
/// fill-in, collector tags, then pipeline submission.
pub struct BatchConsumer {
    processor: Arc<SpanProcessor>,
    tenancy: TenancyManager,
    collector_tags: Vec<KeyValue>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsumeError {
    #[error(transparent)]
    Tenancy(#[from] TenancyError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl BatchConsumer {
    pub fn new(
        processor: Arc<SpanProcessor>,
        tenancy: TenancyManager,
        collector_tags: Vec<KeyValue>,
    ) -> Self {
        Self {
            processor,
            tenancy,
            collector_tags,
        }
    }

    pub fn tenancy(&self) -> &TenancyManager {
        &self.tenancy
    }

    /// Validates the tenant header values, prepares the batch, and submits
    /// it. Returns the pipeline's per-span admission vector.
    pub async fn consume<'a, I>(
        &self,
        tenant_values: I,
        batch: TraceBatch,
    ) -> Result<Vec<bool>, ConsumeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tenant = self.tenancy.extract_from(tenant_values)?;
        let transport = batch.transport();
        let format = batch.format();
        let batch = batch.with_tenant(tenant.clone());

        let batch_process = batch.process().cloned();
        let (mut spans, _) = batch.into_v1_spans();
        for span in &mut spans {
            // Spans without their own process inherit the batch-level one.
            if span.process.service_name.is_empty() && span.process.tags.is_empty() {
                if let Some(process) = &batch_process {
                    span.process = process.clone();
                }
            }
            // Collector tags are appended once; span-provided keys win.
            for tag in &self.collector_tags {
                if !span.process.tags.iter().any(|t| t.key == tag.key) {
                    span.process.tags.push(tag.clone());
                }
            }
        }

        debug!(
            spans = spans.len(),
            transport = transport.as_str(),
            format = format.as_str(),
            tenant = %tenant,
            "consuming batch"
        );
        // The validated tenant also travels as an ambient context value for
        // pre-save hooks and outgoing calls.
        let oks = tracevault_tenancy::with_tenant(
            tenant.clone(),
            self.processor.process_spans(spans, &tenant, transport, format),
        )
        .await?;
        Ok(oks)
    }
}
