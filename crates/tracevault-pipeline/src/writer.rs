use async_trait::async_trait;

use tracevault_model::Span;

/// Destination for processed spans. The in-memory trace store implements
/// this; production deployments plug in a remote-storage client instead.
#[async_trait]
pub trait SpanWriter: Send + Sync {
    async fn write_span(&self, span: &Span, tenant: &str) -> anyhow::Result<()>;

    /// Flush and release resources. Called once during pipeline shutdown.
    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Discards everything. Useful in tests and as a wiring placeholder.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSpanWriter;

#[async_trait]
impl SpanWriter for NoopSpanWriter {
    async fn write_span(&self, _span: &Span, _tenant: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
