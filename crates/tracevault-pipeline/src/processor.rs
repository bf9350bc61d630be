use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use tracevault_model::{InboundTransport, Span, SpanFormat};

use crate::queue::BoundedQueue;
use crate::sanitizer::{sanitize_chain, Sanitizer};
use crate::writer::SpanWriter;
use crate::{PipelineError, SpanSizeEwma};

/// Predicate deciding whether a span is admitted; rejected spans are counted
/// and reported through the dropped-span hook.
pub type SpanFilter = Arc<dyn Fn(&Span) -> bool + Send + Sync>;

/// Invoked for every span right before it is handed to the writer.
pub type PreSaveHook = Arc<dyn Fn(&Span, &str) + Send + Sync>;

/// Invoked for every span the filter rejected.
pub type DroppedSpanHook = Arc<dyn Fn(&Span) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Worker tasks draining the queue.
    pub num_workers: usize,
    /// Queue capacity in spans when dynamic sizing is off; the initial
    /// capacity otherwise.
    pub queue_size: usize,
    /// Memory budget in bytes for dynamic queue sizing; 0 disables it.
    pub dyn_queue_size_memory: u64,
    /// Floor for the dynamically computed capacity.
    pub min_queue_size: usize,
    /// Wait for space instead of failing with QueueFull.
    pub blocking_submit: bool,
    /// Gates the per-span byte-size histogram.
    pub span_size_metrics_enabled: bool,
    /// Cadence of the dynamic capacity recomputation.
    pub resize_interval: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            num_workers: 50,
            queue_size: 2000,
            dyn_queue_size_memory: 0,
            min_queue_size: 200,
            blocking_submit: false,
            span_size_metrics_enabled: false,
            resize_interval: Duration::from_secs(60),
        }
    }
}

struct QueueItem {
    span: Span,
    tenant: Arc<str>,
}

/// The bounded processing pipeline: a queue, a worker pool, and the hooks
/// the workers run for each span.
pub struct SpanProcessor {
    config: ProcessorConfig,
    queue: Arc<BoundedQueue<QueueItem>>,
    writer: Arc<dyn SpanWriter>,
    filter: Option<SpanFilter>,
    on_dropped: Option<DroppedSpanHook>,
    ewma: Arc<SpanSizeEwma>,
    cancel: CancellationToken,
    workers: Mutex<Vec<JoinHandle<()>>>,
    background: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

pub struct SpanProcessorBuilder {
    config: ProcessorConfig,
    sanitizers: Vec<Sanitizer>,
    filter: Option<SpanFilter>,
    pre_save: Option<PreSaveHook>,
    on_dropped: Option<DroppedSpanHook>,
}

impl SpanProcessorBuilder {
    pub fn sanitizers(mut self, sanitizers: Vec<Sanitizer>) -> Self {
        self.sanitizers = sanitizers;
        self
    }

    pub fn filter(mut self, filter: SpanFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn pre_save(mut self, hook: PreSaveHook) -> Self {
        self.pre_save = Some(hook);
        self
    }

    pub fn on_dropped(mut self, hook: DroppedSpanHook) -> Self {
        self.on_dropped = Some(hook);
        self
    }

    /// Spawns the worker pool (and the resize tick when a memory budget is
    /// configured). Must run inside a tokio runtime.
    pub fn build(self, writer: Arc<dyn SpanWriter>) -> Arc<SpanProcessor> {
        let queue = Arc::new(BoundedQueue::new(self.config.queue_size));
        let ewma = Arc::new(SpanSizeEwma::new());
        let cancel = CancellationToken::new();

        let processor = Arc::new(SpanProcessor {
            config: self.config,
            queue: Arc::clone(&queue),
            writer: Arc::clone(&writer),
            filter: self.filter,
            on_dropped: self.on_dropped,
            ewma: Arc::clone(&ewma),
            cancel: cancel.clone(),
            workers: Mutex::new(Vec::new()),
            background: Mutex::new(None),
            closed: AtomicBool::new(false),
        });

        let mut workers = Vec::with_capacity(processor.config.num_workers);
        for _ in 0..processor.config.num_workers {
            let queue = Arc::clone(&queue);
            let writer = Arc::clone(&writer);
            let sanitizers = self.sanitizers.clone();
            let pre_save = self.pre_save.clone();
            workers.push(tokio::spawn(run_worker(queue, writer, sanitizers, pre_save)));
        }
        *processor.workers.lock() = workers;

        if processor.config.dyn_queue_size_memory > 0 {
            let task = tokio::spawn(run_resize_tick(
                Arc::clone(&processor),
                cancel,
                processor.config.resize_interval,
            ));
            *processor.background.lock() = Some(task);
        }

        processor
    }
}

impl SpanProcessor {
    pub fn builder(config: ProcessorConfig) -> SpanProcessorBuilder {
        SpanProcessorBuilder {
            config,
            sanitizers: crate::sanitizer::default_sanitizers(),
            filter: None,
            pre_save: None,
            on_dropped: None,
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Submits a batch of spans. The returned vector carries one admission
    /// bit per span in batch order; filter-rejected spans come back `false`.
    /// A full queue fails the whole batch with `QueueFull` in non-blocking
    /// mode, or waits for space in blocking mode.
    pub async fn process_spans(
        &self,
        spans: Vec<Span>,
        tenant: &str,
        transport: InboundTransport,
        format: SpanFormat,
    ) -> Result<Vec<bool>, PipelineError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PipelineError::Closed);
        }

        counter!(
            "tracevault.pipeline.spans.received",
            spans.len() as u64,
            "format" => format.as_str(),
            "transport" => transport.as_str()
        );

        let tenant: Arc<str> = Arc::from(tenant);
        let mut oks = Vec::with_capacity(spans.len());
        for span in spans {
            let size = span.approx_size_bytes();
            if self.config.span_size_metrics_enabled {
                histogram!("tracevault.pipeline.span_size_bytes", size as f64);
            }

            if let Some(filter) = &self.filter {
                if !filter(&span) {
                    counter!("tracevault.pipeline.spans.rejected", 1, "format" => format.as_str());
                    debug!(
                        operation = %span.operation_name,
                        service = %span.process.service_name,
                        "span rejected by filter"
                    );
                    if let Some(hook) = &self.on_dropped {
                        hook(&span);
                    }
                    oks.push(false);
                    continue;
                }
            }

            let item = QueueItem {
                span,
                tenant: Arc::clone(&tenant),
            };
            let outcome = if self.config.blocking_submit {
                self.queue.push(item, &self.cancel).await
            } else {
                self.queue.try_push(item)
            };
            match outcome {
                Ok(()) => {
                    self.ewma.record(size);
                    counter!("tracevault.pipeline.spans.accepted", 1, "format" => format.as_str());
                    gauge!(
                        "tracevault.pipeline.queue_length",
                        self.queue.len() as f64
                    );
                    oks.push(true);
                }
                Err(PipelineError::QueueFull) => {
                    counter!("tracevault.pipeline.spans.dropped", 1, "format" => format.as_str());
                    return Err(PipelineError::QueueFull);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(oks)
    }

    /// Recomputes the queue capacity from the memory budget and the observed
    /// average span size. Applied only when the change is more than 10%.
    pub fn resize_now(&self) {
        if self.config.dyn_queue_size_memory == 0 {
            return;
        }
        let avg = self.ewma.average();
        if avg <= 0.0 {
            return;
        }
        let ideal = (self.config.dyn_queue_size_memory as f64 / avg) as usize;
        let new_capacity = ideal.max(self.config.min_queue_size);
        let current = self.queue.capacity();
        let change = (new_capacity as f64 - current as f64).abs() / current as f64;
        if change > 0.1 {
            info!(
                old_capacity = current,
                new_capacity,
                avg_span_bytes = avg as u64,
                "resizing span queue"
            );
            self.queue.set_capacity(new_capacity);
            gauge!("tracevault.pipeline.queue_capacity", new_capacity as f64);
        }
    }

    /// Stops intake, drains the workers, then closes the writer. Idempotent.
    pub async fn close(&self) -> anyhow::Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.queue.close();
        self.cancel.cancel();

        let workers: Vec<JoinHandle<()>> = self.workers.lock().drain(..).collect();
        for handle in workers {
            let _ = handle.await;
        }
        let background = self.background.lock().take();
        if let Some(task) = background {
            let _ = task.await;
        }
        self.writer.close().await
    }
}

async fn run_worker(
    queue: Arc<BoundedQueue<QueueItem>>,
    writer: Arc<dyn SpanWriter>,
    sanitizers: Vec<Sanitizer>,
    pre_save: Option<PreSaveHook>,
) {
    while let Some(item) = queue.pop().await {
        gauge!("tracevault.pipeline.queue_length", queue.len() as f64);
        let span = sanitize_chain(item.span, &sanitizers);
        if let Some(hook) = &pre_save {
            hook(&span, &item.tenant);
        }
        match writer.write_span(&span, &item.tenant).await {
            Ok(()) => {
                counter!("tracevault.pipeline.writes.ok", 1);
            }
            Err(err) => {
                counter!("tracevault.pipeline.writes.err", 1);
                error!(
                    error = %err,
                    service = %span.process.service_name,
                    "failed to write span"
                );
            }
        }
    }
}

async fn run_resize_tick(
    processor: Arc<SpanProcessor>,
    cancel: CancellationToken,
    interval: Duration,
) {
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick fires immediately; skip it so the EWMA has data.
    tick.tick().await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => processor.resize_now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::NoopSpanWriter;
    use async_trait::async_trait;
    use tracevault_model::{Process, SpanId, SpanKind, SpanStatus, TraceId};

    fn make_span(op: &str) -> Span {
        Span {
            trace_id: TraceId::from_high_low(0, 1),
            span_id: SpanId::from_u64(1),
            parent_span_id: None,
            operation_name: op.to_owned(),
            process: Process::new("svc"),
            start_time: 1,
            duration: 1,
            tags: vec![],
            logs: vec![],
            references: vec![],
            kind: SpanKind::Unspecified,
            status: SpanStatus::Unset,
            warnings: vec![],
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        written: Mutex<Vec<(String, String)>>,
        delay: Option<Duration>,
    }

    impl RecordingWriter {
        fn slow(delay: Duration) -> Self {
            Self {
                written: Mutex::new(Vec::new()),
                delay: Some(delay),
            }
        }

        fn written(&self) -> Vec<(String, String)> {
            self.written.lock().clone()
        }
    }

    #[async_trait]
    impl SpanWriter for RecordingWriter {
        async fn write_span(&self, span: &Span, tenant: &str) -> anyhow::Result<()> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.written
                .lock()
                .push((span.operation_name.clone(), tenant.to_owned()));
            Ok(())
        }
    }

    async fn wait_for<F: Fn() -> bool>(cond: F) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    fn config(num_workers: usize, queue_size: usize) -> ProcessorConfig {
        ProcessorConfig {
            num_workers,
            queue_size,
            ..ProcessorConfig::default()
        }
    }

    #[tokio::test]
    async fn accepted_spans_are_written_exactly_once() {
        let writer = Arc::new(RecordingWriter::default());
        let processor = SpanProcessor::builder(config(2, 16)).build(writer.clone());

        let spans = vec![make_span("a"), make_span("b"), make_span("c")];
        let oks = processor
            .process_spans(spans, "acme", InboundTransport::Grpc, SpanFormat::Proto)
            .await
            .unwrap();
        assert_eq!(oks, vec![true, true, true]);

        wait_for(|| writer.written().len() == 3).await;
        processor.close().await.unwrap();

        let mut ops: Vec<String> = writer.written().into_iter().map(|(op, _)| op).collect();
        ops.sort();
        assert_eq!(ops, vec!["a", "b", "c"]);
        assert!(writer.written().iter().all(|(_, t)| t == "acme"));
    }

    #[tokio::test]
    async fn overflow_fails_batch_with_queue_full() {
        // No workers: nothing drains the queue.
        let processor =
            SpanProcessor::builder(config(0, 1)).build(Arc::new(NoopSpanWriter));

        let first = processor
            .process_spans(
                vec![make_span("a")],
                "",
                InboundTransport::Grpc,
                SpanFormat::Proto,
            )
            .await
            .unwrap();
        assert_eq!(first, vec![true]);

        let second = processor
            .process_spans(
                vec![make_span("b")],
                "",
                InboundTransport::Grpc,
                SpanFormat::Proto,
            )
            .await;
        assert_eq!(second, Err(PipelineError::QueueFull));
    }

    #[tokio::test]
    async fn filtered_spans_report_false_and_are_not_written() {
        let writer = Arc::new(RecordingWriter::default());
        let dropped = Arc::new(Mutex::new(Vec::<String>::new()));
        let dropped_clone = Arc::clone(&dropped);

        let processor = SpanProcessor::builder(config(1, 16))
            .filter(Arc::new(|span: &Span| span.operation_name != "drop-me"))
            .on_dropped(Arc::new(move |span: &Span| {
                dropped_clone.lock().push(span.operation_name.clone());
            }))
            .build(writer.clone());

        let oks = processor
            .process_spans(
                vec![make_span("keep"), make_span("drop-me")],
                "",
                InboundTransport::Http,
                SpanFormat::Jaeger,
            )
            .await
            .unwrap();
        assert_eq!(oks, vec![true, false]);

        wait_for(|| writer.written().len() == 1).await;
        processor.close().await.unwrap();
        assert_eq!(writer.written()[0].0, "keep");
        assert_eq!(dropped.lock().clone(), vec!["drop-me".to_owned()]);
    }

    #[tokio::test]
    async fn blocking_submit_waits_for_drain() {
        let writer = Arc::new(RecordingWriter::slow(Duration::from_millis(10)));
        let mut cfg = config(1, 1);
        cfg.blocking_submit = true;
        let processor = SpanProcessor::builder(cfg).build(writer.clone());

        // Three spans through a single-slot queue with a slow writer: the
        // submission can only finish by waiting for space repeatedly.
        let oks = processor
            .process_spans(
                vec![make_span("a"), make_span("b"), make_span("c")],
                "",
                InboundTransport::Grpc,
                SpanFormat::Proto,
            )
            .await
            .unwrap();
        assert_eq!(oks.len(), 3);

        wait_for(|| writer.written().len() == 3).await;
        processor.close().await.unwrap();
    }

    #[tokio::test]
    async fn submissions_after_close_fail() {
        let processor =
            SpanProcessor::builder(config(1, 4)).build(Arc::new(NoopSpanWriter));
        processor.close().await.unwrap();
        let result = processor
            .process_spans(
                vec![make_span("late")],
                "",
                InboundTransport::Grpc,
                SpanFormat::Proto,
            )
            .await;
        assert_eq!(result, Err(PipelineError::Closed));
    }

    #[tokio::test]
    async fn close_drains_queued_spans() {
        let writer = Arc::new(RecordingWriter::slow(Duration::from_millis(5)));
        let processor = SpanProcessor::builder(config(1, 16)).build(writer.clone());
        processor
            .process_spans(
                (0..8).map(|i| make_span(&format!("s{i}"))).collect(),
                "",
                InboundTransport::Grpc,
                SpanFormat::Proto,
            )
            .await
            .unwrap();
        processor.close().await.unwrap();
        assert_eq!(writer.written().len(), 8);
    }

    #[tokio::test]
    async fn dynamic_resize_follows_span_size() {
        let mut cfg = config(1, 10);
        cfg.dyn_queue_size_memory = 1_000_000;
        cfg.min_queue_size = 5;
        let processor = SpanProcessor::builder(cfg).build(Arc::new(NoopSpanWriter));

        processor
            .process_spans(
                vec![make_span("sizing")],
                "",
                InboundTransport::Grpc,
                SpanFormat::Proto,
            )
            .await
            .unwrap();

        processor.resize_now();
        let capacity = processor.queue_capacity();
        assert!(capacity > 10, "capacity = {capacity}");
        processor.close().await.unwrap();
    }
}
