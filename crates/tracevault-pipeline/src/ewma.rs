use std::sync::atomic::{AtomicU64, Ordering};

/// Exponentially weighted moving average of span byte sizes.
///
/// The value is stored as f64 bits in an atomic so updates on the submit
/// path never take a lock. With alpha = 0.2 the window covers roughly the
/// last hundred accepted spans.
#[derive(Debug, Default)]
pub struct SpanSizeEwma {
    bits: AtomicU64,
}

const ALPHA: f64 = 0.2;

impl SpanSizeEwma {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, size_bytes: usize) {
        let size = size_bytes as f64;
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let current = f64::from_bits(bits);
                let next = if current == 0.0 {
                    size
                } else {
                    current * (1.0 - ALPHA) + size * ALPHA
                };
                Some(next.to_bits())
            });
    }

    /// Current average, or zero when nothing has been recorded yet.
    pub fn average(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_seeds_the_average() {
        let ewma = SpanSizeEwma::new();
        assert_eq!(ewma.average(), 0.0);
        ewma.record(100);
        assert_eq!(ewma.average(), 100.0);
    }

    #[test]
    fn average_tracks_recent_sizes() {
        let ewma = SpanSizeEwma::new();
        ewma.record(100);
        for _ in 0..100 {
            ewma.record(500);
        }
        let avg = ewma.average();
        assert!(avg > 490.0 && avg <= 500.0, "avg = {avg}");
    }
}
