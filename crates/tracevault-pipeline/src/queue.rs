use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::PipelineError;

/// A FIFO queue with a mutable capacity bound.
///
/// Capacity is advisory state next to the buffer rather than a property of
/// the allocation, which is what lets the dynamic sizing swap it atomically
/// without moving the queued items. Shrinking below the current length keeps
/// the already-enqueued items; the bound re-applies as they drain.
pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    capacity: AtomicUsize,
    closed: AtomicBool,
    space_available: Notify,
    item_available: Notify,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            capacity: AtomicUsize::new(capacity.max(1)),
            closed: AtomicBool::new(false),
            space_available: Notify::new(),
            item_available: Notify::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Replaces the capacity bound. Producers blocked on a full queue are
    /// woken so they can re-check against the new bound.
    pub fn set_capacity(&self, capacity: usize) {
        self.capacity.store(capacity.max(1), Ordering::Release);
        self.space_available.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Enqueue attempt that hands the item back on failure.
    fn offer(&self, item: T) -> Result<(), (T, PipelineError)> {
        if self.is_closed() {
            return Err((item, PipelineError::Closed));
        }
        {
            let mut items = self.items.lock();
            if items.len() >= self.capacity() {
                return Err((item, PipelineError::QueueFull));
            }
            items.push_back(item);
        }
        self.item_available.notify_one();
        Ok(())
    }

    /// Non-blocking enqueue.
    pub fn try_push(&self, item: T) -> Result<(), PipelineError> {
        self.offer(item).map_err(|(_, err)| err)
    }

    /// Blocking enqueue: waits for space, subject to cancellation.
    pub async fn push(&self, item: T, cancel: &CancellationToken) -> Result<(), PipelineError> {
        let mut item = item;
        loop {
            match self.offer(item) {
                Ok(()) => return Ok(()),
                Err((back, PipelineError::QueueFull)) => {
                    item = back;
                }
                Err((_, err)) => return Err(err),
            }
            tokio::select! {
                _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
                _ = self.space_available.notified() => {}
            }
        }
    }

    /// Dequeues the next item, waiting for one to arrive. Returns `None`
    /// once the queue is closed and fully drained.
    pub async fn pop(&self) -> Option<T> {
        loop {
            {
                let mut items = self.items.lock();
                if let Some(item) = items.pop_front() {
                    drop(items);
                    self.space_available.notify_one();
                    return Some(item);
                }
            }
            if self.is_closed() {
                return None;
            }
            self.item_available.notified().await;
        }
    }

    /// Stops intake. Queued items remain poppable; blocked producers and
    /// consumers are woken.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.space_available.notify_waiters();
        self.item_available.notify_waiters();
    }
}
