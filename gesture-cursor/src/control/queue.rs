//! Control Message Queue
//!
//! Lock-free SPSC queue from an outside thread (signal handler, voice or
//! hotkey front-end) into the control loop. The loop owns its session state
//! exclusively; other threads only ever talk to it through this queue.
//!
//! The queue is built on `rtrb`. A stop request additionally latches a shared
//! flag so it survives a full queue.

use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Default queue capacity
pub const DEFAULT_CAPACITY: usize = 64;

/// Requests an outside thread may send to the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlMessage {
    /// Resume gesture processing
    Enable,
    /// Suspend gesture processing; frames are treated as hand-less
    Disable,
    /// Finish the current frame, release any drag and return
    Stop,
}

/// Queue statistics
#[derive(Debug, Default)]
pub struct ControlStats {
    pub sent: AtomicU64,
    pub dropped: AtomicU64,
    pub received: AtomicU64,
}

/// Unsplit queue.
pub struct ControlQueue {
    producer: Producer<ControlMessage>,
    consumer: Consumer<ControlMessage>,
    stats: Arc<ControlStats>,
    stop: Arc<AtomicBool>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (producer, consumer) = RingBuffer::new(capacity);
        Self {
            producer,
            consumer,
            stats: Arc::new(ControlStats::default()),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Separate the sending half (for the outside thread) from the
    /// receiving half (for the control loop).
    pub fn split(self) -> (ControlSender, ControlReceiver) {
        (
            ControlSender {
                inner: self.producer,
                stats: Arc::clone(&self.stats),
                stop: Arc::clone(&self.stop),
            },
            ControlReceiver {
                inner: self.consumer,
                stats: self.stats,
                stop: self.stop,
            },
        )
    }

    pub fn stats(&self) -> Arc<ControlStats> {
        Arc::clone(&self.stats)
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending half.
pub struct ControlSender {
    inner: Producer<ControlMessage>,
    stats: Arc<ControlStats>,
    stop: Arc<AtomicBool>,
}

impl ControlSender {
    /// Enqueue a message without blocking. Returns false if the queue was
    /// full and the message dropped.
    pub fn send(&mut self, message: ControlMessage) -> bool {
        if message == ControlMessage::Stop {
            self.stop.store(true, Ordering::SeqCst);
        }
        match self.inner.push(message) {
            Ok(()) => {
                self.stats.sent.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    pub fn request_stop(&mut self) {
        self.send(ControlMessage::Stop);
    }
}

/// Receiving half, polled by the control loop between frames.
pub struct ControlReceiver {
    inner: Consumer<ControlMessage>,
    stats: Arc<ControlStats>,
    stop: Arc<AtomicBool>,
}

impl ControlReceiver {
    pub fn try_recv(&mut self) -> Option<ControlMessage> {
        let message = self.inner.pop().ok()?;
        self.stats.received.fetch_add(1, Ordering::Relaxed);
        Some(message)
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<ControlMessage> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Whether a stop was ever requested, even if its message was dropped.
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
