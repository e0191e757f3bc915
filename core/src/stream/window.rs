//! In-flight window for the compression pipeline.
//!
//! One token per chunk, taken by the reader before it reads the chunk and
//! returned once that chunk's frame is on the wire (or the chunk is dropped
//! after an abort). Queued, encoding, and parked frames together never
//! exceed the window capacity.

use std::sync::Mutex;

use crossbeam::channel::{bounded, Receiver, Sender};
use crossbeam::select;

#[derive(Debug)]
pub struct InflightWindow {
    tokens_tx: Sender<()>,
    tokens_rx: Receiver<()>,
    // Dropping the sender disconnects `abort_rx`, which wakes a blocked `acquire`.
    abort_tx: Mutex<Option<Sender<()>>>,
    abort_rx: Receiver<()>,
    capacity: usize,
}

impl InflightWindow {
    /// Window admitting `capacity` chunks at once (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tokens_tx, tokens_rx) = bounded(capacity);
        for _ in 0..capacity {
            // Cannot fail: the channel was just sized for exactly this many.
            let _ = tokens_tx.try_send(());
        }
        let (abort_tx, abort_rx) = bounded(0);
        Self {
            tokens_tx,
            tokens_rx,
            abort_tx: Mutex::new(Some(abort_tx)),
            abort_rx,
            capacity,
        }
    }

    /// Take a token, suspending while the window is full.
    ///
    /// Returns `false` once the run is aborted.
    pub fn acquire(&self) -> bool {
        if self.is_aborted() {
            return false;
        }
        select! {
            recv(self.tokens_rx) -> token => token.is_ok() && !self.is_aborted(),
            recv(self.abort_rx) -> _ => false,
        }
    }

    /// Return `n` tokens.
    pub fn release(&self, n: usize) {
        for _ in 0..n {
            if self.tokens_tx.try_send(()).is_err() {
                log::error!("[WINDOW] released more tokens than were taken");
                break;
            }
        }
    }

    /// Stop admitting chunks and wake a reader blocked in `acquire`. Idempotent.
    pub fn abort(&self) {
        if let Ok(mut guard) = self.abort_tx.lock() {
            guard.take();
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.abort_tx.lock().map(|g| g.is_none()).unwrap_or(true)
    }

    /// Tokens currently held by chunks.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.tokens_rx.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
