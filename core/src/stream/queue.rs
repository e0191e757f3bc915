//! Work queue between the chunk producer and the worker pool.
//!
//! A bounded FIFO over a crossbeam channel. The queue owns the only
//! long-lived sender, so `close` disconnects the channel: every consumer
//! blocked in `pop` wakes, drains what is left, then sees `None`.

use std::sync::Mutex;

use crossbeam::channel::{bounded, Receiver, Sender};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("push on a closed work queue")]
    Closed,
    #[error("work queue lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
pub struct WorkQueue<T> {
    tx: Mutex<Option<Sender<T>>>,
    rx: Receiver<T>,
    capacity: usize,
}

impl<T> WorkQueue<T> {
    /// Queue holding at most `capacity` pending items (minimum 1).
    pub fn bounded(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = bounded(capacity);
        Self {
            tx: Mutex::new(Some(tx)),
            rx,
            capacity,
        }
    }

    /// Append to the tail, suspending while the queue is full.
    ///
    /// The lock only guards the sender handle, so a blocked push never
    /// holds it and `close` can always proceed.
    pub fn push(&self, item: T) -> Result<(), QueueError> {
        let tx = {
            let guard = self.tx.lock().map_err(|_| QueueError::Poisoned)?;
            guard.as_ref().cloned().ok_or(QueueError::Closed)?
        };
        tx.send(item).map_err(|_| QueueError::Closed)
    }

    /// Take the head, suspending until an item arrives or the queue is
    /// closed and empty. `None` tells the worker to terminate.
    pub fn pop(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Mark the queue closed. Idempotent; wakes every waiting consumer.
    pub fn close(&self) -> Result<(), QueueError> {
        let mut guard = self.tx.lock().map_err(|_| QueueError::Poisoned)?;
        if guard.take().is_some() {
            log::debug!("[QUEUE] closed with {} pending", self.rx.len());
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.tx.lock().map(|g| g.is_none()).unwrap_or(true)
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
