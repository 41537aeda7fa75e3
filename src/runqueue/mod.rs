//! Multi-producer, multi-consumer FIFO of actors ready to tick.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use crossbeam_channel::{Receiver, Sender};

// Layer 3: Internal module imports
use crate::actor::ActorRecord;

/// An item placed on the run queue: either an actor ready to tick, or the
/// sentinel a worker should exit on.
#[derive(Clone)]
pub enum WorkItem {
    Actor(Arc<ActorRecord>),
    Shutdown,
}

/// The run queue. Cloning shares the same underlying channel — every
/// worker and the coordinator hold a clone of both halves.
#[derive(Clone)]
pub struct RunQueue {
    tx: Sender<WorkItem>,
    rx: Receiver<WorkItem>,
}

impl RunQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Enqueue an actor. Callers must have already set the actor's state
    /// to `Ready` before calling this.
    pub fn enqueue(&self, actor: Arc<ActorRecord>) {
        let _ = self.tx.send(WorkItem::Actor(actor));
    }

    /// Post one shutdown sentinel, consumed by exactly one worker.
    pub fn post_shutdown_sentinel(&self) {
        let _ = self.tx.send(WorkItem::Shutdown);
    }

    /// Blocking pop, used by worker threads.
    pub fn pop_blocking(&self) -> Option<WorkItem> {
        self.rx.recv().ok()
    }
}

impl Default for RunQueue {
    fn default() -> Self {
        Self::new()
    }
}
