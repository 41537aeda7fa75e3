//! Bounded reservoir of reusable sandboxes.

// Layer 2: Third-party crate imports
use crossbeam_channel::{Receiver, Sender};

// Layer 3: Internal module imports
use super::traits::Sandbox;

/// Thread-safe FIFO of idle, reset sandboxes ready for reuse.
///
/// Producers: the coordinator (after deferred reclamation, §4.3) and
/// startup pre-warming. Consumers: the coordinator, on `SPAWN`.
pub struct SandboxPool {
    tx: Sender<Box<dyn Sandbox>>,
    rx: Receiver<Box<dyn Sandbox>>,
}

impl SandboxPool {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Pre-populate with `count` freshly constructed sandboxes, one per
    /// hardware thread at startup.
    pub fn prewarm(&self, count: usize, factory: impl Fn() -> Box<dyn Sandbox>) {
        for _ in 0..count {
            self.release(factory());
        }
    }

    /// Take a sandbox from the pool, or construct a fresh one if empty
    /// (pool first, then fresh).
    pub fn acquire_or_else(&self, fresh: impl FnOnce() -> Box<dyn Sandbox>) -> Box<dyn Sandbox> {
        match self.rx.try_recv() {
            Ok(sandbox) => sandbox,
            Err(_) => fresh(),
        }
    }

    /// Return a reset sandbox to the pool.
    pub fn release(&self, sandbox: Box<dyn Sandbox>) {
        let _ = self.tx.send(sandbox);
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SandboxPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{NativeSandbox, ScriptRegistry};
    use std::sync::Arc;

    fn dummy() -> Box<dyn Sandbox> {
        Box::new(NativeSandbox::new(Arc::new(ScriptRegistry::new())))
    }

    #[test]
    fn prewarm_populates_pool() {
        let pool = SandboxPool::new();
        pool.prewarm(3, dummy);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn acquire_drains_pool_before_constructing_fresh() {
        let pool = SandboxPool::new();
        pool.prewarm(1, dummy);
        let mut built_fresh = false;
        let _s1 = pool.acquire_or_else(|| {
            built_fresh = true;
            dummy()
        });
        assert!(!built_fresh);
        assert!(pool.is_empty());

        let _s2 = pool.acquire_or_else(|| {
            built_fresh = true;
            dummy()
        });
        assert!(built_fresh);
    }

    #[test]
    fn released_sandbox_is_reused() {
        let pool = SandboxPool::new();
        pool.release(dummy());
        assert_eq!(pool.len(), 1);
        let _ = pool.acquire_or_else(dummy);
        assert!(pool.is_empty());
    }
}
