//! The runtime driver: wires the coordinator, worker pool, and sandbox
//! pool together and drives one run to quiescence.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// Layer 2: Third-party crate imports
use dashmap::DashMap;

// Layer 3: Internal module imports
use crate::actor::{ActorRecord, ActorState};
use crate::coordinator::Coordinator;
use crate::diagnostics;
use crate::message::signal_channel;
use crate::message::Signal;
use crate::runqueue::RunQueue;
use crate::sandbox::{NativeSandbox, Sandbox, ScriptRegistry, SandboxPool};
use crate::system::config::SystemConfig;
use crate::system::errors::RuntimeError;
use crate::util::{ActorId, ActorIdAllocator, ScriptRef};
use crate::worker;

/// Summary of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub total_actors_spawned: u64,
}

/// Owns the long-lived, per-run resources and drives one `run` end to end.
pub struct RuntimeDriver {
    config: SystemConfig,
    registry: Arc<ScriptRegistry>,
}

impl RuntimeDriver {
    pub fn new(config: SystemConfig, registry: Arc<ScriptRegistry>) -> Self {
        Self { config, registry }
    }

    /// Spawn `root_script` as the initial actor and run until every actor
    /// has terminated and been reclaimed, or the configured timeout
    /// elapses first.
    pub fn run(&self, root_script: ScriptRef) -> Result<RunReport, RuntimeError> {
        if self.registry.lookup(&root_script).is_none() {
            return Err(RuntimeError::ScriptNotFound(root_script));
        }

        let run_queue = RunQueue::new();
        let sandbox_pool = Arc::new(SandboxPool::new());
        let (signal_tx, signal_rx) = signal_channel();
        let actors: Arc<DashMap<ActorId, Arc<ActorRecord>>> = Arc::new(DashMap::new());
        let id_alloc = Arc::new(ActorIdAllocator::new());
        let live_actor_count = Arc::new(AtomicU64::new(0));

        let worker_count = self.config.resolved_worker_count();
        {
            let registry = Arc::clone(&self.registry);
            sandbox_pool.prewarm(worker_count, move || {
                Box::new(NativeSandbox::new(Arc::clone(&registry))) as Box<dyn Sandbox>
            });
        }
        diagnostics::print_system(&format!(
            "Starting actor system with {worker_count} worker thread(s)"
        ));

        let mut coordinator = Coordinator::new(
            Arc::clone(&actors),
            Arc::clone(&id_alloc),
            run_queue.clone(),
            Arc::clone(&sandbox_pool),
            Arc::clone(&self.registry),
            signal_rx,
            signal_tx.clone(),
            Arc::clone(&live_actor_count),
        );

        diagnostics::print_system(&format!("Spawning initial parent actor: {root_script}"));
        coordinator.spawn_root(root_script);

        let coordinator_thread = thread::spawn(move || coordinator.run());

        let worker_threads: Vec<_> = (0..worker_count)
            .map(|id| {
                let rq = run_queue.clone();
                thread::spawn(move || worker::run(id, rq))
            })
            .collect();

        let result = self.wait_for_quiescence(&live_actor_count, &actors);
        if result.is_ok() {
            diagnostics::print_system("All actors completed!");
        }

        // Shutdown proceeds regardless of outcome: even a timed-out run
        // drains in-flight output and joins every thread before exiting.
        let _ = signal_tx.send(Signal::Shutdown);
        let _ = coordinator_thread.join();

        for _ in 0..worker_count {
            run_queue.post_shutdown_sentinel();
        }
        for handle in worker_threads {
            let _ = handle.join();
        }

        let total_actors_spawned = id_alloc.allocated_count();
        diagnostics::print_system(&format!(
            "All workers completed! Total actors spawned: {total_actors_spawned}"
        ));
        diagnostics::print_system("Cleanup complete!");

        result?;

        Ok(RunReport {
            total_actors_spawned,
        })
    }

    /// Poll `live_actor_count` until it reaches zero, logging a periodic
    /// liveness diagnostic and enforcing the configured timeout.
    fn wait_for_quiescence(
        &self,
        live_actor_count: &Arc<AtomicU64>,
        actors: &Arc<DashMap<ActorId, Arc<ActorRecord>>>,
    ) -> Result<(), RuntimeError> {
        diagnostics::print_system("Waiting for all actors to complete...");
        let deadline = self.config.timeout.map(|d| Instant::now() + d);
        let mut elapsed_since_log = Duration::ZERO;

        loop {
            if live_actor_count.load(Ordering::SeqCst) == 0 {
                return Ok(());
            }

            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    diagnostics::print_system("Timeout exceeded, aborting");
                    return Err(RuntimeError::TimedOut);
                }
            }

            thread::sleep(self.config.poll_interval);
            elapsed_since_log += self.config.poll_interval;

            if elapsed_since_log >= self.config.liveness_log_interval {
                elapsed_since_log = Duration::ZERO;
                self.log_non_dead_actors(actors);
            }
        }
    }

    fn log_non_dead_actors(&self, actors: &Arc<DashMap<ActorId, Arc<ActorRecord>>>) {
        let non_dead: Vec<String> = actors
            .iter()
            .filter(|entry| entry.value().state() != ActorState::Dead)
            .map(|entry| format!("{}:{:?}", entry.key(), entry.value().state()))
            .collect();
        diagnostics::print_system(&format!("Still waiting on actors: [{}]", non_dead.join(", ")));
    }
}
