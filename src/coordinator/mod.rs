//! The coordinator: the single-threaded consumer of the signal channel,
//! exclusive writer of actor state, mailboxes, the spawn correlation
//! table, and the pending-messages table.

// Layer 1: Standard library imports
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use crossbeam_channel::TryRecvError;
use dashmap::DashMap;

// Layer 3: Internal module imports
use crate::actor::{ActorRecord, ActorState};
use crate::diagnostics;
use crate::message::{decode_line, Signal, SignalReceiver, SignalSender};
use crate::runqueue::RunQueue;
use crate::sandbox::{NativeSandbox, ScriptRegistry, Sandbox, SandboxPool};
use crate::util::{ActorId, ActorIdAllocator, RequestId, ScriptRef};

/// How long the coordinator sleeps between empty polls of the signal
/// channel. Short enough to stay responsive, long enough to yield the
/// core to worker threads (mirrors the original's `time.sleep(0.000001)`).
const IDLE_POLL_INTERVAL: Duration = Duration::from_micros(50);

/// Exclusive owner of the correlation tables and the only writer of actor
/// state on the ingress path.
pub struct Coordinator {
    actors: Arc<DashMap<ActorId, Arc<ActorRecord>>>,
    id_alloc: Arc<ActorIdAllocator>,
    run_queue: RunQueue,
    sandbox_pool: Arc<SandboxPool>,
    registry: Arc<ScriptRegistry>,
    signal_rx: SignalReceiver,
    signal_tx: SignalSender,
    live_actor_count: Arc<AtomicU64>,

    spawn_requests: HashMap<RequestId, ActorId>,
    pending_messages: HashMap<RequestId, Vec<Vec<u8>>>,
    reclaimed: HashSet<ActorId>,
}

impl Coordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        actors: Arc<DashMap<ActorId, Arc<ActorRecord>>>,
        id_alloc: Arc<ActorIdAllocator>,
        run_queue: RunQueue,
        sandbox_pool: Arc<SandboxPool>,
        registry: Arc<ScriptRegistry>,
        signal_rx: SignalReceiver,
        signal_tx: SignalSender,
        live_actor_count: Arc<AtomicU64>,
    ) -> Self {
        Self {
            actors,
            id_alloc,
            run_queue,
            sandbox_pool,
            registry,
            signal_rx,
            signal_tx,
            live_actor_count,
            spawn_requests: HashMap::new(),
            pending_messages: HashMap::new(),
            reclaimed: HashSet::new(),
        }
    }

    /// Spawn the root actor directly — there is no parent sandbox to emit
    /// a `SPAWN` signal for it.
    pub fn spawn_root(&mut self, script_ref: ScriptRef) -> ActorId {
        let actor = self.create_actor(None, script_ref);
        let id = actor.id();
        self.run_queue.enqueue(actor);
        id
    }

    fn create_actor(&mut self, parent_id: Option<ActorId>, script_ref: ScriptRef) -> Arc<ActorRecord> {
        let new_id = self.id_alloc.next();
        let registry = Arc::clone(&self.registry);
        let sandbox = self
            .sandbox_pool
            .acquire_or_else(|| Box::new(NativeSandbox::new(registry)) as Box<dyn Sandbox>);

        let actor = Arc::new(ActorRecord::new(new_id, script_ref.clone(), parent_id, sandbox));

        if let Some(mut sandbox) = actor.take_sandbox() {
            sandbox.bootstrap(
                new_id,
                script_ref,
                Arc::clone(actor.mailbox()),
                self.signal_tx.clone(),
            );
            actor.put_sandbox(sandbox);
        }

        self.actors.insert(new_id, Arc::clone(&actor));
        self.live_actor_count.fetch_add(1, Ordering::SeqCst);
        actor
    }

    /// Run until a `SHUTDOWN` signal is processed.
    pub fn run(mut self) -> Self {
        loop {
            match self.signal_rx.try_recv() {
                Ok(signal) => {
                    if !self.process_signal(signal) {
                        break;
                    }
                }
                Err(TryRecvError::Empty) => {
                    self.reclaim_dead_actors();
                    std::thread::sleep(IDLE_POLL_INTERVAL);
                }
                Err(TryRecvError::Disconnected) => break,
            }
        }
        self.report_discarded_pending_messages();
        self
    }

    fn process_signal(&mut self, signal: Signal) -> bool {
        match signal {
            Signal::Spawn {
                actor_id,
                request_id,
                script_ref,
            } => {
                self.handle_spawn(actor_id, request_id, script_ref);
                true
            }
            Signal::Cast {
                request_id, payload, ..
            } => {
                self.handle_cast(request_id, payload);
                true
            }
            Signal::Print { line, .. } => {
                self.handle_print(line);
                true
            }
            Signal::Blocked { actor_id } => {
                self.handle_blocked(actor_id);
                true
            }
            Signal::Shutdown => {
                self.drain_remaining_prints();
                false
            }
        }
    }

    fn handle_spawn(&mut self, parent_actor_id: ActorId, request_id: RequestId, script_ref: ScriptRef) {
        diagnostics::print_system(&format!(
            "Processing SPAWN from actor {parent_actor_id}: {script_ref}"
        ));
        diagnostics::print_system(&format!("SPAWN request_id: {request_id}"));

        let actor = self.create_actor(Some(parent_actor_id), script_ref.clone());
        let new_id = actor.id();

        self.spawn_requests.insert(request_id, new_id);
        diagnostics::print_system(&format!("Registered request_id {request_id} -> actor {new_id}"));

        if let Some(messages) = self.pending_messages.remove(&request_id) {
            diagnostics::print_system(&format!(
                "Delivering {} pending message(s) to actor {new_id}",
                messages.len()
            ));
            for message in messages {
                actor.mailbox().push(message);
            }
        }

        diagnostics::print_system(&format!(
            "Spawned actor {new_id} ({script_ref}) (parent was actor {parent_actor_id})"
        ));
        self.run_queue.enqueue(actor);
    }

    fn handle_cast(&mut self, request_id: RequestId, payload: Vec<u8>) {
        let target_id = match self.spawn_requests.get(&request_id) {
            Some(&id) => id,
            None => {
                diagnostics::print_system(&format!(
                    "actor not yet created for request_id {request_id}, queueing message"
                ));
                self.pending_messages.entry(request_id).or_default().push(payload);
                return;
            }
        };

        let actor = match self.actors.get(&target_id) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                diagnostics::print_system(&format!("ERROR: actor {target_id} not found"));
                return;
            }
        };

        if actor.state() == ActorState::Dead {
            diagnostics::print_system(&format!(
                "WARNING: message delivered to dead actor {target_id}, dropped"
            ));
            return;
        }

        actor.mailbox().push(payload);

        if actor.wake_if_blocked() {
            self.run_queue.enqueue(actor);
        }
        // Ready or Running: leave it, the next tick (or its level-triggered
        // recheck) will observe the message.
    }

    fn handle_print(&mut self, line: Vec<u8>) {
        if let Ok(decoded) = decode_line(&line) {
            diagnostics::print_actor_line(&decoded);
        }
    }

    fn handle_blocked(&mut self, actor_id: ActorId) {
        if let Some(actor) = self.actors.get(&actor_id) {
            // Advisory: a concurrent CAST may already have
            // moved this actor back to Ready; the worker's level-triggered
            // recheck is what actually prevents stranding.
            if actor.state() != ActorState::Dead {
                actor.set_state(ActorState::Blocked);
            }
        }
    }

    fn drain_remaining_prints(&mut self) {
        while let Ok(signal) = self.signal_rx.try_recv() {
            if let Signal::Print { line, .. } = signal {
                self.handle_print(line);
            }
        }
    }

    /// Deferred sandbox reclamation: only when the signal
    /// channel is momentarily empty do we reset and pool (or destroy) the
    /// sandboxes of actors a worker has already marked `Dead`.
    fn reclaim_dead_actors(&mut self) {
        let newly_dead: Vec<Arc<ActorRecord>> = self
            .actors
            .iter()
            .filter(|entry| entry.value().state() == ActorState::Dead && !self.reclaimed.contains(entry.key()))
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        if newly_dead.is_empty() {
            return;
        }

        diagnostics::print_system(&format!(
            "Processing deferred cleanup for {} actor(s)",
            newly_dead.len()
        ));

        for actor in newly_dead {
            self.reclaimed.insert(actor.id());
            if let Some(mut sandbox) = actor.take_sandbox() {
                match sandbox.reset() {
                    Ok(()) => {
                        self.sandbox_pool.release(sandbox);
                        diagnostics::print_system(&format!(
                            "Cleaned up actor {} and returned sandbox to pool",
                            actor.id()
                        ));
                    }
                    Err(err) => {
                        diagnostics::print_system(&format!(
                            "Error cleaning actor {} for reuse: {err}",
                            actor.id()
                        ));
                        sandbox.destroy();
                    }
                }
            }
            self.live_actor_count.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn report_discarded_pending_messages(&self) {
        if !self.pending_messages.is_empty() {
            diagnostics::print_system(&format!(
                "Discarding {} pending message group(s) for request ids with no SPAWN ever processed",
                self.pending_messages.len()
            ));
        }
    }
}
