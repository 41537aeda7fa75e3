//! Worker loop: pop an actor, tick it once, classify the result,
//! optionally requeue.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 3: Internal module imports
use crate::actor::{ActorRecord, ActorState};
use crate::diagnostics::{self, timestamp};
use crate::runqueue::{RunQueue, WorkItem};
use crate::sandbox::TickOutcome;

/// Run the worker loop until a shutdown sentinel is popped.
pub fn run(worker_id: usize, run_queue: RunQueue) {
    loop {
        let item = match run_queue.pop_blocking() {
            Some(item) => item,
            None => break,
        };

        let actor = match item {
            WorkItem::Actor(actor) => actor,
            WorkItem::Shutdown => break,
        };

        tick_once(worker_id, &actor, &run_queue);
    }
}

/// Tick a single actor once and apply the resulting state transition.
/// Exposed separately from [`run`] so tests can drive one step at a time
/// without spinning up real threads.
pub fn tick_once(worker_id: usize, actor: &Arc<ActorRecord>, run_queue: &RunQueue) {
    diagnostics::print_system(&format!(
        "[Worker {worker_id}] Executing actor {} ({})",
        actor.id(),
        actor.script_ref()
    ));
    actor.set_state(ActorState::Running);

    let sandbox = match actor.take_sandbox() {
        Some(s) => s,
        None => {
            // Should never happen if every caller respects the one-sandbox-
            // per-actor rule. Treat defensively as a dead end rather than
            // panicking the worker thread.
            diagnostics::print_system(&format!(
                "[Worker {worker_id}] ERROR: actor {} had no sandbox to tick",
                actor.id()
            ));
            actor.set_state(ActorState::Dead);
            return;
        }
    };

    let mut sandbox = sandbox;
    let outcome = sandbox.tick();
    actor.put_sandbox(sandbox);

    match outcome {
        Ok(TickOutcome::Ready) => {
            actor.set_state(ActorState::Ready);
            run_queue.enqueue(Arc::clone(actor));
        }
        Ok(TickOutcome::Blocked) => {
            // Level-triggered recheck: a CAST may land after the sandbox's
            // last `recv` attempt but before the coordinator notices the
            // BLOCKED signal. Mark Blocked *first*, then recheck the
            // mailbox — so a CAST racing this transition either observes
            // `Blocked` (and wakes the actor itself via `wake_if_blocked`)
            // or is observed here once the state write has landed. Either
            // way the actor is requeued exactly once: `wake_if_blocked` is
            // a CAS that only one side of the race can win.
            actor.set_state(ActorState::Blocked);
            if !actor.mailbox().is_empty() && actor.wake_if_blocked() {
                run_queue.enqueue(Arc::clone(actor));
            }
        }
        Ok(TickOutcome::Done) => {
            diagnostics::print_system(&format!(
                "[{}] [Worker {worker_id}] actor {} ({}) finished",
                timestamp(),
                actor.id(),
                actor.script_ref()
            ));
            actor.set_state(ActorState::Dead);
        }
        Err(err) => {
            diagnostics::print_system(&format!(
                "[Worker {worker_id}] ERROR in actor {}: {err}",
                actor.id()
            ));
            actor.set_state(ActorState::Dead);
            // On error the sandbox is destroyed, not pooled — replace it
            // with nothing so the coordinator's deferred reclamation finds
            // no sandbox to reset and simply drops this slot.
            if let Some(dead_sandbox) = actor.take_sandbox() {
                dead_sandbox.destroy();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{NativeSandbox, ScriptRegistry};
    use crate::util::{ActorId, ScriptRef};
    use std::sync::Arc;

    fn make_actor(script_ref: &str, registry: Arc<ScriptRegistry>) -> Arc<ActorRecord> {
        let sandbox = Box::new(NativeSandbox::new(registry));
        Arc::new(ActorRecord::new(
            ActorId::from_raw(0),
            ScriptRef::new(script_ref),
            None,
            sandbox,
        ))
    }

    #[test]
    fn ready_outcome_requeues_actor() {
        let registry = ScriptRegistry::new();
        registry.register(ScriptRef::new("a.rs"), |ctx| {
            Box::pin(async move {
                let _ = ctx.recv().await;
            }) as crate::sandbox::BoxFuture
        });
        let registry = Arc::new(registry);
        let actor = make_actor("a.rs", Arc::clone(&registry));
        let (tx, _rx) = crate::message::signal_channel();
        if let Some(mut sandbox) = actor.take_sandbox() {
            sandbox.bootstrap(actor.id(), actor.script_ref().clone(), Arc::clone(actor.mailbox()), tx);
            actor.put_sandbox(sandbox);
        }
        actor.mailbox().push(crate::message::encode(&"m".to_string()));

        let run_queue = RunQueue::new();
        tick_once(0, &actor, &run_queue);
        assert_eq!(actor.state(), ActorState::Ready);
    }

    #[test]
    fn blocked_outcome_with_empty_mailbox_stays_blocked() {
        let registry = ScriptRegistry::new();
        registry.register(ScriptRef::new("a.rs"), |ctx| {
            Box::pin(async move {
                let _ = ctx.recv().await;
            }) as crate::sandbox::BoxFuture
        });
        let registry = Arc::new(registry);
        let actor = make_actor("a.rs", registry);
        let (tx, _rx) = crate::message::signal_channel();
        if let Some(mut sandbox) = actor.take_sandbox() {
            sandbox.bootstrap(actor.id(), actor.script_ref().clone(), Arc::clone(actor.mailbox()), tx);
            actor.put_sandbox(sandbox);
        }

        let run_queue = RunQueue::new();
        tick_once(0, &actor, &run_queue);
        assert_eq!(actor.state(), ActorState::Blocked);
    }

    #[test]
    fn done_outcome_marks_dead() {
        let registry = ScriptRegistry::new();
        registry.register(ScriptRef::new("a.rs"), |_ctx| Box::pin(async {}) as crate::sandbox::BoxFuture);
        let registry = Arc::new(registry);
        let actor = make_actor("a.rs", registry);
        let (tx, _rx) = crate::message::signal_channel();
        if let Some(mut sandbox) = actor.take_sandbox() {
            sandbox.bootstrap(actor.id(), actor.script_ref().clone(), Arc::clone(actor.mailbox()), tx);
            actor.put_sandbox(sandbox);
        }

        let run_queue = RunQueue::new();
        tick_once(0, &actor, &run_queue);
        assert_eq!(actor.state(), ActorState::Dead);
    }

    #[test]
    fn user_fault_marks_dead() {
        let registry = ScriptRegistry::new();
        registry.register(ScriptRef::new("a.rs"), |_ctx| {
            Box::pin(async move { panic!("boom") }) as crate::sandbox::BoxFuture
        });
        let registry = Arc::new(registry);
        let actor = make_actor("a.rs", registry);
        let (tx, _rx) = crate::message::signal_channel();
        if let Some(mut sandbox) = actor.take_sandbox() {
            sandbox.bootstrap(actor.id(), actor.script_ref().clone(), Arc::clone(actor.mailbox()), tx);
            actor.put_sandbox(sandbox);
        }

        let run_queue = RunQueue::new();
        tick_once(0, &actor, &run_queue);
        assert_eq!(actor.state(), ActorState::Dead);
    }
}
