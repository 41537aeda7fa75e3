//! User-script contract: the four primitives injected into a sandbox
//! (`recv`, `spawn`, `cast`, `print`) and the registry that
//! stands in for loading an arbitrary script file from disk.

// Layer 1: Standard library imports
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use serde::Serialize;

// Layer 3: Internal module imports
use crate::mailbox::Mailbox;
use crate::message::{encode, encode_line, Signal, SignalSender};
use crate::util::{ActorId, RequestId, ScriptRef};

/// A user program's top-level task, boxed so the sandbox can poll it
/// without knowing its concrete type.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A registered script: given a bound [`ScriptContext`], produce the
/// actor's top-level task.
///
/// Any `Fn(ScriptContext) -> BoxFuture` qualifies — this is how the test
/// suite and the CLI's built-in demo scripts (`demos/`) register actor
/// bodies without a real file-based interpreter.
pub trait Script: Send + Sync {
    fn boot(&self, ctx: ScriptContext) -> BoxFuture;
}

impl<F> Script for F
where
    F: Fn(ScriptContext) -> BoxFuture + Send + Sync + 'static,
{
    fn boot(&self, ctx: ScriptContext) -> BoxFuture {
        self(ctx)
    }
}

/// Maps [`ScriptRef`]s to the scripts they name — the in-process stand-in
/// for "load the user code at this path."
#[derive(Default)]
pub struct ScriptRegistry {
    scripts: DashMap<ScriptRef, Arc<dyn Script>>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self {
            scripts: DashMap::new(),
        }
    }

    pub fn register(&self, script_ref: ScriptRef, script: impl Script + 'static) {
        self.scripts.insert(script_ref, Arc::new(script));
    }

    pub fn lookup(&self, script_ref: &ScriptRef) -> Option<Arc<dyn Script>> {
        self.scripts.get(script_ref).map(|entry| Arc::clone(entry.value()))
    }

    pub fn known_refs(&self) -> Vec<ScriptRef> {
        self.scripts.iter().map(|e| e.key().clone()).collect()
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("len", &self.scripts.len())
            .finish()
    }
}

/// Bound set of injected primitives, handed to a script's top-level task.
///
/// Cheap to clone: every clone shares the same mailbox and signal sender,
/// consistent with there being exactly one sandbox behind it.
#[derive(Clone)]
pub struct ScriptContext {
    actor_id: ActorId,
    own_script_ref: Arc<ScriptRef>,
    mailbox: Arc<Mailbox>,
    signal_tx: SignalSender,
    blocked_this_poll: Arc<AtomicBool>,
}

impl ScriptContext {
    pub(crate) fn new(
        actor_id: ActorId,
        own_script_ref: Arc<ScriptRef>,
        mailbox: Arc<Mailbox>,
        signal_tx: SignalSender,
        blocked_this_poll: Arc<AtomicBool>,
    ) -> Self {
        Self {
            actor_id,
            own_script_ref,
            mailbox,
            signal_tx,
            blocked_this_poll,
        }
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    /// The cooperative suspension point: wait for the next mailbox
    /// message. Resolves immediately if one is already queued.
    pub fn recv(&self) -> Recv {
        Recv { ctx: self.clone() }
    }

    /// Mint a fresh correlation token, emit `SPAWN`, and return a handle
    /// usable immediately — casts against it before the coordinator has
    /// created the child are buffered in the coordinator's Pending Messages
    /// Table.
    pub fn spawn(&self, script_ref: ScriptRef) -> ActorHandle {
        let resolved = script_ref.resolve_relative_to(&self.own_script_ref);
        let request_id = RequestId::new();
        let _ = self.signal_tx.send(Signal::Spawn {
            actor_id: self.actor_id,
            request_id,
            script_ref: resolved,
        });
        ActorHandle {
            emitting_actor: self.actor_id,
            request_id,
            signal_tx: self.signal_tx.clone(),
        }
    }

    /// Emit a formatted output line, prefixed with this actor's id
    /// (`[Actor N] ...`).
    pub fn print(&self, line: impl AsRef<str>) {
        let formatted = format!("[Actor {}] {}", self.actor_id, line.as_ref());
        let _ = self.signal_tx.send(Signal::Print {
            actor_id: self.actor_id,
            line: encode_line(&formatted),
        });
    }
}

/// An opaque handle to a not-yet-necessarily-created actor, encapsulating
/// the `request_id` correlation token, a language-neutral stand-in for a
/// bound closure.
#[derive(Clone)]
pub struct ActorHandle {
    emitting_actor: ActorId,
    request_id: RequestId,
    signal_tx: SignalSender,
}

impl ActorHandle {
    /// Send `msg`, encoded canonically, to the actor this handle
    /// addresses.
    pub fn cast<T: Serialize>(&self, msg: &T) {
        let payload = encode(msg);
        let _ = self.signal_tx.send(Signal::Cast {
            actor_id: self.emitting_actor,
            request_id: self.request_id,
            payload,
        });
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }
}

/// The future returned by [`ScriptContext::recv`].
pub struct Recv {
    ctx: ScriptContext,
}

impl Future for Recv {
    type Output = Vec<u8>;

    fn poll(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        match self.ctx.mailbox.pop() {
            Some(bytes) => Poll::Ready(bytes),
            None => {
                self.ctx.blocked_this_poll.store(true, Ordering::SeqCst);
                let _ = self.ctx.signal_tx.send(Signal::Blocked {
                    actor_id: self.ctx.actor_id,
                });
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::signal_channel;

    fn test_ctx() -> (ScriptContext, Arc<Mailbox>, crate::message::SignalReceiver) {
        let mailbox = Arc::new(Mailbox::new());
        let (tx, rx) = signal_channel();
        let ctx = ScriptContext::new(
            ActorId::from_raw(0),
            Arc::new(ScriptRef::new("root.rs")),
            Arc::clone(&mailbox),
            tx,
            Arc::new(AtomicBool::new(false)),
        );
        (ctx, mailbox, rx)
    }

    #[test]
    fn registry_round_trips_a_script() {
        let registry = ScriptRegistry::new();
        registry.register(ScriptRef::new("a.rs"), |_ctx| Box::pin(async {}) as BoxFuture);
        assert!(registry.lookup(&ScriptRef::new("a.rs")).is_some());
        assert!(registry.lookup(&ScriptRef::new("b.rs")).is_none());
    }

    #[test]
    fn spawn_emits_signal_and_returns_usable_handle() {
        let (ctx, _mailbox, rx) = test_ctx();
        let handle = ctx.spawn(ScriptRef::new("child.rs"));
        handle.cast(&"hello".to_string());

        match rx.try_recv().unwrap() {
            Signal::Spawn { script_ref, .. } => assert_eq!(script_ref.as_str(), "child.rs"),
            other => panic!("expected Spawn, got {other:?}"),
        }
        match rx.try_recv().unwrap() {
            Signal::Cast { request_id, .. } => assert_eq!(request_id, handle.request_id()),
            other => panic!("expected Cast, got {other:?}"),
        }
    }

    #[test]
    fn print_prefixes_actor_id() {
        let (ctx, _mailbox, rx) = test_ctx();
        ctx.print("hello world");
        match rx.try_recv().unwrap() {
            Signal::Print { line, .. } => {
                let decoded = crate::message::decode_line(&line).unwrap();
                assert_eq!(decoded, "[Actor 0] hello world");
            }
            other => panic!("expected Print, got {other:?}"),
        }
    }
}
