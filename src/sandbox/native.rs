//! The crate's one concrete `Sandbox`: it runs a registered [`Script`] by
//! manually polling its boxed future to the next `recv` suspension point,
//! reproducing the original's `loop.run_until_complete(asyncio.sleep(0))`
//! drain without needing an async runtime.

// Layer 1: Standard library imports
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

// Layer 2: Third-party crate imports
use futures::task::noop_waker_ref;

// Layer 3: Internal module imports
use super::script::{BoxFuture, ScriptContext, ScriptRegistry};
use super::traits::{Sandbox, SandboxError, TickOutcome};
use crate::mailbox::Mailbox;
use crate::message::SignalSender;
use crate::util::{ActorId, ScriptRef};

/// Reusable [`Sandbox`] backed by the in-process [`ScriptRegistry`].
pub struct NativeSandbox {
    registry: Arc<ScriptRegistry>,
    actor_id: Option<ActorId>,
    script_ref: Option<Arc<ScriptRef>>,
    mailbox: Option<Arc<Mailbox>>,
    signal_tx: Option<SignalSender>,
    task: Option<BoxFuture>,
    blocked_this_poll: Arc<AtomicBool>,
}

impl NativeSandbox {
    pub fn new(registry: Arc<ScriptRegistry>) -> Self {
        Self {
            registry,
            actor_id: None,
            script_ref: None,
            mailbox: None,
            signal_tx: None,
            task: None,
            blocked_this_poll: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Sandbox for NativeSandbox {
    fn bootstrap(
        &mut self,
        actor_id: ActorId,
        script_ref: ScriptRef,
        mailbox: Arc<Mailbox>,
        signal_tx: SignalSender,
    ) {
        self.actor_id = Some(actor_id);
        self.script_ref = Some(Arc::new(script_ref));
        self.mailbox = Some(mailbox);
        self.signal_tx = Some(signal_tx);
        self.task = None;
        self.blocked_this_poll.store(false, Ordering::SeqCst);
    }

    fn tick(&mut self) -> Result<TickOutcome, SandboxError> {
        if self.task.is_none() {
            let script_ref = match &self.script_ref {
                Some(r) => Arc::clone(r),
                None => return Err(SandboxError::UserFault("tick before bootstrap".into())),
            };
            let script = self
                .registry
                .lookup(&script_ref)
                .ok_or_else(|| SandboxError::MissingEntry((*script_ref).clone()))?;

            let (actor_id, mailbox, signal_tx) = match (&self.actor_id, &self.mailbox, &self.signal_tx) {
                (Some(a), Some(m), Some(s)) => (*a, Arc::clone(m), s.clone()),
                _ => return Err(SandboxError::UserFault("tick before bootstrap".into())),
            };

            let ctx = ScriptContext::new(
                actor_id,
                script_ref,
                mailbox,
                signal_tx,
                Arc::clone(&self.blocked_this_poll),
            );
            self.task = Some(script.boot(ctx));
        }

        self.blocked_this_poll.store(false, Ordering::SeqCst);

        let waker = noop_waker_ref();
        let mut cx = TaskContext::from_waker(waker);

        let poll_outcome = match &mut self.task {
            Some(task) => {
                let task: Pin<&mut (dyn std::future::Future<Output = ()> + Send)> = task.as_mut();
                catch_unwind(AssertUnwindSafe(|| task.poll(&mut cx)))
            }
            None => return Err(SandboxError::UserFault("task missing after boot".into())),
        };

        match poll_outcome {
            Ok(Poll::Ready(())) => {
                self.task = None;
                Ok(TickOutcome::Done)
            }
            Ok(Poll::Pending) => {
                if self.blocked_this_poll.load(Ordering::SeqCst) {
                    Ok(TickOutcome::Blocked)
                } else {
                    Ok(TickOutcome::Ready)
                }
            }
            Err(payload) => {
                self.task = None;
                let message = panic_message(&payload);
                Err(SandboxError::UserFault(message))
            }
        }
    }

    fn reset(&mut self) -> Result<(), SandboxError> {
        if self.task.is_some() {
            return Err(SandboxError::ResetFailure(
                "cannot reset a sandbox whose task has not finished".into(),
            ));
        }
        self.actor_id = None;
        self.script_ref = None;
        self.mailbox = None;
        self.signal_tx = None;
        self.blocked_this_poll.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        // No external resources: dropping releases everything.
    }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "user script panicked".to_string()
    }
}
