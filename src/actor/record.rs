//! The `Actor` record: identity, state, mailbox, bound sandbox, script
//! reference, parent link.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
use super::state::ActorState;
use crate::mailbox::Mailbox;
use crate::sandbox::Sandbox;
use crate::util::{ActorId, ScriptRef};

/// An actor: the unit the coordinator and workers schedule.
///
/// `sandbox` is guarded by a mutex purely to satisfy `Send`/`Sync` sharing
/// through `Arc` — at most one worker ever holds the lock at a time, so
/// there is no real contention.
pub struct ActorRecord {
    id: ActorId,
    script_ref: ScriptRef,
    parent_id: Option<ActorId>,
    state: Mutex<ActorState>,
    mailbox: Arc<Mailbox>,
    sandbox: Mutex<Option<Box<dyn Sandbox>>>,
}

impl ActorRecord {
    pub fn new(
        id: ActorId,
        script_ref: ScriptRef,
        parent_id: Option<ActorId>,
        sandbox: Box<dyn Sandbox>,
    ) -> Self {
        Self {
            id,
            script_ref,
            parent_id,
            state: Mutex::new(ActorState::Ready),
            mailbox: Arc::new(Mailbox::new()),
            sandbox: Mutex::new(Some(sandbox)),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn script_ref(&self) -> &ScriptRef {
        &self.script_ref
    }

    pub fn parent_id(&self) -> Option<ActorId> {
        self.parent_id
    }

    pub fn mailbox(&self) -> &Arc<Mailbox> {
        &self.mailbox
    }

    pub fn state(&self) -> ActorState {
        *self.state.lock()
    }

    pub fn set_state(&self, state: ActorState) {
        *self.state.lock() = state;
    }

    /// Compare-and-set used by the coordinator when a `Cast` targets a
    /// `Blocked` actor: only transition (and report `true`, meaning
    /// "requeue me") if the actor was actually blocked.
    pub fn wake_if_blocked(&self) -> bool {
        let mut guard = self.state.lock();
        if *guard == ActorState::Blocked {
            *guard = ActorState::Ready;
            true
        } else {
            false
        }
    }

    /// Take the sandbox out for exclusive use by the calling worker.
    /// Panics only if called concurrently by two workers, which invariant
    /// I2 forbids.
    pub fn take_sandbox(&self) -> Option<Box<dyn Sandbox>> {
        self.sandbox.lock().take()
    }

    /// Return the sandbox after a tick.
    pub fn put_sandbox(&self, sandbox: Box<dyn Sandbox>) {
        *self.sandbox.lock() = Some(sandbox);
    }
}
