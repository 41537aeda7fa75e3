//! The `Sandbox` interface: an isolated execution context
//! for one actor's user program. The runtime never reaches inside a
//! sandbox beyond this interface — how user code actually runs is the
//! sandbox implementation's business, not the coordinator's or worker's.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 3: Internal module imports
use crate::mailbox::Mailbox;
use crate::message::SignalSender;
use crate::util::{ActorId, ScriptRef};
use thiserror::Error;

/// Outcome of one bounded, cooperative advance of an actor's user program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The program made progress and should be rescheduled.
    Ready,
    /// The program is suspended on an empty mailbox.
    Blocked,
    /// The program ran to completion.
    Done,
}

/// Errors a sandbox may report out of `tick`, `reset`, or `bootstrap`.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The script has no recognizable top-level entry point.
    #[error("script {0} has no entry point")]
    MissingEntry(ScriptRef),
    /// An exception escaped the user program during `tick`.
    #[error("user fault: {0}")]
    UserFault(String),
    /// Resetting a reclaimed sandbox for reuse failed.
    #[error("sandbox reset failed: {0}")]
    ResetFailure(String),
}

/// An isolated execution context that runs one actor's user program.
///
/// Implementations carry no state visible to other sandboxes. The crate
/// ships one implementation, [`crate::sandbox::NativeSandbox`]; this trait
/// is the seam at which a real language interpreter would be substituted.
pub trait Sandbox: Send {
    /// One-time setup: bind the actor's identity and channels.
    fn bootstrap(
        &mut self,
        actor_id: ActorId,
        script_ref: ScriptRef,
        mailbox: Arc<Mailbox>,
        signal_tx: SignalSender,
    );

    /// Advance the user's cooperative task by one bounded step.
    fn tick(&mut self) -> Result<TickOutcome, SandboxError>;

    /// Restore the sandbox to a pristine state for reuse by a future actor.
    fn reset(&mut self) -> Result<(), SandboxError>;

    /// Release all sandbox resources. Consumes the sandbox.
    fn destroy(self: Box<Self>);
}
