//! The signal channel: a tagged sum type carried over a single
//! multi-producer, single-consumer channel, replacing the original's
//! string-encoded `actor_id:KIND:payload` mini-protocol.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use crossbeam_channel::{Receiver, Sender};

// Layer 3: Internal module imports
use crate::util::{ActorId, RequestId, ScriptRef};

/// A control record emitted by a sandbox and consumed exclusively by the
/// coordinator. Carries typed fields instead of the original's
/// delimiter-split strings.
#[derive(Debug, Clone)]
pub enum Signal {
    /// A sandbox asked to create a new actor running `script_ref`,
    /// correlated by `request_id`.
    Spawn {
        actor_id: ActorId,
        request_id: RequestId,
        script_ref: ScriptRef,
    },
    /// A sandbox asked to deliver `payload` to whatever actor `request_id`
    /// resolves to (possibly not yet spawned).
    Cast {
        actor_id: ActorId,
        request_id: RequestId,
        payload: Vec<u8>,
    },
    /// A sandbox produced a formatted output line.
    Print { actor_id: ActorId, line: Vec<u8> },
    /// A sandbox's mailbox was empty at the last `recv` attempt.
    ///
    /// Advisory: a concurrent `Cast` may already have moved the actor back
    /// to `Ready` by the time the coordinator processes this.
    Blocked { actor_id: ActorId },
    /// Produced solely by the runtime driver to stop the coordinator loop.
    Shutdown,
}

/// The producing half of the signal channel. Cheaply `Clone`-able: every
/// sandbox and the runtime driver hold their own clone.
pub type SignalSender = Sender<Signal>;

/// The single consuming half, owned by the coordinator.
pub type SignalReceiver = Receiver<Signal>;

/// Create a fresh signal channel (unbounded — sandboxes must never block
/// on emitting a signal, since that would reintroduce the preemption the
/// spec explicitly rules out).
pub fn signal_channel() -> (SignalSender, SignalReceiver) {
    crossbeam_channel::unbounded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_are_received_in_emission_order() {
        let (tx, rx) = signal_channel();
        for i in 0..5u64 {
            tx.send(Signal::Blocked {
                actor_id: ActorId::from_raw(i),
            })
            .unwrap();
        }
        for i in 0..5u64 {
            match rx.try_recv().unwrap() {
                Signal::Blocked { actor_id } => assert_eq!(actor_id.raw(), i),
                other => panic!("unexpected signal: {other:?}"),
            }
        }
    }
}
