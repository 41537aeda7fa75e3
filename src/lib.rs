//! # mote-rt — a cooperative actor runtime
//!
//! A fixed pool of OS threads runs many isolated actors, each wrapped in
//! a sandbox that advances its program one cooperative step at a time.
//! Actors never share memory: the only way to communicate is `spawn`ing a
//! child or `cast`ing it a canonically-encoded message. A single-threaded
//! coordinator is the sole arbiter of actor identity, state, and mailbox
//! contents, reached only through a signal channel every sandbox writes to
//! and nothing reads from except the coordinator itself.
//!
//! # Quick start
//!
//! ```rust
//! use mote_rt::sandbox::{BoxFuture, ScriptRegistry};
//! use mote_rt::system::{RuntimeDriver, SystemConfig};
//! use mote_rt::util::ScriptRef;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let registry = ScriptRegistry::new();
//! registry.register(ScriptRef::new("root.rs"), |ctx| {
//!     Box::pin(async move {
//!         ctx.print("hello from the root actor");
//!     }) as BoxFuture
//! });
//!
//! let config = SystemConfig::builder()
//!     .with_worker_count(2)
//!     .with_timeout(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//!
//! let driver = RuntimeDriver::new(config, Arc::new(registry));
//! let report = driver.run(ScriptRef::new("root.rs")).unwrap();
//! assert_eq!(report.total_actors_spawned, 1);
//! ```
//!
//! # Module organization
//!
//! - [`util`] — actor ids, request correlation tokens, script references
//! - [`message`] — the byte-oriented codec and the coordinator's signal protocol
//! - [`mailbox`] — the per-actor FIFO byte queue
//! - [`sandbox`] — the `Sandbox` trait, its one concrete implementation, and the pool that recycles them
//! - [`actor`] — actor lifecycle state and the shared `ActorRecord`
//! - [`runqueue`] — the MPMC queue of actors ready to tick
//! - [`worker`] — the fixed worker-thread loop
//! - `coordinator` — the single-threaded dispatcher (internal; reached through [`system::RuntimeDriver`])
//! - [`system`] — configuration, errors, and the driver that ties everything together
//! - [`diagnostics`] — the `[ts] [System] ...` / `[Actor N] ...` logging convention

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod actor;
mod coordinator;
pub mod demos;
pub mod diagnostics;
pub mod mailbox;
pub mod message;
pub mod runqueue;
pub mod sandbox;
pub mod system;
pub mod util;
pub mod worker;

pub use actor::{ActorRecord, ActorState};
pub use mailbox::Mailbox;
pub use message::{decode, encode, Signal};
pub use sandbox::{NativeSandbox, Sandbox, SandboxError, SandboxPool, Script, ScriptContext, ScriptRegistry, TickOutcome};
pub use system::{RunReport, RuntimeDriver, RuntimeError, SystemConfig};
pub use util::{ActorId, RequestId, ScriptRef};
