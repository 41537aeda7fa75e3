//! Sandboxes: the isolated execution contexts that run one actor's user
//! program each, plus the pool that recycles them.

mod native;
mod pool;
mod script;
mod traits;

pub use native::NativeSandbox;
pub use pool::SandboxPool;
pub use script::{ActorHandle, BoxFuture, Recv, Script, ScriptContext, ScriptRegistry};
pub use traits::{Sandbox, SandboxError, TickOutcome};
