//! Shared identity types.

mod ids;
mod script_ref;

pub use ids::{ActorId, ActorIdAllocator, RequestId};
pub use script_ref::ScriptRef;
