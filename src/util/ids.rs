//! Identity types used throughout the runtime: dense actor ids and
//! correlation tokens for spawn/cast requests.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dense, monotonically increasing actor identifier assigned by the
/// coordinator. Starts at zero for the root actor.
///
/// Unlike a UUID, density lets the runtime derive "total actors spawned"
/// directly from the counter instead of tracking a separate tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Wrap a raw id. Only the coordinator's id allocator should call this.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coordinator-exclusive allocator for [`ActorId`]s.
///
/// A plain `AtomicU64` would admit duplicate ids across the race between
/// SPAWN processing threads if the counter were ever shared; id
/// allocation is reserved to the single-threaded coordinator, so this
/// type is deliberately not `Clone` — callers outside the coordinator
/// have no business minting ids.
#[derive(Debug, Default)]
pub struct ActorIdAllocator {
    next: AtomicU64,
}

impl ActorIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Allocate the next id. The root actor receives id 0.
    pub fn next(&self) -> ActorId {
        ActorId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids allocated so far (equals total actors spawned).
    pub fn allocated_count(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

/// Correlation token minted at `spawn` time, addressing the not-yet-created
/// child actor. Survives as the stable handle for subsequent casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
