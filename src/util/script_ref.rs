//! Script reference resolution.

// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

/// An opaque locator a sandbox uses to load user code.
///
/// Modeled as a path-like string: `spawn(script_ref)` resolves a relative
/// reference against the directory of the spawning actor's own script,
/// mirroring the original's `os.path.join(os.path.dirname(parent), ref)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptRef(String);

impl ScriptRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }

    fn dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// Resolve `self` as a reference relative to `parent`'s directory,
    /// unless `self` is already absolute.
    pub fn resolve_relative_to(&self, parent: &ScriptRef) -> ScriptRef {
        if self.is_absolute() {
            return self.clone();
        }
        let dir = parent.dir();
        if dir.is_empty() {
            self.clone()
        } else {
            ScriptRef(format!("{dir}/{}", self.0))
        }
    }
}

impl Display for ScriptRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
