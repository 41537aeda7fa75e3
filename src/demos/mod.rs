//! Built-in demo scripts standing in for the `.pya` example files a real
//! file-based scripting layer would load from disk. Each one is a closure
//! registered under a [`ScriptRef`](crate::util::ScriptRef) name, reachable
//! through [`register_all`] or individually via the `mote-rt list-scripts`
//! / `mote-rt run` CLI commands.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::message::decode;
use crate::sandbox::{BoxFuture, ScriptContext, ScriptRegistry};
use crate::util::ScriptRef;

/// Register every built-in demo under its canonical name.
pub fn register_all(registry: &ScriptRegistry) {
    register_simple(registry);
    register_chain(registry);
    register_tree(registry);
    register_binary(registry);
    register_race(registry);
}

/// Parent spawns one child, sends it one message, both print and finish.
fn register_simple(registry: &ScriptRegistry) {
    registry.register(ScriptRef::new("demos/simple_parent.rs"), |ctx| {
        Box::pin(async move {
            ctx.print("Parent starting, spawning child...");
            let child = ctx.spawn(ScriptRef::new("simple_child.rs"));
            ctx.print("Parent sending message...");
            child.cast(&"hello".to_string());
            ctx.print("Parent finished");
        }) as BoxFuture
    });

    registry.register(ScriptRef::new("demos/simple_child.rs"), |ctx| {
        Box::pin(async move {
            let bytes = ctx.recv().await;
            let msg: String = decode(&bytes).unwrap_or_default();
            ctx.print(format!("received message: {msg}"));
            ctx.print("Child finished");
        }) as BoxFuture
    });
}

/// A chain of three actors: root -> branch -> leaf, each forwarding what
/// it received plus its own note.
fn register_chain(registry: &ScriptRegistry) {
    registry.register(ScriptRef::new("demos/chain_root.rs"), |ctx| {
        Box::pin(async move {
            ctx.print("ROOT starting");
            ctx.print("ROOT spawning 1 branch...");
            let branch = ctx.spawn(ScriptRef::new("chain_branch.rs"));
            ctx.print("ROOT sending message to branch...");
            branch.cast(&"hello from root".to_string());
            ctx.print("ROOT finished");
        }) as BoxFuture
    });

    registry.register(ScriptRef::new("demos/chain_branch.rs"), |ctx| {
        Box::pin(async move {
            ctx.print("BRANCH started, waiting for message...");
            let bytes = ctx.recv().await;
            let received: String = decode(&bytes).unwrap_or_default();
            ctx.print(format!("BRANCH received: {received}"));
            ctx.print("BRANCH spawning 1 leaf...");
            let leaf = ctx.spawn(ScriptRef::new("chain_leaf.rs"));
            ctx.print("BRANCH sending message to leaf...");
            leaf.cast(&format!("hello from branch (got: {received})"));
            ctx.print("BRANCH finished");
        }) as BoxFuture
    });

    registry.register(ScriptRef::new("demos/chain_leaf.rs"), |ctx| {
        Box::pin(async move {
            ctx.print("LEAF started, waiting for message...");
            let bytes = ctx.recv().await;
            let received: String = decode(&bytes).unwrap_or_default();
            ctx.print(format!("LEAF received: {received}"));
            ctx.print("LEAF finished");
        }) as BoxFuture
    });
}

/// A static tree: root spawns 2 children, each of those spawns 2
/// grandchildren (7 actors total).
fn register_tree(registry: &ScriptRegistry) {
    registry.register(ScriptRef::new("demos/tree_root.rs"), |ctx| {
        Box::pin(async move {
            ctx.print("TREE ROOT spawning 2 children");
            for i in 0..2 {
                let child = ctx.spawn(ScriptRef::new("tree_child.rs"));
                child.cast(&format!("branch {i}"));
            }
            ctx.print("TREE ROOT finished");
        }) as BoxFuture
    });

    registry.register(ScriptRef::new("demos/tree_child.rs"), |ctx| {
        Box::pin(async move {
            let bytes = ctx.recv().await;
            let label: String = decode(&bytes).unwrap_or_default();
            ctx.print(format!("TREE CHILD ({label}) spawning 2 leaves"));
            for i in 0..2 {
                let leaf = ctx.spawn(ScriptRef::new("tree_leaf.rs"));
                leaf.cast(&format!("{label}/{i}"));
            }
            ctx.print(format!("TREE CHILD ({label}) finished"));
        }) as BoxFuture
    });

    registry.register(ScriptRef::new("demos/tree_leaf.rs"), |ctx| {
        Box::pin(async move {
            let bytes = ctx.recv().await;
            let label: String = decode(&bytes).unwrap_or_default();
            ctx.print(format!("TREE LEAF ({label}) finished"));
        }) as BoxFuture
    });
}

/// Depth message passed down a recursive binary tree: how deep the
/// receiving actor is, and the depth at which it becomes a leaf.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct BinaryDepth {
    depth: u32,
    max_depth: u32,
}

/// A recursive binary tree of depth 2: a driver actor spawns the depth-0
/// root (mirroring `examples/tree_recursive/actor_tree_root.pya` spawning
/// `actor_tree.pya` in the original), which recurses two levels deeper
/// until `depth == max_depth`, where it finishes as a leaf. 7 recursive-tree
/// actors plus the driver itself = 8 total.
fn register_binary(registry: &ScriptRegistry) {
    registry.register(ScriptRef::new("demos/binary_driver.rs"), |ctx| {
        Box::pin(async move {
            ctx.print("Starting binary tree spawn test");
            ctx.print("Creating root actor (depth 0, max_depth 2)");
            ctx.print("Expected actors: 1 + 2 + 4 = 7 total");
            let root = ctx.spawn(ScriptRef::new("binary_node.rs"));
            root.cast(&BinaryDepth { depth: 0, max_depth: 2 });
            ctx.print("Root spawned");
            ctx.print("Tree spawn test complete");
        }) as BoxFuture
    });

    registry.register(ScriptRef::new("demos/binary_node.rs"), |ctx| {
        Box::pin(async move {
            ctx.print("Actor started, waiting for depth message...");
            let bytes = ctx.recv().await;
            let msg: BinaryDepth = decode(&bytes).unwrap_or(BinaryDepth { depth: 0, max_depth: 2 });
            ctx.print(format!("Received message: {msg:?}"));
            binary_node(ctx, msg.depth, msg.max_depth).await;
        }) as BoxFuture
    });
}

async fn binary_node(ctx: ScriptContext, depth: u32, max_depth: u32) {
    if depth >= max_depth {
        ctx.print(format!("Leaf node at depth {depth} (max depth reached)"));
        return;
    }
    ctx.print(format!("Spawning 2 children at depth {}", depth + 1));
    for _ in 0..2 {
        let child = ctx.spawn(ScriptRef::new("binary_node.rs"));
        child.cast(&BinaryDepth {
            depth: depth + 1,
            max_depth,
        });
    }
    ctx.print(format!("Spawned 2 children from depth {depth}"));
}

/// Parent spawns one child and immediately casts 1000 messages at it
/// before the coordinator can possibly have processed the `SPAWN` —
/// exercising the Pending Messages Table and its in-order delivery.
fn register_race(registry: &ScriptRegistry) {
    registry.register(ScriptRef::new("demos/race_parent.rs"), |ctx| {
        Box::pin(async move {
            let child = ctx.spawn(ScriptRef::new("race_child.rs"));
            for i in 0..1000u32 {
                child.cast(&i);
            }
            ctx.print("RACE PARENT finished sending 1000 messages");
        }) as BoxFuture
    });

    registry.register(ScriptRef::new("demos/race_child.rs"), |ctx| {
        Box::pin(async move {
            let mut expected = 0u32;
            loop {
                let bytes = ctx.recv().await;
                let value: u32 = decode(&bytes).unwrap_or(u32::MAX);
                if value != expected {
                    ctx.print(format!("RACE CHILD out-of-order: expected {expected}, got {value}"));
                    return;
                }
                expected += 1;
                if expected == 1000 {
                    break;
                }
            }
            ctx.print("RACE CHILD received all 1000 messages in order");
        }) as BoxFuture
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_all_populates_every_demo() {
        let registry = ScriptRegistry::new();
        register_all(&registry);
        let refs = registry.known_refs();
        assert!(refs.iter().any(|r| r.as_str() == "demos/simple_parent.rs"));
        assert!(refs.iter().any(|r| r.as_str() == "demos/chain_root.rs"));
        assert!(refs.iter().any(|r| r.as_str() == "demos/tree_root.rs"));
        assert!(refs.iter().any(|r| r.as_str() == "demos/binary_driver.rs"));
        assert!(refs.iter().any(|r| r.as_str() == "demos/race_parent.rs"));
    }
}
