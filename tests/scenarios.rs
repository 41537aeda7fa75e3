//! End-to-end scenarios driven through the public `RuntimeDriver` API,
//! mirroring the six example programs: a simple parent/child, a
//! three-actor chain, a static tree, a recursive binary tree, a
//! spawn/cast race, and a hand-built boundary case for each documented
//! race (cast-before-spawn, cast-to-blocked).

use std::sync::Arc;
use std::time::Duration;

use mote_rt::demos;
use mote_rt::sandbox::{BoxFuture, ScriptRegistry};
use mote_rt::system::{RuntimeDriver, SystemConfig};
use mote_rt::util::ScriptRef;

fn driver_with(registry: ScriptRegistry, worker_count: usize) -> RuntimeDriver {
    let config = SystemConfig::builder()
        .with_worker_count(worker_count)
        .with_timeout(Duration::from_secs(10))
        .with_poll_interval(Duration::from_millis(1))
        .build()
        .unwrap();
    RuntimeDriver::new(config, Arc::new(registry))
}

fn demo_registry() -> ScriptRegistry {
    let registry = ScriptRegistry::new();
    demos::register_all(&registry);
    registry
}

#[test]
fn simple_parent_child_spawns_exactly_two_actors() {
    let driver = driver_with(demo_registry(), 2);
    let report = driver.run(ScriptRef::new("demos/simple_parent.rs")).unwrap();
    assert_eq!(report.total_actors_spawned, 2);
}

#[test]
fn chain_of_three_spawns_exactly_three_actors() {
    let driver = driver_with(demo_registry(), 3);
    let report = driver.run(ScriptRef::new("demos/chain_root.rs")).unwrap();
    assert_eq!(report.total_actors_spawned, 3);
}

#[test]
fn static_tree_spawns_root_plus_two_children_plus_four_grandchildren() {
    let driver = driver_with(demo_registry(), 4);
    let report = driver.run(ScriptRef::new("demos/tree_root.rs")).unwrap();
    assert_eq!(report.total_actors_spawned, 7);
}

#[test]
fn recursive_binary_tree_depth_two_spawns_eight_actors_including_the_driver() {
    let driver = driver_with(demo_registry(), 4);
    let report = driver.run(ScriptRef::new("demos/binary_driver.rs")).unwrap();
    // the driver itself + depth-0 root + 2 at depth 1 + 4 at depth 2 (leaves) = 8
    assert_eq!(report.total_actors_spawned, 8);
}

/// The in-order assertion over all 1000 messages happens inside
/// `race_child.rs` itself: it prints an "out-of-order" diagnostic and
/// returns early if any message arrives out of sequence, or a success
/// diagnostic once all 1000 arrive in order. This test only checks that
/// the run completes and reaches quiescence with exactly the two actors
/// it spawned; seeing the success line in captured stdout is the stronger
/// check, but asserting on interleaved multi-thread stdout is out of scope
/// for an in-process integration test (see DESIGN.md's "Testing approach").
#[test]
fn spawn_cast_race_of_a_thousand_messages_completes_cleanly() {
    let driver = driver_with(demo_registry(), 4);
    let report = driver.run(ScriptRef::new("demos/race_parent.rs")).unwrap();
    assert_eq!(report.total_actors_spawned, 2);
}

#[test]
fn unknown_script_fails_without_spawning_anything() {
    let driver = driver_with(demo_registry(), 1);
    let result = driver.run(ScriptRef::new("demos/does-not-exist.rs"));
    assert!(result.is_err());
}

/// A script that never calls `recv` still terminates once it returns, and
/// the run reaches quiescence without waiting on it.
#[test]
fn an_actor_that_never_blocks_still_reaches_quiescence() {
    let registry = ScriptRegistry::new();
    registry.register(ScriptRef::new("never_blocks.rs"), |ctx| {
        Box::pin(async move {
            ctx.print("I finish without ever receiving anything");
        }) as BoxFuture
    });

    let driver = driver_with(registry, 1);
    let report = driver.run(ScriptRef::new("never_blocks.rs")).unwrap();
    assert_eq!(report.total_actors_spawned, 1);
}

/// Exercises the cast-before-spawn race end to end: the parent spawns a
/// child and casts to it in the same tick, before the coordinator could
/// possibly have processed the SPAWN on a different thread.
#[test]
fn cast_issued_immediately_after_spawn_is_still_delivered() {
    let registry = ScriptRegistry::new();
    registry.register(ScriptRef::new("race_root.rs"), |ctx| {
        Box::pin(async move {
            let child = ctx.spawn(ScriptRef::new("race_leaf.rs"));
            child.cast(&"immediate".to_string());
        }) as BoxFuture
    });
    registry.register(ScriptRef::new("race_leaf.rs"), |ctx| {
        Box::pin(async move {
            let bytes = ctx.recv().await;
            let msg: String = mote_rt::decode(&bytes).unwrap();
            ctx.print(format!("got: {msg}"));
        }) as BoxFuture
    });

    let driver = driver_with(registry, 2);
    let report = driver.run(ScriptRef::new("race_root.rs")).unwrap();
    assert_eq!(report.total_actors_spawned, 2);
}

/// A child that blocks on `recv` must wake and finish once cast to,
/// regardless of whether the coordinator's `BLOCKED` signal or the
/// parent's `CAST` is processed first — the worker's level-triggered
/// recheck resolves the race either way.
#[test]
fn a_blocked_actor_wakes_on_a_later_cast() {
    let registry = ScriptRegistry::new();
    registry.register(ScriptRef::new("waiter_root.rs"), |ctx| {
        Box::pin(async move {
            let child = ctx.spawn(ScriptRef::new("waiter_child.rs"));
            child.cast(&"wake up".to_string());
        }) as BoxFuture
    });
    registry.register(ScriptRef::new("waiter_child.rs"), |ctx| {
        Box::pin(async move {
            let bytes = ctx.recv().await;
            let msg: String = mote_rt::decode(&bytes).unwrap();
            ctx.print(format!("woke up: {msg}"));
        }) as BoxFuture
    });

    let driver = driver_with(registry, 2);
    let report = driver.run(ScriptRef::new("waiter_root.rs")).unwrap();
    assert_eq!(report.total_actors_spawned, 2);
}
