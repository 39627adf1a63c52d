//! End-to-end behaviour of resources and the registry
//!
//! Run with:
//!   cargo test --test version_scenarios

use std::sync::Arc;

use arbor::version::ROOT_ID;
use arbor::{ArborError, ManualClock, Messages, Registry, VersionId};

fn registry() -> Registry {
    Registry::with_clock(Messages::default(), Arc::new(ManualClock::ticking()))
}

fn history_ids(reg: &Registry, name: &str) -> Vec<VersionId> {
    reg.history(name).unwrap().iter().map(|n| n.id()).collect()
}

#[test]
fn create_insert_snapshot_update_rollback() {
    let mut reg = registry();

    let root = reg.create("a").unwrap().active();
    assert_eq!(root.id(), ROOT_ID);
    assert!(root.is_snapshot());
    assert_eq!(root.content(), "");

    let node = reg.insert("a", "hello").unwrap();
    assert_eq!(node.id(), 1);
    assert_eq!(node.content(), "hello");
    assert!(!node.is_snapshot());

    let node = reg.insert("a", " world").unwrap();
    assert_eq!(node.id(), 1);
    assert_eq!(node.content(), "hello world");

    let node = reg.snapshot("a", Some("v1")).unwrap();
    assert_eq!(node.id(), 1);
    assert!(node.is_snapshot());

    let node = reg.update("a", "new").unwrap();
    assert_eq!(node.id(), 2);
    assert_eq!(node.content(), "new");
    assert_eq!(node.parent(), Some(1));

    assert_eq!(reg.rollback_to_parent("a").unwrap().id(), 1);
    assert_eq!(reg.rollback_to("a", 0).unwrap().id(), 0);
    assert_eq!(history_ids(&reg, "a"), vec![0]);
    assert_eq!(reg.read("a").unwrap(), "");
}

#[test]
fn snapshotted_nodes_never_change() {
    let mut reg = registry();
    reg.create("doc").unwrap();
    reg.update("doc", "frozen").unwrap();
    reg.snapshot("doc", Some("freeze")).unwrap();

    // writing branches instead of touching node 1
    reg.insert("doc", "!").unwrap();
    reg.rollback_to("doc", 1).unwrap();
    let err = reg.snapshot("doc", Some("again")).unwrap_err();
    assert!(matches!(err, ArborError::State(_)));

    let doc = reg.get("doc").unwrap();
    let frozen = doc.version(1).unwrap();
    assert_eq!(frozen.content(), "frozen");
    assert_eq!(frozen.message(), "freeze");
    assert_eq!(doc.version(2).unwrap().content(), "frozen!");
}

#[test]
fn rollback_jumps_across_branches() {
    let mut reg = registry();
    reg.create("doc").unwrap();

    // root -> 1 -> 2 and root -> 3
    reg.update("doc", "a").unwrap();
    reg.snapshot("doc", Some("a")).unwrap();
    reg.update("doc", "a2").unwrap();
    reg.rollback_to("doc", 0).unwrap();
    reg.update("doc", "b").unwrap();
    assert_eq!(reg.get("doc").unwrap().total_versions(), 4);

    let node = reg.rollback_to("doc", 2).unwrap();
    assert_eq!(node.content(), "a2");
    assert_eq!(history_ids(&reg, "doc"), vec![0, 1]);

    // ids are never reused, even after jumping around
    reg.snapshot("doc", None).unwrap();
    assert_eq!(reg.update("doc", "c").unwrap().id(), 4);
}

#[test]
fn history_counts_snapshotted_ancestors() {
    let mut reg = registry();
    reg.create("doc").unwrap();
    for i in 0..5 {
        reg.update("doc", &format!("rev {}", i)).unwrap();
        if i % 2 == 0 {
            reg.snapshot("doc", Some(format!("s{}", i).as_str())).unwrap();
        }
    }

    let history = reg.history("doc").unwrap();
    let messages: Vec<&str> = history.iter().map(|n| n.message()).collect();
    assert_eq!(messages, vec!["This is the root", "s0", "s2", "s4"]);
    assert!(history
        .windows(2)
        .all(|w| w[0].snapshot_at() < w[1].snapshot_at()));
}

#[test]
fn rankings_track_every_mutation() {
    let mut reg = registry();
    for name in ["alpha", "beta", "gamma"] {
        reg.create(name).unwrap();
    }

    reg.update("alpha", "1").unwrap();
    reg.snapshot("alpha", None).unwrap();
    reg.update("alpha", "2").unwrap();
    reg.snapshot("alpha", None).unwrap();
    reg.update("alpha", "3").unwrap();
    reg.update("beta", "1").unwrap();

    let recent: Vec<String> = reg.recent(3).unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(recent, vec!["beta", "alpha", "gamma"]);

    let biggest = reg.biggest(2).unwrap();
    assert_eq!(biggest[0].name, "alpha");
    assert_eq!(biggest[0].total_versions, 4);
    assert_eq!(biggest[1].name, "beta");

    // queries are repeatable
    assert_eq!(reg.biggest(2).unwrap(), biggest);
}
