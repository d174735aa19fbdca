//! Integration test: membership changes only move the keys they must.
//!
//! Uses real digest probes and 10 000 keys per test.

use multiprobe_integration_tests::{assignments, build_hash, splitmix_keys};
use multiprobe_placement::MultiProbeHash;
use multiprobe_probes::Bundle;

const KEYS: usize = 10_000;

/// Removing B leaves every key not on B where it was; B's keys land on A or C.
#[test]
fn test_remove_node_only_moves_its_keys() {
    let keys = splitmix_keys(KEYS, 1);
    let mut hash = build_hash(
        Bundle::Standard.probes(),
        &[("A", 1.0), ("B", 1.0), ("C", 1.0)],
    );
    let before = assignments(&hash, &keys);

    hash.remove_node("B");
    let after = assignments(&hash, &keys);

    let mut moved = 0;
    for (i, (old, new)) in before.iter().zip(&after).enumerate() {
        let old = old.as_ref().expect("three nodes always yield an owner");
        let new = new.as_ref().expect("two nodes always yield an owner");
        if old == "B" {
            moved += 1;
            assert!(new == "A" || new == "C", "key {} moved to {new}", keys[i]);
        } else {
            assert_eq!(old, new, "key {} moved off surviving node {old}", keys[i]);
        }
    }
    assert!(moved > 0, "B should have owned some keys");
}

/// Adding D only moves keys onto D.
#[test]
fn test_add_node_only_moves_keys_to_it() {
    let keys = splitmix_keys(KEYS, 2);
    let mut hash = build_hash(
        Bundle::Accurate.probes(),
        &[("A", 1.0), ("B", 2.0), ("C", 1.0)],
    );
    let before = hash.clone();

    hash.add_node_with_weight("D", 1.0).unwrap();

    let moves = MultiProbeHash::reassignments(&before, &hash, &keys);
    assert!(!moves.is_empty());
    for m in &moves {
        assert_eq!(
            m.to.as_ref().map(|n| n.as_str()),
            Some("D"),
            "key {} moved from {:?} to {:?}",
            keys[m.key_index],
            m.from,
            m.to
        );
    }

    // D holds a fifth of the weight; allow generous slack.
    let ratio = moves.len() as f64 / KEYS as f64;
    assert!((0.12..0.30).contains(&ratio), "moved ratio {ratio}");
}

/// Raising a node's weight only pulls keys onto that node.
#[test]
fn test_reweight_up_only_moves_keys_to_node() {
    let keys = splitmix_keys(KEYS, 3);
    let mut hash = build_hash(
        Bundle::Standard.probes(),
        &[("A", 1.0), ("B", 1.0), ("C", 1.0)],
    );
    let before = hash.clone();

    let previous = hash.add_node_with_weight("B", 3.0).unwrap();
    assert_eq!(previous, Some(1.0));
    assert_eq!(hash.total_weight(), 5.0);

    let moves = MultiProbeHash::reassignments(&before, &hash, &keys);
    assert!(!moves.is_empty());
    for m in &moves {
        assert_eq!(m.to.as_ref().map(|n| n.as_str()), Some("B"));
    }
}

/// Removing and re-adding a node restores every assignment.
#[test]
fn test_remove_then_readd_restores_assignments() {
    let keys = splitmix_keys(KEYS, 4);
    let mut hash = build_hash(
        Bundle::Standard.probes(),
        &[("A", 25.0), ("B", 75.0), ("C", 40.0)],
    );
    let original = assignments(&hash, &keys);

    hash.remove_node("C");
    hash.add_node_with_weight("C", 40.0).unwrap();

    assert_eq!(assignments(&hash, &keys), original);
    assert_eq!(hash.total_weight(), 140.0);
}

/// Removing an unknown node is a no-op.
#[test]
fn test_remove_absent_node_is_noop() {
    let keys = splitmix_keys(1_000, 5);
    let mut hash = build_hash(Bundle::Standard.probes(), &[("A", 1.0), ("B", 1.0)]);
    let before = assignments(&hash, &keys);

    assert_eq!(hash.remove_node("Z"), None);
    assert_eq!(hash.node_count(), 2);
    assert_eq!(hash.total_weight(), 2.0);
    assert_eq!(assignments(&hash, &keys), before);
}
