//! Integration test: a shared selector under concurrent lookups and
//! membership changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use multiprobe_integration_tests::splitmix_keys;
use multiprobe_placement::{MultiProbeHash, SharedHash};
use multiprobe_probes::Bundle;

/// Readers keep getting valid owners while a writer flips a node in and out.
#[test]
#[ntest::timeout(30000)]
fn test_lookups_during_membership_churn() {
    let shared = SharedHash::new(MultiProbeHash::with_probes(Bundle::Standard.probes()));
    shared
        .add_nodes([("A", Some(1.0)), ("B", Some(2.0)), ("C", None)])
        .unwrap();

    let keys = Arc::new(splitmix_keys(2_000, 9));
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let keys = Arc::clone(&keys);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut lookups = 0usize;
                while !stop.load(Ordering::Relaxed) {
                    for key in keys.iter() {
                        let node = shared.get_node(key).expect("nodes are always present");
                        assert!(
                            ["A", "B", "C", "D"].contains(&node.as_str()),
                            "unexpected owner {node}"
                        );
                        lookups += 1;
                    }
                }
                lookups
            })
        })
        .collect();

    for _ in 0..50 {
        shared.add_node_with_weight("D", 1.5).unwrap();
        shared.remove_node("D");
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(shared.node_count(), 3);
    assert_eq!(shared.total_weight(), 4.0);
}

/// After concurrent churn settles, answers match a fresh selector.
#[test]
#[ntest::timeout(30000)]
fn test_settled_state_matches_fresh_selector() {
    let shared = SharedHash::default();
    shared.set_hash_functions(Bundle::Accurate.probes());

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || {
                for round in 0..25 {
                    let id = format!("node-{i}-{round}");
                    shared.add_node_with_weight(id.as_str(), 1.0).unwrap();
                    if round % 2 == 1 {
                        shared.remove_node(&id);
                    }
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    // Each writer keeps its even rounds: 13 nodes.
    assert_eq!(shared.node_count(), 4 * 13);

    let mut fresh = MultiProbeHash::with_probes(Bundle::Accurate.probes());
    for i in 0..4 {
        for round in (0..25).step_by(2) {
            fresh
                .add_node_with_weight(format!("node-{i}-{round}"), 1.0)
                .unwrap();
        }
    }

    let keys = splitmix_keys(1_000, 10);
    let snapshot = shared.snapshot();
    assert!(MultiProbeHash::reassignments(&snapshot, &fresh, &keys).is_empty());
    for key in &keys {
        assert_eq!(shared.get_node(key).as_ref(), fresh.get_node(key));
    }
}
