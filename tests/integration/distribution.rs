//! Integration test: key shares follow node weights.

use multiprobe_integration_tests::{build_hash, share_of, six_probes, splitmix_keys};
use multiprobe_placement::MultiProbeHash;
use multiprobe_probes::{Algorithm, Bundle, probe_set};

const KEYS: usize = 10_000;
const SEED: u64 = 42;

/// Distance of B's share from the ideal 75% on a 25/75 split.
fn skew_error(hash: &MultiProbeHash, keys: &[String]) -> f64 {
    (share_of(hash, keys, "B") - 0.75).abs()
}

#[test]
fn test_weighted_split_standard() {
    let keys = splitmix_keys(KEYS, SEED);
    let hash = build_hash(Bundle::Standard.probes(), &[("A", 25.0), ("B", 75.0)]);

    let b = share_of(&hash, &keys, "B");
    assert!((0.71..=0.79).contains(&b), "B share {b:.4} not near 0.75");
    assert!((share_of(&hash, &keys, "A") + b - 1.0).abs() < 1e-9);
}

#[test]
fn test_weighted_split_accurate() {
    let keys = splitmix_keys(KEYS, SEED);
    let hash = build_hash(Bundle::Accurate.probes(), &[("A", 25.0), ("B", 75.0)]);

    let b = share_of(&hash, &keys, "B");
    assert!((0.71..=0.79).contains(&b), "B share {b:.4} not near 0.75");
}

/// Six probes do not make the split materially worse than three.
#[test]
fn test_more_probes_do_not_worsen_split() {
    let keys = splitmix_keys(KEYS, SEED);
    let nodes = [("A", 25.0), ("B", 75.0)];

    let three = skew_error(&build_hash(Bundle::Standard.probes(), &nodes), &keys);
    let six = skew_error(&build_hash(six_probes(), &nodes), &keys);

    assert!(
        six <= three + 0.01,
        "six-probe error {six:.4} vs three-probe {three:.4}"
    );
}

#[test]
fn test_equal_nodes_split_evenly() {
    let keys = splitmix_keys(KEYS, SEED);
    let hash = build_hash(
        Bundle::Standard.probes(),
        &[("A", 1.0), ("B", 1.0), ("C", 1.0)],
    );

    for node in ["A", "B", "C"] {
        let share = share_of(&hash, &keys, node);
        assert!(
            (share - 1.0 / 3.0).abs() < 0.04,
            "{node} share {share:.4} not near 1/3"
        );
    }
}

/// `crc32("hellonode1") = 1181947054` beats `crc32("hellonode2") = 3749332244`.
#[test]
fn test_crc32_hello_maps_to_node1() {
    let hash = build_hash(
        probe_set(&[Algorithm::Crc32]),
        &[("node1", 1.0), ("node2", 1.0)],
    );
    assert_eq!(Algorithm::Crc32.score(b"hellonode1"), 1_181_947_054);
    assert_eq!(Algorithm::Crc32.score(b"hellonode2"), 3_749_332_244);
    assert_eq!(hash.get_node("hello").map(|n| n.as_str()), Some("node1"));
}

/// Same contents, different insertion order, same answers.
#[test]
fn test_insertion_order_does_not_matter() {
    let keys = splitmix_keys(2_000, 7);
    let forward = build_hash(
        Bundle::Accurate.probes(),
        &[("A", 2.0), ("B", 1.0), ("C", 3.0)],
    );
    let backward = build_hash(
        Bundle::Accurate.probes(),
        &[("C", 3.0), ("B", 1.0), ("A", 2.0)],
    );

    assert!(MultiProbeHash::reassignments(&forward, &backward, &keys).is_empty());
}

#[test]
fn test_no_probes_or_nodes_yield_no_node() {
    let empty_probes = build_hash(probe_set(&[]), &[("A", 1.0)]);
    assert!(!empty_probes.has_probes());
    assert_eq!(empty_probes.get_node("anything"), None);

    let empty_nodes = build_hash(Bundle::Standard.probes(), &[]);
    assert_eq!(empty_nodes.get_node("anything"), None);
}
