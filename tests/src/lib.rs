//! Shared helpers for the multi-probe integration tests.
//!
//! Keys come from a splitmix64 stream so every statistical assertion runs
//! against the same data on every machine.

use std::collections::HashMap;

use multiprobe_placement::{MultiProbeHash, NodeId, ProbeSet};
use multiprobe_probes::{Algorithm, probe_set};

/// `count` pseudo-random 16-character hex keys from a splitmix64 stream.
pub fn splitmix_keys(count: usize, seed: u64) -> Vec<String> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            format!("{z:016x}")
        })
        .collect()
}

/// A six-probe set, larger than either bundle.
pub fn six_probes() -> ProbeSet {
    probe_set(&[
        Algorithm::Crc32,
        Algorithm::Sha1,
        Algorithm::Md4,
        Algorithm::Md5,
        Algorithm::Sha256,
        Algorithm::Sha512,
    ])
}

/// Selector with `probes` and the given weighted nodes.
pub fn build_hash(probes: ProbeSet, nodes: &[(&str, f64)]) -> MultiProbeHash {
    let mut hash = MultiProbeHash::with_probes(probes);
    for &(id, weight) in nodes {
        hash.add_node_with_weight(id, weight)
            .expect("test weights are valid");
    }
    hash
}

/// Owner of every key, in key order.
pub fn assignments(hash: &MultiProbeHash, keys: &[String]) -> Vec<Option<NodeId>> {
    keys.iter().map(|k| hash.get_node(k).cloned()).collect()
}

/// Fraction of `keys` owned by each node.
pub fn shares(hash: &MultiProbeHash, keys: &[String]) -> HashMap<NodeId, f64> {
    let mut counts: HashMap<NodeId, usize> = HashMap::new();
    for key in keys {
        if let Some(node) = hash.get_node(key) {
            *counts.entry(node.clone()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(node, count)| (node, count as f64 / keys.len() as f64))
        .collect()
}

/// Fraction of `keys` owned by `node` (0 when it owns none).
pub fn share_of(hash: &MultiProbeHash, keys: &[String], node: &str) -> f64 {
    shares(hash, keys).get(node).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splitmix_keys_are_stable() {
        let keys = splitmix_keys(3, 42);
        assert_eq!(
            keys,
            vec!["bdd732262feb6e95", "28efe333b266f103", "47526757130f9f52"]
        );
    }
}
