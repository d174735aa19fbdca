//! Probe combinations to compare.

use multiprobe_placement::ProbeSet;
use multiprobe_probes::{Algorithm, Bundle, probe_set};

/// Every `k`-element subset of `items`, in lexicographic index order.
///
/// Returns nothing when `k` is zero or larger than `items.len()`.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i].clone()).collect());

        // Rightmost index that can still advance.
        let Some(pos) = (0..k).rev().find(|&i| indices[i] != n - k + i) else {
            return result;
        };
        indices[pos] += 1;
        for j in pos + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// A labelled, ordered list of algorithms measured as one probe set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCombination {
    /// Display label: the bundle name, or the algorithm names joined by `", "`.
    pub name: String,
    /// Algorithms in probe order.
    pub algorithms: Vec<Algorithm>,
    /// The bundle this combination came from, if any.
    pub bundle: Option<Bundle>,
}

impl ProbeCombination {
    /// Combination labelled with its algorithm names.
    pub fn from_algorithms(algorithms: Vec<Algorithm>) -> Self {
        let name = algorithms
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            name,
            algorithms,
            bundle: None,
        }
    }

    /// Combination for a named bundle.
    pub fn from_bundle(bundle: Bundle) -> Self {
        Self {
            name: bundle.name().to_string(),
            algorithms: bundle.algorithms().to_vec(),
            bundle: Some(bundle),
        }
    }

    /// Number of probes.
    pub fn probe_count(&self) -> usize {
        self.algorithms.len()
    }

    /// Build the probe set.
    pub fn probes(&self) -> ProbeSet {
        probe_set(&self.algorithms)
    }
}

/// The `standard` and `accurate` bundles followed by every combination of
/// `algorithms` for each size in `probe_counts`.
///
/// Repeated sizes are only expanded once.
pub fn probe_combinations(
    algorithms: &[Algorithm],
    probe_counts: &[usize],
) -> Vec<ProbeCombination> {
    let mut result: Vec<ProbeCombination> = Bundle::ALL
        .into_iter()
        .map(ProbeCombination::from_bundle)
        .collect();

    let mut expanded = Vec::with_capacity(probe_counts.len());
    for &k in probe_counts {
        if expanded.contains(&k) {
            continue;
        }
        expanded.push(k);
        result.extend(
            combinations(algorithms, k)
                .into_iter()
                .map(ProbeCombination::from_algorithms),
        );
    }
    result
}
