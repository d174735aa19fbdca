//! Weighted node layouts to measure against.

use multiprobe_placement::{MultiProbeHash, ProbeSet};
use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// A named set of weighted nodes.
///
/// Node order is significant: the first node is the one removed when
/// measuring churn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Label shown in reports, e.g. `"25 75"`.
    pub name: String,
    /// `(node id, weight)` pairs.
    pub nodes: Vec<(String, f64)>,
}

impl Scenario {
    /// Create a scenario from explicit nodes.
    pub fn new<I, S>(name: impl Into<String>, nodes: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            nodes: nodes.into_iter().map(|(id, w)| (id.into(), w)).collect(),
        }
    }

    /// `node1..nodeN` with the given weights, named after the weights.
    pub fn weighted(weights: &[f64]) -> Self {
        let name = weights
            .iter()
            .map(|&w| format_weight(w))
            .collect::<Vec<_>>()
            .join(" ");
        Self::new(
            name,
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| (format!("node{}", i + 1), w)),
        )
    }

    /// `count` nodes sharing 100 equally.
    pub fn equal_split(count: usize) -> Self {
        Self::weighted(&vec![100.0 / count as f64; count])
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.nodes.iter().map(|(_, w)| w).sum()
    }

    /// The node removed during churn measurement.
    pub fn first_node(&self) -> Option<&str> {
        self.nodes.first().map(|(id, _)| id.as_str())
    }

    /// Build a selector with these nodes and `probes`.
    pub fn build(&self, probes: ProbeSet) -> Result<MultiProbeHash, BenchError> {
        let mut hash = MultiProbeHash::with_probes(probes);
        hash.add_nodes(self.nodes.iter().map(|(id, w)| (id.as_str(), Some(*w))))?;
        Ok(hash)
    }
}

/// The built-in scenario list.
pub fn default_scenarios() -> Vec<Scenario> {
    let mut scenarios = vec![
        Scenario::weighted(&[50.0, 50.0]),
        Scenario::weighted(&[25.0, 75.0]),
        Scenario::weighted(&[20.0, 30.0, 50.0]),
    ];
    scenarios.extend((4..=11).map(Scenario::equal_split));
    scenarios.push(Scenario::weighted(&[15.0, 15.0, 25.0, 45.0]));
    scenarios.push(Scenario::weighted(&[50.0, 20.0, 20.0, 5.0, 5.0]));
    scenarios.extend((2..=5).map(|n| Scenario::weighted(&vec![1.0; n])));
    scenarios
}

/// Weight rounded to two decimals, without trailing zeros.
fn format_weight(weight: f64) -> String {
    let s = format!("{weight:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
