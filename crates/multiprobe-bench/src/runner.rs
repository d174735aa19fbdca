//! Measurement loop: every scenario against every probe combination.
//!
//! One iteration builds a fresh selector for a (scenario, combination) pair,
//! times `get_node` over a full key round, compares the resulting shares
//! with the ideal weight shares, then removes the scenario's first node and
//! checks that only that node's keys moved.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use multiprobe_placement::{MultiProbeHash, NodeId};
use serde::Serialize;
use tracing::{debug, info};

use crate::combinations::ProbeCombination;
use crate::error::BenchError;
use crate::keys::KeySet;
use crate::scenario::Scenario;

/// Progress is logged every this many iterations.
const PROGRESS_EVERY: usize = 5;

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Keys generated per family per iteration (the round is twice this).
    pub key_count: usize,
    /// Key rounds per (scenario, combination) pair.
    pub iterations: usize,
    /// Base seed; iteration `i` uses `seed + i`.
    pub seed: u64,
    /// Load keys from this directory instead of generating them.
    pub data_dir: Option<PathBuf>,
    /// Node layouts.
    pub scenarios: Vec<Scenario>,
    /// Probe sets.
    pub combinations: Vec<ProbeCombination>,
}

impl RunSettings {
    /// Number of iterations the run performs in total.
    pub fn total_iterations(&self) -> usize {
        self.scenarios.len() * self.combinations.len() * self.iterations
    }

    /// Serializable record of these settings.
    pub fn summary(&self) -> SettingsSummary {
        SettingsSummary {
            key_count: self.key_count,
            iterations: self.iterations,
            seed: self.seed,
            data_dir: self.data_dir.clone(),
            scenarios: self.scenarios.clone(),
            combinations: self.combinations.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

/// The settings written next to a results file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSummary {
    pub key_count: usize,
    pub iterations: usize,
    pub seed: u64,
    pub data_dir: Option<PathBuf>,
    pub scenarios: Vec<Scenario>,
    pub combinations: Vec<String>,
}

/// Aggregated measurements for one (combination, scenario) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchResult {
    /// Combination label.
    pub name: String,
    /// Scenario label.
    pub distribution: String,
    /// Lookup time summed over all iterations, in milliseconds.
    pub total_time_ms: f64,
    /// `total_time_ms` divided by the number of lookups.
    pub avg_time_per_hash_ms: f64,
    /// Mean over iterations of the summed per-node share deviation, in
    /// percentage points.
    pub avg_deviation_pct: f64,
    /// Number of probes in the combination.
    pub probe_count: usize,
    /// Mean percentage of keys that moved after removing the first node.
    pub avg_moved_pct: f64,
    /// Keys that moved although the removed node did not own them.
    pub stickiness_violations: usize,
}

/// Measurements from a single iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IterationStats {
    elapsed: Duration,
    deviation_pct: f64,
    moved_pct: f64,
    violations: usize,
}

/// Runs the measurement grid.
#[derive(Debug)]
pub struct Runner {
    settings: RunSettings,
}

impl Runner {
    /// Create a runner.
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }

    /// The settings in use.
    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Run every scenario against every combination.
    ///
    /// `on_result` is called as soon as each pair finishes, so callers can
    /// stream rows to disk. Results are returned in run order.
    pub fn run<F>(&self, mut on_result: F) -> Result<Vec<BenchResult>, BenchError>
    where
        F: FnMut(&BenchResult) -> Result<(), BenchError>,
    {
        let rounds = self.key_rounds()?;
        let total = self.settings.total_iterations();
        let started = Instant::now();
        let mut completed = 0;
        let mut results =
            Vec::with_capacity(self.settings.scenarios.len() * self.settings.combinations.len());

        info!(
            scenarios = self.settings.scenarios.len(),
            combinations = self.settings.combinations.len(),
            iterations = self.settings.iterations,
            keys_per_round = rounds.first().map_or(0, Vec::len),
            "starting run"
        );

        for scenario in &self.settings.scenarios {
            for combination in &self.settings.combinations {
                let mut stats = Vec::with_capacity(rounds.len());
                for keys in &rounds {
                    stats.push(measure(scenario, combination, keys)?);
                    completed += 1;
                    if completed % PROGRESS_EVERY == 0 {
                        info!(
                            "progress: {completed}/{total} ({:.2}%) elapsed: {}",
                            completed as f64 * 100.0 / total as f64,
                            format_elapsed(started.elapsed())
                        );
                    }
                }

                let lookups: usize = rounds.iter().map(Vec::len).sum();
                let result = aggregate(scenario, combination, &stats, lookups);
                debug!(
                    combination = %result.name,
                    scenario = %result.distribution,
                    deviation = result.avg_deviation_pct,
                    time_ms = result.total_time_ms,
                    "measured pair"
                );
                on_result(&result)?;
                results.push(result);
            }
        }

        Ok(results)
    }

    /// One shuffled key round per iteration.
    fn key_rounds(&self) -> Result<Vec<Vec<String>>, BenchError> {
        let s = &self.settings;
        let loaded = match &s.data_dir {
            Some(dir) => {
                let keys = KeySet::load(dir)?;
                info!(dir = %dir.display(), keys = keys.len(), "loaded key data");
                Some(keys)
            }
            None => None,
        };

        let mut rounds = Vec::with_capacity(s.iterations);
        for i in 0..s.iterations {
            let seed = s.seed.wrapping_add(i as u64);
            let round = match &loaded {
                Some(keys) => keys.shuffled(seed),
                None => KeySet::generate(s.key_count, seed)?.shuffled(seed),
            };
            if round.is_empty() {
                return Err(BenchError::NoKeys);
            }
            rounds.push(round);
        }
        Ok(rounds)
    }
}

fn measure(
    scenario: &Scenario,
    combination: &ProbeCombination,
    keys: &[String],
) -> Result<IterationStats, BenchError> {
    let hash = scenario.build(combination.probes())?;

    let started = Instant::now();
    let owners: Vec<Option<&NodeId>> = keys.iter().map(|key| hash.get_node(key)).collect();
    let elapsed = started.elapsed();

    let deviation_pct = deviation_pct(&hash, &owners);
    let (moved_pct, violations) = churn(&hash, scenario.first_node(), keys);

    Ok(IterationStats {
        elapsed,
        deviation_pct,
        moved_pct,
        violations,
    })
}

/// Sum over all nodes of `|ideal% - observed%|`.
///
/// Nodes that received no keys contribute their whole ideal share.
fn deviation_pct(hash: &MultiProbeHash, owners: &[Option<&NodeId>]) -> f64 {
    if owners.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<&NodeId, usize> = HashMap::new();
    for owner in owners.iter().flatten() {
        *counts.entry(*owner).or_default() += 1;
    }

    let total_weight = hash.total_weight();
    hash.registry()
        .iter()
        .map(|(node, weight)| {
            let ideal = weight / total_weight * 100.0;
            let assigned = counts.get(&node).copied().unwrap_or(0);
            let observed = assigned as f64 / owners.len() as f64 * 100.0;
            (ideal - observed).abs()
        })
        .sum()
}

/// Remove `victim` and return the percentage of keys that moved plus the
/// number that moved without having been on `victim`.
fn churn(hash: &MultiProbeHash, victim: Option<&str>, keys: &[String]) -> (f64, usize) {
    let Some(victim) = victim else {
        return (0.0, 0);
    };
    if keys.is_empty() {
        return (0.0, 0);
    }

    let mut after = hash.clone();
    after.remove_node(victim);

    let moved = MultiProbeHash::reassignments(hash, &after, keys);
    let violations = moved
        .iter()
        .filter(|r| r.from.as_ref().is_none_or(|from| from != victim))
        .count();

    (moved.len() as f64 / keys.len() as f64 * 100.0, violations)
}

fn aggregate(
    scenario: &Scenario,
    combination: &ProbeCombination,
    stats: &[IterationStats],
    lookups: usize,
) -> BenchResult {
    let iterations = stats.len().max(1) as f64;
    let total_time_ms: f64 = stats.iter().map(|s| s.elapsed.as_secs_f64() * 1000.0).sum();

    BenchResult {
        name: combination.name.clone(),
        distribution: scenario.name.clone(),
        total_time_ms,
        avg_time_per_hash_ms: if lookups == 0 {
            0.0
        } else {
            total_time_ms / lookups as f64
        },
        avg_deviation_pct: stats.iter().map(|s| s.deviation_pct).sum::<f64>() / iterations,
        probe_count: combination.probe_count(),
        avg_moved_pct: stats.iter().map(|s| s.moved_pct).sum::<f64>() / iterations,
        stickiness_violations: stats.iter().map(|s| s.violations).sum(),
    }
}

/// Format a duration as `HH:MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}
