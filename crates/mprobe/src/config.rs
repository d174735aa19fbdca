//! TOML configuration for `mprobe run`.
//!
//! Every section is optional; missing values fall back to the defaults of
//! the reference benchmark grid (35 000 keys per family, 10 iterations,
//! seven algorithms in combinations of 2 to 4 probes).

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use multiprobe_bench::{
    ProbeCombination, RunSettings, Scenario, default_scenarios, probe_combinations,
};
use multiprobe_probes::Algorithm;
use serde::Deserialize;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Key generation.
    pub keys: KeysSection,
    /// Probe combinations to compare.
    pub probes: ProbesSection,
    /// Where results go.
    pub output: OutputSection,
    /// Logging configuration.
    pub log: LogSection,
    /// Custom scenarios; the built-in list is used when empty.
    #[serde(rename = "scenario")]
    pub scenarios: Vec<ScenarioSection>,
}

/// `[keys]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeysSection {
    /// Keys generated per family per iteration.
    pub count: usize,
    /// Key rounds per (scenario, combination) pair.
    pub iterations: usize,
    /// Base RNG seed.
    pub seed: u64,
    /// Load keys from this directory instead of generating them.
    pub data_dir: Option<PathBuf>,
}

impl Default for KeysSection {
    fn default() -> Self {
        Self {
            count: 35_000,
            iterations: 10,
            seed: 0x5EED,
            data_dir: None,
        }
    }
}

/// `[probes]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProbesSection {
    /// Algorithm names to combine.
    pub algorithms: Vec<String>,
    /// Combination sizes.
    pub counts: Vec<usize>,
    /// Also measure the `standard` and `accurate` bundles.
    pub bundles: bool,
}

impl Default for ProbesSection {
    fn default() -> Self {
        Self {
            algorithms: [
                "crc32", "md4", "md5", "sha1", "sha256", "sha3-224", "sha512",
            ]
            .map(String::from)
            .to_vec(),
            counts: vec![2, 3, 4],
            bundles: true,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory for `results{N}.csv` / `results{N}.json`.
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// One `[[scenario]]` table.
///
/// ```toml
/// [[scenario]]
/// name = "hot spare"
/// nodes = { primary = 60, secondary = 30, spare = 10 }
/// ```
#[derive(Debug, Deserialize)]
pub struct ScenarioSection {
    pub name: String,
    /// Node id to weight, in file order.
    pub nodes: toml::Table,
}

impl ScenarioSection {
    fn to_scenario(&self) -> anyhow::Result<Scenario> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (id, value) in &self.nodes {
            let weight = match value {
                toml::Value::Float(f) => *f,
                toml::Value::Integer(i) => *i as f64,
                other => bail!(
                    "scenario {:?}: weight of node {id:?} must be a number, got {}",
                    self.name,
                    other.type_str()
                ),
            };
            nodes.push((id.clone(), weight));
        }
        if nodes.is_empty() {
            bail!("scenario {:?} has no nodes", self.name);
        }
        Ok(Scenario::new(self.name.clone(), nodes))
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read {}", p.display()))?;
                let config: CliConfig = toml::from_str(&content)
                    .with_context(|| format!("failed to parse {}", p.display()))?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Configured algorithms, parsed.
    pub fn algorithms(&self) -> anyhow::Result<Vec<Algorithm>> {
        self.probes
            .algorithms
            .iter()
            .map(|name| name.parse::<Algorithm>().map_err(anyhow::Error::from))
            .collect()
    }

    /// Effective scenario list.
    pub fn scenarios(&self) -> anyhow::Result<Vec<Scenario>> {
        if self.scenarios.is_empty() {
            return Ok(default_scenarios());
        }
        self.scenarios
            .iter()
            .map(ScenarioSection::to_scenario)
            .collect()
    }

    /// Effective probe combinations.
    pub fn combinations(&self) -> anyhow::Result<Vec<ProbeCombination>> {
        let mut combos = probe_combinations(&self.algorithms()?, &self.probes.counts);
        if !self.probes.bundles {
            combos.retain(|c| c.bundle.is_none());
        }
        if combos.is_empty() {
            bail!("no probe combinations to measure; check [probes] algorithms and counts");
        }
        Ok(combos)
    }

    /// Everything the runner needs.
    pub fn run_settings(&self) -> anyhow::Result<RunSettings> {
        Ok(RunSettings {
            key_count: self.keys.count,
            iterations: self.keys.iterations,
            seed: self.keys.seed,
            data_dir: self.keys.data_dir.clone(),
            scenarios: self.scenarios()?,
            combinations: self.combinations()?,
        })
    }
}
