//! `mprobe`: measure and try out multi-probe consistent hashing.
//!
//! # Usage
//!
//! ```text
//! mprobe run                                   # full benchmark grid
//! mprobe run -c mprobe.toml -n 5000 -i 2       # config file plus overrides
//! mprobe generate --amount 100000 --target-dir ./data
//! mprobe lookup --nodes a:1,b:3 --bundle accurate user-42 user-43
//! mprobe algorithms                            # list probes and bundles
//! ```

mod config;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use multiprobe_bench::report::{self, CsvReport};
use multiprobe_bench::{KeySet, Runner};
use multiprobe_placement::{DEFAULT_WEIGHT, MultiProbeHash};
use multiprobe_probes::{Algorithm, Bundle, probe_set};
use tracing::{info, warn};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "mprobe",
    version,
    about = "Multi-probe consistent hashing benchmark and lookup tool"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scenario against every probe combination.
    Run {
        /// Keys generated per family per iteration.
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Key rounds per scenario and combination.
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Base RNG seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Load keys from this directory instead of generating them.
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Directory for the results files.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Combination sizes, e.g. `2,3`.
        #[arg(short, long, value_delimiter = ',')]
        probe_counts: Vec<usize>,
    },

    /// Generate key files for later runs.
    Generate {
        /// Items per key family.
        #[arg(long)]
        amount: usize,

        /// Directory to write the JSON files to.
        #[arg(long)]
        target_dir: PathBuf,

        /// RNG seed (defaults to `[keys] seed`).
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show which node each key maps to.
    Lookup {
        /// Nodes as `id` or `id:weight`, comma separated.
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<String>,

        /// Probe bundle: `standard` or `accurate`.
        #[arg(long, conflicts_with = "algorithms")]
        bundle: Option<Bundle>,

        /// Explicit probe list, e.g. `crc32,sha256`.
        #[arg(long, value_delimiter = ',')]
        algorithms: Vec<Algorithm>,

        /// Keys to look up.
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List supported algorithms and bundles.
    Algorithms,
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    match cli.command {
        Commands::Run {
            count,
            iterations,
            seed,
            data_dir,
            output_dir,
            probe_counts,
        } => {
            // CLI args override config file values.
            if let Some(count) = count {
                config.keys.count = count;
            }
            if let Some(iterations) = iterations {
                config.keys.iterations = iterations;
            }
            if let Some(seed) = seed {
                config.keys.seed = seed;
            }
            if let Some(dir) = data_dir {
                config.keys.data_dir = Some(dir);
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if !probe_counts.is_empty() {
                config.probes.counts = probe_counts;
            }
            cmd_run(&config)
        }
        Commands::Generate {
            amount,
            target_dir,
            seed,
        } => cmd_generate(amount, &target_dir, seed.unwrap_or(config.keys.seed)),
        Commands::Lookup {
            nodes,
            bundle,
            algorithms,
            keys,
        } => cmd_lookup(&nodes, bundle, &algorithms, &keys),
        Commands::Algorithms => {
            cmd_algorithms();
            Ok(())
        }
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// -----------------------------------------------------------------------
// mprobe run
// -----------------------------------------------------------------------

fn cmd_run(config: &CliConfig) -> Result<()> {
    let settings = config.run_settings()?;
    info!(
        keys = settings.key_count,
        iterations = settings.iterations,
        seed = settings.seed,
        scenarios = settings.scenarios.len(),
        combinations = settings.combinations.len(),
        total_iterations = settings.total_iterations(),
        "run configuration"
    );

    let files =
        report::next_result_files(&config.output.dir).context("failed to pick a results file")?;
    report::write_settings(&files.json, &settings.summary())
        .context("failed to write run settings")?;
    let mut csv = CsvReport::create(&files.csv).context("failed to create results CSV")?;

    let started = Instant::now();
    let mut results = Runner::new(settings).run(|row| csv.write_row(row))?;
    csv.finish().context("failed to flush results CSV")?;

    report::sort_results(&mut results);
    println!("Results:");
    print!("{}", report::render_table(&results));

    let violations: usize = results.iter().map(|r| r.stickiness_violations).sum();
    if violations > 0 {
        warn!(violations, "keys moved between surviving nodes");
    }

    let lookup_ms: f64 = results.iter().map(|r| r.total_time_ms).sum();
    info!(
        csv = %files.csv.display(),
        lookup_ms = lookup_ms.round(),
        wall = %multiprobe_bench::format_elapsed(started.elapsed()),
        "run complete"
    );
    println!("Total time: {}ms", lookup_ms.round());

    Ok(())
}

// -----------------------------------------------------------------------
// mprobe generate
// -----------------------------------------------------------------------

fn cmd_generate(amount: usize, target_dir: &Path, seed: u64) -> Result<()> {
    let keys = KeySet::generate(amount, seed).context("failed to generate keys")?;
    keys.save(target_dir)
        .with_context(|| format!("failed to write keys to {}", target_dir.display()))?;
    info!(amount, seed, dir = %target_dir.display(), "generated key files");
    Ok(())
}

// -----------------------------------------------------------------------
// mprobe lookup
// -----------------------------------------------------------------------

fn cmd_lookup(
    nodes: &[String],
    bundle: Option<Bundle>,
    algorithms: &[Algorithm],
    keys: &[String],
) -> Result<()> {
    let probes = if algorithms.is_empty() {
        bundle.unwrap_or(Bundle::Standard).probes()
    } else {
        probe_set(algorithms)
    };

    let mut hash = MultiProbeHash::with_probes(probes);
    for spec in nodes {
        let (id, weight) = parse_node_spec(spec)?;
        hash.add_node_with_weight(id, weight)?;
    }

    println!("probes: {}", hash.probes().label());
    for key in keys {
        match hash.get_node(key) {
            Some(node) => println!("{key} -> {node}"),
            None => println!("{key} -> (no node)"),
        }
    }
    Ok(())
}

/// Parse `id` or `id:weight`.
fn parse_node_spec(spec: &str) -> Result<(&str, f64)> {
    let spec = spec.trim();
    let (id, weight) = match spec.rsplit_once(':') {
        Some((id, weight)) => {
            let weight = weight
                .trim()
                .parse::<f64>()
                .with_context(|| format!("invalid weight in node spec {spec:?}"))?;
            (id.trim(), weight)
        }
        None => (spec, DEFAULT_WEIGHT),
    };
    if id.is_empty() {
        bail!("empty node id in node spec {spec:?}");
    }
    Ok((id, weight))
}

// -----------------------------------------------------------------------
// mprobe algorithms
// -----------------------------------------------------------------------

fn cmd_algorithms() {
    println!("Algorithms:");
    for algorithm in Algorithm::ALL {
        println!("  {algorithm}");
    }
    println!();
    println!("Bundles:");
    for bundle in Bundle::ALL {
        println!("  {bundle:<9} {}", bundle.probes().label());
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
