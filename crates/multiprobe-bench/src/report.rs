//! CSV, JSON and console output for run results.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::BenchError;
use crate::runner::{BenchResult, SettingsSummary};

/// Column names of the results CSV.
pub const CSV_HEADER: [&str; 8] = [
    "name",
    "distribution",
    "totalTime",
    "avgTimePerHash",
    "avgDeviationFromPerfectPercentage",
    "probeCount",
    "avgMovedPercentage",
    "stickinessViolations",
];

/// Highest `N` tried for `results{N}.csv`.
pub const MAX_RESULT_FILES: u32 = 100;

/// Paths of one results CSV and its settings JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Pick the first `results{N}.csv` in `dir` that does not exist yet.
///
/// Creates `dir` if needed.
pub fn next_result_files(dir: &Path) -> Result<ResultFiles, BenchError> {
    fs::create_dir_all(dir)?;
    for n in 1..=MAX_RESULT_FILES {
        let csv = dir.join(format!("results{n}.csv"));
        if !csv.exists() {
            return Ok(ResultFiles {
                json: csv.with_extension("json"),
                csv,
            });
        }
    }
    Err(BenchError::NoFreeResultFile {
        dir: dir.to_path_buf(),
        max: MAX_RESULT_FILES,
    })
}

/// Write the run settings as pretty-printed JSON.
pub fn write_settings(path: &Path, settings: &SettingsSummary) -> Result<(), BenchError> {
    fs::write(path, serde_json::to_vec_pretty(settings)?)?;
    info!(path = %path.display(), "wrote run settings");
    Ok(())
}

/// Streaming CSV writer for [`BenchResult`] rows.
///
/// Fields are quoted per RFC 4180 when they contain a comma, quote or line
/// break.
#[derive(Debug)]
pub struct CsvReport<W: Write> {
    out: W,
    rows: usize,
}

impl CsvReport<BufWriter<File>> {
    /// Create `path` and write the header.
    pub fn create(path: &Path) -> Result<Self, BenchError> {
        let report = Self::new(BufWriter::new(File::create(path)?))?;
        info!(path = %path.display(), "writing results");
        Ok(report)
    }
}

impl<W: Write> CsvReport<W> {
    /// Wrap `out` and write the header.
    pub fn new(mut out: W) -> Result<Self, BenchError> {
        write_record(&mut out, CSV_HEADER.iter().map(|h| Cow::Borrowed(*h)))?;
        Ok(Self { out, rows: 0 })
    }

    /// Append one row and flush it.
    pub fn write_row(&mut self, row: &BenchResult) -> Result<(), BenchError> {
        let fields = [
            Cow::Borrowed(row.name.as_str()),
            Cow::Borrowed(row.distribution.as_str()),
            Cow::Owned(row.total_time_ms.to_string()),
            Cow::Owned(row.avg_time_per_hash_ms.to_string()),
            Cow::Owned(row.avg_deviation_pct.to_string()),
            Cow::Owned(row.probe_count.to_string()),
            Cow::Owned(row.avg_moved_pct.to_string()),
            Cow::Owned(row.stickiness_violations.to_string()),
        ];
        write_record(&mut self.out, fields.into_iter())?;
        self.out.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, excluding the header.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W, BenchError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

fn write_record<'a, W: Write>(
    out: &mut W,
    fields: impl Iterator<Item = Cow<'a, str>>,
) -> Result<(), BenchError> {
    let line = fields
        .map(|f| quote_field(&f).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{line}")?;
    Ok(())
}

/// Quote a CSV field if it needs it, doubling embedded quotes.
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Sort by deviation, then total time, both ascending.
pub fn sort_results(results: &mut [BenchResult]) {
    results.sort_by(|a, b| {
        a.avg_deviation_pct
            .total_cmp(&b.avg_deviation_pct)
            .then_with(|| a.total_time_ms.total_cmp(&b.total_time_ms))
    });
}

/// Fixed-width summary table, one line per result.
pub fn render_table(results: &[BenchResult]) -> String {
    let name_width = results
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("probes".len()))
        .max()
        .unwrap_or(0);
    let dist_width = results
        .iter()
        .map(|r| r.distribution.len())
        .chain(std::iter::once("distribution".len()))
        .max()
        .unwrap_or(0);

    let header = format!(
        "{:<name_width$}  {:<dist_width$}  {:>12}  {:>12}  {:>10}  {:>6}  {:>8}  {:>10}",
        "probes",
        "distribution",
        "total",
        "per hash",
        "deviation",
        "count",
        "moved",
        "violations"
    );
    let rows = results.iter().map(|r| {
        format!(
            "{:<name_width$}  {:<dist_width$}  {:>10.2}ms  {:>10.6}ms  {:>9.2}%  {:>6}  {:>7.2}%  {:>10}",
            r.name,
            r.distribution,
            r.total_time_ms,
            r.avg_time_per_hash_ms,
            r.avg_deviation_pct,
            r.probe_count,
            r.avg_moved_pct,
            r.stickiness_violations,
        )
    });

    std::iter::once(header)
        .chain(rows)
        .map(|line| line + "\n")
        .collect()
}
