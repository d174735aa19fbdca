//! Integration test: the measurement harness end to end.
//!
//! Generate key files, run a reduced grid from them, write the CSV and
//! settings JSON, then check the sorted rows.

use multiprobe_bench::report::{self, CsvReport};
use multiprobe_bench::{
    KeySet, RunSettings, Runner, Scenario, default_scenarios, probe_combinations,
};
use multiprobe_probes::Algorithm;

#[test]
#[ntest::timeout(60000)]
fn test_run_from_saved_keys() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let out_dir = dir.path().join("results");

    KeySet::generate(400, 77).unwrap().save(&data_dir).unwrap();

    let scenarios: Vec<Scenario> = default_scenarios()
        .into_iter()
        .filter(|s| ["25 75", "20 30 50", "1 1 1"].contains(&s.name.as_str()))
        .collect();
    assert_eq!(scenarios.len(), 3);

    let settings = RunSettings {
        key_count: 0,
        iterations: 2,
        seed: 1,
        data_dir: Some(data_dir),
        scenarios,
        combinations: probe_combinations(
            &[Algorithm::Crc32, Algorithm::Md5, Algorithm::Sha1],
            &[2],
        ),
    };
    // 3 scenarios x (2 bundles + 3 pairs) x 2 iterations
    assert_eq!(settings.total_iterations(), 30);

    let files = report::next_result_files(&out_dir).unwrap();
    report::write_settings(&files.json, &settings.summary()).unwrap();
    let mut csv = CsvReport::create(&files.csv).unwrap();

    let mut results = Runner::new(settings).run(|row| csv.write_row(row)).unwrap();
    assert_eq!(csv.rows(), 15);
    csv.finish().unwrap();

    for row in &results {
        assert_eq!(
            row.stickiness_violations, 0,
            "{} on {} moved keys between surviving nodes",
            row.name, row.distribution
        );
        assert!(row.avg_deviation_pct.is_finite());
    }

    report::sort_results(&mut results);
    for pair in results.windows(2) {
        assert!(pair[0].avg_deviation_pct <= pair[1].avg_deviation_pct);
    }

    let text = std::fs::read_to_string(&files.csv).unwrap();
    assert_eq!(text.lines().count(), 16);
    let md5_sha1 = "\"md5, sha1\",20 30 50,";
    assert!(text.lines().any(|l| l.starts_with(md5_sha1)));

    // The next run picks a fresh file.
    let next = report::next_result_files(&out_dir).unwrap();
    assert_eq!(next.csv, out_dir.join("results2.csv"));
}
