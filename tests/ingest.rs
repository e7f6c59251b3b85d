//! Loader round-trips: write seed files to a temp directory, ingest them,
//! and pool the result.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;

use seedpool::data::{load_directory, IngestDiagnostic, MissingQuantityPolicy, SeedPattern};
use seedpool::{mean_err_of_data, AnalysisConfig};

fn write_file(dir: &Path, name: &str, content: &str) {
    let mut f = File::create(dir.join(name)).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

#[test]
fn ingest_then_pool() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "run.1.dat",
        "# first seed\nenergy\n1.0\n2.0\n3.0\n4.0\n5.0\n6.0\n7.0\n8.0\n",
    );
    write_file(
        dir.path(),
        "run.2.dat",
        "energy\n2.0\n3.0\n4.0\n5.0\n6.0\n7.0\n8.0\n9.0\n",
    );

    let (dataset, diagnostics) = load_directory(
        dir.path(),
        &SeedPattern::new("run.", ".dat"),
        &["energy"],
        MissingQuantityPolicy::Fail,
    )
    .unwrap();
    assert!(diagnostics.is_empty());

    let report = mean_err_of_data(&dataset, None, None, &AnalysisConfig::default()).unwrap();
    let (mean, error) = report.estimates["energy"].scalar().unwrap();
    assert!((mean - 5.0).abs() < 1e-12);
    assert!((error - 0.5).abs() < 1e-12);
}

#[test]
fn corrupt_seed_does_not_abort_the_batch() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "run.1.dat", "energy\n1.0\n2.0\n");
    write_file(dir.path(), "run.2.dat", "energy\n3.0\n4.0\n");
    write_file(dir.path(), "run.3.dat", "energy\n3.0\noops\n");

    let (dataset, diagnostics) = load_directory(
        dir.path(),
        &SeedPattern::new("run.", ".dat"),
        &["energy"],
        MissingQuantityPolicy::Fail,
    )
    .unwrap();

    let energy = dataset.get("energy").unwrap();
    assert_eq!(energy.seeds().collect::<Vec<_>>(), vec!["1", "2"]);
    assert_eq!(diagnostics.len(), 1);
    let IngestDiagnostic::SkippedSeed { seed, reason, .. } = &diagnostics[0] else {
        panic!("expected SkippedSeed, got {:?}", diagnostics[0]);
    };
    assert_eq!(seed, "3");
    assert!(reason.contains("invalid numeric value"));
}

#[test]
fn multi_column_files_feed_multiple_quantities() {
    let dir = TempDir::new().unwrap();
    for (seed, offset) in [("a", 0.0), ("b", 1.0)] {
        let mut content = String::from("energy magnetization\n");
        for t in 0..6 {
            content.push_str(&format!("{} {}\n", t as f64 + offset, 0.5 - offset * 0.1));
        }
        write_file(dir.path(), &format!("run.{}.dat", seed), &content);
    }

    let (dataset, diagnostics) = load_directory(
        dir.path(),
        &SeedPattern::new("run.", ".dat"),
        &["energy", "magnetization"],
        MissingQuantityPolicy::Fail,
    )
    .unwrap();

    assert!(diagnostics.is_empty());
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.get("magnetization").unwrap().len(), 2);
    assert_eq!(dataset.get("energy").unwrap().get("b").unwrap()[[0]], 1.0);
}
