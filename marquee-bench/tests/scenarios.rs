//! Runs every bundled scenario file

use std::path::PathBuf;

use marquee_bench::Scenario;

fn scenario_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

fn run(file: &str) {
    let path = scenario_dir().join(file);
    let scenario = Scenario::load(&path).unwrap();
    let report = scenario
        .run()
        .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
    assert_eq!(report.steps, scenario.steps.len());
}

#[test]
fn test_fifo_two() {
    run("fifo_two.toml");
}

#[test]
fn test_fifo_four() {
    run("fifo_four.toml");
}

#[test]
fn test_digits_eight() {
    run("digits_eight.toml");
}

#[test]
fn test_loopback() {
    run("loopback.toml");
}

#[test]
fn test_ext_refresh() {
    run("ext_refresh.toml");
}

#[test]
fn test_fixed_color() {
    run("fixed_color.toml");
}

#[test]
fn test_every_file_parses() {
    let mut count = 0;
    for entry in std::fs::read_dir(scenario_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().map_or(false, |ext| ext == "toml") {
            Scenario::load(&path).unwrap();
            count += 1;
        }
    }
    assert!(count >= 6);
}
