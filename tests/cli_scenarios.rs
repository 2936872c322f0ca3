//! Runs the binary against the shipped scenario files.

use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pv-autonomy"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(args)
        .output()
        .expect("pv-autonomy process should run")
}

fn days_without_supply(stdout: &str) -> usize {
    stdout
        .lines()
        .find_map(|l| l.strip_prefix("Days without supply:"))
        .and_then(|v| v.trim().parse().ok())
        .expect("summary should report days without supply")
}

#[test]
fn scenarios_produce_distinct_outage_counts() {
    let baseline = run(&["--scenario", "scenarios/baseline.toml"]);
    assert!(
        baseline.status.success(),
        "{}",
        String::from_utf8_lossy(&baseline.stderr)
    );
    let small = run(&["--scenario", "scenarios/small_panel.toml"]);
    assert!(small.status.success(), "{}", String::from_utf8_lossy(&small.stderr));

    let baseline_days = days_without_supply(&String::from_utf8_lossy(&baseline.stdout));
    let small_days = days_without_supply(&String::from_utf8_lossy(&small.stdout));
    assert_eq!(baseline_days, 10);
    assert_eq!(small_days, 30);
}

#[test]
fn sweep_table_is_printed_unless_disabled() {
    let with = run(&["--scenario", "scenarios/baseline.toml"]);
    assert!(String::from_utf8_lossy(&with.stdout).contains("2 × 500W"));

    let without = run(&["--scenario", "scenarios/baseline.toml", "--no-sweep"]);
    assert!(without.status.success());
    assert!(!String::from_utf8_lossy(&without.stdout).contains("2 × 500W"));
}

#[test]
fn missing_generation_table_fails() {
    let out = run(&["--preset", "baseline"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no generation table"));
}

#[test]
fn zero_efficiency_scenario_fails() {
    let dir = std::env::temp_dir().join(format!("pv-autonomy-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let scenario = dir.join("zero_eta.toml");
    let generation =
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/generation_demo.csv");
    std::fs::write(
        &scenario,
        format!(
            "[generation]\ncsv = {:?}\n\n[efficiency]\neta_bat = 0.0\n",
            generation.display().to_string()
        ),
    )
    .unwrap();

    let out = run(&["--scenario", scenario.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("non-positive global efficiency"));
    std::fs::remove_dir_all(&dir).ok();
}
