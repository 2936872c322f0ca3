//! Integration tests for loading the shipped data tables and exporting results.

mod common;

use pv_autonomy::io::consumption::read_consumption_csv;
use pv_autonomy::io::export::{export_days_csv, export_sweep_csv};
use pv_autonomy::io::generation::read_generation_csv;
use pv_autonomy::sim::soc::simulate;
use pv_autonomy::sim::sweep::{SweepGrid, sweep};

#[test]
fn demo_generation_table_loads() {
    let series = read_generation_csv(&common::data_path("generation_demo.csv")).unwrap();
    assert_eq!(series.len(), 30);
    assert_eq!(series.first_date(), Some(common::start_date()));
}

#[test]
fn demo_consumption_table_sums_devices() {
    let kwh = read_consumption_csv(&common::data_path("consumo_diario.csv")).unwrap();
    assert!((kwh - 1.33).abs() < 1e-9);
}

#[test]
fn demo_scenario_days_without_supply() {
    let series = read_generation_csv(&common::data_path("generation_demo.csv")).unwrap();
    let kwh = read_consumption_csv(&common::data_path("consumo_diario.csv")).unwrap();
    let result = simulate(&series, &common::reference_parameters(kwh)).unwrap();
    assert_eq!(result.days_below_min, 10);
}

#[test]
fn exports_write_one_row_per_record() {
    let series = common::winter_fortnight();
    let params = common::reference_parameters(1.2);
    let result = simulate(&series, &params).unwrap();
    let table = sweep(&series, &SweepGrid::default(), &params).unwrap();

    let dir = std::env::temp_dir().join(format!("pv-autonomy-export-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let days_path = dir.join("days.csv");
    let sweep_path = dir.join("sweep.csv");

    export_days_csv(&result.days, &days_path).unwrap();
    export_sweep_csv(&table, &sweep_path).unwrap();

    let days = std::fs::read_to_string(&days_path).unwrap();
    let sweep_rows = std::fs::read_to_string(&sweep_path).unwrap();
    assert_eq!(days.lines().count(), series.len() + 1);
    assert_eq!(sweep_rows.lines().count(), 26);

    std::fs::remove_dir_all(&dir).ok();
}
