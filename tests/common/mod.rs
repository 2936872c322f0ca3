//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use pv_autonomy::sim::efficiency::EfficiencyFactors;
use pv_autonomy::sim::types::{GenerationSample, GenerationSeries, SimulationParameters};

/// First day of every fixture series.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Consecutive daily series starting at [`start_date`].
pub fn daily_series(values: &[f64]) -> GenerationSeries {
    GenerationSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| GenerationSample::new(start_date() + Days::new(i as u64), v))
            .collect(),
    )
}

/// Two weeks alternating sunny and overcast spells (kWh per 1 kW panel).
pub fn winter_fortnight() -> GenerationSeries {
    daily_series(&[
        2.1, 1.4, 0.6, 0.3, 2.8, 3.2, 1.1, 0.4, 0.2, 0.9, 2.6, 3.0, 0.5, 0.3,
    ])
}

/// Reference installation (12 V / 250 Ah, 80% DoD, default efficiency chain).
pub fn reference_parameters(consumption_kwh: f64) -> SimulationParameters {
    SimulationParameters {
        total_consumption_kwh: consumption_kwh,
        ..SimulationParameters::default()
    }
}

/// 2000 Wh battery with a lossless chain, so demand equals consumption.
pub fn lossless_2kwh(consumption_kwh: f64) -> SimulationParameters {
    SimulationParameters {
        panel_power_kw: 1.0,
        total_consumption_kwh: consumption_kwh,
        efficiency: EfficiencyFactors::new(1.0, 1.0, 1.0, 1.0),
        battery_voltage_v: 20.0,
        battery_capacity_ah: 100.0,
        dod_pct: 80.0,
        initial_soc_pct: 100.0,
    }
}

/// Path of a file shipped under `data/`.
pub fn data_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(name)
}
