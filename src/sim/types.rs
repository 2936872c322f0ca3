//! Core simulation types: input series, parameter set, and per-day results.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::balance::BalanceKind;
use super::efficiency::EfficiencyFactors;

/// Daily generation of a 1 kW reference panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationSample {
    /// Calendar day of the sample.
    pub date: NaiveDate,
    /// Energy produced by the 1 kW reference panel that day (kWh).
    pub energy_1kw_kwh: f64,
}

impl GenerationSample {
    /// Creates a new sample.
    pub fn new(date: NaiveDate, energy_1kw_kwh: f64) -> Self {
        Self {
            date,
            energy_1kw_kwh,
        }
    }
}

/// Ordered, date-unique sequence of generation samples.
///
/// Construction sorts by date and drops repeated dates (first occurrence
/// wins), so iteration always yields strictly increasing dates.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use pv_autonomy::sim::types::{GenerationSample, GenerationSeries};
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let series = GenerationSeries::new(vec![
///     GenerationSample::new(d(2), 3.0),
///     GenerationSample::new(d(1), 2.0),
///     GenerationSample::new(d(2), 9.0),
/// ]);
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.first_date(), Some(d(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GenerationSeries {
    samples: Vec<GenerationSample>,
}

impl GenerationSeries {
    /// Builds a series from samples in any order.
    pub fn new(mut samples: Vec<GenerationSample>) -> Self {
        samples.sort_by_key(|s| s.date);
        samples.dedup_by_key(|s| s.date);
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[GenerationSample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenerationSample> {
        self.samples.iter()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.samples.first().map(|s| s.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.samples.last().map(|s| s.date)
    }
}

impl<'a> IntoIterator for &'a GenerationSeries {
    type Item = &'a GenerationSample;
    type IntoIter = std::slice::Iter<'a, GenerationSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Complete parameter set for a single-scenario run.
///
/// Range checks (etas in `[0, 1]`, percentages in `[0, 100]`, positive
/// power, voltage and capacity) belong to the caller; the engine only
/// rejects a non-positive global efficiency or battery energy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationParameters {
    /// Installed panel power (kW).
    pub panel_power_kw: f64,
    /// Daily consumption of all loads (kWh/day).
    pub total_consumption_kwh: f64,
    /// Conversion efficiency chain.
    pub efficiency: EfficiencyFactors,
    /// Nominal battery voltage (V).
    pub battery_voltage_v: f64,
    /// Nominal battery capacity (Ah).
    pub battery_capacity_ah: f64,
    /// Maximum depth of discharge (%).
    pub dod_pct: f64,
    /// State of charge on the day before the first sample (% of capacity).
    pub initial_soc_pct: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            panel_power_kw: 1.0,
            total_consumption_kwh: 1.0,
            efficiency: EfficiencyFactors::default(),
            battery_voltage_v: 12.0,
            battery_capacity_ah: 250.0,
            dod_pct: 80.0,
            initial_soc_pct: 100.0,
        }
    }
}

/// Quantities derived once per parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedQuantities {
    /// Product of the four efficiency factors (> 0).
    pub eta_global: f64,
    /// Equivalent daily demand including losses (kWh/day), constant for every day.
    pub demand_kwh: f64,
    /// Battery energy at 100% SoC (Wh).
    pub e_max_wh: f64,
    /// Minimum usable battery energy given the depth of discharge (Wh).
    pub e_min_wh: f64,
    /// Initial stored energy (Wh).
    pub soc0_wh: f64,
}

/// One simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayResult {
    pub date: NaiveDate,
    /// Raw consumption before losses (kWh).
    pub consumption_kwh: f64,
    /// Generation scaled to the installed panel power (kWh).
    pub generation_kwh: f64,
    /// Equivalent demand including losses (kWh).
    pub demand_kwh: f64,
    /// `generation_kwh - demand_kwh`; negative on deficit days.
    pub balance_kwh: f64,
    /// Stored energy at the end of the day (Wh), within `[0, e_max]`.
    pub soc_wh: f64,
    /// Stored energy as a percentage of full capacity.
    pub soc_pct: f64,
    /// Whether `soc_wh` fell strictly below the minimum usable energy.
    pub below_min: bool,
}

impl DayResult {
    /// Surplus or deficit classification of the day's balance.
    pub fn balance_kind(&self) -> BalanceKind {
        BalanceKind::of(self.balance_kwh)
    }
}

impl fmt::Display for DayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | cons={:>6.3} kWh  gen={:>6.3} kWh  dem={:>6.3} kWh  \
             bal={:>7.3} kWh | SoC={:>8.1} Wh ({:>5.1}%) below_min={}",
            self.date,
            self.consumption_kwh,
            self.generation_kwh,
            self.demand_kwh,
            self.balance_kwh,
            self.soc_wh,
            self.soc_pct,
            self.below_min,
        )
    }
}

/// Outcome of a single-scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Quantities derived from the parameter set.
    pub derived: DerivedQuantities,
    /// One entry per generation sample, in date order.
    pub days: Vec<DayResult>,
    /// Number of days with `below_min == true`.
    pub days_below_min: usize,
}
