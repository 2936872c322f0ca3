//! Day-by-day battery state-of-charge simulation.

use tracing::debug;

use super::balance::compute_balance;
use super::efficiency::{min_energy_wh, reduce};
use super::error::EngineError;
use super::types::{DayResult, GenerationSeries, SimulationParameters, SimulationResult};

/// Usable energy window of a battery.
///
/// Stored energy is clamped to `[0, e_max_wh]`; a day whose closing energy
/// is strictly below `e_min_wh` counts as a day without supply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryWindow {
    /// Energy at 100% SoC (Wh, > 0).
    pub e_max_wh: f64,
    /// Minimum usable energy (Wh).
    pub e_min_wh: f64,
}

impl BatteryWindow {
    /// Creates a window from explicit bounds.
    ///
    /// # Panics
    ///
    /// Panics if `e_max_wh` is not positive.
    pub fn new(e_max_wh: f64, e_min_wh: f64) -> Self {
        assert!(e_max_wh > 0.0, "e_max_wh must be > 0");
        Self { e_max_wh, e_min_wh }
    }

    /// Window for a battery of `capacity_wh` at `dod_pct` depth of discharge.
    pub fn from_capacity_wh(capacity_wh: f64, dod_pct: f64) -> Self {
        Self::new(capacity_wh, min_energy_wh(capacity_wh, dod_pct))
    }

    /// Applies one day's balance and returns the clamped stored energy.
    ///
    /// Energy beyond either bound is discarded, not carried forward.
    pub fn step(&self, prev_soc_wh: f64, balance_wh: f64) -> f64 {
        (prev_soc_wh + balance_wh).clamp(0.0, self.e_max_wh)
    }

    pub fn is_below_min(&self, soc_wh: f64) -> bool {
        soc_wh < self.e_min_wh
    }

    pub fn soc_pct(&self, soc_wh: f64) -> f64 {
        soc_wh / self.e_max_wh * 100.0
    }
}

/// Runs the single-scenario simulation.
///
/// The parameter set is reduced first, so a configuration error aborts the
/// run before any day is evaluated.
///
/// # Errors
///
/// * [`EngineError::NonPositiveEfficiency`] / [`EngineError::NonPositiveBatteryEnergy`]
///   for an unusable parameter set
/// * [`EngineError::EmptyInput`] if `series` holds no samples
pub fn simulate(
    series: &GenerationSeries,
    params: &SimulationParameters,
) -> Result<SimulationResult, EngineError> {
    let derived = reduce(params)?;
    if series.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let window = BatteryWindow::new(derived.e_max_wh, derived.e_min_wh);
    debug!(
        days = series.len(),
        eta_global = derived.eta_global,
        demand_kwh = derived.demand_kwh,
        e_max_wh = window.e_max_wh,
        e_min_wh = window.e_min_wh,
        soc0_wh = derived.soc0_wh,
        "running SoC simulation"
    );

    let mut soc_wh = derived.soc0_wh;
    let days: Vec<DayResult> = series
        .iter()
        .map(|sample| {
            let balance = compute_balance(sample, params.panel_power_kw, derived.demand_kwh);
            soc_wh = window.step(soc_wh, balance.balance_wh());
            DayResult {
                date: sample.date,
                consumption_kwh: params.total_consumption_kwh,
                generation_kwh: balance.generation_kwh,
                demand_kwh: derived.demand_kwh,
                balance_kwh: balance.balance_kwh,
                soc_wh,
                soc_pct: window.soc_pct(soc_wh),
                below_min: window.is_below_min(soc_wh),
            }
        })
        .collect();

    let days_below_min = days.iter().filter(|d| d.below_min).count();
    debug!(days_below_min, "SoC simulation finished");

    Ok(SimulationResult {
        derived,
        days,
        days_below_min,
    })
}

/// Counts days below the minimum without materialising the per-day table.
///
/// Same recurrence as [`simulate`], starting from `soc0_wh`.
pub fn count_days_below_min(
    series: &GenerationSeries,
    panel_power_kw: f64,
    demand_kwh: f64,
    window: BatteryWindow,
    soc0_wh: f64,
) -> usize {
    series
        .iter()
        .fold((soc0_wh, 0_usize), |(soc_wh, count), sample| {
            let balance = compute_balance(sample, panel_power_kw, demand_kwh);
            let soc_wh = window.step(soc_wh, balance.balance_wh());
            (soc_wh, count + usize::from(window.is_below_min(soc_wh)))
        })
        .1
}
