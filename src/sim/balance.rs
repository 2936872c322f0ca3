//! Daily energy balance computation.

use serde::Serialize;

use super::types::GenerationSample;

/// Sign of a day's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceKind {
    /// Generation covers demand (`balance >= 0`).
    Surplus,
    /// Demand exceeds generation.
    Deficit,
}

impl BalanceKind {
    pub fn of(balance_kwh: f64) -> Self {
        if balance_kwh >= 0.0 {
            Self::Surplus
        } else {
            Self::Deficit
        }
    }
}

/// Generation and net balance for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBalance {
    /// Generation scaled to the installed panel power (kWh).
    pub generation_kwh: f64,
    /// Generation minus demand (kWh, may be negative).
    pub balance_kwh: f64,
}

impl DailyBalance {
    pub fn balance_wh(&self) -> f64 {
        self.balance_kwh * 1000.0
    }

    pub fn kind(&self) -> BalanceKind {
        BalanceKind::of(self.balance_kwh)
    }
}

/// Scales the 1 kW reference generation to `panel_power_kw` and subtracts demand.
///
/// # Arguments
///
/// * `sample` - Reference generation for the day
/// * `panel_power_kw` - Installed panel power (kW)
/// * `demand_kwh` - Equivalent daily demand (kWh)
pub fn compute_balance(
    sample: &GenerationSample,
    panel_power_kw: f64,
    demand_kwh: f64,
) -> DailyBalance {
    let generation_kwh = sample.energy_1kw_kwh * panel_power_kw;
    DailyBalance {
        generation_kwh,
        balance_kwh: generation_kwh - demand_kwh,
    }
}
