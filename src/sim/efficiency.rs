//! Efficiency-chain reduction and derivation of per-run constants.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::types::{DerivedQuantities, SimulationParameters};

/// The four independent conversion efficiencies between panel and load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyFactors {
    /// PV module efficiency.
    pub eta_fv: f64,
    /// Wiring efficiency.
    pub eta_cableado: f64,
    /// MPPT / charge controller efficiency.
    pub eta_mppt: f64,
    /// Battery charge/discharge round-trip efficiency.
    pub eta_bat: f64,
}

impl EfficiencyFactors {
    pub fn new(eta_fv: f64, eta_cableado: f64, eta_mppt: f64, eta_bat: f64) -> Self {
        Self {
            eta_fv,
            eta_cableado,
            eta_mppt,
            eta_bat,
        }
    }

    /// Product of the four factors.
    pub fn global(&self) -> f64 {
        self.eta_fv * self.eta_cableado * self.eta_mppt * self.eta_bat
    }
}

impl Default for EfficiencyFactors {
    fn default() -> Self {
        Self::new(0.90, 0.98, 0.96, 0.90)
    }
}

impl fmt::Display for EfficiencyFactors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "eta_fv={:.2}, eta_cableado={:.2}, eta_mppt={:.2}, eta_bat={:.2}",
            self.eta_fv, self.eta_cableado, self.eta_mppt, self.eta_bat
        )
    }
}

/// Validates the efficiency chain and returns `eta_global`.
///
/// # Errors
///
/// Returns [`EngineError::NonPositiveEfficiency`] if the product is `<= 0`
/// (or NaN).
pub fn global_efficiency(factors: &EfficiencyFactors) -> Result<f64, EngineError> {
    let eta_global = factors.global();
    if !(eta_global > 0.0) {
        return Err(EngineError::NonPositiveEfficiency {
            eta_global,
            factors: *factors,
        });
    }
    Ok(eta_global)
}

/// Equivalent daily demand: consumption grossed up by the system losses.
pub fn demand_kwh(total_consumption_kwh: f64, eta_global: f64) -> f64 {
    total_consumption_kwh / eta_global
}

/// Minimum usable energy for a battery of `e_max_wh` at the given depth of discharge.
pub fn min_energy_wh(e_max_wh: f64, dod_pct: f64) -> f64 {
    e_max_wh * (1.0 - dod_pct / 100.0)
}

/// Reduces a parameter set to the constants shared by every simulated day.
///
/// # Errors
///
/// * [`EngineError::NonPositiveEfficiency`] if `eta_global <= 0`
/// * [`EngineError::NonPositiveBatteryEnergy`] if `voltage * capacity <= 0`
pub fn reduce(params: &SimulationParameters) -> Result<DerivedQuantities, EngineError> {
    let eta_global = global_efficiency(&params.efficiency)?;

    let e_max_wh = params.battery_voltage_v * params.battery_capacity_ah;
    if !(e_max_wh > 0.0) {
        return Err(EngineError::NonPositiveBatteryEnergy { e_max_wh });
    }

    Ok(DerivedQuantities {
        eta_global,
        demand_kwh: demand_kwh(params.total_consumption_kwh, eta_global),
        e_max_wh,
        e_min_wh: min_energy_wh(e_max_wh, params.dod_pct),
        soc0_wh: e_max_wh * params.initial_soc_pct / 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SimulationParameters {
        SimulationParameters {
            total_consumption_kwh: 10.0,
            ..SimulationParameters::default()
        }
    }

    #[test]
    fn default_chain_matches_reference_scenario() {
        let derived = reduce(&params()).unwrap();
        // 0.90 * 0.98 * 0.96 * 0.90
        assert!((derived.eta_global - 0.762_048).abs() < 1e-9);
        assert!((derived.demand_kwh - 13.1225).abs() < 1e-3);
    }

    #[test]
    fn battery_energy_from_voltage_and_amp_hours() {
        let derived = reduce(&params()).unwrap();
        assert_eq!(derived.e_max_wh, 3000.0);
        assert!((derived.e_min_wh - 600.0).abs() < 1e-9);
        assert_eq!(derived.soc0_wh, 3000.0);
    }

    #[test]
    fn initial_soc_percentage_applied() {
        let mut p = params();
        p.initial_soc_pct = 40.0;
        let derived = reduce(&p).unwrap();
        assert!((derived.soc0_wh - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn zero_efficiency_is_rejected() {
        let mut p = params();
        p.efficiency.eta_mppt = 0.0;
        let err = reduce(&p).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NonPositiveEfficiency { eta_global, .. } if eta_global == 0.0
        ));
    }

    #[test]
    fn zero_battery_energy_is_rejected() {
        let mut p = params();
        p.battery_capacity_ah = 0.0;
        let err = reduce(&p).unwrap_err();
        assert!(matches!(err, EngineError::NonPositiveBatteryEnergy { .. }));
    }

    #[test]
    fn full_depth_of_discharge_gives_zero_floor() {
        assert_eq!(min_energy_wh(2000.0, 100.0), 0.0);
        assert_eq!(min_energy_wh(2000.0, 0.0), 2000.0);
    }
}
