//! Post-hoc summary computed from a simulation result.

use std::fmt;

use serde::Serialize;

use super::balance::BalanceKind;
use super::types::SimulationResult;

/// Headline figures of a single-scenario run.
///
/// Computed from the per-day table so the report can never disagree with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// Global efficiency as a percentage.
    pub eta_global_pct: f64,
    /// Equivalent daily demand (kWh/day).
    pub demand_kwh: f64,
    /// Battery energy at 100% SoC (Wh).
    pub e_max_wh: f64,
    /// Minimum usable battery energy (Wh).
    pub e_min_wh: f64,
    /// Number of simulated days.
    pub days_simulated: usize,
    /// Days with SoC strictly below the minimum ("days without supply").
    pub days_below_min: usize,
    /// Days whose balance is `>= 0`.
    pub surplus_days: usize,
    /// Days whose balance is negative.
    pub deficit_days: usize,
    /// Total scaled generation over the period (kWh).
    pub total_generation_kwh: f64,
    /// Total equivalent demand over the period (kWh).
    pub total_demand_kwh: f64,
    /// Lowest end-of-day SoC (%).
    pub min_soc_pct: f64,
    /// SoC at the end of the last day (%).
    pub final_soc_pct: f64,
}

impl SummaryReport {
    pub fn from_result(result: &SimulationResult) -> Self {
        let derived = &result.derived;
        let mut surplus_days = 0_usize;
        let mut total_generation_kwh = 0.0_f64;
        let mut total_demand_kwh = 0.0_f64;
        let mut min_soc_pct = f64::INFINITY;

        for d in &result.days {
            if d.balance_kind() == BalanceKind::Surplus {
                surplus_days += 1;
            }
            total_generation_kwh += d.generation_kwh;
            total_demand_kwh += d.demand_kwh;
            min_soc_pct = min_soc_pct.min(d.soc_pct);
        }

        let initial_soc_pct = derived.soc0_wh / derived.e_max_wh * 100.0;
        Self {
            eta_global_pct: derived.eta_global * 100.0,
            demand_kwh: derived.demand_kwh,
            e_max_wh: derived.e_max_wh,
            e_min_wh: derived.e_min_wh,
            days_simulated: result.days.len(),
            days_below_min: result.days_below_min,
            surplus_days,
            deficit_days: result.days.len() - surplus_days,
            total_generation_kwh,
            total_demand_kwh,
            min_soc_pct: if result.days.is_empty() {
                initial_soc_pct
            } else {
                min_soc_pct
            },
            final_soc_pct: result
                .days
                .last()
                .map_or(initial_soc_pct, |d| d.soc_pct),
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary ---")?;
        writeln!(f, "Global efficiency:     {:.2}%", self.eta_global_pct)?;
        writeln!(f, "Equivalent demand:     {:.3} kWh/day", self.demand_kwh)?;
        writeln!(
            f,
            "Battery window:        {:.1} Wh max, {:.1} Wh min",
            self.e_max_wh, self.e_min_wh
        )?;
        writeln!(f, "Days simulated:        {}", self.days_simulated)?;
        writeln!(
            f,
            "Surplus/deficit days:  {} / {}",
            self.surplus_days, self.deficit_days
        )?;
        writeln!(
            f,
            "Generation vs demand:  {:.2} kWh / {:.2} kWh",
            self.total_generation_kwh, self.total_demand_kwh
        )?;
        writeln!(
            f,
            "SoC min / final:       {:.1}% / {:.1}%",
            self.min_soc_pct, self.final_soc_pct
        )?;
        write!(f, "Days without supply:   {}", self.days_below_min)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::sim::types::{DayResult, DerivedQuantities};

    fn derived() -> DerivedQuantities {
        DerivedQuantities {
            eta_global: 0.8,
            demand_kwh: 1.0,
            e_max_wh: 2000.0,
            e_min_wh: 400.0,
            soc0_wh: 2000.0,
        }
    }

    fn day(n: u32, generation_kwh: f64, soc_wh: f64) -> DayResult {
        DayResult {
            date: NaiveDate::from_ymd_opt(2024, 5, n).unwrap(),
            consumption_kwh: 0.8,
            generation_kwh,
            demand_kwh: 1.0,
            balance_kwh: generation_kwh - 1.0,
            soc_wh,
            soc_pct: soc_wh / 20.0,
            below_min: soc_wh < 400.0,
        }
    }

    #[test]
    fn totals_and_day_classes() {
        let result = SimulationResult {
            derived: derived(),
            days: vec![day(1, 0.5, 1500.0), day(2, 1.0, 1500.0), day(3, 0.0, 300.0)],
            days_below_min: 1,
        };
        let report = SummaryReport::from_result(&result);
        assert_eq!(report.days_simulated, 3);
        assert_eq!(report.surplus_days, 1);
        assert_eq!(report.deficit_days, 2);
        assert!((report.total_generation_kwh - 1.5).abs() < 1e-9);
        assert!((report.total_demand_kwh - 3.0).abs() < 1e-9);
        assert!((report.min_soc_pct - 15.0).abs() < 1e-9);
        assert!((report.final_soc_pct - 15.0).abs() < 1e-9);
        assert!((report.eta_global_pct - 80.0).abs() < 1e-9);
        assert_eq!(report.days_below_min, 1);
    }

    #[test]
    fn empty_result_falls_back_to_initial_soc() {
        let result = SimulationResult {
            derived: derived(),
            days: Vec::new(),
            days_below_min: 0,
        };
        let report = SummaryReport::from_result(&result);
        assert_eq!(report.min_soc_pct, 100.0);
        assert_eq!(report.final_soc_pct, 100.0);
    }

    #[test]
    fn display_ends_with_outage_count() {
        let result = SimulationResult {
            derived: derived(),
            days: vec![day(1, 0.0, 0.0)],
            days_below_min: 1,
        };
        let s = SummaryReport::from_result(&result).to_string();
        assert!(s.starts_with("--- Summary ---"));
        assert!(s.ends_with("Days without supply:   1"));
    }
}
