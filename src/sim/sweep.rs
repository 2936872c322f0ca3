//! Autonomy sweep over battery capacity and panel power.
//!
//! Every cell starts from a full battery whose capacity is given directly in
//! Wh, independent of the single-scenario initial SoC and of the
//! voltage x amp-hour capacity used there.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::efficiency::{demand_kwh, global_efficiency};
use super::error::EngineError;
use super::soc::{BatteryWindow, count_days_below_min};
use super::types::{GenerationSeries, SimulationParameters};

/// A panel power option and its presentation label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelOption {
    /// Installed panel power (kW).
    pub power_kw: f64,
    /// Display label, e.g. `"2 × 200W"`.
    pub label: String,
}

impl PanelOption {
    pub fn new(power_kw: f64, label: impl Into<String>) -> Self {
        Self {
            power_kw,
            label: label.into(),
        }
    }
}

/// Capacities and panel options whose Cartesian product is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    /// Battery capacities (Wh).
    pub capacities_wh: Vec<f64>,
    /// Panel power options.
    pub panels: Vec<PanelOption>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            capacities_wh: vec![600.0, 1200.0, 1800.0, 2400.0, 3000.0],
            panels: vec![
                PanelOption::new(0.4, "2 × 200W"),
                PanelOption::new(0.5, "2 × 250W"),
                PanelOption::new(0.6, "2 × 300W"),
                PanelOption::new(0.8, "2 × 400W"),
                PanelOption::new(1.0, "2 × 500W"),
            ],
        }
    }
}

impl SweepGrid {
    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.capacities_wh.len() * self.panels.len()
    }
}

/// Days without supply for one (capacity, panel power) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepCell {
    pub battery_capacity_wh: f64,
    pub panel_power_kw: f64,
    pub panel_label: String,
    pub days_below_min: usize,
}

/// All sweep cells, capacity-major then in panel order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepTable {
    /// Demand used for every cell (kWh/day).
    pub demand_kwh: f64,
    /// Depth of discharge used for every cell (%).
    pub dod_pct: f64,
    pub cells: Vec<SweepCell>,
}

impl SweepTable {
    /// Looks up a cell by capacity and panel label.
    pub fn cell(&self, capacity_wh: f64, label: &str) -> Option<&SweepCell> {
        self.cells
            .iter()
            .find(|c| c.battery_capacity_wh == capacity_wh && c.panel_label == label)
    }

    /// Looks up a cell by capacity and panel power.
    pub fn cell_for_power(&self, capacity_wh: f64, power_kw: f64) -> Option<&SweepCell> {
        self.cells
            .iter()
            .find(|c| c.battery_capacity_wh == capacity_wh && c.panel_power_kw == power_kw)
    }

    /// Distinct capacities in table order.
    pub fn capacities(&self) -> Vec<f64> {
        let mut out: Vec<f64> = Vec::new();
        for c in &self.cells {
            if !out.contains(&c.battery_capacity_wh) {
                out.push(c.battery_capacity_wh);
            }
        }
        out
    }

    /// Distinct panel columns `(power_kw, label)` in table order, keyed by power.
    pub fn columns(&self) -> Vec<(f64, &str)> {
        let mut out: Vec<(f64, &str)> = Vec::new();
        for c in &self.cells {
            if !out.iter().any(|&(p, _)| p == c.panel_power_kw) {
                out.push((c.panel_power_kw, &c.panel_label));
            }
        }
        out
    }
}

/// Renders the table as a capacity x panel grid of day counts.
impl fmt::Display for SweepTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.columns();
        writeln!(
            f,
            "--- Days without supply (demand {:.3} kWh/day, DoD {:.0}%) ---",
            self.demand_kwh, self.dod_pct
        )?;
        write!(f, "{:>12}", "battery Wh")?;
        for (_, label) in &columns {
            write!(f, " | {label:>10}")?;
        }
        for cap in self.capacities() {
            write!(f, "\n{cap:>12.0}")?;
            for &(power_kw, _) in &columns {
                match self.cell_for_power(cap, power_kw) {
                    Some(c) => write!(f, " | {:>10}", c.days_below_min)?,
                    None => write!(f, " | {:>10}", "-")?,
                }
            }
        }
        Ok(())
    }
}

/// Evaluates the grid using the demand and depth of discharge of `params`.
///
/// Only the efficiency chain, consumption and `dod_pct` of `params` are
/// used; panel power, battery voltage/capacity and initial SoC are not.
///
/// # Errors
///
/// * [`EngineError::NonPositiveEfficiency`] if the efficiency chain is unusable
/// * [`EngineError::NonPositiveBatteryEnergy`] if any grid capacity is `<= 0`
/// * [`EngineError::EmptyInput`] if `series` holds no samples
pub fn sweep(
    series: &GenerationSeries,
    grid: &SweepGrid,
    params: &SimulationParameters,
) -> Result<SweepTable, EngineError> {
    let eta_global = global_efficiency(&params.efficiency)?;
    let demand = demand_kwh(params.total_consumption_kwh, eta_global);
    sweep_with_demand(series, grid, demand, params.dod_pct)
}

/// Evaluates the grid for an already derived demand.
///
/// Cells are independent and evaluated in parallel.
///
/// # Errors
///
/// See [`sweep`].
pub fn sweep_with_demand(
    series: &GenerationSeries,
    grid: &SweepGrid,
    demand_kwh: f64,
    dod_pct: f64,
) -> Result<SweepTable, EngineError> {
    if let Some(&e_max_wh) = grid.capacities_wh.iter().find(|&&c| !(c > 0.0)) {
        return Err(EngineError::NonPositiveBatteryEnergy { e_max_wh });
    }
    if series.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    debug!(
        cells = grid.cell_count(),
        days = series.len(),
        demand_kwh,
        dod_pct,
        "running autonomy sweep"
    );

    let pairs: Vec<(f64, &PanelOption)> = grid
        .capacities_wh
        .iter()
        .flat_map(|&cap| grid.panels.iter().map(move |panel| (cap, panel)))
        .collect();

    let cells = pairs
        .into_par_iter()
        .map(|(capacity_wh, panel)| {
            let window = BatteryWindow::from_capacity_wh(capacity_wh, dod_pct);
            SweepCell {
                battery_capacity_wh: capacity_wh,
                panel_power_kw: panel.power_kw,
                panel_label: panel.label.clone(),
                days_below_min: count_days_below_min(
                    series,
                    panel.power_kw,
                    demand_kwh,
                    window,
                    capacity_wh,
                ),
            }
        })
        .collect();

    Ok(SweepTable {
        demand_kwh,
        dod_pct,
        cells,
    })
}
