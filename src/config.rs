//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::sim::efficiency::EfficiencyFactors;
use crate::sim::sweep::{PanelOption, SweepGrid};
use crate::sim::types::SimulationParameters;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Daily consumption source.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Generation table source.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Installed panel.
    #[serde(default)]
    pub panel: PanelConfig,
    /// Conversion efficiency chain.
    #[serde(default)]
    pub efficiency: EfficiencyConfig,
    /// Battery sizing.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Autonomy sweep grid.
    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Daily consumption source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    /// Total daily consumption (kWh/day), used when `loads_csv` is unset.
    pub total_kwh: f64,
    /// Per-device consumption table; its energy column is summed.
    pub loads_csv: Option<PathBuf>,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            total_kwh: 1.0,
            loads_csv: None,
        }
    }
}

/// Generation table source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Daily generation of a 1 kW reference panel.
    pub csv: Option<PathBuf>,
}

/// Installed panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    /// Panel power (kW, > 0).
    pub power_kw: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { power_kw: 1.0 }
    }
}

/// Conversion efficiency chain, each factor in `[0, 1]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EfficiencyConfig {
    pub eta_fv: f64,
    pub eta_cableado: f64,
    pub eta_mppt: f64,
    pub eta_bat: f64,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        let f = EfficiencyFactors::default();
        Self {
            eta_fv: f.eta_fv,
            eta_cableado: f.eta_cableado,
            eta_mppt: f.eta_mppt,
            eta_bat: f.eta_bat,
        }
    }
}

/// Battery sizing for the single-scenario run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Nominal voltage (V).
    pub voltage_v: f64,
    /// Nominal capacity (Ah).
    pub capacity_ah: f64,
    /// Maximum depth of discharge (0–100 %), also used by the sweep.
    pub dod_pct: f64,
    /// Initial state of charge (0–100 %).
    pub initial_soc_pct: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            voltage_v: 12.0,
            capacity_ah: 250.0,
            dod_pct: 80.0,
            initial_soc_pct: 100.0,
        }
    }
}

/// Autonomy sweep grid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Battery capacities (Wh).
    pub capacities_wh: Vec<f64>,
    /// Panel power options with labels.
    pub panels: Vec<PanelOption>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let grid = SweepGrid::default();
        Self {
            capacities_wh: grid.capacities_wh,
            panels: grid.panels,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.dod_pct"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the large-battery preset: 24 V / 400 Ah bank, 2 kW array.
    pub fn large_battery() -> Self {
        Self {
            panel: PanelConfig { power_kw: 2.0 },
            battery: BatteryConfig {
                voltage_v: 24.0,
                capacity_ah: 400.0,
                dod_pct: 50.0,
                ..BatteryConfig::default()
            },
            sweep: SweepConfig {
                capacities_wh: vec![2400.0, 4800.0, 7200.0, 9600.0],
                panels: vec![
                    PanelOption::new(1.0, "2 × 500W"),
                    PanelOption::new(1.5, "3 × 500W"),
                    PanelOption::new(2.0, "4 × 500W"),
                ],
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "large_battery"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "large_battery" => Ok(Self::large_battery()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// Relative data paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            cfg.resolve_paths(base);
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.consumption.loads_csv, &mut self.generation.csv]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Engine parameters for a given total daily consumption.
    ///
    /// The consumption comes either from `consumption.total_kwh` or from the
    /// loads table, which the caller reads.
    pub fn parameters(&self, total_consumption_kwh: f64) -> SimulationParameters {
        let e = &self.efficiency;
        let b = &self.battery;
        SimulationParameters {
            panel_power_kw: self.panel.power_kw,
            total_consumption_kwh,
            efficiency: EfficiencyFactors::new(e.eta_fv, e.eta_cableado, e.eta_mppt, e.eta_bat),
            battery_voltage_v: b.voltage_v,
            battery_capacity_ah: b.capacity_ah,
            dod_pct: b.dod_pct,
            initial_soc_pct: b.initial_soc_pct,
        }
    }

    pub fn sweep_grid(&self) -> SweepGrid {
        SweepGrid {
            capacities_wh: self.sweep.capacities_wh.clone(),
            panels: self.sweep.panels.clone(),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ConfigError {
                    field: field.into(),
                    message: message.into(),
                });
            }
        };

        let c = &self.consumption;
        check(c.total_kwh >= 0.0, "consumption.total_kwh", "must be >= 0");

        check(self.panel.power_kw > 0.0, "panel.power_kw", "must be > 0");

        let e = &self.efficiency;
        for (field, value) in [
            ("efficiency.eta_fv", e.eta_fv),
            ("efficiency.eta_cableado", e.eta_cableado),
            ("efficiency.eta_mppt", e.eta_mppt),
            ("efficiency.eta_bat", e.eta_bat),
        ] {
            check((0.0..=1.0).contains(&value), field, "must be in [0.0, 1.0]");
        }

        let b = &self.battery;
        check(b.voltage_v > 0.0, "battery.voltage_v", "must be > 0");
        check(b.capacity_ah > 0.0, "battery.capacity_ah", "must be > 0");
        check((0.0..=100.0).contains(&b.dod_pct), "battery.dod_pct", "must be in [0, 100]");
        check(
            (0.0..=100.0).contains(&b.initial_soc_pct),
            "battery.initial_soc_pct",
            "must be in [0, 100]",
        );

        let s = &self.sweep;
        check(!s.capacities_wh.is_empty(), "sweep.capacities_wh", "must not be empty");
        check(
            s.capacities_wh.iter().all(|&c| c > 0.0),
            "sweep.capacities_wh",
            "every capacity must be > 0",
        );
        check(!s.panels.is_empty(), "sweep.panels", "must not be empty");
        check(
            s.panels.iter().all(|p| p.power_kw > 0.0),
            "sweep.panels.power_kw",
            "every power must be > 0",
        );
        let unique_powers = s
            .panels
            .iter()
            .enumerate()
            .all(|(i, p)| s.panels[..i].iter().all(|q| q.power_kw != p.power_kw));
        check(unique_powers, "sweep.panels.power_kw", "powers must be unique");
        let unique_labels = s
            .panels
            .iter()
            .enumerate()
            .all(|(i, p)| s.panels[..i].iter().all(|q| q.label != p.label));
        check(unique_labels, "sweep.panels.label", "labels must be unique");

        errors
    }
}
