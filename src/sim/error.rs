//! Errors raised by the simulation engine.

use thiserror::Error;

use super::efficiency::EfficiencyFactors;

/// Fatal conditions detected by the engine before any day is simulated.
///
/// No partial results accompany these errors; they describe a parameter or
/// data problem the caller has to fix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The product of the efficiency chain is zero or negative.
    #[error("non-positive global efficiency: eta_global = {eta_global:.4} ({factors})")]
    NonPositiveEfficiency {
        eta_global: f64,
        factors: EfficiencyFactors,
    },

    /// Battery energy at 100% SoC is zero or negative.
    #[error("non-positive battery energy: e_max = {e_max_wh:.1} Wh")]
    NonPositiveBatteryEnergy { e_max_wh: f64 },

    /// The generation series holds no usable day.
    #[error("generation series is empty: at least one day is required")]
    EmptyInput,
}

impl EngineError {
    /// Returns `true` for errors caused by the parameter set rather than the data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveEfficiency { .. } | Self::NonPositiveBatteryEnergy { .. }
        )
    }
}
