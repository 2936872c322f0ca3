/// Daily generation/demand balance.
pub mod balance;
pub mod efficiency;
pub mod error;
pub mod kpi;
/// Battery state-of-charge recurrence.
pub mod soc;
pub mod sweep;
pub mod types;

pub use efficiency::{EfficiencyFactors, reduce};
pub use error::EngineError;
pub use soc::simulate;
pub use sweep::{PanelOption, SweepGrid, SweepTable, sweep};
pub use types::{GenerationSample, GenerationSeries, SimulationParameters, SimulationResult};
