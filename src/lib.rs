//! Stand-alone photovoltaic installation with battery storage: daily energy
//! balance, battery state-of-charge simulation and autonomy sizing sweep.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod io;
/// Simulation engine: efficiency chain, balance, SoC recurrence and sweep.
pub mod sim;
