//! pv-autonomy entry point: CLI wiring, input loading and report printing.

mod cli;

use std::path::{Path, PathBuf};
use std::process;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pv_autonomy::config::ScenarioConfig;
use pv_autonomy::io::consumption::read_consumption_csv;
use pv_autonomy::io::export::{export_days_csv, export_sweep_csv};
use pv_autonomy::io::generation::read_generation_csv;
use pv_autonomy::sim::kpi::SummaryReport;
use pv_autonomy::sim::soc::simulate;
use pv_autonomy::sim::sweep::{SweepTable, sweep};
use pv_autonomy::sim::types::{GenerationSeries, SimulationParameters, SimulationResult};

use crate::cli::{CliOptions, Command};

/// Everything produced by one invocation.
struct RunOutput {
    parameters: SimulationParameters,
    result: SimulationResult,
    summary: SummaryReport,
    sweep: Option<SweepTable>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the scenario: `--scenario` takes priority, then `--preset`, then baseline.
fn load_scenario(cli: &CliOptions) -> Result<ScenarioConfig, String> {
    let mut scenario = if let Some(ref path) = cli.scenario {
        ScenarioConfig::from_toml_file(path).map_err(|e| e.to_string())?
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name).map_err(|e| e.to_string())?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(ref path) = cli.generation {
        scenario.generation.csv = Some(path.clone());
    }
    if let Some(ref path) = cli.consumption {
        scenario.consumption.loads_csv = Some(path.clone());
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        return Err(errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"));
    }
    Ok(scenario)
}

fn load_inputs(scenario: &ScenarioConfig) -> Result<(GenerationSeries, f64), String> {
    let generation_path: &PathBuf = scenario.generation.csv.as_ref().ok_or_else(|| {
        "no generation table: pass --generation <csv> or set generation.csv in the scenario"
            .to_string()
    })?;
    let series = read_generation_csv(generation_path).map_err(|e| e.to_string())?;

    let consumption_kwh = match scenario.consumption.loads_csv {
        Some(ref path) => read_consumption_csv(path).map_err(|e| e.to_string())?,
        None => scenario.consumption.total_kwh,
    };

    info!(
        days = series.len(),
        first = ?series.first_date(),
        last = ?series.last_date(),
        consumption_kwh,
        "inputs loaded"
    );
    Ok((series, consumption_kwh))
}

fn run(scenario: &ScenarioConfig, run_sweep: bool) -> Result<RunOutput, String> {
    let (series, consumption_kwh) = load_inputs(scenario)?;
    let parameters = scenario.parameters(consumption_kwh);

    let result = simulate(&series, &parameters).map_err(|e| e.to_string())?;
    let summary = SummaryReport::from_result(&result);

    let sweep = if run_sweep {
        Some(sweep(&series, &scenario.sweep_grid(), &parameters).map_err(|e| e.to_string())?)
    } else {
        None
    };

    Ok(RunOutput {
        parameters,
        result,
        summary,
        sweep,
    })
}

fn write_outputs(cli: &CliOptions, out: &RunOutput) -> Result<(), String> {
    if let Some(ref path) = cli.results_out {
        export_days_csv(&out.result.days, path)
            .map_err(|e| format!("failed to write \"{}\": {e}", path.display()))?;
        info!(path = %path.display(), "per-day results written");
    }
    if let (Some(path), Some(table)) = (cli.sweep_out.as_deref(), out.sweep.as_ref()) {
        export_sweep_csv(table, Path::new(path))
            .map_err(|e| format!("failed to write \"{}\": {e}", path.display()))?;
        info!(path = %path.display(), "sweep table written");
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve(out: RunOutput, port: u16) -> Result<(), String> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(pv_autonomy::api::AppState {
        parameters: out.parameters,
        summary: out.summary,
        result: out.result,
        sweep: out.sweep,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("failed to create tokio runtime: {e}"))?;
    rt.block_on(pv_autonomy::api::serve(state, addr))
        .map_err(|e| format!("server error on {addr}: {e}"))
}

#[cfg(not(feature = "api"))]
fn serve(_out: RunOutput, _port: u16) -> Result<(), String> {
    Err("--serve requires building with the `api` feature".to_string())
}

fn main() {
    init_tracing();

    let cli = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    let outcome = load_scenario(&cli).and_then(|scenario| run(&scenario, !cli.no_sweep));
    let out = match outcome {
        Ok(out) => out,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    info!(
        parameters = ?out.parameters,
        days_below_min = out.result.days_below_min,
        "simulation finished"
    );
    for day in &out.result.days {
        println!("{day}");
    }
    println!("\n{}", out.summary);
    if let Some(ref table) = out.sweep {
        println!("\n{table}");
    }

    if let Err(e) = write_outputs(&cli, &out) {
        error!("{e}");
        process::exit(1);
    }

    if cli.serve {
        if let Err(e) = serve(out, cli.port) {
            error!("{e}");
            process::exit(1);
        }
    }
}
