//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

/// Parsed CLI arguments.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    /// Overrides `generation.csv` from the scenario.
    pub generation: Option<PathBuf>,
    /// Overrides `consumption.loads_csv` from the scenario.
    pub consumption: Option<PathBuf>,
    pub results_out: Option<PathBuf>,
    pub sweep_out: Option<PathBuf>,
    pub no_sweep: bool,
    pub serve: bool,
    pub port: u16,
}

/// Outcome of argument parsing.
#[derive(Debug)]
pub enum Command {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Command, String> {
    parse_args_from(env::args().skip(1).collect())
}

pub fn parse_args_from(args: Vec<String>) -> Result<Command, String> {
    let mut opts = CliOptions {
        port: 3000,
        ..CliOptions::default()
    };

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                set_once(&mut opts.scenario, PathBuf::from(path), "--scenario")?;
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --preset (expected a preset name)",
                )?;
                set_once(&mut opts.preset, name.to_string(), "--preset")?;
            }
            "--generation" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --generation (expected a CSV file path)",
                )?;
                set_once(&mut opts.generation, PathBuf::from(path), "--generation")?;
            }
            "--consumption" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --consumption (expected a CSV file path)",
                )?;
                set_once(&mut opts.consumption, PathBuf::from(path), "--consumption")?;
            }
            "--results-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --results-out (expected a file path)",
                )?;
                set_once(&mut opts.results_out, PathBuf::from(path), "--results-out")?;
            }
            "--sweep-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --sweep-out (expected a file path)",
                )?;
                set_once(&mut opts.sweep_out, PathBuf::from(path), "--sweep-out")?;
            }
            "--no-sweep" => opts.no_sweep = true,
            "--serve" => opts.serve = true,
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                opts.port = raw
                    .parse()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if opts.no_sweep && opts.sweep_out.is_some() {
        return Err("`--sweep-out` cannot be combined with `--no-sweep`".to_string());
    }

    Ok(Command::Run(opts))
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("pv-autonomy: stand-alone PV + battery autonomy simulator");
    eprintln!();
    eprintln!("Usage: pv-autonomy [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, large_battery)");
    eprintln!("  --generation <path>      Daily generation CSV for a 1 kW panel");
    eprintln!("  --consumption <path>     Per-device consumption CSV (summed)");
    eprintln!("  --results-out <path>     Export per-day results to CSV");
    eprintln!("  --sweep-out <path>       Export the autonomy sweep to CSV");
    eprintln!("  --no-sweep               Skip the autonomy sweep");
    eprintln!("  --serve                  Start REST API server after simulation (feature `api`)");
    eprintln!("  --port <u16>             API server port (default: 3000)");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run(list: &[&str]) -> CliOptions {
        match parse_args_from(args(list)) {
            Ok(Command::Run(opts)) => opts,
            other => panic!("expected run options, got {other:?}"),
        }
    }

    #[test]
    fn supports_scenario_and_generation() {
        let opts = run(&["--scenario", "s.toml", "--generation", "gen.csv"]);
        assert_eq!(opts.scenario, Some(PathBuf::from("s.toml")));
        assert_eq!(opts.generation, Some(PathBuf::from("gen.csv")));
        assert!(opts.preset.is_none());
        assert_eq!(opts.port, 3000);
    }

    #[test]
    fn supports_outputs_and_port() {
        let opts = run(&[
            "--preset",
            "baseline",
            "--results-out",
            "days.csv",
            "--sweep-out",
            "sweep.csv",
            "--serve",
            "--port",
            "8080",
        ]);
        assert_eq!(opts.preset.as_deref(), Some("baseline"));
        assert_eq!(opts.results_out, Some(PathBuf::from("days.csv")));
        assert_eq!(opts.sweep_out, Some(PathBuf::from("sweep.csv")));
        assert!(opts.serve);
        assert_eq!(opts.port, 8080);
    }

    #[test]
    fn help_flag() {
        assert!(matches!(parse_args_from(args(&["-h"])), Ok(Command::Help)));
    }

    #[test]
    fn scenario_and_preset_are_exclusive() {
        let err = parse_args_from(args(&["--scenario", "a.toml", "--preset", "baseline"]));
        assert!(err.is_err());
    }

    #[test]
    fn repeated_flag_is_rejected() {
        let err = parse_args_from(args(&["--generation", "a.csv", "--generation", "b.csv"]));
        assert_eq!(err.err().as_deref(), Some("--generation provided more than once"));
    }

    #[test]
    fn missing_value_and_bad_port() {
        assert!(parse_args_from(args(&["--generation"])).is_err());
        assert!(parse_args_from(args(&["--port", "99999"])).is_err());
        assert!(parse_args_from(args(&["--bogus"])).is_err());
    }

    #[test]
    fn sweep_out_conflicts_with_no_sweep() {
        assert!(parse_args_from(args(&["--no-sweep", "--sweep-out", "s.csv"])).is_err());
    }
}
