//! Patrol planner CLI.
//!
//! ```text
//! uav-patrol <instance> <drones> <generations> <ticks>
//! ```
//!
//! Results are appended to `resultados/<instance>_estadisticas.csv` and
//! `resultados/<instance>_rutas.csv`. Set `PATROL_SEED` to replay a run and
//! `RUST_LOG` to change the log level (default `info`).

use std::process;
use std::str::FromStr;
use std::time::Instant;

use uav_patrol::{
    ga::{GaConfig, GaRunner},
    grid::load_instance,
    patrol::PatrolProblem,
    report::{self, RunSummary},
};

const OUTPUT_DIR: &str = "resultados";

/// Command-line errors; every one ends the process with status 1.
#[derive(Debug, PartialEq, thiserror::Error)]
enum CliError {
    #[error("wrong number of arguments: expected 4, got {0}")]
    Usage(usize),
    #[error("invalid {name} {value:?}: {reason}")]
    InvalidNumber {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Parsed command line plus the optional `PATROL_SEED`.
#[derive(Debug, PartialEq)]
struct CliArgs {
    instance: String,
    drones: usize,
    generations: usize,
    ticks: usize,
    seed: Option<u64>,
}

impl CliArgs {
    /// `args` excludes the program name.
    fn parse(args: &[String], seed: Option<&str>) -> Result<Self, CliError> {
        let [instance, drones, generations, ticks] = args else {
            return Err(CliError::Usage(args.len()));
        };
        Ok(Self {
            instance: instance.clone(),
            drones: parse_number(drones, "drone count")?,
            generations: parse_number(generations, "generation count")?,
            ticks: parse_number(ticks, "tick horizon")?,
            seed: seed.map(|s| parse_number(s, "PATROL_SEED")).transpose()?,
        })
    }
}

fn parse_number<T: FromStr>(value: &str, name: &'static str) -> Result<T, CliError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| CliError::InvalidNumber {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn usage(program: &str) {
    eprintln!("Usage: {program} <instance> <drones> <generations> <ticks>");
    eprintln!("Example: {program} instancias/PSP-UAV_01_a.txt 5 1000 50");
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("uav-patrol", String::as_str);
    let seed = std::env::var("PATROL_SEED").ok();
    let cli = CliArgs::parse(args.get(1..).unwrap_or_default(), seed.as_deref())
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            if matches!(e, CliError::Usage(_)) {
                usage(program);
            }
            process::exit(1);
        });
    let CliArgs {
        instance,
        drones,
        generations,
        ticks,
        seed,
    } = cli;
    let instance_path = &instance;

    let start = Instant::now();

    let grid = load_instance(instance_path).unwrap_or_else(|e| {
        eprintln!("Error loading instance {instance_path}: {e}");
        process::exit(1);
    });

    let problem = PatrolProblem::new(grid, drones, ticks)
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        })
        .with_progress(generations);

    let mut config = GaConfig::patrol(generations);
    config.seed = seed;

    println!("--- Evolutionary patrol search ---");
    println!("Instance: {instance_path}");
    println!("Drones: {drones}");
    println!("Generations: {generations}");
    println!("Ticks (T): {ticks}");
    println!("----------------------------------");

    let result = GaRunner::run(&problem, &config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    log::debug!("run seed: {}", result.seed);

    let seconds = start.elapsed().as_secs_f64();
    let best = &result.best;

    println!();
    println!("--- Done ---");
    println!("Accumulated urgency: {:.1}", best.fitness());
    println!("Horizon T: {ticks}");
    println!("Drones: {drones}");
    println!("Valid solution: {}", if best.is_valid() { "yes" } else { "no" });
    println!("Elapsed: {seconds:.1}s");
    println!("Routes:");
    print!("{}", report::route_summary(best, problem.grid()));

    let name = report::instance_name(instance_path);
    let summary = RunSummary {
        drones,
        generations,
        ticks,
        fitness: best.fitness(),
        valid: best.is_valid(),
        seconds,
    };
    match report::append_statistics(OUTPUT_DIR, &name, &summary) {
        Ok(path) => println!("\nStatistics saved to: {}", path.display()),
        Err(e) => {
            eprintln!("Error writing statistics: {e}");
            process::exit(1);
        }
    }
    match report::append_routes(OUTPUT_DIR, &name, best, problem.grid()) {
        Ok(path) => println!("Routes saved to: {}", path.display()),
        Err(e) => {
            eprintln!("Error writing routes: {e}");
            process::exit(1);
        }
    }
}
