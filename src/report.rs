//! Run artifacts: statistics and route CSV files, console route summaries.
//!
//! Both CSV files are opened in append mode so repeated runs on the same
//! instance accumulate rows; the header is written only when the file is
//! created.

use crate::grid::{Action, Coord, Grid};
use crate::patrol::Genome;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const STATS_HEADER: &str =
    "num_drones,iteraciones,ticks_operacion,urgencia_acumulada,solucion_valida,tiempo_s";
const ROUTES_HEADER: &str = "num_drones,dron,tick,fila,columna,accion,base_origen";

/// Figures recorded for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub drones: usize,
    pub generations: usize,
    pub ticks: usize,
    pub fitness: f64,
    pub valid: bool,
    pub seconds: f64,
}

/// File stem of an instance path: no directories, no final extension.
pub fn instance_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Positions of every drone from its base through each tick.
///
/// Moves are applied without any feasibility check, so an invalid plan shows
/// exactly where it goes wrong.
pub fn routes(genome: &Genome, grid: &Grid) -> Vec<Vec<Coord>> {
    (0..genome.drones())
        .map(|d| genome.trajectory(d, grid).collect())
        .collect()
}

/// One line per drone: `D1: B0 - (r,c) - (r,c) ...`, drones numbered from 1.
pub fn route_summary(genome: &Genome, grid: &Grid) -> String {
    let mut out = String::new();
    for (d, path) in routes(genome, grid).iter().enumerate() {
        let _ = write!(out, "D{}: B{}", d + 1, genome.base_id(d));
        for pos in path.iter().skip(1) {
            let _ = write!(out, " - {pos}");
        }
        out.push('\n');
    }
    out
}

/// Appends one row to `<dir>/<instance>_estadisticas.csv`.
pub fn append_statistics(
    dir: impl AsRef<Path>,
    instance: &str,
    summary: &RunSummary,
) -> io::Result<PathBuf> {
    let path = dir.as_ref().join(format!("{instance}_estadisticas.csv"));
    let mut out = open_append(&path, STATS_HEADER)?;
    writeln!(
        out,
        "{},{},{},{:.2},{},{:.3}",
        summary.drones,
        summary.generations,
        summary.ticks,
        summary.fitness,
        if summary.valid { "Si" } else { "No" },
        summary.seconds
    )?;
    out.flush()?;
    Ok(path)
}

/// Appends the routes of `genome` to `<dir>/<instance>_rutas.csv`.
///
/// Tick 0 lists every drone at its base with action 0; tick `t + 1` lists
/// the position after applying the action of tick `t`.
pub fn append_routes(
    dir: impl AsRef<Path>,
    instance: &str,
    genome: &Genome,
    grid: &Grid,
) -> io::Result<PathBuf> {
    let path = dir.as_ref().join(format!("{instance}_rutas.csv"));
    let mut out = open_append(&path, ROUTES_HEADER)?;
    let k = genome.drones();
    let paths = routes(genome, grid);

    for tick in 0..=genome.ticks() {
        for (drone, route) in paths.iter().enumerate() {
            let action = match tick {
                0 => Action::Stay,
                t => genome.action(drone, t - 1),
            };
            let pos = route[tick];
            writeln!(
                out,
                "{k},{drone},{tick},{},{},{},{}",
                pos.row,
                pos.col,
                action.code(),
                genome.base_id(drone)
            )?;
        }
    }
    out.flush()?;
    Ok(path)
}

fn open_append(path: &Path, header: &str) -> io::Result<BufWriter<fs::File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let is_new = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    if is_new {
        writeln!(out, "{header}")?;
    }
    Ok(out)
}
