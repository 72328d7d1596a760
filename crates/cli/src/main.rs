use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use even_ratio::prelude::*;
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod provenance;

#[derive(Parser)]
#[command(name = "even-ratio")]
#[command(about = "Rail-ratio first-cushion solver with invariant checks")]
struct Cmd {
    #[command(flatten)]
    table: TableArgs,

    /// Also write per-case outcomes to this file (.jsonl, .csv or .parquet)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Args)]
struct TableArgs {
    /// Millimetres per grid unit
    #[arg(long, global = true, default_value_t = TableCfg::default().grid_mm)]
    grid_mm: f64,
    /// Ball radius in millimetres
    #[arg(long, global = true, default_value_t = TableCfg::default().ball_radius_mm)]
    ball_radius_mm: f64,
}

impl TableArgs {
    fn to_cfg(&self) -> Result<TableCfg> {
        let cfg = TableCfg {
            grid_mm: self.grid_mm,
            ball_radius_mm: self.ball_radius_mm,
            ..TableCfg::default()
        };
        cfg.check().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

#[derive(Subcommand)]
enum Action {
    /// Run one case from discrete arguments
    Single {
        #[arg(long)]
        rail: Rail,
        /// Cue ball position (grid units)
        #[arg(long, num_args = 2, value_names = ["X", "Y"], required = true, allow_negative_numbers = true)]
        co: Vec<f64>,
        /// Object ball position (grid units)
        #[arg(long, num_args = 2, value_names = ["X", "Y"], required = true, allow_negative_numbers = true)]
        ob: Vec<f64>,
        #[arg(long, default_value_t = Division::Internal)]
        division: Division,
        #[arg(long, default_value_t = even_ratio::cfg::DEFAULT_TOLERANCE, value_parser = finite_f64, allow_negative_numbers = true)]
        tolerance: f64,
    },
    /// Run N uniformly sampled cases on one rail
    Random {
        #[arg(long, default_value_t = Rail::LongLeft)]
        rail: Rail,
        #[arg(long)]
        count: usize,
        /// Fixed seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run cases from a JSON file (object, array, or {"examples": [...]})
    Batch {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    execute(Cmd::parse(), &mut std::io::stdout().lock())?;
    Ok(())
}

/// Run a parsed command, writing the summary and detail lines to `stdout`.
///
/// Table overrides, the export format, and batch files are all checked before
/// the first case runs.
fn execute(cmd: Cmd, stdout: &mut impl Write) -> Result<BatchRun> {
    let table = cmd.table.to_cfg()?;
    let format = cmd
        .out
        .as_deref()
        .map(export::Format::from_path)
        .transpose()?;
    let (name, params, source) = source_for(cmd.action)?;
    tracing::info!(command = name, %params, "run");

    let cases = source.into_cases(&table);
    let run = run_batch(&cases, &table);
    writeln!(stdout, "{}", run.summary_line())?;
    for line in run.detail_lines()? {
        writeln!(stdout, "{line}")?;
    }

    if let (Some(out), Some(format)) = (cmd.out, format) {
        export::write(&out, format, &run)?;
        let payload = provenance::Payload {
            command: name.to_string(),
            args: params,
            table,
            tally: provenance::Tally::from(&run),
        };
        let sidecar = provenance::write_sidecar(&out, payload)?;
        tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "exported");
    }
    Ok(run)
}

/// Turn a subcommand into a case source; batch files are read here so that
/// unreadable or malformed input aborts before any case runs.
fn source_for(action: Action) -> Result<(&'static str, Value, CaseSource)> {
    Ok(match action {
        Action::Single {
            rail,
            co,
            ob,
            division,
            tolerance,
        } => {
            let raw = single_case(rail, &co, &ob, division, tolerance);
            ("single", raw.clone(), CaseSource::Single(raw))
        }
        Action::Random { rail, count, seed } => (
            "random",
            json!({"rail": rail.tag(), "count": count, "seed": seed}),
            CaseSource::Random { rail, count, seed },
        ),
        Action::Batch { input } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let cases = even_ratio::harness::load_cases(&text)
                .with_context(|| format!("parsing {}", input.display()))?;
            (
                "batch",
                json!({"input": input.to_string_lossy(), "cases": cases.len()}),
                CaseSource::Literal(cases),
            )
        }
    })
}

/// JSON has no encoding for inf/NaN, so they are refused before a case is built.
fn finite_f64(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("{v} is not finite"))
    }
}

fn single_case(rail: Rail, co: &[f64], ob: &[f64], division: Division, tolerance: f64) -> Value {
    json!({
        "rail": rail.tag(),
        "CO": {"x": co[0], "y": co[1]},
        "OB": {"x": ob[0], "y": ob[1]},
        "division": division.tag(),
        "tolerance": tolerance,
    })
}
