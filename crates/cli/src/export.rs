//! Per-case outcome export: JSON lines, or a flat table through polars.

use anyhow::{bail, Context, Result};
use even_ratio::prelude::*;
use polars::prelude::*;
use serde_json::Value;
use std::fs::{self, File};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Jsonl,
    Csv,
    Parquet,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonl") => Ok(Format::Jsonl),
            Some("csv") => Ok(Format::Csv),
            Some("parquet") => Ok(Format::Parquet),
            other => bail!(
                "unsupported output extension {:?} for {} (expected .jsonl, .csv or .parquet)",
                other.unwrap_or(""),
                path.display()
            ),
        }
    }
}

/// Write `run` to `path`; `format` normally comes from `Format::from_path`.
pub fn write(path: &Path, format: Format, run: &BatchRun) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    match format {
        Format::Jsonl => {
            let mut text = String::new();
            for outcome in &run.outcomes {
                text.push_str(&serde_json::to_string(outcome)?);
                text.push('\n');
            }
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        }
        Format::Csv | Format::Parquet => {
            let mut df = to_frame(run)?;
            let mut file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            if format == Format::Csv {
                CsvWriter::new(&mut file).finish(&mut df)?;
            } else {
                ParquetWriter::new(file).finish(&mut df)?;
            }
        }
    }
    tracing::info!(rows = run.total(), path = %path.display(), ?format, "wrote outcomes");
    Ok(())
}

/// One row per case; solver columns are null for failed cases.
pub fn to_frame(run: &BatchRun) -> PolarsResult<DataFrame> {
    let n = run.total();
    let mut index: Vec<u32> = Vec::with_capacity(n);
    let mut rail: Vec<Option<String>> = Vec::with_capacity(n);
    let mut pass: Vec<bool> = Vec::with_capacity(n);
    let mut error: Vec<Option<String>> = Vec::with_capacity(n);
    let mut c1_x: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut c1_y: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut d1: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut d2: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut t: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut anchor: Vec<Option<bool>> = Vec::with_capacity(n);
    let mut ratio: Vec<Option<bool>> = Vec::with_capacity(n);
    let mut bounds: Vec<Option<bool>> = Vec::with_capacity(n);

    for (i, outcome) in run.outcomes.iter().enumerate() {
        index.push(i as u32 + 1);
        pass.push(outcome.passed());
        if let Some(r) = outcome.report() {
            rail.push(Some(r.input.rail.tag().to_string()));
            error.push(None);
            c1_x.push(Some(r.c1.x));
            c1_y.push(Some(r.c1.y));
            d1.push(Some(r.d1));
            d2.push(Some(r.d2));
            t.push(Some(r.t));
            anchor.push(Some(r.checks.anchor_on_rail));
            ratio.push(Some(r.checks.ratio_match));
            bounds.push(Some(r.checks.in_bounds));
        } else if let CaseOutcome::Failed { input, error: e } = outcome {
            rail.push(input.get("rail").and_then(Value::as_str).map(str::to_string));
            error.push(Some(e.to_string()));
            c1_x.push(None);
            c1_y.push(None);
            d1.push(None);
            d2.push(None);
            t.push(None);
            anchor.push(None);
            ratio.push(None);
            bounds.push(None);
        }
    }

    df!(
        "index" => index,
        "rail" => rail,
        "pass" => pass,
        "error" => error,
        "c1_x" => c1_x,
        "c1_y" => c1_y,
        "d1" => d1,
        "d2" => d2,
        "t" => t,
        "anchor_on_rail" => anchor,
        "ratio_match" => ratio,
        "in_bounds" => bounds,
    )
}
