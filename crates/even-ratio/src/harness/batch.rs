//! Batch execution: case sources, the pass tally, and line-oriented output.
//!
//! Case-level errors are recorded on the outcome; nothing here aborts a run.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::case::Case;
use super::check::{run_case, Report};
use crate::error::RailError;
use crate::model::Rail;
use crate::table::TableCfg;

/// Where a batch gets its raw cases from.
#[derive(Clone, Debug)]
pub enum CaseSource {
    /// One case assembled from discrete fields.
    Single(Value),
    /// Literal cases, e.g. from a JSON document (see `load_cases`).
    Literal(Vec<Value>),
    /// Uniformly sampled CO/OB for a fixed rail. `seed = None` draws from entropy.
    Random {
        rail: Rail,
        count: usize,
        seed: Option<u64>,
    },
}

impl CaseSource {
    pub fn into_cases(self, table: &TableCfg) -> Vec<Value> {
        match self {
            CaseSource::Single(raw) => vec![raw],
            CaseSource::Literal(cases) => cases,
            CaseSource::Random { rail, count, seed } => random_cases(rail, count, seed, table),
        }
    }
}

/// Parse a batch document: one case object, an array of cases, or a dataset
/// `{"examples": [..]}`.
pub fn load_cases(text: &str) -> Result<Vec<Value>, serde_json::Error> {
    let doc: Value = serde_json::from_str(text)?;
    Ok(match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("examples") {
            Some(Value::Array(items)) if !map.contains_key("rail") => items,
            Some(other) => {
                map.insert("examples".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        other => vec![other],
    })
}

fn sample_point<R: Rng>(rng: &mut R, table: &TableCfg) -> Vector2<f64> {
    let x = rng.gen_range(0.0..=table.long_extent);
    let y = rng.gen_range(0.0..=table.short_extent);
    Vector2::new(x, y)
}

/// `count` random internal-division cases on `rail` with default tolerance.
///
/// A fixed `seed` reproduces the same sequence run-to-run.
pub fn random_cases(rail: Rail, count: usize, seed: Option<u64>, table: &TableCfg) -> Vec<Value> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    (0..count)
        .map(|_| {
            let co = sample_point(&mut rng, table);
            let ob = sample_point(&mut rng, table);
            Case::new(rail, co, ob).to_json()
        })
        .collect()
}

/// Outcome of one case within a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseOutcome {
    Evaluated(Report),
    Failed { input: Value, error: RailError },
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, CaseOutcome::Evaluated(r) if r.pass)
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            CaseOutcome::Evaluated(r) => Some(r),
            CaseOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&RailError> {
        match self {
            CaseOutcome::Evaluated(_) => None,
            CaseOutcome::Failed { error, .. } => Some(error),
        }
    }
}

#[derive(Serialize)]
struct FailedLine<'a> {
    input: &'a Value,
    error: String,
    pass: bool,
}

impl Serialize for CaseOutcome {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            CaseOutcome::Evaluated(report) => report.serialize(s),
            CaseOutcome::Failed { input, error } => FailedLine {
                input,
                error: error.to_string(),
                pass: false,
            }
            .serialize(s),
        }
    }
}

/// All outcomes of a run plus the pass tally.
#[derive(Clone, Debug, Default)]
pub struct BatchRun {
    pub outcomes: Vec<CaseOutcome>,
    pub passed: usize,
}

impl BatchRun {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed
    }

    pub fn summary_line(&self) -> String {
        format!(
            "cases={} pass={} fail={}",
            self.total(),
            self.passed,
            self.failed()
        )
    }

    /// One `#<index>: <json>` line per case, 1-based.
    pub fn detail_lines(&self) -> Result<Vec<String>, serde_json::Error> {
        self.outcomes
            .iter()
            .enumerate()
            .map(|(i, o)| Ok(format!("#{}: {}", i + 1, serde_json::to_string(o)?)))
            .collect()
    }
}

/// Run every case, converting case-level errors into failed outcomes.
pub fn run_batch(cases: &[Value], table: &TableCfg) -> BatchRun {
    let mut run = BatchRun {
        outcomes: Vec::with_capacity(cases.len()),
        passed: 0,
    };
    for (index, raw) in cases.iter().enumerate() {
        let outcome = match run_case(raw, table) {
            Ok(report) => {
                tracing::debug!(index, pass = report.pass, t = report.t, "case evaluated");
                CaseOutcome::Evaluated(report)
            }
            Err(error) => {
                tracing::warn!(index, %error, "case failed");
                CaseOutcome::Failed {
                    input: raw.clone(),
                    error,
                }
            }
        };
        if outcome.passed() {
            run.passed += 1;
        }
        run.outcomes.push(outcome);
    }
    tracing::info!(
        cases = run.total(),
        passed = run.passed,
        failed = run.failed(),
        "batch finished"
    );
    run
}
