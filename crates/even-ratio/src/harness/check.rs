//! Invariant checks and per-case reports.

use serde::Serialize;
use serde_json::Value;

use super::case::{validate_case, Case, PointXY};
use crate::cfg::{COINCIDENT_EPS, DISTANCE_DECIMALS, POINT_DECIMALS, RATIO_TOL_FLOOR, T_DECIMALS};
use crate::error::RailError;
use crate::model::{compute_c1, SolveResult};
use crate::table::TableCfg;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Checks {
    pub anchor_on_rail: bool,
    pub ratio_match: bool,
    pub in_bounds: bool,
}

impl Checks {
    /// All three hold; there is no partial credit.
    #[inline]
    pub fn all(&self) -> bool {
        self.anchor_on_rail && self.ratio_match && self.in_bounds
    }
}

/// Balls resting against the rail (edge distance clamped to 0). Informational.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Frozen {
    #[serde(rename = "CO")]
    pub co: bool,
    #[serde(rename = "OB")]
    pub ob: bool,
}

/// Result of one evaluated case; numeric fields are rounded for output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub input: Case,
    #[serde(rename = "C1")]
    pub c1: PointXY,
    pub d1: f64,
    pub d2: f64,
    pub t: f64,
    /// `d1 / d2`; `None` when OB is frozen.
    pub ratio: Option<f64>,
    pub frozen: Frozen,
    pub checks: Checks,
    pub pass: bool,
}

impl Report {
    fn new(input: Case, res: &SolveResult, checks: Checks) -> Self {
        let (co, ob) = res.frozen();
        Self {
            input,
            c1: PointXY {
                x: round_to(res.c1.x, POINT_DECIMALS),
                y: round_to(res.c1.y, POINT_DECIMALS),
            },
            d1: round_to(res.d1, DISTANCE_DECIMALS),
            d2: round_to(res.d2, DISTANCE_DECIMALS),
            t: round_to(res.t, T_DECIMALS),
            ratio: res.distance_ratio().map(|r| round_to(r, DISTANCE_DECIMALS)),
            frozen: Frozen { co, ob },
            checks,
            pass: checks.all(),
        }
    }
}

/// Round half away from zero to `places` decimals.
#[inline]
pub fn round_to(v: f64, places: i32) -> f64 {
    let k = 10f64.powi(places);
    (v * k).round() / k
}

#[inline]
fn within(v: f64, target: f64, tol: f64) -> bool {
    (v - target).abs() <= tol
}

fn anchor_on_rail(res: &SolveResult, tol: f64, table: &TableCfg) -> bool {
    let fixed = res.rail.fixed_axis();
    let varying = res.rail.varying_axis();
    within(res.c1[fixed.index()], res.rail.anchor_value(table), tol)
        && table.axis_contains_eps(varying, res.c1[varying.index()], tol)
}

fn ratio_match(res: &SolveResult, tol: f64) -> bool {
    let start = res.along(res.f1);
    let total = res.along(res.f2) - start;
    let c = res.along(res.c1);
    if total.abs() < COINCIDENT_EPS {
        // Feet coincide: C1 must sit on them.
        return within(c, start, tol);
    }
    // Relative to the feet separation: feet a hair above COINCIDENT_EPS apart
    // amplify float error past the tolerance and fail the check.
    within((c - start) / total, res.t, tol.max(RATIO_TOL_FLOOR))
}

/// Evaluate the three invariants on an unrounded solver result.
pub fn check_invariants(case: &Case, res: &SolveResult, table: &TableCfg) -> Checks {
    let tol = case.tolerance;
    Checks {
        anchor_on_rail: anchor_on_rail(res, tol, table),
        ratio_match: ratio_match(res, tol),
        in_bounds: table.contains_eps(res.c1, tol),
    }
}

/// Solve and check an already validated case.
pub fn evaluate(case: &Case, table: &TableCfg) -> Result<Report, RailError> {
    let res = compute_c1(case.co, case.ob, case.rail, case.division, table)?;
    let checks = check_invariants(case, &res, table);
    Ok(Report::new(*case, &res, checks))
}

/// Normalize, solve, and check one raw case.
pub fn run_case(raw: &Value, table: &TableCfg) -> Result<Report, RailError> {
    let case = validate_case(raw, table)?;
    evaluate(&case, table)
}
