//! Validation harness around the geometry model.
//!
//! Flow per case: raw JSON → `validate_case` → `compute_c1` → three invariant
//! checks → `Report`. `run_batch` applies this to many cases and keeps a
//! pass tally; case-level errors become failed outcomes and never abort a run.
//!
//! Checks
//! - anchor_on_rail: C1's fixed coordinate equals the rail anchor and its
//!   varying coordinate lies on the rail segment (both within `tolerance`).
//! - ratio_match: C1 divides F1→F2 in the ratio `t`.
//! - in_bounds: C1 lies inside the table, widened by `tolerance`.

mod batch;
mod case;
mod check;

pub use batch::{load_cases, random_cases, run_batch, BatchRun, CaseOutcome, CaseSource};
pub use case::{validate_case, Case, PointXY};
pub use check::{check_invariants, evaluate, round_to, run_case, Checks, Frozen, Report};

#[cfg(test)]
mod tests;
