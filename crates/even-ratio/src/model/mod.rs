//! Geometry model of the rail-ratio rule.
//!
//! Purpose
//! - Measure the gap between a ball's surface and a cushion (`edge_distance`).
//! - Place the first-cushion point C1 on a rail by dividing the segment between
//!   the rail feet of CO and OB in the ratio of those gaps (`compute_c1`).
//!
//! Everything here is a pure function of its inputs; validity checks on the
//! result live in `crate::harness`.

mod rail;
mod solve;

pub use rail::{rail_anchor, Division, Rail, RailAnchor, Side};
pub use solve::{compute_c1, edge_distance, SolveResult};
