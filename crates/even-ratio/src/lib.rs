//! Rail-ratio ("even ratio") first-cushion solver and its validation harness.
//!
//! Layout
//! - `model`: edge distances, rail anchors, and the C1 solver (pure functions).
//! - `harness`: case normalization, invariant checks, batch execution.
//! - `table`: table/ball dimensions (`TableCfg`) and the `Axis` enum.
//! - `cfg`: fixed numeric thresholds shared by model and harness.
//!
//! Units
//! - All coordinates are grid units (RG): long axis `x ∈ [0, 80]`, short axis
//!   `y ∈ [0, 40]` for the default table. Millimetres only appear inside
//!   `model::edge_distance`.

pub mod cfg;
pub mod error;
pub mod harness;
pub mod model;
pub mod table;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::RailError;
pub use nalgebra::Vector2 as Vec2;

/// Common exports for callers (CLI, benches).
pub mod prelude {
    pub use crate::error::RailError;
    pub use crate::harness::{
        load_cases, random_cases, run_batch, run_case, validate_case, BatchRun, Case,
        CaseOutcome, CaseSource, Checks, Report,
    };
    pub use crate::model::{
        compute_c1, edge_distance, rail_anchor, Division, Rail, RailAnchor, SolveResult,
    };
    pub use crate::table::{Axis, TableCfg};
    pub use nalgebra::Vector2 as Vec2;
}
