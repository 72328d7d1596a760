//! Numeric thresholds (fixed).
//!
//! Policy
//! - These are constants, not knobs. Table geometry is configurable through
//!   `TableCfg`; the thresholds below only guard floating-point edge cases.

/// `|denom|` below this makes the C1 ratio undefined.
pub const DEGENERATE_EPS: f64 = 1e-9;
/// `|F2 - F1|` below this means both feet coincide on the rail.
pub const COINCIDENT_EPS: f64 = 1e-12;
/// Lower bound for the tolerance used by the ratio check.
pub const RATIO_TOL_FLOOR: f64 = 1e-6;
/// Case tolerance when the input omits `tolerance`.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Decimal places used when a report is emitted.
pub const POINT_DECIMALS: i32 = 6;
pub const DISTANCE_DECIMALS: i32 = 6;
pub const T_DECIMALS: i32 = 9;
