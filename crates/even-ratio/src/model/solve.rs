//! Edge distance and the C1 solver.

use nalgebra::Vector2;

use super::rail::{Division, Rail};
use crate::cfg::DEGENERATE_EPS;
use crate::error::RailError;
use crate::table::TableCfg;

/// Gap between the ball surface and the cushion line of `rail`, in grid units.
///
/// The centre offset along the rail normal is scaled to millimetres, the ball
/// radius subtracted, and the result scaled back. Balls touching or overlapping
/// the rail ("frozen") report exactly `0.0`.
pub fn edge_distance(p: Vector2<f64>, rail: Rail, table: &TableCfg) -> f64 {
    let axis = rail.fixed_axis();
    let offset = rail.sign() * (p[axis.index()] - rail.anchor_value(table));
    let d_mm = offset * table.grid_mm - table.ball_radius_mm;
    (d_mm / table.grid_mm).max(0.0)
}

/// Output of `compute_c1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveResult {
    pub rail: Rail,
    pub division: Division,
    /// First-cushion point on the rail.
    pub c1: Vector2<f64>,
    /// Edge distance of CO.
    pub d1: f64,
    /// Edge distance of OB.
    pub d2: f64,
    /// Interpolation parameter from F1 towards F2 (not clamped).
    pub t: f64,
    /// Foot of CO on the rail.
    pub f1: Vector2<f64>,
    /// Foot of OB on the rail.
    pub f2: Vector2<f64>,
}

impl SolveResult {
    /// `d1 / d2`, or `None` when OB is frozen against the rail.
    pub fn distance_ratio(&self) -> Option<f64> {
        if self.d2 == 0.0 {
            None
        } else {
            Some(self.d1 / self.d2)
        }
    }

    /// Whether CO and OB (in that order) sit against the rail.
    pub fn frozen(&self) -> (bool, bool) {
        (self.d1 == 0.0, self.d2 == 0.0)
    }

    /// Coordinate of `p` along the rail.
    #[inline]
    pub fn along(&self, p: Vector2<f64>) -> f64 {
        p[self.rail.varying_axis().index()]
    }
}

/// Project `p` onto the rail line.
#[inline]
fn foot(p: Vector2<f64>, rail: Rail, table: &TableCfg) -> Vector2<f64> {
    let mut f = p;
    f[rail.fixed_axis().index()] = rail.anchor_value(table);
    f
}

/// Solve the rail-ratio rule for cue ball `co` and object ball `ob`.
///
/// `t = d1 / (d1 ± d2)` and `C1 = F1 + (F2 - F1)·t`, with the fixed coordinate
/// pinned to the rail anchor. Fails with `DegenerateConfiguration` when
/// `|d1 ± d2| < 1e-9`.
pub fn compute_c1(
    co: Vector2<f64>,
    ob: Vector2<f64>,
    rail: Rail,
    division: Division,
    table: &TableCfg,
) -> Result<SolveResult, RailError> {
    let d1 = edge_distance(co, rail, table);
    let d2 = edge_distance(ob, rail, table);
    let denom = match division {
        Division::Internal => d1 + d2,
        Division::External => d1 - d2,
    };
    if denom.abs() < DEGENERATE_EPS {
        return Err(RailError::DegenerateConfiguration { denom });
    }
    let t = d1 / denom;
    let f1 = foot(co, rail, table);
    let f2 = foot(ob, rail, table);
    let c1 = f1 + (f2 - f1) * t;
    Ok(SolveResult {
        rail,
        division,
        c1,
        d1,
        d2,
        t,
        f1,
        f2,
    })
}
