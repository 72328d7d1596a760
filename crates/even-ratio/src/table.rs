//! Table and ball dimensions.
//!
//! - `TableCfg`: grid scale, ball radius, and grid extents of the playing area.
//! - `Axis`: the two table axes, usable as indices into `Vector2`.

use nalgebra::Vector2;
use serde::Serialize;

/// Table axis. `X` is the long axis, `Y` the short one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// Physical table/ball constants.
///
/// `grid_mm` converts one grid unit to millimetres; `ball_radius_mm` is the
/// ball radius in millimetres. Extents are in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TableCfg {
    pub grid_mm: f64,
    pub ball_radius_mm: f64,
    pub long_extent: f64,
    pub short_extent: f64,
}

impl Default for TableCfg {
    fn default() -> Self {
        Self {
            grid_mm: 35.55,
            ball_radius_mm: 30.75,
            long_extent: 80.0,
            short_extent: 40.0,
        }
    }
}

impl TableCfg {
    /// Upper bound of the playing area along `axis` (lower bound is 0).
    #[inline]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.long_extent,
            Axis::Y => self.short_extent,
        }
    }

    /// Closed-box membership, widened by `eps` on every side.
    pub fn contains_eps(&self, p: Vector2<f64>, eps: f64) -> bool {
        [Axis::X, Axis::Y]
            .into_iter()
            .all(|a| self.axis_contains_eps(a, p[a.index()], eps))
    }

    #[inline]
    pub fn axis_contains_eps(&self, axis: Axis, v: f64, eps: f64) -> bool {
        -eps <= v && v <= self.extent(axis) + eps
    }

    /// Reject non-physical configurations (non-positive or non-finite values).
    pub fn check(&self) -> Result<(), String> {
        let fields = [
            ("grid_mm", self.grid_mm),
            ("ball_radius_mm", self.ball_radius_mm),
            ("long_extent", self.long_extent),
            ("short_extent", self.short_extent),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v <= 0.0 {
                return Err(format!("{name} must be finite and > 0 (got {v})"));
            }
        }
        Ok(())
    }
}
