//! Rails and division modes.
//!
//! Per-rail data (fixed axis, table side, orientation) sits in one lookup
//! table indexed by the `Rail` discriminant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RailError;
use crate::table::{Axis, TableCfg};

/// One of the four cushions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rail {
    LongLeft = 0,
    LongRight = 1,
    ShortBottom = 2,
    ShortTop = 3,
}

/// Which end of the fixed axis a rail sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Anchor at 0.
    Low,
    /// Anchor at the table extent.
    High,
}

#[derive(Clone, Copy, Debug)]
struct RailSpec {
    tag: &'static str,
    fixed: Axis,
    side: Side,
}

const RAILS: [RailSpec; 4] = [
    RailSpec {
        tag: "long_left",
        fixed: Axis::X,
        side: Side::Low,
    },
    RailSpec {
        tag: "long_right",
        fixed: Axis::X,
        side: Side::High,
    },
    RailSpec {
        tag: "short_bottom",
        fixed: Axis::Y,
        side: Side::Low,
    },
    RailSpec {
        tag: "short_top",
        fixed: Axis::Y,
        side: Side::High,
    },
];

impl Rail {
    pub const ALL: [Rail; 4] = [
        Rail::LongLeft,
        Rail::LongRight,
        Rail::ShortBottom,
        Rail::ShortTop,
    ];

    #[inline]
    fn spec(self) -> &'static RailSpec {
        &RAILS[self as usize]
    }

    /// Snake-case tag used on the wire.
    #[inline]
    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    /// Axis pinned by the rail.
    #[inline]
    pub fn fixed_axis(self) -> Axis {
        self.spec().fixed
    }

    /// Axis along which a point on the rail moves.
    #[inline]
    pub fn varying_axis(self) -> Axis {
        self.spec().fixed.other()
    }

    #[inline]
    pub fn side(self) -> Side {
        self.spec().side
    }

    /// `+1` when the table lies on the positive side of the rail line, `-1` otherwise.
    #[inline]
    pub fn sign(self) -> f64 {
        match self.side() {
            Side::Low => 1.0,
            Side::High => -1.0,
        }
    }

    /// Fixed-axis coordinate of the rail line.
    #[inline]
    pub fn anchor_value(self, table: &TableCfg) -> f64 {
        match self.side() {
            Side::Low => 0.0,
            Side::High => table.extent(self.fixed_axis()),
        }
    }
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Rail {
    type Err = RailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rail::ALL
            .into_iter()
            .find(|r| r.tag() == s)
            .ok_or_else(|| RailError::UnknownRail { tag: s.to_string() })
    }
}

/// Pinned coordinate of a rail and the coordinate that varies along it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RailAnchor {
    pub fixed_axis: Axis,
    pub fixed_value: f64,
    pub varying_axis: Axis,
}

pub fn rail_anchor(rail: Rail, table: &TableCfg) -> RailAnchor {
    RailAnchor {
        fixed_axis: rail.fixed_axis(),
        fixed_value: rail.anchor_value(table),
        varying_axis: rail.varying_axis(),
    }
}

/// How `d1` and `d2` combine into the interpolation parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    /// `t = d1 / (d1 + d2)`
    #[default]
    Internal,
    /// `t = d1 / (d1 - d2)`
    External,
}

impl Division {
    pub fn tag(self) -> &'static str {
        match self {
            Division::Internal => "internal",
            Division::External => "external",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Division {
    type Err = RailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(Division::Internal),
            "external" => Ok(Division::External),
            _ => Err(RailError::invalid(
                "division",
                "must be internal or external",
            )),
        }
    }
}
