//! Error type shared by the model and the harness.
//!
//! All variants are case-local: a batch records them on the failing case and
//! moves on.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum RailError {
    /// Missing, malformed, or out-of-range input field.
    InvalidInput { field: String, reason: String },
    /// Rail tag outside `long_left | long_right | short_bottom | short_top`.
    UnknownRail { tag: String },
    /// `d1 ± d2` is (near) zero; the caller must switch the division mode.
    DegenerateConfiguration { denom: f64 },
}

impl RailError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Offending field for `InvalidInput`, `None` otherwise.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for RailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, reason } => write!(f, "invalid input `{field}`: {reason}"),
            Self::UnknownRail { tag } => write!(
                f,
                "unknown rail `{tag}` (expected long_left, long_right, short_bottom or short_top)"
            ),
            Self::DegenerateConfiguration { denom } => write!(
                f,
                "degenerate configuration: denominator {denom:e} ~ 0, try switching division mode"
            ),
        }
    }
}

impl std::error::Error for RailError {}
