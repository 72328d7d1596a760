//! Case normalization: raw JSON in, typed `Case` out.

use nalgebra::Vector2;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::cfg::DEFAULT_TOLERANCE;
use crate::error::RailError;
use crate::model::{Division, Rail};
use crate::table::{Axis, TableCfg};

/// `{"x": .., "y": ..}` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PointXY {
    pub x: f64,
    pub y: f64,
}

impl From<Vector2<f64>> for PointXY {
    fn from(p: Vector2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

fn ser_point<S: Serializer>(p: &Vector2<f64>, s: S) -> Result<S::Ok, S::Error> {
    PointXY::from(*p).serialize(s)
}

/// A validated input record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Case {
    pub rail: Rail,
    #[serde(rename = "CO", serialize_with = "ser_point")]
    pub co: Vector2<f64>,
    #[serde(rename = "OB", serialize_with = "ser_point")]
    pub ob: Vector2<f64>,
    pub division: Division,
    pub tolerance: f64,
}

impl Case {
    /// Internal division, default tolerance.
    pub fn new(rail: Rail, co: Vector2<f64>, ob: Vector2<f64>) -> Self {
        Self {
            rail,
            co,
            ob,
            division: Division::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_division(mut self, division: Division) -> Self {
        self.division = division;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Raw JSON form accepted by `validate_case`.
    pub fn to_json(&self) -> Value {
        json!({
            "rail": self.rail.tag(),
            "CO": {"x": self.co.x, "y": self.co.y},
            "OB": {"x": self.ob.x, "y": self.ob.y},
            "division": self.division.tag(),
            "tolerance": self.tolerance,
        })
    }
}

const RAIL_CHOICES: &str = "must be one of: long_left, long_right, short_bottom, short_top";

/// Normalize a raw case, failing on the first offending field.
///
/// Checks run in order: required keys (`rail`, `CO`, `OB`), rail tag, ball
/// coordinates (present, numeric, inside the table), `division`, `tolerance`.
pub fn validate_case(raw: &Value, table: &TableCfg) -> Result<Case, RailError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| RailError::invalid("case", "must be a JSON object"))?;
    for key in ["rail", "CO", "OB"] {
        if !obj.contains_key(key) {
            return Err(RailError::invalid(key, "missing required field"));
        }
    }
    let rail = match &obj["rail"] {
        Value::String(tag) => tag
            .parse::<Rail>()
            .map_err(|_| RailError::invalid("rail", RAIL_CHOICES))?,
        _ => return Err(RailError::invalid("rail", RAIL_CHOICES)),
    };
    let co = ball(obj, "CO", table)?;
    let ob = ball(obj, "OB", table)?;
    let division = match obj.get("division") {
        None | Some(Value::Null) => Division::default(),
        Some(Value::String(tag)) => tag.parse::<Division>()?,
        Some(_) => {
            return Err(RailError::invalid(
                "division",
                "must be internal or external",
            ))
        }
    };
    let tolerance = match obj.get("tolerance") {
        None | Some(Value::Null) => DEFAULT_TOLERANCE,
        Some(v) => v
            .as_f64()
            .ok_or_else(|| RailError::invalid("tolerance", "must be a number"))?,
    };
    if !(tolerance >= 0.0 && tolerance.is_finite()) {
        return Err(RailError::invalid("tolerance", "must be finite and >= 0"));
    }
    Ok(Case {
        rail,
        co,
        ob,
        division,
        tolerance,
    })
}

fn ball(obj: &Map<String, Value>, name: &str, table: &TableCfg) -> Result<Vector2<f64>, RailError> {
    let node = obj[name]
        .as_object()
        .ok_or_else(|| RailError::invalid(name, "must be an object with x and y"))?;
    let mut p = Vector2::zeros();
    for axis in [Axis::X, Axis::Y] {
        let field = format!("{name}.{}", axis.name());
        let v = node
            .get(axis.name())
            .ok_or_else(|| RailError::invalid(field.as_str(), "is required"))?
            .as_f64()
            .ok_or_else(|| RailError::invalid(field.as_str(), "must be a number"))?;
        if !table.axis_contains_eps(axis, v, 0.0) {
            return Err(RailError::invalid(
                field.as_str(),
                format!("out of range [0,{}]", table.extent(axis)),
            ));
        }
        p[axis.index()] = v;
    }
    Ok(p)
}
