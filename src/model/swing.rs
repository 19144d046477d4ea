use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Signed percentage-point change against a prior baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Swing(f64);

impl Swing {
    pub const NEUTRAL: Swing = Swing(0.0);

    pub fn new(points: f64) -> Swing {
        // Keeps -0.0 from rendering as "-0.0%".
        if points == 0.0 || !points.is_finite() {
            Swing::NEUTRAL
        } else {
            Swing(points)
        }
    }

    pub fn points(&self) -> f64 {
        self.0
    }

    /// Parses strings such as `+3.2%`, `-1.5`, ` 2 % `.
    pub fn parse(raw: &str) -> Option<Swing> {
        lazy_static! {
            static ref SWING_RX: Regex = Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*%?\s*$").unwrap();
        }

        let caps = SWING_RX.captures(raw)?;
        caps.get(1)?.as_str().parse::<f64>().ok().map(Swing::new)
    }

    /// Coerces a JSON value into a swing, falling back to neutral.
    pub fn from_value(value: &Value) -> Swing {
        match value {
            Value::Number(n) => n.as_f64().map(Swing::new).unwrap_or(Swing::NEUTRAL),
            Value::String(s) => Swing::parse(s).unwrap_or(Swing::NEUTRAL),
            _ => Swing::NEUTRAL,
        }
    }
}

impl fmt::Display for Swing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.1}%", self.0)
    }
}

impl Serialize for Swing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
