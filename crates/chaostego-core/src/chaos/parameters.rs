use std::fmt;

use crate::error::ChaostegoError;
use crate::result::Result;

pub const DEFAULT_R1: f64 = 3.9;
pub const DEFAULT_X01: f64 = 0.5;
pub const DEFAULT_R2: f64 = 3.95;
pub const DEFAULT_X02: f64 = 0.7;

/// Growth rate and seed of the two logistic maps that drive a [`Keystream`][ks].
///
/// There is no check for the chaotic regime. Degenerate values like `x0 = 0.0`
/// or `r > 4.0` are accepted and simply produce a degenerate keystream.
///
/// [ks]: super::Keystream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaoticParameters {
    pub r1: f64,
    pub x01: f64,
    pub r2: f64,
    pub x02: f64,
}

impl Default for ChaoticParameters {
    fn default() -> Self {
        Self {
            r1: DEFAULT_R1,
            x01: DEFAULT_X01,
            r2: DEFAULT_R2,
            x02: DEFAULT_X02,
        }
    }
}

impl fmt::Display for ChaoticParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r1={} x01={} r2={} x02={}",
            self.r1, self.x01, self.r2, self.x02
        )
    }
}

impl ChaoticParameters {
    pub fn new(r1: f64, x01: f64, r2: f64, x02: f64) -> Self {
        Self { r1, x01, r2, x02 }
    }

    /// Builds parameters from optional textual values, missing ones fall back to the defaults.
    pub fn parse(
        r1: Option<&str>,
        x01: Option<&str>,
        r2: Option<&str>,
        x02: Option<&str>,
    ) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            r1: parse_or("r1", r1, defaults.r1)?,
            x01: parse_or("x01", x01, defaults.x01)?,
            r2: parse_or("r2", r2, defaults.r2)?,
            x02: parse_or("x02", x02, defaults.x02)?,
        })
    }

    pub fn first_map(&self) -> (f64, f64) {
        (self.r1, self.x01)
    }

    pub fn second_map(&self) -> (f64, f64) {
        (self.r2, self.x02)
    }
}

/// Parses one named parameter value, used by the cli as well.
pub fn parse_parameter(name: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ChaostegoError::InvalidParameter {
            name,
            value: value.to_string(),
        })
}

fn parse_or(name: &'static str, value: Option<&str>, default: f64) -> Result<f64> {
    match value {
        Some(v) => parse_parameter(name, v),
        None => Ok(default),
    }
}
