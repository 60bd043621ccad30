use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Direction of a fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rising,
    Falling,
}

impl Direction {
    /// `Rising` for a strictly positive slope, `Falling` otherwise (zero included).
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            Direction::Rising
        } else {
            Direction::Falling
        }
    }
}

/// How missing calendar dates are inserted into a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapFill {
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "zero")]
    Zero,
    #[strum(serialize = "missing")]
    Missing,
    #[strum(serialize = "ffill")]
    #[serde(rename = "ffill")]
    ForwardFill,
    #[strum(serialize = "bfill")]
    #[serde(rename = "bfill")]
    BackFill,
}

/// What to do with negative values (downward data revisions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NegativePolicy {
    Keep,
    Clip,
}
