//! Salary band records and the band arithmetic.
//!
//! A band is described by its midpoint `m` and spread `s`. It splits into four
//! contiguous sub-bands:
//! - Learning `[m(1-2s), m(1-s))`
//! - Fulfilling `[m(1-s), m)`
//! - Mastering `[m, m(1+s))`
//! - Exceeding `[m(1+s), m(1+2s)]`
//!
//! Consecutive levels are chained so the next level's Learning start equals
//! this level's Exceeding start.

use serde::{Deserialize, Serialize};

/// Midpoint of a new top-level band.
pub const DEFAULT_MIDPOINT: f64 = 50_000.0;
/// Spread of a new top-level band.
pub const DEFAULT_SPREAD: f64 = 0.075;

/// One compensation level of a job family.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalaryBand {
    pub id: String,
    pub name: String,
    pub midpoint: f64,
    /// Fraction of the midpoint, e.g. 0.075.
    pub spread: f64,
    /// Derived from neighbors instead of edited by hand.
    pub is_auto_calculated: bool,
    /// The level below this one in the progression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Wins conflicts when several manual bands constrain the same auto band.
    pub is_leading: bool,
}

impl SalaryBand {
    /// A manual band.
    pub fn manual(id: impl Into<String>, name: impl Into<String>, midpoint: f64, spread: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            midpoint,
            spread,
            ..Default::default()
        }
    }

    /// An auto-calculated band above `parent_id`.
    pub fn auto(id: impl Into<String>, name: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_auto_calculated: true,
            parent_id: Some(parent_id.into()),
            ..Default::default()
        }
    }

    /// Builder-style parent assignment.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Spreads outside `(0, 0.5)` make the band formulas degenerate.
    pub fn has_valid_spread(&self) -> bool {
        self.spread > 0.0 && self.spread < 0.5
    }

    pub fn sub_bands(&self) -> [SubBand; 4] {
        sub_bands(self.midpoint, self.spread)
    }

    /// Lowest and highest salary covered by the band.
    pub fn range(&self) -> (f64, f64) {
        (
            self.midpoint * (1.0 - 2.0 * self.spread),
            self.midpoint * (1.0 + 2.0 * self.spread),
        )
    }
}

/// Name of a sub-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubBandName {
    Learning,
    Fulfilling,
    Mastering,
    Exceeding,
}

/// A salary interval inside a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubBand {
    pub name: SubBandName,
    pub start: f64,
    pub end: f64,
}

/// The four sub-bands of `(midpoint, spread)`, lowest first.
pub fn sub_bands(midpoint: f64, spread: f64) -> [SubBand; 4] {
    let m = midpoint;
    let s = spread;
    [
        SubBand {
            name: SubBandName::Learning,
            start: m * (1.0 - 2.0 * s),
            end: m * (1.0 - s),
        },
        SubBand {
            name: SubBandName::Fulfilling,
            start: m * (1.0 - s),
            end: m,
        },
        SubBand {
            name: SubBandName::Mastering,
            start: m,
            end: m * (1.0 + s),
        },
        SubBand {
            name: SubBandName::Exceeding,
            start: m * (1.0 + s),
            end: m * (1.0 + 2.0 * s),
        },
    ]
}

/// Midpoint of the level above, so its Learning start meets this Exceeding start.
#[inline]
pub fn next_midpoint(midpoint: f64, spread: f64) -> f64 {
    midpoint * (1.0 + spread) / (1.0 - 2.0 * spread)
}

/// Midpoint of the level below; inverse of [`next_midpoint`].
#[inline]
pub fn previous_midpoint(midpoint: f64, spread: f64) -> f64 {
    midpoint * (1.0 - 2.0 * spread) / (1.0 + spread)
}
