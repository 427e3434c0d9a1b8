//! The score type ranked by the search.
//!
//! A [`Score`] pairs the numeric fitness value with the feasibility flag.
//! Ordering puts every feasible score above every infeasible one and only
//! then compares values, so an overloaded assignment can never outrank a
//! legal one, whatever the sign of either raw value.

use std::cmp::Ordering;
use std::fmt;

/// Fitness of one genome. Higher is better (maximization).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    value: f64,
    feasible: bool,
}

impl Score {
    /// Score of an assignment that respects every capacity.
    pub fn feasible(value: f64) -> Self {
        Self {
            value,
            feasible: true,
        }
    }

    /// Score of an assignment that overloads at least one carrier.
    pub fn infeasible(value: f64) -> Self {
        Self {
            value,
            feasible: false,
        }
    }

    /// Ranks below every other score.
    pub fn worst() -> Self {
        Self::infeasible(f64::NEG_INFINITY)
    }

    /// The numeric fitness (already penalized when infeasible).
    pub fn value(self) -> f64 {
        self.value
    }

    /// Whether no carrier is overloaded.
    pub fn is_feasible(self) -> bool {
        self.feasible
    }

    /// A feasible assignment with positive value, i.e. something worth
    /// shipping. Callers should treat anything else as "no usable plan".
    pub fn is_usable(self) -> bool {
        self.feasible && self.value > 0.0
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.feasible, other.feasible) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => self.value.total_cmp(&other.value),
        }
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.feasible {
            write!(f, "{:.2}", self.value)
        } else {
            write!(f, "{:.2} (infeasible)", self.value)
        }
    }
}
