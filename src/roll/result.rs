//! Roll outcomes and analytic odds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::range::Numeric;

/// Outcome of one roll including its explosion chains.
///
/// `rolls` is the first roll, then every lower-explosion roll, then every
/// upper-explosion roll. `last` is the final element of that sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollResult<T> {
    pub first: T,
    pub last: T,
    pub sum: T,
    pub lower_explosions: usize,
    pub upper_explosions: usize,
    pub rolls: Vec<T>,
}

pub type IntResult = RollResult<i64>;
pub type FloatResult = RollResult<f64>;

impl<T: Numeric> RollResult<T> {
    /// A single roll with no explosions.
    pub fn single(value: T) -> Self {
        Self {
            first: value,
            last: value,
            sum: value,
            lower_explosions: 0,
            upper_explosions: 0,
            rolls: vec![value],
        }
    }

    /// Assembles a result from the first roll and both explosion chains.
    pub fn from_chains(first: T, lower: Vec<T>, upper: Vec<T>) -> Self {
        let lower_explosions = lower.len();
        let upper_explosions = upper.len();

        let mut rolls = Vec::with_capacity(1 + lower_explosions + upper_explosions);
        rolls.push(first);
        rolls.extend(lower);
        rolls.extend(upper);

        let sum = rolls.iter().fold(T::default(), |acc, &v| acc + v);
        let last = rolls.last().copied().unwrap_or(first);

        Self {
            first,
            last,
            sum,
            lower_explosions,
            upper_explosions,
            rolls,
        }
    }

    pub fn exploded(&self) -> bool {
        self.lower_explosions + self.upper_explosions > 0
    }
}

/// Exact outcome probabilities, in percent (0 to 100).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    /// Probability per integer bucket.
    pub probabilities: BTreeMap<i64, f64>,
    /// Chance the first roll triggers a lower explosion, when enabled.
    pub lower_explosion_chance: Option<f64>,
    /// Chance the first roll triggers an upper explosion, when enabled.
    pub upper_explosion_chance: Option<f64>,
}

impl Odds {
    /// Probability of `bucket`, 0 when absent.
    pub fn probability(&self, bucket: i64) -> f64 {
        self.probabilities.get(&bucket).copied().unwrap_or(0.0)
    }

    /// Sum of all bucket probabilities (100 for a complete table).
    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}
