//! Partial, mergeable roll options.
//!
//! Every field is optional. Unset fields leave the target untouched when
//! merged, so options can be layered: crate defaults, then a loaded document,
//! then per-call overrides.
//!
//! # TOML
//!
//! ```toml
//! dist = "weighted_high"
//! weight = 0.75
//! range = { lower = 1, upper = 20 }
//! reroll_above = 18
//! max_upper_explosions = 3
//! custom = [[1, 10.0], [3, 30.0]]
//! ```

use serde::{Deserialize, Serialize};

use super::dist::Dist;
use super::range::{Numeric, Range};
use crate::error::RollError;

/// Custom discrete table: `(value, weight)` pairs in any order.
pub type Weights<T> = Vec<(T, f64)>;
pub type IntWeights = Weights<i64>;
pub type FloatWeights = Weights<f64>;

/// Roll options. `None` means "not set here".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound = "T: Numeric")]
pub struct Options<T> {
    /// Distribution used by distribution casters.
    pub dist: Option<Dist>,
    /// Shape knob in `[0, 1]`, interpreted by the distribution.
    pub weight: Option<f64>,
    /// Ticket table used by weighted casters.
    pub custom: Option<Weights<T>>,
    /// Range used when a roll call does not pass one.
    pub range: Option<Range<T>>,
    /// Reroll while the newest value is strictly below this.
    pub reroll_below: Option<T>,
    pub max_lower_explosions: Option<u32>,
    /// Reroll while the newest value is strictly above this.
    pub reroll_above: Option<T>,
    pub max_upper_explosions: Option<u32>,
}

pub type IntOptions = Options<i64>;
pub type FloatOptions = Options<f64>;

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            dist: None,
            weight: None,
            custom: None,
            range: None,
            reroll_below: None,
            max_lower_explosions: None,
            reroll_above: None,
            max_upper_explosions: None,
        }
    }
}

impl<T: Numeric> Options<T> {
    /// Overwrites every field that `other` sets.
    ///
    /// # Examples
    /// ```
    /// use u_roll::roll::{Dist, IntOptions};
    ///
    /// let mut base = IntOptions { dist: Some(Dist::Normal), weight: Some(0.2), ..Default::default() };
    /// base.merge(IntOptions { weight: Some(0.9), ..Default::default() });
    /// assert_eq!(base.dist, Some(Dist::Normal));
    /// assert_eq!(base.weight, Some(0.9));
    /// ```
    pub fn merge(&mut self, other: Options<T>) {
        if other.dist.is_some() {
            self.dist = other.dist;
        }
        if other.weight.is_some() {
            self.weight = other.weight;
        }
        if other.custom.is_some() {
            self.custom = other.custom;
        }
        if other.range.is_some() {
            self.range = other.range;
        }
        if other.reroll_below.is_some() {
            self.reroll_below = other.reroll_below;
        }
        if other.max_lower_explosions.is_some() {
            self.max_lower_explosions = other.max_lower_explosions;
        }
        if other.reroll_above.is_some() {
            self.reroll_above = other.reroll_above;
        }
        if other.max_upper_explosions.is_some() {
            self.max_upper_explosions = other.max_upper_explosions;
        }
    }

    /// Builder form of [`merge`](Self::merge).
    pub fn merged(mut self, other: Options<T>) -> Self {
        self.merge(other);
        self
    }

    /// Parses an options document.
    ///
    /// # Errors
    /// Returns [`RollError::Config`] on malformed TOML, unknown distribution
    /// names or values of the wrong type.
    pub fn from_toml_str(s: &str) -> Result<Self, RollError> {
        toml::from_str(s).map_err(|e| RollError::Config(e.to_string()))
    }
}

/// Folds options left to right; later sets win.
///
/// An empty input yields all-unset options.
pub fn merge_options<T: Numeric>(opts: impl IntoIterator<Item = Options<T>>) -> Options<T> {
    opts.into_iter().fold(Options::default(), Options::merged)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn opt_strategy() -> impl Strategy<Value = IntOptions> {
        (
            proptest::option::of(0_usize..7),
            proptest::option::of(0.0_f64..=1.0),
            proptest::option::of(-10_i64..10),
            proptest::option::of(0_u32..5),
        )
            .prop_map(|(dist, weight, below, max_lower)| IntOptions {
                dist: dist.map(|i| Dist::ALL[i]),
                weight,
                reroll_below: below,
                max_lower_explosions: max_lower,
                ..Default::default()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn merge_with_unset_is_identity(a in opt_strategy()) {
            prop_assert_eq!(a.clone().merged(IntOptions::default()), a);
        }

        #[test]
        fn merge_is_associative(a in opt_strategy(), b in opt_strategy(), c in opt_strategy()) {
            let left = a.clone().merged(b.clone()).merged(c.clone());
            let right = a.merged(b.merged(c));
            prop_assert_eq!(left, right);
        }
    }
}
