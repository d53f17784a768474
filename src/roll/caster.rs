//! The caster interface and the distribution caster.
//!
//! # Explosion Chains
//!
//! After the first roll, two independent chains run, both seeded with the
//! first value:
//!
//! - lower: while `count < max_lower_explosions` and the newest value is
//!   strictly below `reroll_below`, roll again;
//! - upper: while `count < max_upper_explosions` and the newest value is
//!   strictly above `reroll_above`, roll again.
//!
//! The lower chain consumes the stream before the upper chain.

use std::sync::Arc;
use tracing::trace;

use super::config::{DistConfig, ExplosionRules};
use super::dist::{roll_float, Dist, DistParams, Distribution};
use super::options::Options;
use super::range::{Numeric, Range};
use super::result::{Odds, RollResult};
use crate::error::RollError;
use crate::random::Stream;

/// Something that rolls values of kind `T`.
///
/// Every method takes an optional range; `None` selects the caster's
/// configured default range.
pub trait Caster<T: Numeric> {
    /// Rolls one value with its explosion chains.
    fn one(&mut self, range: impl Into<Option<Range<T>>>) -> Result<RollResult<T>, RollError>;

    /// Rolls `count` independent results over the same range, in stream order.
    fn multiple(
        &mut self,
        count: usize,
        range: impl Into<Option<Range<T>>>,
    ) -> Result<Vec<RollResult<T>>, RollError> {
        let range = range.into();
        (0..count).map(|_| self.one(range)).collect()
    }

    /// Exact outcome probabilities. Never consumes randomness.
    fn odds(&self, range: impl Into<Option<Range<T>>>) -> Result<Odds, RollError>;
}

/// Caster drawing from a continuous distribution over a range.
///
/// # Examples
/// ```
/// use u_roll::roll::{d6, Caster, Dist, IntSource};
///
/// let mut caster = IntSource::new("campaign").salt_dist("goblin").dist(Dist::Normal);
/// let result = caster.one(d6()).unwrap();
/// assert!((1..=6).contains(&result.first));
///
/// let odds = caster.odds(d6()).unwrap();
/// assert!((odds.total() - 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct DistCaster<T> {
    rng: Stream,
    cfg: DistConfig<T>,
}

pub type IntDistCaster = DistCaster<i64>;
pub type FloatDistCaster = DistCaster<f64>;

type ExplodeRule<T> = fn(&ExplosionRules<T>, T, usize) -> bool;

impl<T: Numeric> DistCaster<T> {
    pub(crate) fn new(rng: Stream, cfg: DistConfig<T>) -> Self {
        Self { rng, cfg }
    }

    pub fn config(&self) -> &DistConfig<T> {
        &self.cfg
    }

    /// Selects a built-in distribution.
    pub fn dist(mut self, dist: Dist) -> Self {
        self.cfg.dist = Arc::new(dist);
        self
    }

    /// Rolls from any [`Distribution`] implementation.
    pub fn distribution<D: Distribution + 'static>(mut self, dist: D) -> Self {
        self.cfg.dist = Arc::new(dist);
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.cfg.weight = weight;
        self
    }

    /// Default range for calls that pass `None`.
    pub fn range(mut self, range: Range<T>) -> Self {
        self.cfg.range = range;
        self
    }

    pub fn reroll_below(mut self, value: T) -> Self {
        self.cfg.explosions.reroll_below = value;
        self
    }

    pub fn lower_explosions(mut self, max: u32) -> Self {
        self.cfg.explosions.max_lower_explosions = max;
        self
    }

    pub fn reroll_above(mut self, value: T) -> Self {
        self.cfg.explosions.reroll_above = value;
        self
    }

    pub fn upper_explosions(mut self, max: u32) -> Self {
        self.cfg.explosions.max_upper_explosions = max;
        self
    }

    /// Applies every field the options set; the rest is kept.
    pub fn with(mut self, opts: Options<T>) -> Self {
        self.cfg.apply(&opts);
        self
    }

    /// Independent copy continuing from the same stream position.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    fn params(&self, range: Range<T>) -> Result<DistParams, RollError> {
        T::check_range(&range)?;
        Ok(DistParams::new(range.working(), self.cfg.weight))
    }

    fn roll_value(&mut self, params: &DistParams) -> Result<T, RollError> {
        let dist = self.cfg.dist.as_ref();
        Ok(T::from_sample(roll_float(dist, params, &mut self.rng)?))
    }

    fn explode(
        &mut self,
        first: T,
        params: &DistParams,
        should_explode: ExplodeRule<T>,
    ) -> Result<Vec<T>, RollError> {
        let rules = self.cfg.explosions;
        let mut rolls = Vec::new();
        let mut current = first;
        while should_explode(&rules, current, rolls.len()) {
            current = self.roll_value(params)?;
            rolls.push(current);
        }
        Ok(rolls)
    }
}

impl<T: Numeric> Caster<T> for DistCaster<T> {
    fn one(&mut self, range: impl Into<Option<Range<T>>>) -> Result<RollResult<T>, RollError> {
        let range = range.into().unwrap_or(self.cfg.range);
        let params = self.params(range)?;

        let first = self.roll_value(&params)?;
        let lower = self.explode(first, &params, ExplosionRules::should_explode_lower)?;
        let upper = self.explode(first, &params, ExplosionRules::should_explode_upper)?;

        if !lower.is_empty() || !upper.is_empty() {
            trace!(
                dist = ?self.cfg.dist,
                lower = lower.len(),
                upper = upper.len(),
                "explosion chain"
            );
        }

        Ok(RollResult::from_chains(first, lower, upper))
    }

    fn odds(&self, range: impl Into<Option<Range<T>>>) -> Result<Odds, RollError> {
        let range = range.into().unwrap_or(self.cfg.range);
        let params = self.params(range)?;
        let dist = self.cfg.dist.as_ref();

        let mut odds = Odds::default();
        for v in range.lower.bucket()..=range.upper.bucket() {
            let x = v as f64;
            let p = dist.cdf(x + 1.0, &params)? - dist.cdf(x, &params)?;
            odds.probabilities.insert(v, p * 100.0);
        }

        let rules = &self.cfg.explosions;
        let thresholds = rules.thresholds().working();
        if rules.max_lower_explosions > 0 {
            odds.lower_explosion_chance = Some(dist.cdf(thresholds.lower, &params)? * 100.0);
        }
        if rules.max_upper_explosions > 0 {
            odds.upper_explosion_chance =
                Some((1.0 - dist.cdf(thresholds.upper, &params)?) * 100.0);
        }

        Ok(odds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::dist::BetaDist;
    use crate::roll::range::{d6, MAX_EXACT_INT};
    use crate::roll::source::{FloatSource, IntSource};
    use approx::assert_abs_diff_eq;

    fn caster(salt: &str) -> IntDistCaster {
        IntSource::new("caster-tests").salt_dist(salt)
    }

    #[test]
    fn test_one_without_range_uses_default() {
        let mut c = caster("default");
        for _ in 0..500 {
            let r = c.one(None).unwrap();
            assert!((1..=100).contains(&r.first));
        }
    }

    #[test]
    fn test_range_setter_changes_default() {
        let mut c = caster("range").range(Range::new(10, 12));
        for _ in 0..200 {
            assert!((10..=12).contains(&c.one(None).unwrap().first));
        }
    }

    #[test]
    fn test_same_salt_same_sequence() {
        let mut a = caster("twin");
        let mut b = caster("twin");
        let ra = a.multiple(50, d6()).unwrap();
        let rb = b.multiple(50, d6()).unwrap();
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_multiple_matches_repeated_one() {
        let mut a = caster("multi");
        let mut b = caster("multi");
        let batch = a.multiple(20, d6()).unwrap();
        let singles: Vec<_> = (0..20).map(|_| b.one(d6()).unwrap()).collect();
        assert_eq!(batch, singles);
    }

    #[test]
    fn test_fork_continues_identically() {
        let mut a = caster("fork");
        a.one(d6()).unwrap();
        let mut b = a.fork();
        assert_eq!(a.multiple(10, d6()).unwrap(), b.multiple(10, d6()).unwrap());
    }

    #[test]
    fn test_lower_explosions_capped() {
        let mut c = caster("lower").reroll_below(3).lower_explosions(2);
        let mut saw_chain = false;
        for _ in 0..2000 {
            let r = c.one(d6()).unwrap();
            assert!(r.lower_explosions <= 2);
            assert_eq!(r.upper_explosions, 0);
            assert_eq!(r.rolls.len(), 1 + r.lower_explosions);
            assert_eq!(r.sum, r.rolls.iter().sum::<i64>());
            if r.first >= 3 {
                assert_eq!(r.lower_explosions, 0);
            } else {
                assert!(r.lower_explosions >= 1);
                saw_chain = true;
            }
            for w in r.rolls.windows(2) {
                assert!(w[0] < 3, "chain continued past a value >= 3");
            }
        }
        assert!(saw_chain);
    }

    #[test]
    fn test_both_chains_start_from_first() {
        // below > above: a first value of 4 triggers both chains
        let mut c = caster("both")
            .reroll_below(5)
            .lower_explosions(1)
            .reroll_above(3)
            .upper_explosions(1);
        let mut saw_both = false;
        for _ in 0..500 {
            let r = c.one(d6()).unwrap();
            if r.first == 4 {
                assert_eq!(r.lower_explosions, 1);
                assert_eq!(r.upper_explosions, 1);
                assert_eq!(r.rolls.len(), 3);
                saw_both = true;
            }
        }
        assert!(saw_both);
    }

    #[test]
    fn test_uniform_odds_d6() {
        let odds = caster("odds").odds(d6()).unwrap();
        assert_eq!(odds.probabilities.len(), 6);
        for v in 1..=6 {
            assert_abs_diff_eq!(odds.probability(v), 100.0 / 6.0, epsilon = 1e-9);
        }
        assert!(odds.lower_explosion_chance.is_none());
        assert!(odds.upper_explosion_chance.is_none());
    }

    #[test]
    fn test_explosion_chances() {
        let c = caster("chance")
            .reroll_below(3)
            .lower_explosions(2)
            .reroll_above(5)
            .upper_explosions(1);
        let odds = c.odds(d6()).unwrap();
        // below 3 is {1, 2}, above 5 is {6}
        assert_abs_diff_eq!(odds.lower_explosion_chance.unwrap(), 200.0 / 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(odds.upper_explosion_chance.unwrap(), 100.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_odds_does_not_advance_stream() {
        let mut a = caster("pure");
        let mut b = caster("pure");
        for d in Dist::ALL {
            a.clone().dist(d).odds(d6()).unwrap();
        }
        let _ = a.odds(d6()).unwrap();
        assert_eq!(a.one(d6()).unwrap(), b.one(d6()).unwrap());
    }

    #[test]
    fn test_weighted_max_full_weight_returns_upper() {
        let mut c = caster("max").dist(Dist::WeightedMax).weight(1.0);
        for _ in 0..500 {
            assert_eq!(c.one(d6()).unwrap().first, 6);
        }
        let mut f = FloatSource::new("caster-tests")
            .salt_dist("max")
            .dist(Dist::WeightedMax)
            .weight(1.0);
        for _ in 0..500 {
            assert_eq!(f.one(Range::new(0.0, 1.0)).unwrap().first, 1.0);
        }
    }

    #[test]
    fn test_invalid_weight_surfaces_error() {
        let mut c = caster("bad").dist(Dist::Normal).weight(2.0);
        assert!(matches!(c.one(d6()), Err(RollError::Distribution(_))));
        assert!(c.odds(d6()).is_err());
    }

    #[test]
    fn test_with_keeps_unset_fields() {
        let c = caster("with").dist(Dist::Skewed).weight(0.9).with(Options {
            reroll_above: Some(5),
            max_upper_explosions: Some(1),
            ..Default::default()
        });
        assert_eq!(format!("{:?}", c.config().dist), "Skewed");
        assert_eq!(c.config().weight, 0.9);
        assert_eq!(c.config().explosions.reroll_above, 5);
    }

    #[test]
    fn test_float_odds_buckets() {
        let c = FloatSource::new("f").salt_dist("odds");
        let odds = c.odds(Range::new(0.0, 2.0)).unwrap();
        let keys: Vec<i64> = odds.probabilities.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert_abs_diff_eq!(odds.total(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_float_odds_cover_range() {
        let c = FloatSource::new("f").salt_dist("negative");
        let odds = c.odds(Range::new(-2.5, -0.5)).unwrap();
        let keys: Vec<i64> = odds.probabilities.keys().copied().collect();
        assert_eq!(keys, vec![-3, -2, -1]);
        assert_abs_diff_eq!(odds.probability(-3), 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(odds.probability(-2), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(odds.probability(-1), 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(odds.total(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_odds_at_top_of_integer_kind() {
        let c = caster("top");
        assert!(matches!(
            c.odds(Range::new(i64::MAX - 1, i64::MAX)),
            Err(RollError::Distribution(_))
        ));

        let f = FloatSource::new("f").salt_dist("top");
        let odds = f.odds(Range::new(1e19, 1e19)).unwrap();
        let keys: Vec<i64> = odds.probabilities.keys().copied().collect();
        assert_eq!(keys, vec![i64::MAX]);
    }

    #[test]
    fn test_integer_range_limit() {
        let mut c = caster("wide");
        let wide = Range::new(1_i64 << 54, (1_i64 << 54) + 3);
        assert!(matches!(c.one(wide), Err(RollError::Distribution(_))));
        assert!(matches!(c.odds(wide), Err(RollError::Distribution(_))));

        let edge = Range::new(MAX_EXACT_INT - 4, MAX_EXACT_INT - 1);
        let odds = c.odds(edge).unwrap();
        for v in edge.lower..=edge.upper {
            assert_abs_diff_eq!(odds.probability(v), 25.0, epsilon = 1e-9);
        }
        let mut seen = [false; 4];
        for _ in 0..400 {
            let v = c.one(edge).unwrap().first;
            assert!((edge.lower..=edge.upper).contains(&v));
            seen[(v - edge.lower) as usize] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_custom_distribution() {
        // Beta(50, 1) puts almost all mass in the top slice of a d6
        let steep = BetaDist::new(|_| (50.0, 1.0));
        let mut c = caster("custom").distribution(steep);
        let odds = c.odds(d6()).unwrap();
        assert_abs_diff_eq!(odds.total(), 100.0, epsilon = 1e-9);
        // P(X >= 6) on [1, 7) is 1 - (5/6)^50
        let top = (1.0 - (5.0_f64 / 6.0).powi(50)) * 100.0;
        assert_abs_diff_eq!(odds.probability(6), top, epsilon = 1e-6);

        let sixes = c
            .multiple(1000, d6())
            .unwrap()
            .iter()
            .filter(|r| r.first == 6)
            .count();
        assert!(sixes >= 990, "only {sixes} sixes");
    }

    #[test]
    fn test_custom_distribution_survives_fork_and_with() {
        let c = caster("custom-fork")
            .distribution(BetaDist::new(|_| (1.0, 50.0)))
            .with(Options {
                weight: Some(0.2),
                ..Default::default()
            });
        let mut f = c.fork();
        for r in f.multiple(200, d6()).unwrap() {
            assert!(r.first <= 2);
        }
        assert_eq!(c.config().weight, 0.2);
    }
}
