//! Caster drawing from a custom ticket table.

use rand::Rng;

use super::caster::Caster;
use super::config::WeightedConfig;
use super::options::Options;
use super::range::{Numeric, Range};
use super::result::{Odds, RollResult};
use crate::error::RollError;
use crate::random::{Stream, WeightedSampler};

/// Caster selecting values from a `(value, weight)` table.
///
/// One uniform draw per roll. Ranges passed to [`Caster`] methods are
/// ignored, and explosion settings are carried but never trigger.
///
/// - Empty table: rolls yield `T::default()`, odds are empty.
/// - Zero total weight: rolls yield the highest-valued ticket, odds are empty.
///
/// # Examples
/// ```
/// use u_roll::roll::{Caster, IntSource};
///
/// let mut loot = IntSource::new("dungeon")
///     .salt_custom_weighted("chest-3", &[(1, 10.0), (2, 0.0), (3, 30.0)]);
/// let odds = loot.odds(None).unwrap();
/// assert_eq!(odds.probability(1), 25.0);
/// assert_eq!(odds.probability(3), 75.0);
/// assert_ne!(loot.one(None).unwrap().first, 2);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedCaster<T> {
    rng: Stream,
    cfg: WeightedConfig<T>,
}

pub type IntWeightedCaster = WeightedCaster<i64>;
pub type FloatWeightedCaster = WeightedCaster<f64>;

impl<T: Numeric> WeightedCaster<T> {
    pub(crate) fn new(rng: Stream, cfg: WeightedConfig<T>) -> Self {
        Self { rng, cfg }
    }

    pub fn config(&self) -> &WeightedConfig<T> {
        &self.cfg
    }

    /// Replaces the ticket table unless `weights` is empty.
    pub fn custom(mut self, weights: &[(T, f64)]) -> Self {
        self.cfg.set_custom(weights);
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

    /// Applies every field the options set; an unset or empty `custom`
    /// keeps the current table.
    pub fn with(mut self, opts: Options<T>) -> Self {
        self.cfg.apply(&opts);
        self
    }

    /// Independent copy with its own ticket table, continuing from the same
    /// stream position.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    fn roll_weighted(&mut self) -> T {
        let weights: Vec<f64> = self.cfg.tickets.iter().map(|t| t.weight).collect();
        match WeightedSampler::new(&weights) {
            Some(sampler) => self.cfg.tickets[sampler.sample(&mut self.rng)].value,
            None => {
                // empty table still advances the stream by one draw
                let _: f64 = self.rng.random();
                T::default()
            }
        }
    }
}

impl<T: Numeric> Caster<T> for WeightedCaster<T> {
    fn one(&mut self, _range: impl Into<Option<Range<T>>>) -> Result<RollResult<T>, RollError> {
        Ok(RollResult::single(self.roll_weighted()))
    }

    fn odds(&self, _range: impl Into<Option<Range<T>>>) -> Result<Odds, RollError> {
        let mut odds = Odds::default();
        let total = self.cfg.total_weight();
        if total <= 0.0 {
            return Ok(odds);
        }

        for ticket in &self.cfg.tickets {
            let p = ticket.weight.max(0.0) / total * 100.0;
            *odds.probabilities.entry(ticket.value.bucket()).or_insert(0.0) += p;
        }
        Ok(odds)
    }
}
