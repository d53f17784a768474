//! End-to-end checks linking sampled rolls to the analytic odds.

use std::collections::BTreeMap;

use u_roll::roll::{d100, d6, Caster, Dist, FloatSource, IntSource, Range};

const WEIGHTS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
const SAMPLES: usize = 100_000;

fn empirical(counts: &BTreeMap<i64, usize>, bucket: i64) -> f64 {
    counts.get(&bucket).copied().unwrap_or(0) as f64 / SAMPLES as f64 * 100.0
}

#[test]
fn sampled_frequencies_match_odds() {
    let source = IntSource::new("agreement");
    for dist in Dist::ALL {
        for weight in WEIGHTS {
            let mut caster = source
                .salt_dist(&format!("{dist}/{weight}"))
                .dist(dist)
                .weight(weight);
            let odds = caster.odds(d100()).unwrap();
            assert!(
                (odds.total() - 100.0).abs() < 1e-6,
                "{dist} w={weight}: odds sum to {}",
                odds.total()
            );

            let mut counts = BTreeMap::new();
            for _ in 0..SAMPLES {
                *counts.entry(caster.one(d100()).unwrap().first).or_insert(0) += 1;
            }

            for (&bucket, &expected) in &odds.probabilities {
                let got = empirical(&counts, bucket);
                assert!(
                    (got - expected).abs() <= 2.0,
                    "{dist} w={weight}: bucket {bucket} sampled {got:.3}% vs odds {expected:.3}%"
                );
            }
            assert!(counts.keys().all(|v| (1..=100).contains(v)));
        }
    }
}

#[test]
fn explosion_chances_match_first_roll_frequencies() {
    let mut caster = IntSource::new("chances")
        .salt_dist("chain")
        .dist(Dist::WeightedHigh)
        .weight(0.5)
        .reroll_below(20)
        .lower_explosions(1)
        .reroll_above(80)
        .upper_explosions(1);
    let odds = caster.odds(d100()).unwrap();

    let mut lower = 0usize;
    let mut upper = 0usize;
    for _ in 0..SAMPLES {
        let r = caster.one(d100()).unwrap();
        lower += r.lower_explosions;
        upper += r.upper_explosions;
    }
    let lower_pct = lower as f64 / SAMPLES as f64 * 100.0;
    let upper_pct = upper as f64 / SAMPLES as f64 * 100.0;
    assert!((lower_pct - odds.lower_explosion_chance.unwrap()).abs() < 1.0);
    assert!((upper_pct - odds.upper_explosion_chance.unwrap()).abs() < 1.0);
}

#[test]
fn float_rolls_stay_in_closed_range() {
    let source = FloatSource::new("float-bounds");
    let ranges = [
        Range::new(0.0, 1.0),
        Range::new(-5.5, 5.5),
        Range::new(100.0, 100.25),
    ];
    for dist in Dist::ALL {
        for weight in WEIGHTS {
            let mut caster = source.salt_dist(dist.name()).dist(dist).weight(weight);
            for range in ranges {
                for _ in 0..2_000 {
                    let v = caster.one(range).unwrap().first;
                    assert!(
                        v >= range.lower && v <= range.upper,
                        "{dist} w={weight}: {v} outside [{}, {}]",
                        range.lower,
                        range.upper
                    );
                }
            }
        }
    }
}

#[test]
fn int_rolls_stay_in_closed_range() {
    let source = IntSource::new("int-bounds");
    for dist in Dist::ALL {
        for weight in WEIGHTS {
            let mut caster = source.salt_dist(dist.name()).dist(dist).weight(weight);
            for range in [Range::new(-3, 3), Range::new(1, 1), d6()] {
                for _ in 0..2_000 {
                    let v = caster.one(range).unwrap().first;
                    assert!((range.lower..=range.upper).contains(&v), "{dist}: {v}");
                }
            }
        }
    }
}

#[test]
fn same_seed_and_salt_replay_bit_identical() {
    for dist in Dist::ALL {
        let mut a = FloatSource::new("replay").dist(dist).salt_dist("npc-9");
        let mut b = FloatSource::new("replay").dist(dist).salt_dist("npc-9");
        let ra: Vec<u64> = (0..200)
            .map(|_| a.one(None).unwrap().first.to_bits())
            .collect();
        let rb: Vec<u64> = (0..200)
            .map(|_| b.one(None).unwrap().first.to_bits())
            .collect();
        assert_eq!(ra, rb, "{dist}");

        let mut c = FloatSource::new("replay").dist(dist).salt_dist("npc-10");
        let rc: Vec<u64> = (0..200)
            .map(|_| c.one(None).unwrap().first.to_bits())
            .collect();
        assert_ne!(ra, rc, "{dist}");
    }
}

#[test]
fn d6_is_fair() {
    let mut caster = IntSource::new("fair").salt_dist("d6");
    let mut counts = [0usize; 7];
    for _ in 0..SAMPLES {
        let v = caster.one(d6()).unwrap().first;
        counts[v as usize] += 1;
    }
    assert_eq!(counts[0], 0);
    for (face, &n) in counts.iter().enumerate().skip(1) {
        let pct = n as f64 / SAMPLES as f64 * 100.0;
        assert!((pct - 100.0 / 6.0).abs() < 0.5, "face {face}: {pct:.2}%");
    }
}

#[test]
fn weighted_table_odds_and_draws() {
    let mut caster =
        IntSource::new("table").salt_custom_weighted("loot", &[(1, 10.0), (2, 0.0), (3, 30.0)]);
    let odds = caster.odds(None).unwrap();
    assert_eq!(odds.probability(1), 25.0);
    assert_eq!(odds.probability(2), 0.0);
    assert_eq!(odds.probability(3), 75.0);

    for r in caster.multiple(10_000, None).unwrap() {
        assert_ne!(r.first, 2);
        assert_eq!(r.rolls, vec![r.first]);
    }
}

#[test]
fn lower_explosion_chain_on_d6() {
    let mut caster = IntSource::new("explode")
        .salt_dist("d6")
        .reroll_below(3)
        .lower_explosions(2);
    let mut max_seen = 0;
    for r in caster.multiple(20_000, d6()).unwrap() {
        assert!(r.lower_explosions <= 2);
        assert_eq!(r.rolls.len(), 1 + r.lower_explosions + r.upper_explosions);
        assert_eq!(r.sum, r.rolls.iter().sum::<i64>());
        assert_eq!(r.last, *r.rolls.last().unwrap());
        if r.first >= 3 {
            assert_eq!(r.rolls.len(), 1);
        }
        max_seen = max_seen.max(r.lower_explosions);
    }
    assert_eq!(max_seen, 2);
}

#[test]
fn weighted_max_full_weight_always_upper() {
    let mut caster = IntSource::new("max")
        .dist(Dist::WeightedMax)
        .weight(1.0)
        .salt_dist("boss");
    for r in caster.multiple(5_000, d100()).unwrap() {
        assert_eq!(r.first, 100);
    }
    let odds = caster.odds(d100()).unwrap();
    assert!((odds.probability(100) - 100.0).abs() < 1e-9);
}

#[test]
fn options_document_drives_caster() {
    let opts = u_roll::roll::IntOptions::from_toml_str(
        r#"
        dist = "weighted_min"
        weight = 1.0
        range = { lower = 5, upper = 10 }
        "#,
    )
    .unwrap();
    let mut caster = IntSource::new("toml").with(opts).salt_dist("x");
    for r in caster.multiple(100, None).unwrap() {
        assert_eq!(r.first, 5);
    }
}
