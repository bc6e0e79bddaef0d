//! Pure random-decision helpers shared by the yearly phases.
//!
//! Nothing here touches the graph: callers pass in plain slices (ids,
//! degrees) and get back the decision. Every function takes the RNG
//! explicitly so a run is reproducible from its seed.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::{IndexedRandom, index};
use rand_distr::Normal;

use crate::error::SimError;

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>, SimError> {
    Normal::new(mean, std_dev)
        .map_err(|e| SimError::InvalidConfig(format!("normal({mean}, {std_dev}): {e}")))
}

/// Truncate toward zero. Negative and non-finite inputs give zero.
pub fn truncate_count(x: f64) -> usize {
    if x.is_finite() && x > 0.0 { x.trunc() as usize } else { 0 }
}

/// Starting headcount of a hub city: a normal draw truncated to an integer.
pub fn sample_headcount<R: Rng + ?Sized>(
    avg: f64,
    std_dev: f64,
    rng: &mut R,
) -> Result<usize, SimError> {
    Ok(truncate_count(normal(avg, std_dev)?.sample(rng)))
}

pub fn sample_ages<R: Rng + ?Sized>(
    n: usize,
    mean: f64,
    std_dev: f64,
    rng: &mut R,
) -> Result<Vec<f64>, SimError> {
    let dist = normal(mean, std_dev)?;
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}

/// `k` distinct items drawn uniformly. Asking for more than `pool` holds is
/// an error, never a silent truncation.
pub fn choose_distinct<T: Copy, R: Rng + ?Sized>(
    pool: &[T],
    k: usize,
    context: &'static str,
    rng: &mut R,
) -> Result<Vec<T>, SimError> {
    if k > pool.len() {
        return Err(SimError::InsufficientPopulation {
            context,
            requested: k,
            available: pool.len(),
        });
    }
    Ok(index::sample(rng, pool.len(), k)
        .into_iter()
        .map(|i| pool[i])
        .collect())
}

pub fn uniform_pick<T: Copy, R: Rng + ?Sized>(pool: &[T], rng: &mut R) -> Option<T> {
    pool.choose(rng).copied()
}

/// `count` ordered pairs drawn with replacement. Self-pairs are kept; the
/// caller decides what to do with them.
pub fn random_pairs<T: Copy, R: Rng + ?Sized>(
    pool: &[T],
    count: usize,
    rng: &mut R,
) -> Vec<(T, T)> {
    if pool.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            let a = pool[rng.random_range(0..pool.len())];
            let b = pool[rng.random_range(0..pool.len())];
            (a, b)
        })
        .collect()
}

/// Election weight per member: `degree ^ power`.
pub fn election_weights(degrees: &[usize], power: f64) -> Vec<f64> {
    degrees.iter().map(|&d| (d as f64).powf(power)).collect()
}

/// One item drawn with probability proportional to its weight.
pub fn weighted_pick<T: Copy, R: Rng + ?Sized>(
    pool: &[T],
    weights: &[f64],
    rng: &mut R,
) -> Result<T, SimError> {
    let dist = WeightedIndex::new(weights)?;
    Ok(pool[dist.sample(rng)])
}

/// Per-member chance of leaving: `rate / (degree + 1) ^ power + base`,
/// floored at zero.
pub fn leave_probabilities(degrees: &[usize], rate: f64, base: f64, power: f64) -> Vec<f64> {
    degrees
        .iter()
        .map(|&d| (rate / ((d + 1) as f64).powf(power) + base).max(0.0))
        .collect()
}

/// How many members churn this year: the truncated sum of the leave
/// probabilities, capped by how many members can be drawn at all.
pub fn churn_count(probabilities: &[f64]) -> usize {
    let sum: f64 = probabilities.iter().sum();
    let drawable = probabilities.iter().filter(|&&p| p > 0.0).count();
    truncate_count(sum).min(drawable)
}

/// Up to `amount` distinct items drawn with probability proportional to
/// their weights. Zero-weight items are never drawn, so the amount is capped
/// at the number of positive weights.
pub fn choose_weighted_distinct<T: Copy, R: Rng + ?Sized>(
    pool: &[T],
    weights: &[f64],
    amount: usize,
    rng: &mut R,
) -> Result<Vec<T>, SimError> {
    let drawable = weights.iter().filter(|&&w| w > 0.0).count();
    let amount = amount.min(drawable);
    if amount == 0 {
        return Ok(Vec::new());
    }
    let picked = index::sample_weighted(rng, pool.len(), |i| weights[i], amount)?;
    Ok(picked.into_iter().map(|i| pool[i]).collect())
}

/// New members for a city of `size`: `ceil(ratio * size)`.
pub fn intake_count(ratio: f64, size: usize) -> usize {
    truncate_count((ratio * size as f64).ceil())
}

/// Members relocating this year: `floor(total * probability)`, at most `total`.
pub fn hop_count(total: usize, probability: f64) -> usize {
    truncate_count((total as f64 * probability).floor()).min(total)
}

/// Non-ambassador seats left at a retreat once every ambassador is seated.
pub fn retreat_extra_goers(goers: usize, ambassadors: usize) -> usize {
    goers.saturating_sub(ambassadors)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn truncate_count_clamps() {
        assert_eq!(truncate_count(3.9), 3);
        assert_eq!(truncate_count(-2.0), 0);
        assert_eq!(truncate_count(f64::NAN), 0);
        assert_eq!(truncate_count(f64::INFINITY), 0);
    }

    #[test]
    fn zero_std_headcount_is_exact() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(sample_headcount(10.0, 0.0, &mut rng).unwrap(), 10);
        }
    }

    #[test]
    fn negative_std_is_config_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(matches!(
            sample_ages(3, 24.0, -1.0, &mut rng),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn ages_cluster_around_mean() {
        let mut rng = SmallRng::seed_from_u64(2);
        let ages = sample_ages(2000, 24.0, 2.0, &mut rng).unwrap();
        let mean = ages.iter().sum::<f64>() / ages.len() as f64;
        assert!((mean - 24.0).abs() < 0.3, "mean {mean}");
    }

    #[test]
    fn choose_distinct_has_no_repeats() {
        let mut rng = SmallRng::seed_from_u64(3);
        let pool: Vec<u32> = (0..20).collect();
        let picked = choose_distinct(&pool, 20, "test", &mut rng).unwrap();
        let unique: BTreeSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn choose_distinct_rejects_oversized_request() {
        let mut rng = SmallRng::seed_from_u64(3);
        let err = choose_distinct(&[1, 2, 3], 4, "local event", &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimError::InsufficientPopulation {
                requested: 4,
                available: 3,
                ..
            }
        ));
    }

    #[test]
    fn random_pairs_stay_in_pool() {
        let mut rng = SmallRng::seed_from_u64(4);
        let pairs = random_pairs(&[7, 8, 9], 50, &mut rng);
        assert_eq!(pairs.len(), 50);
        assert!(pairs.iter().all(|(a, b)| (7..=9).contains(a) && (7..=9).contains(b)));
        assert!(random_pairs::<u32, _>(&[], 5, &mut rng).is_empty());
    }

    #[test]
    fn weighted_pick_never_picks_zero_weight() {
        let mut rng = SmallRng::seed_from_u64(5);
        let weights = election_weights(&[0, 3, 0], 1.0);
        for _ in 0..50 {
            assert_eq!(weighted_pick(&['a', 'b', 'c'], &weights, &mut rng).unwrap(), 'b');
        }
    }

    #[test]
    fn weighted_pick_all_zero_is_error() {
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(matches!(
            weighted_pick(&[1, 2], &[0.0, 0.0], &mut rng),
            Err(SimError::Weights(_))
        ));
    }

    #[test]
    fn leave_probability_falls_with_degree() {
        let p = leave_probabilities(&[0, 1, 3], 0.4, 0.01, 1.0);
        assert!((p[0] - 0.41).abs() < 1e-12);
        assert!((p[1] - 0.21).abs() < 1e-12);
        assert!((p[2] - 0.11).abs() < 1e-12);
    }

    #[test]
    fn churn_count_truncates_sum() {
        assert_eq!(churn_count(&[0.6, 0.6, 0.6]), 1);
        assert_eq!(churn_count(&[0.0, 0.0]), 0);
        // sum 4.5 but only two members can actually leave
        assert_eq!(churn_count(&[3.0, 1.5, 0.0]), 2);
    }

    #[test]
    fn weighted_distinct_skips_zero_weights() {
        let mut rng = SmallRng::seed_from_u64(6);
        let picked =
            choose_weighted_distinct(&[1, 2, 3, 4], &[0.0, 1.0, 0.0, 2.0], 3, &mut rng).unwrap();
        let set: BTreeSet<_> = picked.into_iter().collect();
        assert_eq!(set, BTreeSet::from([2, 4]));
    }

    #[test]
    fn counts_round_the_right_way() {
        assert_eq!(intake_count(0.1, 11), 2);
        assert_eq!(intake_count(0.0, 11), 0);
        assert_eq!(intake_count(-0.5, 11), 0);
        assert_eq!(hop_count(19, 0.1), 1);
        assert_eq!(hop_count(10, 3.0), 10);
        assert_eq!(retreat_extra_goers(3, 5), 0);
        assert_eq!(retreat_extra_goers(8, 5), 3);
    }
}
