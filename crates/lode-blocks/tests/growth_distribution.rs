use lode_blocks::growth::{GROWTH_DECAY, expected_growth_steps, geometric_growth_steps};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

#[test]
fn sample_mean_matches_closed_form() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(0xC0FFEE);
    let n = 200_000;
    let total: u64 = (0..n).map(|_| geometric_growth_steps(&mut rng) as u64).sum();
    let mean = total as f64 / n as f64;
    let expected = expected_growth_steps();
    assert!(
        (mean - expected).abs() < 0.02,
        "mean {mean} vs closed form {expected}"
    );
}

#[test]
fn tail_frequency_matches_decay() {
    // P(count >= 3) = GROWTH_DECAY^(1 + 2)
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let n = 100_000;
    let hits = (0..n)
        .filter(|_| geometric_growth_steps(&mut rng) >= 3)
        .count();
    let freq = hits as f64 / n as f64;
    let p = GROWTH_DECAY.powi(3);
    assert!((freq - p).abs() < 0.01, "{freq} vs {p}");
}

proptest! {
    // Same seed, same draws, same counts
    #[test]
    fn growth_is_deterministic_per_seed(seed in any::<u64>()) {
        let mut a = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(seed);
        for _ in 0..16 {
            prop_assert_eq!(geometric_growth_steps(&mut a), geometric_growth_steps(&mut b));
        }
    }

    #[test]
    fn growth_is_at_least_one(seed in any::<u64>()) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        prop_assert!(geometric_growth_steps(&mut rng) >= 1);
    }
}
