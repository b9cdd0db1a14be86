//! Vine growth: how far a bonemealed vine extends, and the vine strategy
//! itself.

use lode_geom::{BlockPos, Direction};
use rand::{Rng, RngCore};

use crate::capability::{BonemealGrowable, RandomTicking};
use crate::property::props;
use crate::registry::Catalog;
use crate::types::BlockState;
use crate::world::World;

/// Each further step is this much less likely than the previous one.
pub const GROWTH_DECAY: f64 = 0.826;

pub const MAX_AGE: i32 = 25;

/// Chance a vine tip below [`MAX_AGE`] grows on a random tick.
pub const GROW_PER_TICK_PROBABILITY: f64 = 0.1;

/// Number of blocks a bonemealed vine grows. The first step always happens;
/// step `k + 1` happens with probability `GROWTH_DECAY^k` given step `k` did.
pub fn geometric_growth_steps<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let mut probability = 1.0;
    let mut count = 0;
    while rng.random::<f64>() < probability {
        count += 1;
        probability *= GROWTH_DECAY;
    }
    count
}

/// Closed form of the mean of [`geometric_growth_steps`]:
/// `sum over k >= 1 of GROWTH_DECAY^(k(k-1)/2)`.
pub fn expected_growth_steps() -> f64 {
    let mut total = 0.0;
    let mut term = 1.0;
    let mut k = 1;
    while term > 1e-15 {
        total += term;
        term *= GROWTH_DECAY.powi(k);
        k += 1;
    }
    total
}

/// Weeping (grows down) and twisting (grows up) vines.
#[derive(Clone, Copy, Debug)]
pub struct GrowingVine {
    direction: Direction,
}

impl GrowingVine {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn can_grow_into(state: BlockState) -> bool {
        state.is_air()
    }

    fn age(catalog: &Catalog, state: BlockState) -> i32 {
        catalog.get_value(state, props::AGE_25).unwrap_or(0)
    }

    /// Extend the vine up to `steps` cells from `pos`, stopping at the first
    /// cell that is not air. Returns how many cells were filled.
    pub fn grow(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        pos: BlockPos,
        state: BlockState,
        steps: u32,
    ) -> u32 {
        let mut age = (Self::age(catalog, state) + 1).min(MAX_AGE);
        let mut target = pos.relative(self.direction);
        let mut grown = 0;
        while grown < steps && Self::can_grow_into(world.read_state(target)) {
            let Ok(next) = catalog.with(state, props::AGE_25, age) else {
                break;
            };
            catalog.place(world, target, next);
            target = target.relative(self.direction);
            age = (age + 1).min(MAX_AGE);
            grown += 1;
        }
        grown
    }
}

impl BonemealGrowable for GrowingVine {
    fn is_valid_target(
        &self,
        _catalog: &Catalog,
        world: &dyn World,
        pos: BlockPos,
        _state: BlockState,
    ) -> bool {
        Self::can_grow_into(world.read_state(pos.relative(self.direction)))
    }

    fn apply_growth(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        pos: BlockPos,
        state: BlockState,
    ) {
        let steps = geometric_growth_steps(rng);
        let grown = self.grow(catalog, world, pos, state, steps);
        log::trace!(target: "growth", "{pos}: rolled {steps}, grew {grown}");
    }
}

impl RandomTicking for GrowingVine {
    fn is_randomly_ticking(&self, catalog: &Catalog, state: BlockState) -> bool {
        Self::age(catalog, state) < MAX_AGE
    }

    fn random_tick(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        pos: BlockPos,
        state: BlockState,
    ) {
        if Self::age(catalog, state) < MAX_AGE && rng.random::<f64>() < GROW_PER_TICK_PROBABILITY {
            self.grow(catalog, world, pos, state, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn closed_form_value() {
        let e = expected_growth_steps();
        // 1 + 0.826 + 0.826^3 + 0.826^6 + ...
        assert!((e - 2.936).abs() < 0.01, "{e}");
    }

    #[test]
    fn first_step_always_taken() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(geometric_growth_steps(&mut rng) >= 1);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(42);
        let xs: Vec<u32> = (0..64).map(|_| geometric_growth_steps(&mut a)).collect();
        let ys: Vec<u32> = (0..64).map(|_| geometric_growth_steps(&mut b)).collect();
        assert_eq!(xs, ys);
    }
}
