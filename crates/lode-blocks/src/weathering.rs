//! Weathering: a four-stage oxidation chain where every stage is its own
//! block type.

use lode_geom::BlockPos;
use rand::{Rng, RngCore};

use crate::capability::{RandomTicking, Weatherable};
use crate::registry::Catalog;
use crate::types::BlockState;
use crate::world::World;

/// Per-random-tick probability that an eligible block advances a stage.
pub const WEATHERING_CHANCE: f32 = 0.056_888_89;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeatherState {
    Unaffected,
    Exposed,
    Weathered,
    Oxidized,
}

impl WeatherState {
    pub const ALL: [WeatherState; 4] = [
        WeatherState::Unaffected,
        WeatherState::Exposed,
        WeatherState::Weathered,
        WeatherState::Oxidized,
    ];

    pub const NAMES: &'static [&'static str] = &["unaffected", "exposed", "weathered", "oxidized"];

    /// `None` once fully oxidized.
    pub fn next(self) -> Option<WeatherState> {
        match self {
            WeatherState::Unaffected => Some(WeatherState::Exposed),
            WeatherState::Exposed => Some(WeatherState::Weathered),
            WeatherState::Weathered => Some(WeatherState::Oxidized),
            WeatherState::Oxidized => None,
        }
    }

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    pub fn from_name(s: &str) -> Option<WeatherState> {
        let i = Self::NAMES.iter().position(|n| *n == s)?;
        Some(Self::ALL[i])
    }
}

/// Shared strategy for every weathering shape. Shapes differ only in the
/// family name and stage they were configured with.
#[derive(Clone, Copy, Debug)]
pub struct Weathering {
    stage: WeatherState,
    family: &'static str,
}

impl Weathering {
    pub fn new(stage: WeatherState, family: &'static str) -> Self {
        Self { stage, family }
    }
}

impl Weatherable for Weathering {
    fn current_stage(&self) -> WeatherState {
        self.stage
    }

    fn family(&self) -> &'static str {
        self.family
    }
}

impl RandomTicking for Weathering {
    fn is_randomly_ticking(&self, catalog: &Catalog, state: BlockState) -> bool {
        catalog.next_stage_type(state.block).is_some()
    }

    fn random_tick(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        pos: BlockPos,
        state: BlockState,
    ) {
        if rng.random::<f32>() < WEATHERING_CHANCE {
            change_over_time(catalog, world, pos, state);
        }
    }
}

/// Replace the block at `pos` with its next stage, carrying over shared
/// properties. Returns the new state, or `None` at the end of the chain.
pub fn change_over_time(
    catalog: &Catalog,
    world: &mut dyn World,
    pos: BlockPos,
    state: BlockState,
) -> Option<BlockState> {
    let next = catalog.next_stage_type(state.block)?;
    let to = catalog.copy_matching(state, next)?;
    log::trace!(
        target: "weathering",
        "{pos}: {} -> {}",
        catalog.describe(state),
        catalog.describe(to)
    );
    catalog.place(world, pos, to);
    Some(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_is_linear() {
        let mut s = WeatherState::Unaffected;
        let mut steps = 0;
        while let Some(n) = s.next() {
            assert_eq!(n as usize, s as usize + 1);
            s = n;
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(s, WeatherState::Oxidized);
    }

    #[test]
    fn names_roundtrip() {
        for s in WeatherState::ALL {
            assert_eq!(WeatherState::from_name(s.name()), Some(s));
        }
        assert_eq!(WeatherState::from_name("rusty"), None);
    }
}
