//! Multiface blocks (lichen-like growths on any subset of six faces) and how
//! they spread onto neighboring surfaces.

use lode_geom::{BlockPos, Direction};
use rand::{Rng, RngCore};

use crate::capability::BonemealGrowable;
use crate::kinds::fluid::is_water_source;
use crate::property::props;
use crate::registry::Catalog;
use crate::types::{BlockId, BlockState};
use crate::world::World;

/// How a face at `pos` facing `face` reaches a new surface when spreading
/// toward `dir`. Tried in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpreadType {
    /// Same cell, onto the face pointing at `dir`.
    SamePosition,
    /// Neighbor cell in `dir`, same face.
    SamePlane,
    /// Around the edge: diagonal cell, face pointing back at the source.
    WrapAround,
}

impl SpreadType {
    pub const ALL: [SpreadType; 3] = [
        SpreadType::SamePosition,
        SpreadType::SamePlane,
        SpreadType::WrapAround,
    ];

    pub fn spread_pos(self, pos: BlockPos, dir: Direction, face: Direction) -> SpreadPos {
        match self {
            SpreadType::SamePosition => SpreadPos { pos, face: dir },
            SpreadType::SamePlane => SpreadPos {
                pos: pos.relative(dir),
                face,
            },
            SpreadType::WrapAround => SpreadPos {
                pos: pos.relative(dir).relative(face),
                face: dir.opposite(),
            },
        }
    }
}

/// A face that can be added at a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpreadPos {
    pub pos: BlockPos,
    pub face: Direction,
}

/// Spreading logic for one multiface block type.
pub struct MultifaceSpreader<'a> {
    catalog: &'a Catalog,
    block: BlockId,
}

impl<'a> MultifaceSpreader<'a> {
    pub fn new(catalog: &'a Catalog, block: BlockId) -> Self {
        Self { catalog, block }
    }

    pub fn has_face(&self, state: BlockState, face: Direction) -> bool {
        state.block == self.block
            && self
                .catalog
                .get_value(state, props::face(face))
                .unwrap_or(false)
    }

    /// A face needs a sturdy block on the other side of it.
    pub fn can_attach(&self, world: &dyn World, pos: BlockPos, face: Direction) -> bool {
        self.catalog.is_solid(world.read_state(pos.relative(face)))
    }

    fn can_spread_into(&self, world: &dyn World, target: SpreadPos) -> bool {
        let state = world.read_state(target.pos);
        let open = state.is_air()
            || is_water_source(self.catalog, state)
            || (state.block == self.block && !self.has_face(state, target.face));
        open && self.can_attach(world, target.pos, target.face)
    }

    /// First reachable target when spreading from `face` toward `dir`.
    pub fn spread_from_face_toward(
        &self,
        world: &dyn World,
        pos: BlockPos,
        state: BlockState,
        face: Direction,
        dir: Direction,
    ) -> Option<SpreadPos> {
        if dir.axis() == face.axis() || !self.has_face(state, face) || self.has_face(state, dir) {
            return None;
        }
        SpreadType::ALL
            .iter()
            .map(|t| t.spread_pos(pos, dir, face))
            .find(|sp| self.can_spread_into(world, *sp))
    }

    /// Every spread target in a stable order: existing faces, then spread
    /// directions, both in [`Direction::ALL`] order.
    pub fn candidates(&self, world: &dyn World, pos: BlockPos, state: BlockState) -> Vec<SpreadPos> {
        let mut out = Vec::new();
        for face in Direction::ALL {
            for dir in Direction::ALL {
                if let Some(sp) = self.spread_from_face_toward(world, pos, state, face, dir) {
                    out.push(sp);
                }
            }
        }
        out
    }

    /// Add `target.face` at `target.pos`, creating the block if needed.
    pub fn spread_to(&self, world: &mut dyn World, target: SpreadPos) -> Option<BlockState> {
        let existing = world.read_state(target.pos);
        let base = if existing.block == self.block {
            existing
        } else {
            let ty = self.catalog.get(self.block)?;
            let fresh = ty.default_state();
            if is_water_source(self.catalog, existing) {
                ty.with(fresh, props::WATERLOGGED, true).ok()?
            } else {
                fresh
            }
        };
        let next = self
            .catalog
            .with(base, props::face(target.face), true)
            .ok()?;
        self.catalog.update(world, target.pos, next);
        Some(next)
    }

    pub fn spread_random(
        &self,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        pos: BlockPos,
        state: BlockState,
    ) -> Option<SpreadPos> {
        let candidates = self.candidates(world, pos, state);
        if candidates.is_empty() {
            return None;
        }
        let pick = candidates[rng.random_range(0..candidates.len())];
        self.spread_to(world, pick).map(|_| pick)
    }

    /// Spread to every candidate; returns how many faces were added.
    pub fn spread_all(&self, world: &mut dyn World, pos: BlockPos, state: BlockState) -> usize {
        self.candidates(world, pos, state)
            .into_iter()
            .filter(|sp| self.spread_to(world, *sp).is_some())
            .count()
    }
}

/// Bonemeal on a multiface block spreads one random face.
#[derive(Clone, Copy, Debug, Default)]
pub struct MultifaceGrowth;

impl BonemealGrowable for MultifaceGrowth {
    fn is_valid_target(
        &self,
        catalog: &Catalog,
        world: &dyn World,
        pos: BlockPos,
        state: BlockState,
    ) -> bool {
        !MultifaceSpreader::new(catalog, state.block)
            .candidates(world, pos, state)
            .is_empty()
    }

    fn apply_growth(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        rng: &mut dyn RngCore,
        pos: BlockPos,
        state: BlockState,
    ) {
        let spread = MultifaceSpreader::new(catalog, state.block).spread_random(world, rng, pos, state);
        log::trace!(target: "growth", "{pos}: multiface spread {spread:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_positions() {
        let p = BlockPos::new(0, 0, 0);
        let face = Direction::Down;
        let dir = Direction::North;
        assert_eq!(
            SpreadType::SamePosition.spread_pos(p, dir, face),
            SpreadPos { pos: p, face: dir }
        );
        assert_eq!(
            SpreadType::SamePlane.spread_pos(p, dir, face),
            SpreadPos {
                pos: BlockPos::new(0, 0, -1),
                face
            }
        );
        assert_eq!(
            SpreadType::WrapAround.spread_pos(p, dir, face),
            SpreadPos {
                pos: BlockPos::new(0, -1, -1),
                face: Direction::South
            }
        );
    }
}
