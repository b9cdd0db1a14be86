//! Pairing of two-block structures (double chests). The pairing is derived
//! from both halves' states on every lookup; nothing is stored.

use lode_geom::{BlockPos, Direction};

use crate::registry::Catalog;
use crate::types::BlockState;
use crate::world::{AttachmentKind, World};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DoubleHalf {
    Single,
    First,
    Second,
}

/// How a block encodes its half and where its partner sits.
pub trait DoubleBlockShape {
    /// Attachment both halves must carry.
    fn attachment_kind(&self) -> AttachmentKind;

    fn half(&self, catalog: &Catalog, state: BlockState) -> DoubleHalf;

    /// Direction from this half to its partner.
    fn connected_direction(&self, catalog: &Catalog, state: BlockState) -> Option<Direction>;

    fn facing(&self, catalog: &Catalog, state: BlockState) -> Option<Direction>;

    fn is_blocked(&self, catalog: &Catalog, world: &dyn World, pos: BlockPos) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combination {
    /// No attachment of the expected kind at the queried position.
    Missing,
    Blocked,
    Single(BlockPos),
    Combined { first: BlockPos, second: BlockPos },
}

impl Combination {
    /// Unified accessor over the outcomes.
    pub fn fold<R>(
        self,
        single: impl FnOnce(BlockPos) -> R,
        combined: impl FnOnce(BlockPos, BlockPos) -> R,
        absent: impl FnOnce() -> R,
    ) -> R {
        match self {
            Combination::Single(p) => single(p),
            Combination::Combined { first, second } => combined(first, second),
            Combination::Missing | Combination::Blocked => absent(),
        }
    }

    pub fn positions(self) -> Vec<BlockPos> {
        self.fold(|p| vec![p], |a, b| vec![a, b], Vec::new)
    }
}

fn has_attachment(world: &dyn World, pos: BlockPos, kind: AttachmentKind) -> bool {
    world.read_attachment(pos).is_some_and(|a| a.kind == kind)
}

/// Resolve the structure `state` at `pos` belongs to.
pub fn combine(
    shape: &dyn DoubleBlockShape,
    catalog: &Catalog,
    world: &dyn World,
    pos: BlockPos,
    state: BlockState,
    ignore_being_blocked: bool,
) -> Combination {
    let kind = shape.attachment_kind();
    if !has_attachment(world, pos, kind) {
        return Combination::Missing;
    }
    if !ignore_being_blocked && shape.is_blocked(catalog, world, pos) {
        return Combination::Blocked;
    }
    let half = shape.half(catalog, state);
    if half == DoubleHalf::Single {
        return Combination::Single(pos);
    }
    let Some(dir) = shape.connected_direction(catalog, state) else {
        return Combination::Single(pos);
    };
    let other_pos = pos.relative(dir);
    let other = world.read_state(other_pos);
    if other.block != state.block {
        return Combination::Single(pos);
    }
    let other_half = shape.half(catalog, other);
    let paired = other_half != DoubleHalf::Single
        && other_half != half
        && shape.facing(catalog, other) == shape.facing(catalog, state);
    if !paired {
        return Combination::Single(pos);
    }
    // The partner's obstruction wins over its missing attachment.
    if !ignore_being_blocked && shape.is_blocked(catalog, world, other_pos) {
        return Combination::Blocked;
    }
    if !has_attachment(world, other_pos, kind) {
        return Combination::Single(pos);
    }
    match half {
        DoubleHalf::First => Combination::Combined {
            first: pos,
            second: other_pos,
        },
        _ => Combination::Combined {
            first: other_pos,
            second: pos,
        },
    }
}
