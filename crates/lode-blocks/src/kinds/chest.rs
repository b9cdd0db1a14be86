//! Chests: an attachment-owning block that pairs into double chests.

use std::sync::Arc;

use lode_geom::{BlockPos, Direction};

use super::CHEST;
use super::fluid::Waterlogging;
use crate::capability::{Capabilities, EntityContainer, Ticker, ticker_if_kind};
use crate::codec::{BlockConfig, BlockParts, BlockSchema};
use crate::combiner::{Combination, DoubleBlockShape, DoubleHalf, combine};
use crate::error::Result;
use crate::property::{EnumProperty, PropertyEnum, props};
use crate::registry::Catalog;
use crate::state::StateDefinitionBuilder;
use crate::types::BlockState;
use crate::world::{Attachment, AttachmentKind, World};

pub const CHEST_ATTACHMENT: AttachmentKind = AttachmentKind("chest");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChestType {
    Single,
    Left,
    Right,
}

impl ChestType {
    pub fn opposite(self) -> ChestType {
        match self {
            ChestType::Single => ChestType::Single,
            ChestType::Left => ChestType::Right,
            ChestType::Right => ChestType::Left,
        }
    }
}

impl PropertyEnum for ChestType {
    const VALUES: &'static [Self] = &[ChestType::Single, ChestType::Left, ChestType::Right];
    const NAMES: &'static [&'static str] = &["single", "left", "right"];
}

pub const CHEST_TYPE: EnumProperty<ChestType> = EnumProperty::new("type");

/// Per-chest data kept alongside the state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChestData {
    pub open_count: u32,
    pub ticks: u64,
}

pub fn schema() -> BlockSchema {
    BlockSchema::new(CHEST)
}

pub fn build(_cfg: &BlockConfig) -> Result<BlockParts> {
    let mut states = StateDefinitionBuilder::new();
    states
        .declare(props::HORIZONTAL_FACING)?
        .declare(CHEST_TYPE)?
        .declare(props::WATERLOGGED)?;
    let caps = Waterlogging::capabilities(Capabilities::new().with_entity_container(Arc::new(Chest)));
    Ok(BlockParts::new(states, caps))
}

fn chest_tick(_catalog: &Catalog, world: &mut dyn World, pos: BlockPos, _state: BlockState) {
    if let Some(data) = world
        .read_attachment_mut(pos)
        .and_then(|a| a.data_mut::<ChestData>())
    {
        data.ticks += 1;
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Chest;

impl Chest {
    fn chest_type(catalog: &Catalog, state: BlockState) -> Option<ChestType> {
        catalog.get_value(state, CHEST_TYPE)
    }

    /// Single chest of the same type facing `facing` at `pos`, if any.
    fn candidate(
        catalog: &Catalog,
        world: &dyn World,
        pos: BlockPos,
        like: BlockState,
        facing: Direction,
    ) -> bool {
        let other = world.read_state(pos);
        other.block == like.block
            && Self::chest_type(catalog, other) == Some(ChestType::Single)
            && catalog.get_value(other, props::HORIZONTAL_FACING) == Some(facing)
    }

    /// Place a chest facing `facing`, pairing with a single chest beside it
    /// that faces the same way. Returns the placed state.
    pub fn place(
        catalog: &Catalog,
        world: &mut dyn World,
        pos: BlockPos,
        state: BlockState,
        facing: Direction,
    ) -> Result<BlockState> {
        let mut placed = catalog.with(state, props::HORIZONTAL_FACING, facing)?;
        placed = catalog.with(placed, CHEST_TYPE, ChestType::Single)?;
        let pairing = [
            (facing.clockwise(), ChestType::Left),
            (facing.counter_clockwise(), ChestType::Right),
        ];
        let partner = pairing
            .into_iter()
            .find(|(dir, _)| Self::candidate(catalog, &*world, pos.relative(*dir), placed, facing));
        if let Some((dir, half)) = partner {
            placed = catalog.with(placed, CHEST_TYPE, half)?;
            let other_pos = pos.relative(dir);
            let other = catalog.with(world.read_state(other_pos), CHEST_TYPE, half.opposite())?;
            catalog.update(world, other_pos, other);
        }
        catalog.place(world, pos, placed);
        Ok(placed)
    }

    /// Remove the chest at `pos`, turning its partner back into a single chest.
    pub fn remove(catalog: &Catalog, world: &mut dyn World, pos: BlockPos) -> Result<()> {
        let state = world.read_state(pos);
        if let Combination::Combined { first, second } =
            combine(&Chest, catalog, world, pos, state, true)
        {
            let other_pos = if first == pos { second } else { first };
            let other = catalog.with(world.read_state(other_pos), CHEST_TYPE, ChestType::Single)?;
            catalog.update(world, other_pos, other);
        }
        catalog.place(world, pos, BlockState::AIR);
        Ok(())
    }

    pub fn combine(
        catalog: &Catalog,
        world: &dyn World,
        pos: BlockPos,
        ignore_being_blocked: bool,
    ) -> Combination {
        combine(
            &Chest,
            catalog,
            world,
            pos,
            world.read_state(pos),
            ignore_being_blocked,
        )
    }
}

impl EntityContainer for Chest {
    fn attachment_kind(&self) -> AttachmentKind {
        CHEST_ATTACHMENT
    }

    fn create_attachment(&self, pos: BlockPos, _state: BlockState) -> Option<Attachment> {
        Some(Attachment::new(CHEST_ATTACHMENT, pos, ChestData::default()))
    }

    fn ticker_for(&self, _state: BlockState, kind: AttachmentKind) -> Option<Ticker> {
        ticker_if_kind(kind, CHEST_ATTACHMENT, chest_tick)
    }
}

impl DoubleBlockShape for Chest {
    fn attachment_kind(&self) -> AttachmentKind {
        CHEST_ATTACHMENT
    }

    fn half(&self, catalog: &Catalog, state: BlockState) -> DoubleHalf {
        match Self::chest_type(catalog, state) {
            Some(ChestType::Right) => DoubleHalf::First,
            Some(ChestType::Left) => DoubleHalf::Second,
            _ => DoubleHalf::Single,
        }
    }

    fn connected_direction(&self, catalog: &Catalog, state: BlockState) -> Option<Direction> {
        let facing = catalog.get_value(state, props::HORIZONTAL_FACING)?;
        match Self::chest_type(catalog, state)? {
            ChestType::Left => Some(facing.clockwise()),
            ChestType::Right => Some(facing.counter_clockwise()),
            ChestType::Single => None,
        }
    }

    fn facing(&self, catalog: &Catalog, state: BlockState) -> Option<Direction> {
        catalog.get_value(state, props::HORIZONTAL_FACING)
    }

    /// A solid block directly above keeps the lid shut.
    fn is_blocked(&self, catalog: &Catalog, world: &dyn World, pos: BlockPos) -> bool {
        catalog.is_solid(world.read_state(pos.above()))
    }
}
