//! Gravity-affected blocks: plain falling blocks and anvils.

use std::sync::Arc;

use lode_geom::BlockPos;

use super::{ANVIL, FALLING};
use crate::capability::{Capabilities, FallReactive};
use crate::codec::{BlockConfig, BlockParts, BlockSchema};
use crate::error::Result;
use crate::property::props;
use crate::registry::Catalog;
use crate::state::StateDefinitionBuilder;
use crate::types::BlockState;
use crate::world::{DamageSource, Entity, FallingBlock, SoundId, World};

pub const ANVIL_LAND: SoundId = SoundId("block.anvil.land");
pub const ANVIL_DESTROY: SoundId = SoundId("block.anvil.destroy");

pub fn schema() -> BlockSchema {
    BlockSchema::new(FALLING)
}

pub fn build(_cfg: &BlockConfig) -> Result<BlockParts> {
    Ok(BlockParts::new(
        StateDefinitionBuilder::new(),
        Capabilities::new().with_fall_reactive(Arc::new(GravityBlock)),
    ))
}

pub fn anvil_schema() -> BlockSchema {
    BlockSchema::new(ANVIL)
}

pub fn build_anvil(_cfg: &BlockConfig) -> Result<BlockParts> {
    let mut states = StateDefinitionBuilder::new();
    states.declare(props::HORIZONTAL_FACING)?;
    Ok(BlockParts::new(
        states,
        Capabilities::new().with_fall_reactive(Arc::new(Anvil)),
    ))
}

/// Sand, gravel and the like: no reaction beyond the defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct GravityBlock;

impl FallReactive for GravityBlock {}

#[derive(Clone, Copy, Debug, Default)]
pub struct Anvil;

impl FallReactive for Anvil {
    fn on_land(
        &self,
        _catalog: &Catalog,
        world: &mut dyn World,
        pos: BlockPos,
        _replaced: BlockState,
        falling: &FallingBlock,
    ) {
        if !falling.silent {
            world.emit_sound(pos, ANVIL_LAND);
        }
    }

    fn on_broken_after_fall(
        &self,
        _catalog: &Catalog,
        world: &mut dyn World,
        pos: BlockPos,
        falling: &FallingBlock,
    ) {
        if !falling.silent {
            world.emit_sound(pos, ANVIL_DESTROY);
        }
    }

    fn fall_damage_source(&self, _entity: &Entity) -> DamageSource {
        DamageSource::Anvil
    }
}
