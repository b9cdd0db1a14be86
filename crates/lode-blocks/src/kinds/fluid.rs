//! Liquid blocks and waterlogging.

use std::sync::Arc;

use lode_geom::BlockPos;

use super::LIQUID;
use crate::capability::{BucketPickup, Capabilities, LiquidContainer};
use crate::codec::{BlockConfig, BlockParts, BlockSchema, FieldCodec, FieldSpec};
use crate::error::{BlockError, Result};
use crate::property::props;
use crate::registry::Catalog;
use crate::state::StateDefinitionBuilder;
use crate::types::BlockState;
use crate::world::{Entity, Fluid, ItemPayload, SoundId, World};

pub const BUCKET_FILL: SoundId = SoundId("item.bucket.fill");

pub fn schema() -> BlockSchema {
    BlockSchema::new(LIQUID).field(FieldSpec::required("fluid", FieldCodec::Name(Fluid::NAMES)))
}

pub fn build(cfg: &BlockConfig) -> Result<BlockParts> {
    if cfg.name("fluid").and_then(Fluid::from_name).is_none() {
        return Err(BlockError::schema(LIQUID, "missing fluid"));
    }
    let mut states = StateDefinitionBuilder::new();
    states.declare(props::LEVEL)?;
    Ok(BlockParts::new(states, Capabilities::new()))
}

/// A full water block: liquid at level 0, or a waterlogged block.
pub fn is_water_source(catalog: &Catalog, state: BlockState) -> bool {
    let Some(ty) = catalog.block(state) else {
        return false;
    };
    if ty.kind == LIQUID {
        return ty.config.name("fluid") == Some(Fluid::Water.name())
            && ty.get(state, props::LEVEL) == Some(0);
    }
    ty.get(state, props::WATERLOGGED).unwrap_or(false)
}

/// Shared strategy for every kind that declares `waterlogged`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Waterlogging;

impl Waterlogging {
    /// Capabilities for a kind whose states carry `waterlogged`.
    pub fn capabilities(caps: Capabilities) -> Capabilities {
        let imp = Arc::new(Waterlogging);
        caps.with_liquid_container(imp.clone()).with_bucket_pickup(imp)
    }
}

impl LiquidContainer for Waterlogging {
    fn can_place_liquid(
        &self,
        catalog: &Catalog,
        _world: &dyn World,
        _pos: BlockPos,
        state: BlockState,
        fluid: Fluid,
    ) -> bool {
        fluid == Fluid::Water && catalog.get_value(state, props::WATERLOGGED) == Some(false)
    }

    fn place_liquid(
        &self,
        catalog: &Catalog,
        world: &mut dyn World,
        pos: BlockPos,
        state: BlockState,
        fluid: Fluid,
    ) -> bool {
        if !self.can_place_liquid(catalog, world, pos, state, fluid) {
            return false;
        }
        match catalog.with(state, props::WATERLOGGED, true) {
            Ok(next) => {
                catalog.update(world, pos, next);
                true
            }
            Err(_) => false,
        }
    }
}

impl BucketPickup for Waterlogging {
    fn pickup(
        &self,
        catalog: &Catalog,
        _user: Option<&Entity>,
        world: &mut dyn World,
        pos: BlockPos,
        state: BlockState,
    ) -> ItemPayload {
        if catalog.get_value(state, props::WATERLOGGED) != Some(true) {
            return ItemPayload::Empty;
        }
        match catalog.with(state, props::WATERLOGGED, false) {
            Ok(next) => {
                catalog.update(world, pos, next);
                ItemPayload::FilledBucket(Fluid::Water)
            }
            Err(_) => ItemPayload::Empty,
        }
    }

    fn pickup_sound(&self) -> Option<SoundId> {
        Some(BUCKET_FILL)
    }
}
