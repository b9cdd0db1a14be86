use std::sync::Arc;

use lode_geom::BlockPos;

use super::NETHER_PORTAL;
use crate::capability::{Capabilities, Portal, Transition, TransitionKind};
use crate::codec::{BlockConfig, BlockParts, BlockSchema};
use crate::error::Result;
use crate::property::props;
use crate::state::StateDefinitionBuilder;
use crate::world::{Dimension, Entity, EntityKind, World};

/// Ticks a survival player must stand in a nether portal.
pub const PLAYER_PORTAL_DELAY: u32 = 80;

pub fn nether_schema() -> BlockSchema {
    BlockSchema::new(NETHER_PORTAL)
}

pub fn build_nether(_cfg: &BlockConfig) -> Result<BlockParts> {
    let mut states = StateDefinitionBuilder::new();
    states.declare(props::HORIZONTAL_AXIS)?;
    Ok(BlockParts::new(
        states,
        Capabilities::new().with_portal(Arc::new(NetherPortal)),
    ))
}

/// Links the overworld and the nether at the entity's own coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NetherPortal;

impl Portal for NetherPortal {
    fn destination_for(
        &self,
        _world: &dyn World,
        _pos: BlockPos,
        entity: &Entity,
    ) -> Option<Transition> {
        let dimension = match entity.dimension {
            Dimension::Overworld => Dimension::Nether,
            Dimension::Nether => Dimension::Overworld,
            Dimension::End => return None,
        };
        Some(Transition {
            dimension,
            pos: entity.pos,
        })
    }

    fn transition_time_ticks(&self, entity: &Entity) -> u32 {
        match entity.kind {
            EntityKind::Player { creative: false } => PLAYER_PORTAL_DELAY,
            EntityKind::Player { creative: true } => 1,
            _ => 0,
        }
    }

    fn local_transition(&self) -> TransitionKind {
        TransitionKind::Confusion
    }
}
