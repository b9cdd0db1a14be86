//! Plant-like kinds: growing vines and multiface growths.

use std::sync::Arc;

use lode_geom::Direction;

use super::fluid::Waterlogging;
use super::{GROWING_VINE, MULTIFACE};
use crate::capability::Capabilities;
use crate::codec::{BlockConfig, BlockParts, BlockSchema, FieldCodec, FieldSpec, FieldValue};
use crate::error::{BlockError, Result};
use crate::growth::GrowingVine;
use crate::multiface::MultifaceGrowth;
use crate::property::props;
use crate::state::StateDefinitionBuilder;

pub fn vine_schema() -> BlockSchema {
    BlockSchema::new(GROWING_VINE).field(FieldSpec::optional(
        "direction",
        FieldCodec::Name(&["up", "down"]),
        FieldValue::Name("down".into()),
    ))
}

pub fn build_vine(cfg: &BlockConfig) -> Result<BlockParts> {
    let direction = cfg
        .name("direction")
        .and_then(Direction::from_name)
        .ok_or_else(|| BlockError::schema(GROWING_VINE, "missing direction"))?;
    let mut states = StateDefinitionBuilder::new();
    states.declare(props::AGE_25)?;
    let vine = Arc::new(GrowingVine::new(direction));
    Ok(BlockParts::new(
        states,
        Capabilities::new()
            .with_bonemeal(vine.clone())
            .with_random_ticking(vine),
    ))
}

pub fn multiface_schema() -> BlockSchema {
    BlockSchema::new(MULTIFACE)
}

pub fn build_multiface(_cfg: &BlockConfig) -> Result<BlockParts> {
    let mut states = StateDefinitionBuilder::new();
    for dir in Direction::ALL {
        states.declare(props::face(dir))?;
    }
    states.declare(props::WATERLOGGED)?;
    let caps = Waterlogging::capabilities(
        Capabilities::new().with_bonemeal(Arc::new(MultifaceGrowth)),
    );
    Ok(BlockParts::new(states, caps))
}
