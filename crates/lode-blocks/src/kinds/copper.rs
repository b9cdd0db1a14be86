//! Weathering shapes: plain block, bulb, bars and lantern.

use std::sync::Arc;

use super::WEATHERING;
use super::fluid::Waterlogging;
use crate::capability::Capabilities;
use crate::codec::{BlockConfig, BlockParts, BlockSchema, FieldCodec, FieldSpec, FieldValue};
use crate::error::{BlockError, Result};
use crate::property::props;
use crate::state::StateDefinitionBuilder;
use crate::weathering::{WeatherState, Weathering};

pub const SHAPES: &[&str] = &["block", "bulb", "bars", "lantern"];

pub fn schema() -> BlockSchema {
    BlockSchema::new(WEATHERING)
        .field(FieldSpec::required("stage", FieldCodec::Name(WeatherState::NAMES)))
        .field(FieldSpec::optional(
            "shape",
            FieldCodec::Name(SHAPES),
            FieldValue::Name("block".into()),
        ))
}

pub fn build(cfg: &BlockConfig) -> Result<BlockParts> {
    let stage = cfg
        .name("stage")
        .and_then(WeatherState::from_name)
        .ok_or_else(|| BlockError::schema(WEATHERING, "missing stage"))?;
    let shape = cfg
        .name("shape")
        .and_then(|s| SHAPES.iter().copied().find(|n| *n == s))
        .ok_or_else(|| BlockError::schema(WEATHERING, "missing shape"))?;

    let mut states = StateDefinitionBuilder::new();
    let mut waterloggable = false;
    match shape {
        "bulb" => {
            states.declare(props::LIT)?.declare(props::POWERED)?;
        }
        "bars" => {
            states
                .declare(props::NORTH)?
                .declare(props::EAST)?
                .declare(props::WEST)?
                .declare(props::SOUTH)?
                .declare(props::WATERLOGGED)?;
            waterloggable = true;
        }
        "lantern" => {
            states.declare(props::HANGING)?.declare(props::WATERLOGGED)?;
            waterloggable = true;
        }
        _ => {}
    }

    let weathering = Arc::new(Weathering::new(stage, shape));
    let mut caps = Capabilities::new()
        .with_weatherable(weathering.clone())
        .with_random_ticking(weathering);
    if waterloggable {
        caps = Waterlogging::capabilities(caps);
    }
    Ok(BlockParts::new(states, caps))
}
