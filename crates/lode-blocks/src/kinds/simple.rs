use rand::Rng;

use super::{COLORED, DROP_EXPERIENCE, SIMPLE};
use crate::codec::{
    BlockConfig, BlockParts, BlockSchema, FieldCodec, FieldSpec, FieldValue, IntProvider,
};
use crate::error::Result;
use crate::registry::BlockType;

pub const DYE_COLORS: &[&str] = &[
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "light_gray",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
];

pub const EXPERIENCE_FIELD: &str = "experience";

pub fn schema() -> BlockSchema {
    BlockSchema::new(SIMPLE)
}

pub fn build(_cfg: &BlockConfig) -> Result<BlockParts> {
    Ok(BlockParts::plain())
}

pub fn colored_schema() -> BlockSchema {
    BlockSchema::new(COLORED).field(FieldSpec::required("color", FieldCodec::Name(DYE_COLORS)))
}

pub fn build_colored(_cfg: &BlockConfig) -> Result<BlockParts> {
    Ok(BlockParts::plain())
}

pub fn experience_schema() -> BlockSchema {
    BlockSchema::new(DROP_EXPERIENCE).field(FieldSpec::optional(
        EXPERIENCE_FIELD,
        FieldCodec::IntProvider { min: 0, max: 10 },
        FieldValue::IntProvider(IntProvider::Constant { value: 0 }),
    ))
}

pub fn build_experience(_cfg: &BlockConfig) -> Result<BlockParts> {
    Ok(BlockParts::plain())
}

/// Experience dropped when `ty` is mined; zero for kinds without a provider.
pub fn roll_experience<R: Rng + ?Sized>(ty: &BlockType, rng: &mut R) -> i32 {
    ty.config
        .int_provider(EXPERIENCE_FIELD)
        .map_or(0, |p| p.sample(rng))
}
