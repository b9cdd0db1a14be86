//! Built-in block kinds: one schema plus constructor each.

pub mod chest;
pub mod copper;
pub mod falling;
pub mod fluid;
pub mod plant;
pub mod portal;
pub mod simple;

use crate::codec::{BlockSchema, CodecRegistry, Constructor};
use crate::error::Result;

pub const SIMPLE: &str = "simple";
pub const COLORED: &str = "colored";
pub const DROP_EXPERIENCE: &str = "drop_experience";
pub const WEATHERING: &str = "weathering";
pub const CHEST: &str = "chest";
pub const LIQUID: &str = "liquid";
pub const FALLING: &str = "falling";
pub const ANVIL: &str = "anvil";
pub const NETHER_PORTAL: &str = "nether_portal";
pub const GROWING_VINE: &str = "growing_vine";
pub const MULTIFACE: &str = "multiface";

const BUILTIN: &[(fn() -> BlockSchema, Constructor)] = &[
    (simple::schema, simple::build),
    (simple::colored_schema, simple::build_colored),
    (simple::experience_schema, simple::build_experience),
    (copper::schema, copper::build),
    (chest::schema, chest::build),
    (fluid::schema, fluid::build),
    (falling::schema, falling::build),
    (falling::anvil_schema, falling::build_anvil),
    (portal::nether_schema, portal::build_nether),
    (plant::vine_schema, plant::build_vine),
    (plant::multiface_schema, plant::build_multiface),
];

pub fn register_builtin(codecs: &mut CodecRegistry) -> Result<()> {
    for (schema, build) in BUILTIN {
        codecs.register(schema(), *build)?;
    }
    Ok(())
}
