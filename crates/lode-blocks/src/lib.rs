//! Block types, state spaces, capability contracts and the catalog.
#![forbid(unsafe_code)]

pub mod capability;
pub mod codec;
pub mod combiner;
pub mod config;
pub mod error;
pub mod growth;
pub mod kinds;
pub mod multiface;
pub mod property;
pub mod registry;
pub mod state;
pub mod types;
pub mod weathering;
pub mod world;

pub use capability::{Capabilities, Capability, CapabilitySet};
pub use codec::{BlockConfig, BlockSchema, Blueprint, CodecRegistry, SerializedRecord};
pub use combiner::{Combination, DoubleBlockShape, DoubleHalf, combine};
pub use error::{BlockError, Result};
pub use property::{Domain, Property, TypedProperty, Value, props};
pub use registry::{BlockType, Catalog};
pub use state::{StateDefinition, StateDefinitionBuilder};
pub use types::{BlockId, BlockState};
pub use weathering::WeatherState;
pub use world::World;
