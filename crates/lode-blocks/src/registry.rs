use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lode_geom::BlockPos;
use rand::RngCore;

use crate::capability::{
    BonemealGrowable, BucketPickup, Capabilities, Capability, CapabilitySet, EntityContainer,
    FallReactive, LiquidContainer, Portal, RandomTicking, Weatherable,
};
use crate::codec::{BlockConfig, Blueprint, CodecRegistry, FieldCodec, SerializedRecord};
use crate::config::{BehaviorProperties, CatalogConfig};
use crate::error::{BlockError, Result};
use crate::kinds;
use crate::property::{TypedProperty, Value};
use crate::state::{StateDefinition, StateDefinitionBuilder};
use crate::types::{BlockId, BlockState};
use crate::weathering::WeatherState;
use crate::world::World;

pub const AIR_NAME: &str = "lode:air";

const BUILTIN_CATALOG: &str = include_str!("../catalog/blocks.toml");

/// A registered block type: identity, decoded config, state space and the
/// capabilities it opted into. Read-only once registered.
#[derive(Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub kind: &'static str,
    pub config: BlockConfig,
    pub states: StateDefinition,
    capabilities: Capabilities,
}

impl BlockType {
    #[inline]
    pub fn properties(&self) -> &BehaviorProperties {
        &self.config.properties
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.config.properties.solid
    }

    #[inline]
    pub fn default_state(&self) -> BlockState {
        BlockState::new(self.id, self.states.default_index())
    }

    pub fn state(&self, index: u16) -> Option<BlockState> {
        ((index as usize) < self.states.len()).then_some(BlockState::new(self.id, index))
    }

    /// Every state in enumeration order.
    pub fn all_states(&self) -> impl Iterator<Item = BlockState> + '_ {
        self.states.indices().map(|i| BlockState::new(self.id, i))
    }

    #[inline]
    pub fn owns(&self, state: BlockState) -> bool {
        state.block == self.id && (state.index as usize) < self.states.len()
    }

    #[inline]
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.has(capability)
    }

    #[inline]
    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities.set()
    }

    fn unsupported(&self, capability: Capability) -> BlockError {
        BlockError::CapabilityNotSupported {
            block: self.name.clone(),
            capability,
        }
    }

    fn invalid(&self, property: &str, value: impl ToString) -> BlockError {
        BlockError::InvalidPropertyValue {
            block: self.name.clone(),
            property: property.to_string(),
            value: value.to_string(),
        }
    }

    pub fn entity_container(&self) -> Result<&dyn EntityContainer> {
        self.capabilities
            .entity_container
            .as_deref()
            .ok_or_else(|| self.unsupported(Capability::EntityContainer))
    }

    pub fn fall_reactive(&self) -> Result<&dyn FallReactive> {
        self.capabilities
            .fall_reactive
            .as_deref()
            .ok_or_else(|| self.unsupported(Capability::FallReactive))
    }

    pub fn liquid_container(&self) -> Result<&dyn LiquidContainer> {
        self.capabilities
            .liquid_container
            .as_deref()
            .ok_or_else(|| self.unsupported(Capability::LiquidContainer))
    }

    pub fn portal(&self) -> Result<&dyn Portal> {
        self.capabilities
            .portal
            .as_deref()
            .ok_or_else(|| self.unsupported(Capability::Portal))
    }

    pub fn bonemeal(&self) -> Result<&dyn BonemealGrowable> {
        self.capabilities
            .bonemeal
            .as_deref()
            .ok_or_else(|| self.unsupported(Capability::BonemealGrowable))
    }

    pub fn bucket_pickup(&self) -> Result<&dyn BucketPickup> {
        self.capabilities
            .bucket_pickup
            .as_deref()
            .ok_or_else(|| self.unsupported(Capability::BucketPickup))
    }

    pub fn weatherable(&self) -> Result<&dyn Weatherable> {
        self.capabilities
            .weatherable
            .as_deref()
            .ok_or_else(|| self.unsupported(Capability::Weatherable))
    }

    pub fn random_ticking(&self) -> Result<&dyn RandomTicking> {
        self.capabilities
            .random_ticking
            .as_deref()
            .ok_or_else(|| self.unsupported(Capability::RandomTicking))
    }

    /// Untyped read; `None` if the property is not declared here.
    pub fn value(&self, state: BlockState, name: &str) -> Option<Value> {
        if !self.owns(state) {
            return None;
        }
        self.states.value(state.index, name)
    }

    pub fn get<P: TypedProperty>(&self, state: BlockState, property: P) -> Option<P::Value> {
        if !self.owns(state) {
            return None;
        }
        self.states.typed(state.index, &property)
    }

    pub fn with_value(&self, state: BlockState, name: &str, value: Value) -> Result<BlockState> {
        if !self.owns(state) {
            return Err(self.invalid(name, value));
        }
        self.states
            .with_value(state.index, name, value)
            .map(|i| BlockState::new(self.id, i))
            .ok_or_else(|| self.invalid(name, value))
    }

    pub fn with<P: TypedProperty>(
        &self,
        state: BlockState,
        property: P,
        value: P::Value,
    ) -> Result<BlockState> {
        self.with_value(state, property.name(), property.encode(value))
    }

    pub fn cycle(&self, state: BlockState, name: &str) -> Result<BlockState> {
        if !self.owns(state) {
            return Err(self.invalid(name, "<cycle>"));
        }
        self.states
            .cycle(state.index, name)
            .map(|i| BlockState::new(self.id, i))
            .ok_or_else(|| self.invalid(name, "<cycle>"))
    }

    /// Default state with the given properties overridden.
    pub fn state_with(&self, values: &[(&str, Value)]) -> Result<BlockState> {
        values
            .iter()
            .try_fold(self.default_state(), |s, &(name, v)| self.with_value(s, name, v))
    }
}

/// All registered block types, the codecs that build them and the weathering
/// chains that link them.
pub struct Catalog {
    codecs: CodecRegistry,
    blocks: Vec<BlockType>,
    by_name: HashMap<String, BlockId>,
    stages: HashMap<(&'static str, &'static str, WeatherState), BlockId>,
}

impl Catalog {
    /// Catalog holding the built-in kinds and only air.
    pub fn new() -> Result<Self> {
        let mut codecs = CodecRegistry::new();
        kinds::register_builtin(&mut codecs)?;
        let mut catalog = Catalog {
            codecs,
            blocks: Vec::new(),
            by_name: HashMap::new(),
            stages: HashMap::new(),
        };
        let air = Blueprint {
            kind: kinds::SIMPLE,
            config: BlockConfig::new(BehaviorProperties::air()),
            states: StateDefinitionBuilder::new(),
            capabilities: Capabilities::new(),
        };
        let id = catalog.insert(AIR_NAME.to_string(), air)?;
        if id != BlockId::AIR {
            return Err(BlockError::schema(kinds::SIMPLE, format!("air registered as {id}")));
        }
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: CatalogConfig = toml::from_str(text)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: CatalogConfig) -> Result<Self> {
        let mut catalog = Catalog::new()?;
        for entry in &cfg.blocks {
            catalog.register_record(&entry.id, &entry.record)?;
        }
        catalog.check_references()?;
        log::info!(
            "catalog loaded: {} block types, {} kinds",
            catalog.blocks.len(),
            catalog.codecs.kinds().len()
        );
        Ok(catalog)
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    pub fn codecs_mut(&mut self) -> &mut CodecRegistry {
        &mut self.codecs
    }

    /// Register a block type under a unique namespaced name.
    pub fn register(&mut self, name: &str, blueprint: Blueprint) -> Result<BlockId> {
        if self.by_name.contains_key(name) {
            return Err(BlockError::DuplicateTypeId {
                name: name.to_string(),
            });
        }
        // Only kinds with a codec can be registered; the config must encode.
        let schema = self
            .codecs
            .schema(blueprint.kind)
            .ok_or_else(|| BlockError::UnknownKind(blueprint.kind.to_string()))?;
        schema.encode(&blueprint.config)?;
        let config = schema.normalize(blueprint.config);
        self.insert(name.to_string(), Blueprint { config, ..blueprint })
    }

    /// Decode a serialized reference and register the resulting type.
    pub fn register_record(&mut self, name: &str, record: &SerializedRecord) -> Result<BlockId> {
        if self.by_name.contains_key(name) {
            return Err(BlockError::DuplicateTypeId {
                name: name.to_string(),
            });
        }
        let blueprint = self.codecs.construct(record)?;
        self.insert(name.to_string(), blueprint)
    }

    fn insert(&mut self, name: String, blueprint: Blueprint) -> Result<BlockId> {
        if self.blocks.len() > u16::MAX as usize {
            return Err(BlockError::schema(blueprint.kind, "catalog is full"));
        }
        let id = BlockId(self.blocks.len() as u16);
        let states = blueprint.states.build(&name)?;
        if let Some(w) = blueprint.capabilities.weatherable.as_deref() {
            let key = (blueprint.kind, w.family(), w.current_stage());
            if let Some(&other) = self.stages.get(&key) {
                return Err(BlockError::schema(
                    blueprint.kind,
                    format!(
                        "`{name}` repeats stage {} of family `{}` already held by `{}`",
                        key.2.name(),
                        key.1,
                        self.blocks[other.0 as usize].name
                    ),
                ));
            }
            self.stages.insert(key, id);
        }
        log::debug!(
            target: "catalog",
            "registered {} {} (kind {}, {} states)",
            id,
            name,
            blueprint.kind,
            states.len()
        );
        self.by_name.insert(name.clone(), id);
        self.blocks.push(BlockType {
            id,
            name,
            kind: blueprint.kind,
            config: blueprint.config,
            states,
            capabilities: blueprint.capabilities,
        });
        Ok(id)
    }

    /// Every block reference in a registered config names a registered type.
    pub fn check_references(&self) -> Result<()> {
        for ty in &self.blocks {
            let Some(schema) = self.codecs.schema(ty.kind) else {
                continue;
            };
            for field in schema.fields.iter().filter(|f| f.codec == FieldCodec::BlockRef) {
                if let Some(target) = ty.config.block_ref(field.name) {
                    if !self.by_name.contains_key(target) {
                        log::warn!("{} references unknown block {}", ty.name, target);
                        return Err(BlockError::UnknownBlock(target.to_string()));
                    }
                }
            }
        }
        Ok(())
    }

    /// Serialized reference of a registered type.
    pub fn encode(&self, id: BlockId) -> Result<SerializedRecord> {
        let ty = self
            .get(id)
            .ok_or_else(|| BlockError::UnknownBlock(id.to_string()))?;
        self.codecs.encode(ty.kind, &ty.config)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id.0 as usize)
    }

    #[inline]
    pub fn block(&self, state: BlockState) -> Option<&BlockType> {
        self.get(state.block)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&BlockType> {
        self.id_by_name(name).and_then(|id| self.get(id))
    }

    pub fn lookup(&self, name: &str) -> Result<&BlockType> {
        self.by_name(name)
            .ok_or_else(|| BlockError::UnknownBlock(name.to_string()))
    }

    pub fn default_state(&self, name: &str) -> Option<BlockState> {
        self.by_name(name).map(|ty| ty.default_state())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter()
    }

    pub fn is_solid(&self, state: BlockState) -> bool {
        self.block(state).is_some_and(|ty| ty.is_solid())
    }

    pub fn value(&self, state: BlockState, name: &str) -> Option<Value> {
        self.block(state)?.value(state, name)
    }

    pub fn get_value<P: TypedProperty>(&self, state: BlockState, property: P) -> Option<P::Value> {
        self.block(state)?.get(state, property)
    }

    pub fn with<P: TypedProperty>(
        &self,
        state: BlockState,
        property: P,
        value: P::Value,
    ) -> Result<BlockState> {
        let ty = self
            .block(state)
            .ok_or_else(|| BlockError::UnknownBlock(state.block.to_string()))?;
        ty.with(state, property, value)
    }

    /// State of `to` carrying over every property both types declare, where
    /// the value is legal in the target's domain.
    pub fn copy_matching(&self, from: BlockState, to: BlockId) -> Option<BlockState> {
        let src = self.block(from)?;
        let dst = self.get(to)?;
        let mut out = dst.default_state();
        for (name, value) in src.states.assignment(from.index) {
            if let Some(i) = dst.states.with_value(out.index, name, value) {
                out.index = i;
            }
        }
        Some(out)
    }

    /// `name[prop=value,...]`, or just `name` for property-less types.
    pub fn describe(&self, state: BlockState) -> String {
        let Some(ty) = self.block(state) else {
            return format!("<unknown {}:{}>", state.block, state.index);
        };
        let props = ty.states.assignment(state.index);
        if props.is_empty() {
            return ty.name.clone();
        }
        let parts: Vec<String> = props.iter().map(|(n, v)| format!("{n}={v}")).collect();
        format!("{}[{}]", ty.name, parts.join(","))
    }

    /// Block type one weathering stage further along, if registered.
    pub fn next_stage_type(&self, id: BlockId) -> Option<BlockId> {
        let ty = self.get(id)?;
        let w = ty.capabilities.weatherable.as_deref()?;
        let stage = w.current_stage().next()?;
        self.stages.get(&(ty.kind, w.family(), stage)).copied()
    }

    pub fn is_randomly_ticking(&self, state: BlockState) -> bool {
        self.block(state)
            .and_then(|ty| ty.capabilities.random_ticking.as_deref())
            .is_some_and(|rt| rt.is_randomly_ticking(self, state))
    }

    /// Run the random-tick behavior of whatever sits at `pos`.
    pub fn random_tick(&self, world: &mut dyn World, rng: &mut dyn RngCore, pos: BlockPos) {
        let state = world.read_state(pos);
        let Some(rt) = self
            .block(state)
            .and_then(|ty| ty.capabilities.random_ticking.as_deref())
        else {
            return;
        };
        if rt.is_randomly_ticking(self, state) {
            rt.random_tick(self, world, rng, pos, state);
        }
    }

    /// Write `state` at `pos`, replacing the attachment and scheduling a random
    /// tick when the new state wants one.
    pub fn place(&self, world: &mut dyn World, pos: BlockPos, state: BlockState) {
        world.write_state(pos, state);
        let attachment = self
            .block(state)
            .and_then(|ty| ty.capabilities.entity_container.as_deref())
            .and_then(|ec| ec.create_attachment(pos, state));
        world.write_attachment(pos, attachment);
        if self.is_randomly_ticking(state) {
            world.schedule_random_tick(pos);
        }
    }

    /// Change the state at `pos` in place, keeping any attachment.
    pub fn update(&self, world: &mut dyn World, pos: BlockPos, state: BlockState) {
        world.write_state(pos, state);
        if self.is_randomly_ticking(state) {
            world.schedule_random_tick(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::props;

    #[test]
    fn air_is_registered_first() {
        let c = Catalog::new().unwrap();
        assert_eq!(c.id_by_name(AIR_NAME), Some(BlockId::AIR));
        assert!(!c.is_solid(BlockState::AIR));
        assert_eq!(c.describe(BlockState::AIR), AIR_NAME);
    }

    #[test]
    fn builtin_registration_errors_propagate() {
        let mut codecs = CodecRegistry::new();
        kinds::register_builtin(&mut codecs).unwrap();
        let err = kinds::register_builtin(&mut codecs).unwrap_err();
        assert!(matches!(err, BlockError::DuplicateTypeId { ref name } if name == kinds::SIMPLE));
    }

    #[test]
    fn builtin_catalog_loads() {
        let c = Catalog::builtin().unwrap();
        assert!(c.len() > 20);
        let chest = c.lookup("lode:chest").unwrap();
        assert!(chest.has(Capability::EntityContainer));
        assert!(!chest.has(Capability::Portal));
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut c = Catalog::new().unwrap();
        let rec: SerializedRecord = toml::from_str(r#"kind = "simple""#).unwrap();
        c.register_record("lode:stone", &rec).unwrap();
        let err = c.register_record("lode:stone", &rec).unwrap_err();
        assert!(matches!(err, BlockError::DuplicateTypeId { .. }));
    }

    #[test]
    fn copy_matching_keeps_shared_properties() {
        let c = Catalog::builtin().unwrap();
        let from = c.lookup("lode:copper_lantern").unwrap();
        let to = c.id_by_name("lode:exposed_copper_lantern").unwrap();
        let s = from.with(from.default_state(), props::HANGING, true).unwrap();
        let copied = c.copy_matching(s, to).unwrap();
        assert_eq!(c.get_value(copied, props::HANGING), Some(true));
        assert_eq!(c.get_value(copied, props::WATERLOGGED), Some(false));
    }

    #[test]
    fn describe_lists_properties_in_order() {
        let c = Catalog::builtin().unwrap();
        let s = c.default_state("lode:copper_bulb").unwrap();
        assert_eq!(c.describe(s), "lode:copper_bulb[lit=false,powered=false]");
    }
}
