//! Reversible encoding between a block type's configuration and a
//! kind-tagged TOML record.
//!
//! Every kind registers a [`BlockSchema`] (ordered, typed fields) and a
//! constructor. Decoding a record and running the constructor is how a
//! serialized block reference becomes a live block type.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::capability::Capabilities;
use crate::config::BehaviorProperties;
use crate::error::{BlockError, Result};
use crate::state::StateDefinitionBuilder;

pub type SerializedRecord = toml::Table;

pub const KIND_KEY: &str = "kind";
pub const PROPERTIES_KEY: &str = "properties";

/// Integer-valued distribution used by configs such as experience drops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntProvider {
    Constant { value: i32 },
    Uniform { min_inclusive: i32, max_inclusive: i32 },
}

impl IntProvider {
    pub fn min_value(&self) -> i32 {
        match *self {
            IntProvider::Constant { value } => value,
            IntProvider::Uniform { min_inclusive, .. } => min_inclusive,
        }
    }

    pub fn max_value(&self) -> i32 {
        match *self {
            IntProvider::Constant { value } => value,
            IntProvider::Uniform { max_inclusive, .. } => max_inclusive,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        match *self {
            IntProvider::Constant { value } => value,
            IntProvider::Uniform {
                min_inclusive,
                max_inclusive,
            } => rng.random_range(min_inclusive..=max_inclusive),
        }
    }
}

/// Value codec of one schema field, including its legal domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldCodec {
    Bool,
    Int { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    Name(&'static [&'static str]),
    /// Both bounds of the provider must lie in `[min, max]`.
    IntProvider { min: i32, max: i32 },
    /// Namespaced reference to another block type, e.g. `lode:stone`.
    BlockRef,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Name(String),
    IntProvider(IntProvider),
    BlockRef(String),
}

impl FieldCodec {
    fn check(&self, value: &FieldValue) -> Result<(), String> {
        match (self, value) {
            (FieldCodec::Bool, FieldValue::Bool(_)) => Ok(()),
            (FieldCodec::Int { min, max }, FieldValue::Int(v)) => {
                if (*min..=*max).contains(v) {
                    Ok(())
                } else {
                    Err(format!("{v} outside [{min}, {max}]"))
                }
            }
            (FieldCodec::Float { min, max }, FieldValue::Float(v)) => {
                if v.is_finite() && *v >= *min && *v <= *max {
                    Ok(())
                } else {
                    Err(format!("{v} outside [{min}, {max}]"))
                }
            }
            (FieldCodec::Name(names), FieldValue::Name(n)) => {
                if names.contains(&n.as_str()) {
                    Ok(())
                } else {
                    Err(format!("`{n}` is not one of {names:?}"))
                }
            }
            (FieldCodec::IntProvider { min, max }, FieldValue::IntProvider(p)) => {
                let (lo, hi) = (p.min_value(), p.max_value());
                if lo > hi {
                    Err(format!("provider bounds inverted ({lo} > {hi})"))
                } else if lo < *min || hi > *max {
                    Err(format!("provider [{lo}, {hi}] outside [{min}, {max}]"))
                } else {
                    Ok(())
                }
            }
            (FieldCodec::BlockRef, FieldValue::BlockRef(r)) => match r.split_once(':') {
                Some((ns, path)) if !ns.is_empty() && !path.is_empty() => Ok(()),
                _ => Err(format!("`{r}` is not a namespaced block id")),
            },
            _ => Err(format!("expected {self:?}, got {value:?}")),
        }
    }

    fn to_toml(&self, value: &FieldValue) -> Result<toml::Value, String> {
        self.check(value)?;
        Ok(match value {
            FieldValue::Bool(b) => toml::Value::Boolean(*b),
            FieldValue::Int(i) => toml::Value::Integer(*i),
            FieldValue::Float(f) => toml::Value::Float(*f),
            FieldValue::Name(s) | FieldValue::BlockRef(s) => toml::Value::String(s.clone()),
            FieldValue::IntProvider(IntProvider::Constant { value }) => {
                toml::Value::Integer(*value as i64)
            }
            FieldValue::IntProvider(p) => toml::Value::try_from(p).map_err(|e| e.to_string())?,
        })
    }

    fn from_toml(&self, raw: &toml::Value) -> Result<FieldValue, String> {
        let value = match (self, raw) {
            (FieldCodec::Bool, toml::Value::Boolean(b)) => FieldValue::Bool(*b),
            (FieldCodec::Int { .. }, toml::Value::Integer(i)) => FieldValue::Int(*i),
            (FieldCodec::Float { .. }, toml::Value::Float(f)) => FieldValue::Float(*f),
            (FieldCodec::Float { .. }, toml::Value::Integer(i)) => FieldValue::Float(*i as f64),
            (FieldCodec::Name(_), toml::Value::String(s)) => FieldValue::Name(s.clone()),
            (FieldCodec::BlockRef, toml::Value::String(s)) => FieldValue::BlockRef(s.clone()),
            (FieldCodec::IntProvider { .. }, toml::Value::Integer(i)) => {
                let value = i32::try_from(*i).map_err(|_| format!("{i} does not fit in i32"))?;
                FieldValue::IntProvider(IntProvider::Constant { value })
            }
            (FieldCodec::IntProvider { .. }, toml::Value::Table(_)) => FieldValue::IntProvider(
                raw.clone()
                    .try_into::<IntProvider>()
                    .map_err(|e| e.to_string())?,
            ),
            _ => return Err(format!("expected {self:?}, got {}", raw.type_str())),
        };
        self.check(&value)?;
        Ok(value)
    }
}

/// One named field of a schema, optionally with a default used when absent.
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub codec: FieldCodec,
    pub default: Option<FieldValue>,
}

impl FieldSpec {
    pub fn required(name: &'static str, codec: FieldCodec) -> Self {
        Self {
            name,
            codec,
            default: None,
        }
    }

    pub fn optional(name: &'static str, codec: FieldCodec, default: FieldValue) -> Self {
        Self {
            name,
            codec,
            default: Some(default),
        }
    }
}

/// Decoded configuration of a block type: the shared properties blob plus the
/// kind-specific fields.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BlockConfig {
    pub properties: BehaviorProperties,
    fields: BTreeMap<&'static str, FieldValue>,
}

impl BlockConfig {
    pub fn new(properties: BehaviorProperties) -> Self {
        Self {
            properties,
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &'static str, value: FieldValue) -> Self {
        self.fields.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    pub fn name(&self, field: &str) -> Option<&str> {
        match self.get(field)? {
            FieldValue::Name(s) => Some(s),
            _ => None,
        }
    }

    pub fn block_ref(&self, field: &str) -> Option<&str> {
        match self.get(field)? {
            FieldValue::BlockRef(s) => Some(s),
            _ => None,
        }
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        match self.get(field)? {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn int_provider(&self, field: &str) -> Option<IntProvider> {
        match self.get(field)? {
            FieldValue::IntProvider(p) => Some(*p),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockSchema {
    pub kind: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl BlockSchema {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    fn mismatch(&self, reason: impl Into<String>) -> BlockError {
        BlockError::schema(self.kind, reason)
    }

    pub fn encode(&self, config: &BlockConfig) -> Result<SerializedRecord> {
        if let Some((name, _)) = config
            .fields()
            .find(|(name, _)| !self.fields.iter().any(|f| f.name == *name))
        {
            return Err(self.mismatch(format!("unknown field `{name}`")));
        }
        config
            .properties
            .validate()
            .map_err(|e| self.mismatch(format!("properties: {e}")))?;
        let mut record = SerializedRecord::new();
        record.insert(KIND_KEY.into(), toml::Value::String(self.kind.into()));
        let props = toml::Value::try_from(&config.properties)
            .map_err(|e| self.mismatch(format!("properties: {e}")))?;
        record.insert(PROPERTIES_KEY.into(), props);
        for spec in &self.fields {
            let value = config
                .get(spec.name)
                .or(spec.default.as_ref())
                .ok_or_else(|| self.mismatch(format!("missing field `{}`", spec.name)))?;
            let raw = spec
                .codec
                .to_toml(value)
                .map_err(|e| self.mismatch(format!("field `{}`: {e}", spec.name)))?;
            record.insert(spec.name.into(), raw);
        }
        Ok(record)
    }

    /// Fill every absent field that has a default.
    pub fn normalize(&self, mut config: BlockConfig) -> BlockConfig {
        for spec in &self.fields {
            if let Some(default) = &spec.default {
                config
                    .fields
                    .entry(spec.name)
                    .or_insert_with(|| default.clone());
            }
        }
        config
    }

    pub fn decode(&self, record: &SerializedRecord) -> Result<BlockConfig> {
        match record.get(KIND_KEY) {
            Some(toml::Value::String(k)) if k == self.kind => {}
            Some(other) => return Err(self.mismatch(format!("record is tagged {other}"))),
            None => return Err(self.mismatch("record has no `kind` tag")),
        }
        for key in record.keys() {
            let known = key == KIND_KEY
                || key == PROPERTIES_KEY
                || self.fields.iter().any(|f| f.name == key);
            if !known {
                return Err(self.mismatch(format!("unknown field `{key}`")));
            }
        }
        let properties = match record.get(PROPERTIES_KEY) {
            Some(raw) => raw
                .clone()
                .try_into::<BehaviorProperties>()
                .map_err(|e| self.mismatch(format!("properties: {e}")))?,
            None => BehaviorProperties::default(),
        };
        properties
            .validate()
            .map_err(|e| self.mismatch(format!("properties: {e}")))?;
        let mut config = BlockConfig::new(properties);
        for spec in &self.fields {
            let value = match record.get(spec.name) {
                Some(raw) => spec
                    .codec
                    .from_toml(raw)
                    .map_err(|e| self.mismatch(format!("field `{}`: {e}", spec.name)))?,
                None => spec
                    .default
                    .clone()
                    .ok_or_else(|| self.mismatch(format!("missing field `{}`", spec.name)))?,
            };
            config.fields.insert(spec.name, value);
        }
        Ok(config)
    }
}

/// What a kind's constructor produces from a decoded config.
pub struct BlockParts {
    pub states: StateDefinitionBuilder,
    pub capabilities: Capabilities,
}

impl BlockParts {
    pub fn new(states: StateDefinitionBuilder, capabilities: Capabilities) -> Self {
        Self {
            states,
            capabilities,
        }
    }

    pub fn plain() -> Self {
        Self::new(StateDefinitionBuilder::new(), Capabilities::new())
    }
}

pub type Constructor = fn(&BlockConfig) -> Result<BlockParts>;

/// Everything needed to register one block type.
pub struct Blueprint {
    pub kind: &'static str,
    pub config: BlockConfig,
    pub states: StateDefinitionBuilder,
    pub capabilities: Capabilities,
}

struct CodecEntry {
    schema: BlockSchema,
    constructor: Constructor,
}

#[derive(Default)]
pub struct CodecRegistry {
    entries: HashMap<&'static str, CodecEntry>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: BlockSchema, constructor: Constructor) -> Result<()> {
        if self.entries.contains_key(schema.kind) {
            return Err(BlockError::DuplicateTypeId {
                name: schema.kind.to_string(),
            });
        }
        log::debug!(target: "codec", "registered kind {}", schema.kind);
        self.entries.insert(
            schema.kind,
            CodecEntry {
                schema,
                constructor,
            },
        );
        Ok(())
    }

    pub fn schema(&self, kind: &str) -> Option<&BlockSchema> {
        self.entries.get(kind).map(|e| &e.schema)
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.entries.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    fn entry(&self, kind: &str) -> Result<&CodecEntry> {
        self.entries
            .get(kind)
            .ok_or_else(|| BlockError::UnknownKind(kind.to_string()))
    }

    pub fn encode(&self, kind: &str, config: &BlockConfig) -> Result<SerializedRecord> {
        self.entry(kind)?.schema.encode(config)
    }

    /// Decode a record using the schema named by its `kind` tag.
    pub fn decode(&self, record: &SerializedRecord) -> Result<(&'static str, BlockConfig)> {
        let kind = match record.get(KIND_KEY) {
            Some(toml::Value::String(k)) => k.as_str(),
            _ => return Err(BlockError::schema("<untagged>", "record has no `kind` tag")),
        };
        let entry = self.entry(kind)?;
        Ok((entry.schema.kind, entry.schema.decode(record)?))
    }

    /// Decode and construct: the load-time path from a record to a blueprint.
    pub fn construct(&self, record: &SerializedRecord) -> Result<Blueprint> {
        let (kind, config) = self.decode(record)?;
        self.build(kind, config)
    }

    /// Construct from an in-memory config. The config must encode cleanly;
    /// the stored config is its decoded form, with defaults filled in.
    pub fn build(&self, kind: &str, config: BlockConfig) -> Result<Blueprint> {
        let entry = self.entry(kind)?;
        entry.schema.encode(&config)?;
        let config = entry.schema.normalize(config);
        let parts = (entry.constructor)(&config)?;
        Ok(Blueprint {
            kind: entry.schema.kind,
            config,
            states: parts.states,
            capabilities: parts.capabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xp_schema() -> BlockSchema {
        BlockSchema::new("test:xp").field(FieldSpec::required(
            "experience",
            FieldCodec::IntProvider { min: 0, max: 10 },
        ))
    }

    #[test]
    fn uniform_provider_roundtrips_through_table() {
        let cfg = BlockConfig::default().with(
            "experience",
            FieldValue::IntProvider(IntProvider::Uniform {
                min_inclusive: 2,
                max_inclusive: 5,
            }),
        );
        let schema = xp_schema();
        let rec = schema.encode(&cfg).unwrap();
        assert!(matches!(rec.get("experience"), Some(toml::Value::Table(_))));
        assert_eq!(schema.decode(&rec).unwrap(), cfg);
    }

    #[test]
    fn provider_bound_outside_domain_rejected() {
        let rec: SerializedRecord = toml::from_str(
            r#"
            kind = "test:xp"
            experience = { type = "uniform", min_inclusive = 3, max_inclusive = 11 }
        "#,
        )
        .unwrap();
        let err = xp_schema().decode(&rec).unwrap_err();
        assert!(matches!(err, BlockError::SchemaMismatch { .. }), "{err}");
    }

    #[test]
    fn wrong_kind_tag_rejected() {
        let rec: SerializedRecord = toml::from_str(
            r#"
            kind = "test:other"
            experience = 1
        "#,
        )
        .unwrap();
        assert!(xp_schema().decode(&rec).is_err());
    }
}
