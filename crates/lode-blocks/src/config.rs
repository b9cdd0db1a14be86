use serde::{Deserialize, Serialize};

// Top-level catalog file: a list of named, serialized block type references
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,
}

// One `[[blocks]]` entry. Everything except `id` is the codec record,
// tagged with its `kind`.
#[derive(Deserialize, Debug, Clone)]
pub struct BlockEntry {
    pub id: String,
    #[serde(flatten)]
    pub record: toml::Table,
}

// Construction properties shared by every kind (the `properties` table)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BehaviorProperties {
    pub hardness: f32,
    pub explosion_resistance: f32,
    // Full, sturdy cube: supports attached faces and blocks chests from opening
    pub solid: bool,
    // Can be overwritten by growth and spreading
    pub replaceable: bool,
    pub light_emission: u8,
}

impl Default for BehaviorProperties {
    fn default() -> Self {
        Self {
            hardness: 1.0,
            explosion_resistance: 1.0,
            solid: true,
            replaceable: false,
            light_emission: 0,
        }
    }
}

impl BehaviorProperties {
    pub fn air() -> Self {
        Self {
            hardness: 0.0,
            explosion_resistance: 0.0,
            solid: false,
            replaceable: true,
            light_emission: 0,
        }
    }

    pub fn non_solid(mut self) -> Self {
        self.solid = false;
        self
    }

    /// Strength values must be finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        for (name, v) in [
            ("hardness", self.hardness),
            ("explosion_resistance", self.explosion_resistance),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{name} must be finite and non-negative, got {v}"));
            }
        }
        Ok(())
    }
}
