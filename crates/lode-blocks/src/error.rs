use thiserror::Error;

use crate::capability::Capability;

pub type Result<T, E = BlockError> = std::result::Result<T, E>;

/// Catalog construction and configuration failures.
///
/// Everything here points at a malformed catalog or a bad serialized reference;
/// runtime capability calls never produce these.
#[derive(Debug, Error)]
pub enum BlockError {
    #[error("property `{name}` declared twice")]
    DuplicateProperty { name: String },

    #[error("invalid value `{value}` for property `{property}` on `{block}`")]
    InvalidPropertyValue {
        block: String,
        property: String,
        value: String,
    },

    #[error("property `{name}` has an empty domain")]
    EmptyDomain { name: String },

    #[error("property `{name}` lists value `{value}` twice")]
    DuplicateValue { name: String, value: String },

    #[error("state space of `{block}` has {count} states (limit {})", u16::MAX as usize + 1)]
    StateSpaceTooLarge { block: String, count: usize },

    #[error("schema `{kind}`: {reason}")]
    SchemaMismatch { kind: String, reason: String },

    #[error("block type `{name}` registered twice")]
    DuplicateTypeId { name: String },

    #[error("`{block}` does not implement {capability:?}")]
    CapabilityNotSupported {
        block: String,
        capability: Capability,
    },

    #[error("no codec registered for kind `{0}`")]
    UnknownKind(String),

    #[error("no block type named `{0}`")]
    UnknownBlock(String),

    #[error("reading catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing catalog: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BlockError {
    pub(crate) fn schema(kind: &str, reason: impl Into<String>) -> Self {
        BlockError::SchemaMismatch {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}
