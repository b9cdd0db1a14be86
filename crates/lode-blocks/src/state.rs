//! State definitions: the eagerly enumerated cartesian product of a block
//! type's properties.

use std::collections::HashMap;

use crate::error::{BlockError, Result};
use crate::property::{Domain, Property, TypedProperty, Value};

const MAX_STATES: usize = u16::MAX as usize + 1;

/// Collects property declarations for one block type.
#[derive(Clone, Debug, Default)]
pub struct StateDefinitionBuilder {
    properties: Vec<Property>,
    defaults: Vec<(&'static str, Value)>,
}

impl StateDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property. Names must be unique within the definition.
    pub fn declare<P: TypedProperty>(&mut self, property: P) -> Result<&mut Self> {
        let property = property.property();
        if self.properties.iter().any(|p| p.name == property.name) {
            return Err(BlockError::DuplicateProperty {
                name: property.name.to_string(),
            });
        }
        if property.domain.is_empty() {
            return Err(BlockError::EmptyDomain {
                name: property.name.to_string(),
            });
        }
        if let Domain::Enum(names) = property.domain {
            let repeated = (1..names.len()).find(|&i| names[..i].contains(&names[i]));
            if let Some(i) = repeated {
                return Err(BlockError::DuplicateValue {
                    name: property.name.to_string(),
                    value: names[i].to_string(),
                });
            }
        }
        self.properties.push(property);
        Ok(self)
    }

    /// Value the default state takes for `property`. Unset properties default
    /// to the first value in their domain.
    pub fn default_value<P: TypedProperty>(&mut self, property: P, value: P::Value) -> &mut Self {
        let name = property.name();
        let value = property.encode(value);
        self.defaults.retain(|(n, _)| *n != name);
        self.defaults.push((name, value));
        self
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Enumerate every combination and resolve the default state.
    pub fn build(&self, block: &str) -> Result<StateDefinition> {
        let mut count: usize = 1;
        for p in &self.properties {
            count = count.saturating_mul(p.domain.len());
        }
        if count > MAX_STATES {
            return Err(BlockError::StateSpaceTooLarge {
                block: block.to_string(),
                count,
            });
        }

        // Last declared property varies fastest.
        let mut strides = vec![1usize; self.properties.len()];
        for i in (0..self.properties.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.properties[i + 1].domain.len();
        }

        let width = self.properties.len();
        let mut table: Vec<u16> = Vec::with_capacity(count * width);
        for s in 0..count {
            for (i, p) in self.properties.iter().enumerate() {
                table.push(((s / strides[i]) % p.domain.len()) as u16);
            }
        }

        let index: HashMap<&'static str, usize> = self
            .properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name, i))
            .collect();

        let mut def = StateDefinition {
            properties: self.properties.clone(),
            strides,
            index,
            table,
            len: count,
            default_index: 0,
        };
        let mut default_index = 0u16;
        for &(name, value) in &self.defaults {
            default_index = def.with_value(default_index, name, value).ok_or_else(|| {
                BlockError::InvalidPropertyValue {
                    block: block.to_string(),
                    property: name.to_string(),
                    value: value.to_string(),
                }
            })?;
        }
        def.default_index = default_index;
        Ok(def)
    }
}

/// Immutable, fully materialized state space of one block type.
///
/// State `s` assigns property `i` the domain value at `table[s * width + i]`.
/// Lookups and "mutations" are index arithmetic into this table.
#[derive(Clone, Debug)]
pub struct StateDefinition {
    properties: Vec<Property>,
    strides: Vec<usize>,
    index: HashMap<&'static str, usize>,
    table: Vec<u16>,
    len: usize,
    default_index: u16,
}

impl StateDefinition {
    /// Definition with no properties and a single state.
    pub fn empty() -> Self {
        StateDefinition {
            properties: Vec::new(),
            strides: Vec::new(),
            index: HashMap::new(),
            table: Vec::new(),
            len: 1,
            default_index: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.index.get(name).map(|&i| &self.properties[i])
    }

    #[inline]
    pub fn default_index(&self) -> u16 {
        self.default_index
    }

    #[inline]
    fn row(&self, state: u16) -> Option<&[u16]> {
        let width = self.properties.len();
        let s = state as usize;
        if s >= self.len {
            return None;
        }
        Some(&self.table[s * width..(s + 1) * width])
    }

    /// Value of `name` in state `state`.
    pub fn value(&self, state: u16, name: &str) -> Option<Value> {
        let &i = self.index.get(name)?;
        let vi = *self.row(state)?.get(i)?;
        self.properties[i].domain.value_at(vi as usize)
    }

    /// State reached by replacing `name`'s value; `None` if the property is
    /// undeclared or the value is outside its domain.
    pub fn with_value(&self, state: u16, name: &str, value: Value) -> Option<u16> {
        let &i = self.index.get(name)?;
        let new_vi = self.properties[i].domain.index_of(value)?;
        let cur_vi = *self.row(state)?.get(i)? as usize;
        let s = state as usize - cur_vi * self.strides[i] + new_vi * self.strides[i];
        Some(s as u16)
    }

    /// Next value of `name` in domain order, wrapping around.
    pub fn cycle(&self, state: u16, name: &str) -> Option<u16> {
        let &i = self.index.get(name)?;
        let domain = self.properties[i].domain;
        let cur_vi = *self.row(state)?.get(i)? as usize;
        let next = domain.value_at((cur_vi + 1) % domain.len())?;
        self.with_value(state, name, next)
    }

    /// `(property, value)` pairs of a state, in declaration order.
    pub fn assignment(&self, state: u16) -> Vec<(&'static str, Value)> {
        let Some(row) = self.row(state) else {
            return Vec::new();
        };
        self.properties
            .iter()
            .zip(row)
            .filter_map(|(p, &vi)| p.domain.value_at(vi as usize).map(|v| (p.name, v)))
            .collect()
    }

    /// State index matching a (possibly partial) assignment, starting from
    /// the default state.
    pub fn index_for(&self, values: &[(&str, Value)]) -> Option<u16> {
        values
            .iter()
            .try_fold(self.default_index, |s, &(name, v)| self.with_value(s, name, v))
    }

    /// All state indices in enumeration order.
    pub fn indices(&self) -> impl Iterator<Item = u16> + '_ {
        (0..self.len).map(|s| s as u16)
    }

    pub fn typed<P: TypedProperty>(&self, state: u16, property: &P) -> Option<P::Value> {
        let v = self.value(state, property.name())?;
        property.decode(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{props, IntProperty};

    #[test]
    fn enumeration_order_is_declaration_then_domain() {
        let mut b = StateDefinitionBuilder::new();
        b.declare(props::LIT).unwrap();
        b.declare(IntProperty::new("n", 0, 2)).unwrap();
        let def = b.build("t").unwrap();
        assert_eq!(def.len(), 6);
        let order: Vec<_> = def.indices().map(|s| def.assignment(s)).collect();
        assert_eq!(order[0], vec![("lit", Value::Bool(false)), ("n", Value::Int(0))]);
        assert_eq!(order[1], vec![("lit", Value::Bool(false)), ("n", Value::Int(1))]);
        assert_eq!(order[3], vec![("lit", Value::Bool(true)), ("n", Value::Int(0))]);
    }

    #[test]
    fn duplicate_property_rejected() {
        let mut b = StateDefinitionBuilder::new();
        b.declare(props::LIT).unwrap();
        let err = b.declare(props::LIT).unwrap_err();
        assert!(matches!(err, BlockError::DuplicateProperty { ref name } if name == "lit"));
    }

    #[test]
    fn default_assignment_applied() {
        let mut b = StateDefinitionBuilder::new();
        b.declare(props::HORIZONTAL_FACING).unwrap();
        b.declare(props::WATERLOGGED).unwrap();
        b.default_value(props::HORIZONTAL_FACING, lode_geom::Direction::East);
        let def = b.build("t").unwrap();
        let d = def.default_index();
        assert_eq!(def.value(d, "facing"), Some(Value::Enum("east")));
        assert_eq!(def.value(d, "waterlogged"), Some(Value::Bool(false)));
    }

    #[test]
    fn cycle_wraps() {
        let mut b = StateDefinitionBuilder::new();
        b.declare(IntProperty::new("n", 0, 2)).unwrap();
        let def = b.build("t").unwrap();
        let s2 = def.with_value(0, "n", Value::Int(2)).unwrap();
        assert_eq!(def.cycle(s2, "n"), Some(0));
    }
}
