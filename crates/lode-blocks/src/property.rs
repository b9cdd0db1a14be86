//! Finite, named property axes and their values.

use std::fmt;
use std::marker::PhantomData;

use lode_geom::{Axis, Direction};

/// A single property value. Enum values are interned as static names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Enum(&'static str),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Enum(s) => f.write_str(s),
        }
    }
}

/// Ordered set of legal values for a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    /// `false`, then `true`.
    Bool,
    /// Inclusive integer range.
    Int { min: i32, max: i32 },
    Enum(&'static [&'static str]),
}

impl Domain {
    pub fn len(&self) -> usize {
        match *self {
            Domain::Bool => 2,
            Domain::Int { min, max } => {
                if max < min {
                    0
                } else {
                    (max as i64 - min as i64 + 1) as usize
                }
            }
            Domain::Enum(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index_of(&self, value: Value) -> Option<usize> {
        match (*self, value) {
            (Domain::Bool, Value::Bool(b)) => Some(b as usize),
            (Domain::Int { min, max }, Value::Int(i)) if (min..=max).contains(&i) => {
                Some((i as i64 - min as i64) as usize)
            }
            (Domain::Enum(names), Value::Enum(s)) => names.iter().position(|n| *n == s),
            _ => None,
        }
    }

    pub fn value_at(&self, index: usize) -> Option<Value> {
        if index >= self.len() {
            return None;
        }
        Some(match *self {
            Domain::Bool => Value::Bool(index == 1),
            Domain::Int { min, .. } => Value::Int(min + index as i32),
            Domain::Enum(names) => Value::Enum(names[index]),
        })
    }

    /// Parse the textual form used in configs and debug output.
    pub fn parse(&self, text: &str) -> Option<Value> {
        match *self {
            Domain::Bool => match text {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            Domain::Int { .. } => {
                let v = Value::Int(text.parse().ok()?);
                self.index_of(v).map(|_| v)
            }
            Domain::Enum(names) => names.iter().find(|n| **n == text).map(|n| Value::Enum(*n)),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).filter_map(move |i| self.value_at(i))
    }
}

/// A named axis of variation declared on a block type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub domain: Domain,
}

impl Property {
    pub const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            domain: Domain::Bool,
        }
    }

    pub const fn int(name: &'static str, min: i32, max: i32) -> Self {
        Self {
            name,
            domain: Domain::Int { min, max },
        }
    }

    pub const fn enumeration(name: &'static str, values: &'static [&'static str]) -> Self {
        Self {
            name,
            domain: Domain::Enum(values),
        }
    }
}

/// Typed view over a [`Property`].
pub trait TypedProperty {
    type Value: Copy;

    fn property(&self) -> Property;
    fn encode(&self, value: Self::Value) -> Value;
    fn decode(&self, value: Value) -> Option<Self::Value>;

    fn name(&self) -> &'static str {
        self.property().name
    }
}

impl TypedProperty for Property {
    type Value = Value;

    fn property(&self) -> Property {
        *self
    }
    fn encode(&self, value: Value) -> Value {
        value
    }
    fn decode(&self, value: Value) -> Option<Value> {
        Some(value)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BoolProperty(pub &'static str);

impl TypedProperty for BoolProperty {
    type Value = bool;

    fn property(&self) -> Property {
        Property::boolean(self.0)
    }
    fn encode(&self, value: bool) -> Value {
        Value::Bool(value)
    }
    fn decode(&self, value: Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct IntProperty {
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
}

impl IntProperty {
    pub const fn new(name: &'static str, min: i32, max: i32) -> Self {
        Self { name, min, max }
    }
}

impl TypedProperty for IntProperty {
    type Value = i32;

    fn property(&self) -> Property {
        Property::int(self.name, self.min, self.max)
    }
    fn encode(&self, value: i32) -> Value {
        Value::Int(value)
    }
    fn decode(&self, value: Value) -> Option<i32> {
        match value {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }
}

/// Rust enums usable as property values.
pub trait PropertyEnum: Copy + Eq + 'static {
    const VALUES: &'static [Self];
    const NAMES: &'static [&'static str];

    fn name(self) -> &'static str {
        let i = Self::VALUES.iter().position(|v| *v == self).unwrap_or(0);
        Self::NAMES[i]
    }

    fn from_name(name: &str) -> Option<Self> {
        let i = Self::NAMES.iter().position(|n| *n == name)?;
        Self::VALUES.get(i).copied()
    }
}

/// Enum-valued property. The domain may be a subset of the enum's names,
/// e.g. a horizontal-only facing.
#[derive(Debug)]
pub struct EnumProperty<E> {
    pub name: &'static str,
    pub names: &'static [&'static str],
    _marker: PhantomData<E>,
}

impl<E: PropertyEnum> EnumProperty<E> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            names: E::NAMES,
            _marker: PhantomData,
        }
    }

    pub const fn with_names(name: &'static str, names: &'static [&'static str]) -> Self {
        Self {
            name,
            names,
            _marker: PhantomData,
        }
    }
}

impl<E> Clone for EnumProperty<E> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<E> Copy for EnumProperty<E> {}

impl<E: PropertyEnum> TypedProperty for EnumProperty<E> {
    type Value = E;

    fn property(&self) -> Property {
        Property::enumeration(self.name, self.names)
    }
    fn encode(&self, value: E) -> Value {
        Value::Enum(value.name())
    }
    fn decode(&self, value: Value) -> Option<E> {
        match value {
            Value::Enum(s) => E::from_name(s),
            _ => None,
        }
    }
}

impl PropertyEnum for Direction {
    const VALUES: &'static [Self] = &Direction::ALL;
    const NAMES: &'static [&'static str] = &["down", "up", "north", "south", "west", "east"];
}

impl PropertyEnum for Axis {
    const VALUES: &'static [Self] = &Axis::ALL;
    const NAMES: &'static [&'static str] = &["x", "y", "z"];
}

/// Commonly shared property declarations.
pub mod props {
    use super::*;

    pub const HORIZONTAL_FACING: EnumProperty<Direction> =
        EnumProperty::with_names("facing", &["north", "south", "west", "east"]);
    pub const AXIS: EnumProperty<Axis> = EnumProperty::new("axis");
    pub const HORIZONTAL_AXIS: EnumProperty<Axis> = EnumProperty::with_names("axis", &["x", "z"]);
    pub const WATERLOGGED: BoolProperty = BoolProperty("waterlogged");
    pub const LIT: BoolProperty = BoolProperty("lit");
    pub const POWERED: BoolProperty = BoolProperty("powered");
    pub const HANGING: BoolProperty = BoolProperty("hanging");
    pub const LEVEL: IntProperty = IntProperty::new("level", 0, 15);
    pub const AGE_25: IntProperty = IntProperty::new("age", 0, 25);

    pub const DOWN: BoolProperty = BoolProperty("down");
    pub const UP: BoolProperty = BoolProperty("up");
    pub const NORTH: BoolProperty = BoolProperty("north");
    pub const SOUTH: BoolProperty = BoolProperty("south");
    pub const WEST: BoolProperty = BoolProperty("west");
    pub const EAST: BoolProperty = BoolProperty("east");

    /// Face flag for a direction, as used by multiface and bars shapes.
    pub fn face(dir: Direction) -> BoolProperty {
        match dir {
            Direction::Down => DOWN,
            Direction::Up => UP,
            Direction::North => NORTH,
            Direction::South => SOUTH,
            Direction::West => WEST,
            Direction::East => EAST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_domain_indexing() {
        let d = Domain::Int { min: -2, max: 3 };
        assert_eq!(d.len(), 6);
        assert_eq!(d.index_of(Value::Int(-2)), Some(0));
        assert_eq!(d.index_of(Value::Int(3)), Some(5));
        assert_eq!(d.index_of(Value::Int(4)), None);
        assert_eq!(d.value_at(5), Some(Value::Int(3)));
        assert_eq!(d.index_of(Value::Bool(true)), None);
    }

    #[test]
    fn parse_respects_domain() {
        assert_eq!(Domain::Bool.parse("true"), Some(Value::Bool(true)));
        assert_eq!(Domain::Int { min: 0, max: 3 }.parse("7"), None);
        let facing = props::HORIZONTAL_FACING.property().domain;
        assert_eq!(facing.parse("east"), Some(Value::Enum("east")));
        assert_eq!(facing.parse("up"), None);
    }

    #[test]
    fn enum_property_decodes_subset_names() {
        let v = props::HORIZONTAL_FACING.encode(Direction::West);
        assert_eq!(props::HORIZONTAL_FACING.decode(v), Some(Direction::West));
        assert_eq!(Direction::from_name("down"), Some(Direction::Down));
    }
}
