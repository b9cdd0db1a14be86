//! Grid positions and directions shared by the block crates.
#![forbid(unsafe_code)]

use core::fmt;
use core::ops::{Add, Sub};

/// Integer cell coordinate in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn relative(self, dir: Direction) -> BlockPos {
        self.relative_n(dir, 1)
    }

    #[inline]
    pub fn relative_n(self, dir: Direction, n: i32) -> BlockPos {
        let (dx, dy, dz) = dir.offset();
        BlockPos::new(
            self.x.wrapping_add(dx.wrapping_mul(n)),
            self.y.wrapping_add(dy.wrapping_mul(n)),
            self.z.wrapping_add(dz.wrapping_mul(n)),
        )
    }

    #[inline]
    pub fn above(self) -> BlockPos {
        self.relative(Direction::Up)
    }

    #[inline]
    pub fn below(self) -> BlockPos {
        self.relative(Direction::Down)
    }

    /// Direction from `self` to an orthogonally adjacent `other`, if any.
    pub fn direction_to(self, other: BlockPos) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&d| self.relative(d) == other)
    }
}

impl Add for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn add(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(
            self.x.wrapping_add(rhs.x),
            self.y.wrapping_add(rhs.y),
            self.z.wrapping_add(rhs.z),
        )
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn sub(self, rhs: BlockPos) -> BlockPos {
        BlockPos::new(
            self.x.wrapping_sub(rhs.x),
            self.y.wrapping_sub(rhs.y),
            self.z.wrapping_sub(rhs.z),
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    pub fn from_name(s: &str) -> Option<Axis> {
        Axis::ALL.into_iter().find(|a| a.name() == s)
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Axis::Y)
    }
}

/// One of the six face directions. Declaration order is the canonical
/// enumeration order used throughout the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset; north is -Z, east is +X.
    #[inline]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// Rotate a quarter turn clockwise around Y, seen from above.
    /// Vertical directions are returned unchanged.
    pub const fn clockwise(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            d => d,
        }
    }

    pub const fn counter_clockwise(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
            d => d,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }

    pub fn from_name(s: &str) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.name() == s)
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn direction_to_inverts_relative(p in any::<BlockPos>(), d in any::<Direction>()) {
            prop_assume!(p.x.abs() < 1_000_000 && p.y.abs() < 1_000_000 && p.z.abs() < 1_000_000);
            prop_assert_eq!(p.direction_to(p.relative(d)), Some(d));
        }

        // Arithmetic wraps at the edge of the coordinate range instead of panicking
        #[test]
        fn offsets_wrap_at_extremes(p in any::<BlockPos>(), d in any::<Direction>(), n in any::<i32>()) {
            let far = p.relative_n(d, n);
            prop_assert_eq!(far.relative_n(d, n.wrapping_neg()), p);
            prop_assert_eq!((p + far) - far, p);
        }

        #[test]
        fn axis_name_roundtrip(a in any::<Axis>()) {
            prop_assert_eq!(Axis::from_name(a.name()), Some(a));
        }
    }
}
