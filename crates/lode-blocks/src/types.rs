use std::fmt;

/// Index of a block type in its [`Catalog`](crate::Catalog).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Debug)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air is always registered first.
    pub const AIR: BlockId = BlockId(0);
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One point in a block type's precomputed state space.
///
/// `index` addresses the owning [`StateDefinition`](crate::StateDefinition)'s
/// enumeration, so equality is exactly "same type, same assignment".
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BlockState {
    pub block: BlockId,
    pub index: u16,
}

impl BlockState {
    pub const AIR: BlockState = BlockState {
        block: BlockId::AIR,
        index: 0,
    };

    #[inline]
    pub const fn new(block: BlockId, index: u16) -> Self {
        Self { block, index }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.block == BlockId::AIR
    }
}

impl Default for BlockState {
    fn default() -> Self {
        BlockState::AIR
    }
}
