//! Interface to the external world: storage, attachments, effects.
//!
//! The block engine never owns positions. It reads and writes through [`World`],
//! which the host (or `lode-world` in tests) implements.

use std::any::Any;
use std::fmt;

use lode_geom::BlockPos;

use crate::types::BlockState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundId(pub &'static str);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticleId(pub &'static str);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Overworld,
    Nether,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player { creative: bool },
    Mob,
    Item,
}

/// What the block engine needs to know about an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub dimension: Dimension,
    pub pos: BlockPos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    FallingBlock,
    Anvil,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fluid {
    Water,
    Lava,
}

impl Fluid {
    pub const NAMES: &'static [&'static str] = &["water", "lava"];

    pub fn name(self) -> &'static str {
        match self {
            Fluid::Water => "water",
            Fluid::Lava => "lava",
        }
    }

    pub fn from_name(s: &str) -> Option<Fluid> {
        match s {
            "water" => Some(Fluid::Water),
            "lava" => Some(Fluid::Lava),
            _ => None,
        }
    }
}

/// Result of picking a block up with a bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemPayload {
    Empty,
    FilledBucket(Fluid),
}

/// A falling-block entity as reported by the physics collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FallingBlock {
    pub state: BlockState,
    pub silent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttachmentKind(pub &'static str);

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Mutable per-position data owned by a block, beyond what fits in its state.
pub struct Attachment {
    pub kind: AttachmentKind,
    pub pos: BlockPos,
    data: Box<dyn Any + Send + Sync>,
}

impl Attachment {
    pub fn new<T: Any + Send + Sync>(kind: AttachmentKind, pos: BlockPos, data: T) -> Self {
        Self {
            kind,
            pos,
            data: Box::new(data),
        }
    }

    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref()
    }

    pub fn data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.downcast_mut()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("kind", &self.kind)
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}

/// World storage and effect sinks consumed by block behaviors.
pub trait World {
    /// State at `pos`; unset positions read as air.
    fn read_state(&self, pos: BlockPos) -> BlockState;
    fn write_state(&mut self, pos: BlockPos, state: BlockState);

    fn read_attachment(&self, pos: BlockPos) -> Option<&Attachment>;
    fn read_attachment_mut(&mut self, pos: BlockPos) -> Option<&mut Attachment>;
    /// Replace (or with `None`, remove) the attachment at `pos`.
    fn write_attachment(&mut self, pos: BlockPos, attachment: Option<Attachment>);

    fn schedule_random_tick(&mut self, pos: BlockPos);
    fn emit_sound(&mut self, pos: BlockPos, sound: SoundId);
    fn emit_particle(&mut self, pos: BlockPos, particle: ParticleId);
}
