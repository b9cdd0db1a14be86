//! In-memory world: block states, attachments and an effect journal.
#![forbid(unsafe_code)]

use std::collections::{BTreeSet, HashMap};

use lode_blocks::Catalog;
use lode_blocks::types::BlockState;
use lode_blocks::world::{Attachment, ParticleId, SoundId, World};
use lode_geom::BlockPos;
use rand::RngCore;

pub const CHUNK_SIZE: i32 = 16;

type ChunkKey = (i32, i32, i32);

#[derive(Default, Debug, Clone, Copy)]
pub struct WorldStats {
    pub chunk_entries: usize,
    pub block_entries: usize,
    pub attachments: usize,
    pub scheduled_ticks: usize,
}

/// Effects emitted by block behaviors, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    Sound(BlockPos, SoundId),
    Particle(BlockPos, ParticleId),
}

/// Chunk-keyed map of non-air states. Unset positions read as air.
#[derive(Default)]
pub struct MemoryWorld {
    chunks: HashMap<ChunkKey, HashMap<BlockPos, BlockState>>,
    attachments: HashMap<BlockPos, Attachment>,
    scheduled: BTreeSet<BlockPos>,
    events: Vec<WorldEvent>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn chunk_key(pos: BlockPos) -> ChunkKey {
        (
            pos.x.div_euclid(CHUNK_SIZE),
            pos.y.div_euclid(CHUNK_SIZE),
            pos.z.div_euclid(CHUNK_SIZE),
        )
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            chunk_entries: self.chunks.len(),
            block_entries: self.chunks.values().map(|m| m.len()).sum(),
            attachments: self.attachments.len(),
            scheduled_ticks: self.scheduled.len(),
        }
    }

    pub fn is_scheduled(&self, pos: BlockPos) -> bool {
        self.scheduled.contains(&pos)
    }

    pub fn scheduled(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.scheduled.iter().copied()
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// One random tick for every scheduled position, in position order.
    /// Positions whose block no longer wants ticks are unscheduled.
    /// Returns the number of ticks delivered.
    pub fn random_tick_pass(&mut self, catalog: &Catalog, rng: &mut dyn RngCore) -> usize {
        let due: Vec<BlockPos> = self.scheduled.iter().copied().collect();
        let mut delivered = 0;
        for pos in due {
            let state = self.read_state(pos);
            if !catalog.is_randomly_ticking(state) {
                self.scheduled.remove(&pos);
                continue;
            }
            catalog.random_tick(self, rng, pos);
            delivered += 1;
        }
        log::trace!(target: "world", "random tick pass: {delivered} delivered");
        delivered
    }

    /// Run the ticker of every attachment whose block provides one.
    pub fn tick_attachments(&mut self, catalog: &Catalog) -> usize {
        let mut live: Vec<BlockPos> = self.attachments.keys().copied().collect();
        live.sort();
        let mut ran = 0;
        for pos in live {
            let state = self.read_state(pos);
            let Some(kind) = self.attachments.get(&pos).map(|a| a.kind) else {
                continue;
            };
            let ticker = catalog
                .block(state)
                .and_then(|ty| ty.entity_container().ok())
                .and_then(|ec| ec.ticker_for(state, kind));
            if let Some(tick) = ticker {
                tick(catalog, self, pos, state);
                ran += 1;
            }
        }
        ran
    }
}

impl World for MemoryWorld {
    fn read_state(&self, pos: BlockPos) -> BlockState {
        self.chunks
            .get(&Self::chunk_key(pos))
            .and_then(|m| m.get(&pos).copied())
            .unwrap_or(BlockState::AIR)
    }

    fn write_state(&mut self, pos: BlockPos, state: BlockState) {
        let key = Self::chunk_key(pos);
        if state.is_air() {
            if let Some(m) = self.chunks.get_mut(&key) {
                m.remove(&pos);
                if m.is_empty() {
                    self.chunks.remove(&key);
                }
            }
            self.scheduled.remove(&pos);
            return;
        }
        self.chunks.entry(key).or_default().insert(pos, state);
    }

    fn read_attachment(&self, pos: BlockPos) -> Option<&Attachment> {
        self.attachments.get(&pos)
    }

    fn read_attachment_mut(&mut self, pos: BlockPos) -> Option<&mut Attachment> {
        self.attachments.get_mut(&pos)
    }

    fn write_attachment(&mut self, pos: BlockPos, attachment: Option<Attachment>) {
        match attachment {
            Some(a) => {
                self.attachments.insert(pos, a);
            }
            None => {
                self.attachments.remove(&pos);
            }
        }
    }

    fn schedule_random_tick(&mut self, pos: BlockPos) {
        self.scheduled.insert(pos);
    }

    fn emit_sound(&mut self, pos: BlockPos, sound: SoundId) {
        self.events.push(WorldEvent::Sound(pos, sound));
    }

    fn emit_particle(&mut self, pos: BlockPos, particle: ParticleId) {
        self.events.push(WorldEvent::Particle(pos, particle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lode_blocks::types::BlockId;

    #[test]
    fn unset_reads_air_and_air_writes_clear() {
        let mut w = MemoryWorld::new();
        let p = BlockPos::new(-1, 5, 17);
        assert_eq!(w.read_state(p), BlockState::AIR);
        w.write_state(p, BlockState::new(BlockId(3), 0));
        assert_eq!(w.stats().block_entries, 1);
        assert_eq!(w.stats().chunk_entries, 1);
        w.write_state(p, BlockState::AIR);
        assert_eq!(w.stats().chunk_entries, 0);
    }
}
