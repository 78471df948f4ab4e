//! Generational slot storage for loaded chunks.
//!
//! Chunks refer to their neighbors by [`ChunkKey`] rather than by pointer. A key
//! carries the generation of the slot it was issued for, so once a chunk is removed
//! and its slot reused, old keys stop resolving instead of aliasing the new chunk.

use std::sync::Arc;

use crate::voxels::chunk::Chunk;

/// Stable handle to a chunk slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    index: u32,
    generation: u32,
}

impl ChunkKey {
    /// Slot index.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when the key was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

struct Slot {
    generation: u32,
    chunk: Option<Arc<Chunk>>,
}

/// Slot map of chunks with a free list for reuse.
#[derive(Default)]
pub struct ChunkArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ChunkArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a chunk and returns its key.
    pub fn insert(&mut self, chunk: Arc<Chunk>) -> ChunkKey {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.chunk = Some(chunk);
            return ChunkKey {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            chunk: Some(chunk),
        });
        ChunkKey {
            index,
            generation: 0,
        }
    }

    /// Resolves a key, or `None` if the chunk it named has been removed.
    pub fn get(&self, key: ChunkKey) -> Option<&Arc<Chunk>> {
        self.slots
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.chunk.as_ref())
    }

    /// Removes a chunk, invalidating every outstanding copy of its key.
    pub fn remove(&mut self, key: ChunkKey) -> Option<Arc<Chunk>> {
        let slot = self.slots.get_mut(key.index as usize)?;
        if slot.generation != key.generation {
            return None;
        }
        let chunk = slot.chunk.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.len -= 1;
        Some(chunk)
    }

    /// Number of live chunks.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the arena holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over every stored chunk in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkKey, &Arc<Chunk>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.chunk.as_ref().map(|chunk| {
                (
                    ChunkKey {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    chunk,
                )
            })
        })
    }
}
