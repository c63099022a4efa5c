//! # Entity Registry
//!
//! Slot storage that hands out generational `EntityId`s.
//!
//! Despawning a slot bumps nothing; the generation is bumped on the next
//! spawn into that slot, so every handle issued before the reuse stops
//! resolving. This is what makes cached references safe to hold across ticks.

use super::entity::EntityId;

/// A single slot in the registry.
#[derive(Clone, Debug)]
struct Slot<T> {
    /// Current generation of this slot.
    generation: u32,
    /// Occupant, if alive.
    value: Option<T>,
}

/// Generational slot storage for entities of type `T`.
///
/// # Example
///
/// ```rust
/// use spirit_core::EntityRegistry;
///
/// let mut players = EntityRegistry::new();
/// let alice = players.spawn(10_u32);
/// assert_eq!(players.get(alice), Some(&10));
/// ```
#[derive(Clone, Debug)]
pub struct EntityRegistry<T> {
    /// All slots, alive or free.
    slots: Vec<Slot<T>>,
    /// Free list of slot indices for reuse.
    free_indices: Vec<u32>,
    /// Number of currently alive entities.
    alive_count: usize,
}

impl<T> EntityRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_indices: Vec::new(),
            alive_count: 0,
        }
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.alive_count
    }

    /// Returns true if no entity is alive.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    /// Spawns a new entity, returning its ID.
    ///
    /// Reuses a free slot when one exists, bumping its generation so that
    /// older handles to the slot no longer resolve.
    pub fn spawn(&mut self, value: T) -> EntityId {
        self.spawn_with(|_| value)
    }

    /// Spawns an entity built from its own ID.
    ///
    /// For entities that need to know their handle (to tag outgoing
    /// packets, for instance) at construction time.
    pub fn spawn_with(&mut self, make: impl FnOnce(EntityId) -> T) -> EntityId {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            let id = EntityId::new(index, slot.generation);
            slot.value = Some(make(id));
            return id;
        }

        let id = EntityId::new(self.slots.len() as u32, 0);
        self.slots.push(Slot {
            generation: 0,
            value: Some(make(id)),
        });
        id
    }

    /// Despawns an entity, freeing its slot for reuse.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the ID was null, stale or already dead.
    pub fn despawn(&mut self, id: EntityId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        let value = slot.value.take()?;

        self.alive_count -= 1;
        self.free_indices.push(id.index());
        Some(value)
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Gets an entity by ID.
    ///
    /// Returns `None` if not found, dead or stale.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        if id.is_null() {
            return None;
        }
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    /// Gets a mutable entity by ID.
    ///
    /// Returns `None` if not found, dead or stale.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slot_mut(id)?.value.as_mut()
    }

    /// Iterates over all alive entities with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (EntityId::new(index as u32, slot.generation), value))
        })
    }

    /// Iterates mutably over all alive entities with their IDs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (EntityId::new(index as u32, generation), value))
        })
    }

    /// Returns the IDs of all alive entities.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Slot<T>> {
        if id.is_null() {
            return None;
        }
        let slot = self.slots.get_mut(id.index() as usize)?;
        (slot.generation == id.generation()).then_some(slot)
    }
}

impl<T> Default for EntityRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
