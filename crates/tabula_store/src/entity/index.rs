#![allow(clippy::len_without_is_empty, reason = "internal type")]

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ptr::NonNull;

use log::warn;

use super::{Entity, EntityError, EntityGeneration, EntityId, Record};

// -----------------------------------------------------------------------------
// Slot

const PAGE_BITS: usize = 8;
const PAGE_SIZE: usize = 1 << PAGE_BITS;
const PAGE_MASK: usize = PAGE_SIZE - 1;

#[derive(Clone, Copy)]
struct Slot {
    generation: EntityGeneration,
    alive: bool,
    record: Option<Record>,
}

impl Slot {
    const VACANT: Self = Self {
        generation: EntityGeneration::FIRST,
        alive: false,
        record: None,
    };
}

type Page = Box<[Slot; PAGE_SIZE]>;

// -----------------------------------------------------------------------------
// Entities

/// The entity index: maps every entity id to its [`Record`].
///
/// Slots live in fixed-size pages that are never reallocated, so the address
/// of a record returned by [`find_ptr`](Entities::find_ptr) stays valid for
/// as long as the entity is alive, even while the index grows.
///
/// Freed ids are recycled with a bumped generation, so stale handles are
/// detected instead of aliasing the new occupant.
pub struct Entities {
    pages: Vec<Page>,
    /// One past the highest id ever handed out. Id `0` is reserved.
    next: u32,
    free: Vec<EntityId>,
    alive: usize,
}

impl Debug for Entities {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entities")
            .field("alive", &self.alive)
            .field("allocated", &(self.next - 1))
            .field("free", &self.free.len())
            .finish()
    }
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}

impl Entities {
    /// Creates an empty index.
    #[inline]
    pub const fn new() -> Self {
        Self {
            pages: Vec::new(),
            next: 1,
            free: Vec::new(),
            alive: 0,
        }
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.alive
    }

    #[inline(always)]
    fn slot(&self, id: EntityId) -> Option<&Slot> {
        let index = id.index();
        self.pages
            .get(index >> PAGE_BITS)
            .map(|page| &page[index & PAGE_MASK])
    }

    #[inline(always)]
    fn slot_mut(&mut self, id: EntityId) -> Option<&mut Slot> {
        let index = id.index();
        self.pages
            .get_mut(index >> PAGE_BITS)
            .map(|page| &mut page[index & PAGE_MASK])
    }

    /// Resolves `entity` to its live slot.
    fn live_slot_mut(&mut self, entity: Entity) -> Result<&mut Slot, EntityError> {
        let id = entity.id();
        let slot = self.slot_mut(id).ok_or(EntityError::NotFound(id))?;
        if !slot.alive {
            return Err(EntityError::NotAlive(entity));
        }
        if slot.generation != entity.generation() {
            return Err(EntityError::Mismatch {
                expect: Entity::new(id, slot.generation),
                actual: entity,
            });
        }
        Ok(slot)
    }

    /// Allocates a live entity that is not yet stored in any table.
    pub fn alloc(&mut self) -> Entity {
        self.alive += 1;

        if let Some(id) = self.free.pop() {
            let index = id.index();
            let slot = &mut self.pages[index >> PAGE_BITS][index & PAGE_MASK];
            slot.alive = true;
            return Entity::new(id, slot.generation);
        }

        let id = match (EntityId::new(self.next), self.next.checked_add(1)) {
            (Some(id), Some(next)) => {
                self.next = next;
                id
            }
            _ => panic!("too many entities"),
        };

        let index = id.index();
        if index >> PAGE_BITS == self.pages.len() {
            self.pages.push(Box::new([Slot::VACANT; PAGE_SIZE]));
        }
        self.pages[index >> PAGE_BITS][index & PAGE_MASK].alive = true;
        Entity::from_id(id)
    }

    /// Returns `true` if `entity` was allocated and not freed since.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slot(entity.id())
            .is_some_and(|slot| slot.alive && slot.generation == entity.generation())
    }

    /// Frees a live entity and returns the record it was stored at.
    ///
    /// The caller is responsible for removing the row the record points to.
    pub fn free(&mut self, entity: Entity) -> Result<Option<Record>, EntityError> {
        let slot = self.live_slot_mut(entity)?;

        let record = slot.record.take();
        slot.alive = false;
        let (next, wrapped) = slot.generation.checked_next();
        slot.generation = next;
        if wrapped {
            warn!(
                "generation of entity id {} wrapped around, stale handles may alias it",
                entity.id()
            );
        }

        self.free.push(entity.id());
        self.alive -= 1;
        Ok(record)
    }

    /// Returns the record of a live entity, or `None` if it is not alive or
    /// not stored in any table.
    #[inline]
    pub fn find(&self, entity: Entity) -> Option<Record> {
        let slot = self.slot(entity.id())?;
        if slot.alive && slot.generation == entity.generation() {
            slot.record
        } else {
            None
        }
    }

    /// Like [`find`](Self::find), but reports why the lookup failed.
    pub fn locate(&self, entity: Entity) -> Result<Record, EntityError> {
        let id = entity.id();
        let slot = self.slot(id).ok_or(EntityError::NotFound(id))?;
        if !slot.alive {
            return Err(EntityError::NotAlive(entity));
        }
        if slot.generation != entity.generation() {
            return Err(EntityError::Mismatch {
                expect: Entity::new(id, slot.generation),
                actual: entity,
            });
        }
        slot.record.ok_or(EntityError::NotPlaced(entity))
    }

    /// Returns a stable pointer to the record of a live, placed entity.
    ///
    /// The pointer stays valid until the entity is freed. The record behind
    /// it is rewritten in place when the entity's row moves, so reading it
    /// always yields the current location. Writing through it bypasses the
    /// consistency the index maintains.
    pub fn find_ptr(&mut self, entity: Entity) -> Option<NonNull<Record>> {
        let slot = self.live_slot_mut(entity).ok()?;
        slot.record.as_mut().map(NonNull::from)
    }

    /// Sets or clears the record of a live entity.
    pub fn set(&mut self, entity: Entity, record: Option<Record>) -> Result<(), EntityError> {
        self.live_slot_mut(entity)?.record = record;
        Ok(())
    }

    /// Sets the record of an entity the caller knows to be alive.
    ///
    /// Used for entities read back out of a table, which are alive by
    /// construction.
    #[inline]
    pub(crate) fn update(&mut self, entity: Entity, record: Option<Record>) {
        let result = self.set(entity, record);
        debug_assert!(
            result.is_ok(),
            "table row references a stale entity: {result:?}"
        );
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{Entities, PAGE_SIZE};
    use crate::entity::{EntityError, Record};
    use crate::storage::{TableId, TableRow};

    #[test]
    fn ids_are_recycled_with_new_generation() {
        let mut entities = Entities::new();
        let a = entities.alloc();
        let b = entities.alloc();
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 2);

        assert_eq!(entities.free(a), Ok(None));
        assert!(!entities.is_alive(a));
        assert_eq!(entities.free(a), Err(EntityError::NotAlive(a)));

        let c = entities.alloc();
        assert_eq!(c.id(), a.id());
        assert!(c.generation() > a.generation());
        assert!(entities.is_alive(c));
        assert!(!entities.is_alive(a));
        assert_eq!(entities.len(), 2);

        assert!(matches!(
            entities.set(a, None),
            Err(EntityError::Mismatch { expect, actual }) if expect == c && actual == a
        ));
    }

    #[test]
    fn record_lookup() {
        let mut entities = Entities::new();
        let e = entities.alloc();
        assert_eq!(entities.find(e), None);
        assert_eq!(entities.locate(e), Err(EntityError::NotPlaced(e)));

        let record = Record::new(TableId::EMPTY, TableRow(3));
        entities.set(e, Some(record)).unwrap();
        assert_eq!(entities.find(e), Some(record));
        assert_eq!(entities.locate(e), Ok(record));

        assert_eq!(entities.free(e), Ok(Some(record)));
        assert_eq!(entities.find(e), None);
    }

    #[test]
    fn record_address_is_stable_across_growth() {
        let mut entities = Entities::new();
        let first = entities.alloc();
        entities
            .set(first, Some(Record::new(TableId::EMPTY, TableRow(0))))
            .unwrap();
        let ptr = entities.find_ptr(first).unwrap();

        let others: Vec<_> = (0..PAGE_SIZE * 4).map(|_| entities.alloc()).collect();
        assert_eq!(others.last().unwrap().index(), PAGE_SIZE * 4 + 1);

        entities
            .set(first, Some(Record::new(TableId::EMPTY, TableRow(9))))
            .unwrap();
        assert_eq!(entities.find_ptr(first), Some(ptr));
        assert_eq!(unsafe { ptr.read() }.row, TableRow(9));
    }
}
