use core::cmp::Ordering;
use core::fmt::{Debug, Display};
use core::hash::Hash;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// EntityId

/// The index part of an [`Entity`].
///
/// Zero is reserved: it is the "no entity" value of the insert contract,
/// expressed in Rust as `Option<Entity>::None`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(NonZeroU32);

impl EntityId {
    /// Returns `None` for the reserved id `0`.
    #[inline(always)]
    pub const fn new(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[inline(always)]
    pub const fn index_u32(self) -> u32 {
        self.0.get()
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0.get() as usize
    }
}

impl Debug for EntityId {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.index_u32(), f)
    }
}

impl Display for EntityId {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.index_u32(), f)
    }
}

// -----------------------------------------------------------------------------
// EntityGeneration

/// How many times an [`EntityId`] has been recycled.
///
/// Compared with wrapping arithmetic, so a generation that overflowed is
/// still considered newer than the one before it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityGeneration(u32);

impl EntityGeneration {
    pub const FIRST: Self = Self(0);

    const DIFF_MAX: u32 = 1u32 << 31;

    #[inline(always)]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the next generation and whether it wrapped around.
    #[inline]
    pub const fn checked_next(self) -> (Self, bool) {
        let (next, wrapped) = self.0.overflowing_add(1);
        (Self(next), wrapped)
    }
}

impl PartialOrd for EntityGeneration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl Ord for EntityGeneration {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.0.wrapping_sub(other.0) {
            0 => Ordering::Equal,
            1..Self::DIFF_MAX => Ordering::Greater,
            _ => Ordering::Less,
        }
    }
}

impl Debug for EntityGeneration {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for EntityGeneration {
    #[inline(always)]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Entity

/// A handle to an entity: an [`EntityId`] plus the generation it was
/// allocated with.
///
/// Serialized as its `u64` bit pattern: the id in the low 32 bits, the
/// generation in the high 32 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: EntityId,
    generation: EntityGeneration,
}

impl Entity {
    #[inline(always)]
    pub const fn new(id: EntityId, generation: EntityGeneration) -> Entity {
        Self { id, generation }
    }

    #[inline(always)]
    pub const fn from_id(id: EntityId) -> Entity {
        Self {
            id,
            generation: EntityGeneration::FIRST,
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self.id.index()
    }

    #[inline(always)]
    pub const fn id(self) -> EntityId {
        self.id
    }

    #[inline(always)]
    pub const fn generation(self) -> EntityGeneration {
        self.generation
    }

    #[inline(always)]
    pub const fn to_bits(self) -> u64 {
        ((self.generation.0 as u64) << 32) | self.id.index_u32() as u64
    }

    /// Returns `None` if the id part of `bits` is zero.
    #[inline]
    pub const fn try_from_bits(bits: u64) -> Option<Self> {
        match EntityId::new(bits as u32) {
            Some(id) => Some(Self {
                id,
                generation: EntityGeneration((bits >> 32) as u32),
            }),
            None => None,
        }
    }

    /// # Panics
    /// Panics if the id part of `bits` is zero.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        match Self::try_from_bits(bits) {
            Some(entity) => entity,
            None => panic!("entity bits have a zero id"),
        }
    }
}

impl PartialOrd for Entity {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_bits().cmp(&other.to_bits())
    }
}

impl Debug for Entity {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(&alloc::format!("{}v{}", self.id, self.generation))
    }
}

impl Serialize for Entity {
    #[inline(always)]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.to_bits())
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let bits: u64 = Deserialize::deserialize(deserializer)?;
        Entity::try_from_bits(bits)
            .ok_or_else(|| Error::custom("Attempting to deserialize an invalid entity."))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Entity, EntityGeneration};

    #[test]
    fn entity_is_u64() {
        assert_eq!(
            Entity::from_bits(123456789012_u64).to_bits(),
            123456789012_u64
        );
        assert!(Entity::try_from_bits(7_u64 << 32).is_none());
    }

    #[test]
    fn generation_order_survives_wrap() {
        let last = EntityGeneration::from_bits(u32::MAX);
        let (next, wrapped) = last.checked_next();
        assert!(wrapped);
        assert!(next > last);
        let (next, _) = EntityGeneration::FIRST.checked_next();
        assert!(next > EntityGeneration::FIRST);
    }

    #[test]
    fn serde_as_bits() {
        let entity = Entity::from_bits((3_u64 << 32) | 9);
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, ((3_u64 << 32) | 9).to_string());
        assert_eq!(serde_json::from_str::<Entity>(&json).unwrap(), entity);
        assert!(serde_json::from_str::<Entity>("4294967296").is_err());
        assert_eq!(alloc::format!("{entity}"), "9v3");
    }
}
