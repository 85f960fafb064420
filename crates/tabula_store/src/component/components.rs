#![allow(clippy::len_without_is_empty, reason = "internal type")]

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt::Debug;

use log::warn;
use tabula_utils::hash::{FixedHashState, HashMap};

use super::{Component, ComponentDescriptor, ComponentId, ComponentInfo, RegisterError};

// -----------------------------------------------------------------------------
// Components

/// The component layout registry.
///
/// Maps a [`ComponentId`] to the size, alignment and hooks its columns are
/// built with. Rust types are also indexed by [`TypeId`], and every
/// component by name so that type strings can be resolved.
pub struct Components {
    infos: Vec<ComponentInfo>,
    mapper: HashMap<TypeId, ComponentId>,
    names: HashMap<Box<str>, ComponentId>,
}

impl Debug for Components {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.infos, f)
    }
}

impl Default for Components {
    fn default() -> Self {
        Self::new()
    }
}

impl Components {
    /// Creates a new empty component registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            infos: Vec::new(),
            mapper: HashMap::with_hasher(FixedHashState),
            names: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Returns the number of registered components.
    #[inline]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Iterates registered components in id order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ComponentInfo> {
        self.infos.iter()
    }

    /// Looks up a component ID by its [`TypeId`].
    #[inline]
    pub fn get_id(&self, type_id: TypeId) -> Option<ComponentId> {
        self.mapper.get(&type_id).copied()
    }

    /// Looks up a component ID by the name it was registered under.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<ComponentId> {
        self.names.get(name).copied()
    }

    /// Returns the component info for the given ID.
    #[inline]
    pub fn get(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.infos.get(id.index())
    }

    /// Returns the component info for the given ID without bounds checking.
    ///
    /// # Safety
    /// The caller must ensure `id` was produced by this registry.
    #[inline]
    pub unsafe fn get_unchecked(&self, id: ComponentId) -> &ComponentInfo {
        debug_assert!(id.index() < self.infos.len());
        unsafe { self.infos.get_unchecked(id.index()) }
    }

    /// Registers a component type `T` and returns its unique ID.
    ///
    /// Registering the same type again returns the existing ID. If another
    /// component already uses `T`'s short name, `T` stays reachable through
    /// its [`TypeId`] but not by name.
    #[inline]
    pub fn register<T: Component>(&mut self) -> ComponentId {
        #[cold]
        #[inline(never)]
        fn register_internal<T: Component>(this: &mut Components) -> ComponentId {
            let descriptor = ComponentDescriptor::new::<T>();
            let id = this.push(descriptor);
            this.mapper.insert(TypeId::of::<T>(), id);
            id
        }

        if let Some(id) = self.get_id(TypeId::of::<T>()) {
            id
        } else {
            register_internal::<T>(self)
        }
    }

    /// Registers a component from a descriptor.
    ///
    /// Unlike [`register`](Self::register), the name is the only identity
    /// a raw component has, so a duplicate name is an error. Nothing is
    /// registered on failure.
    pub fn register_raw(
        &mut self,
        descriptor: ComponentDescriptor,
    ) -> Result<ComponentId, RegisterError> {
        let name = descriptor.name();
        if name.trim().is_empty() {
            return Err(RegisterError::EmptyName);
        }
        if self.names.contains_key(name) {
            return Err(RegisterError::DuplicateName(name.to_string()));
        }

        let type_id = descriptor.type_id();
        let id = self.push(descriptor);
        if let Some(type_id) = type_id {
            self.mapper.entry(type_id).or_insert(id);
        }
        Ok(id)
    }

    fn push(&mut self, descriptor: ComponentDescriptor) -> ComponentId {
        let id = ComponentId::new(self.infos.len() as u32);
        let name: Box<str> = descriptor.name().into();

        if let Some(previous) = self.names.get(&name) {
            warn!(
                "component `{name}` ({id}) shares its name with component {previous}, \
                 only the first is found by name",
            );
        } else {
            self.names.insert(name, id);
        }

        self.infos.push(ComponentInfo::new(id, descriptor));
        id
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::alloc::Layout;

    use super::Components;
    use crate::component::{Component, ComponentDescriptor, ComponentHooks, RegisterError};

    struct Position {
        _x: f32,
        _y: f32,
    }
    unsafe impl Component for Position {}

    #[derive(Default)]
    struct Label(String);
    unsafe impl Component for Label {
        const HOOKS: ComponentHooks = ComponentHooks::of::<Self>().with_default::<Self>();
    }

    mod shadow {
        pub struct Position;
        unsafe impl crate::component::Component for Position {}
    }

    #[test]
    fn register_is_idempotent() {
        let mut components = Components::new();
        let a = components.register::<Position>();
        let b = components.register::<Label>();
        assert_ne!(a, b);
        assert_eq!(components.register::<Position>(), a);
        assert_eq!(components.len(), 2);

        let info = components.get(b).unwrap();
        assert_eq!(info.name(), "Label");
        assert_eq!(info.layout(), Layout::new::<Label>());
        assert!(info.hooks().constructor.is_some());
        assert!(info.hooks().dropper.is_some());
    }

    #[test]
    fn lookup_by_short_name() {
        let mut components = Components::new();
        let pos = components.register::<Position>();
        let shadowed = components.register::<shadow::Position>();

        assert_ne!(pos, shadowed);
        assert_eq!(components.lookup("Position"), Some(pos));
        assert_eq!(components.lookup("Missing"), None);
    }

    #[test]
    fn raw_duplicate_name_rejected() {
        let mut components = Components::new();
        components.register::<Position>();

        let layout = Layout::new::<[u8; 3]>();
        let raw =
            unsafe { ComponentDescriptor::new_raw("Position", layout, ComponentHooks::EMPTY) };
        assert_eq!(
            components.register_raw(raw),
            Err(RegisterError::DuplicateName("Position".into()))
        );
        assert_eq!(components.len(), 1);

        let raw = unsafe { ComponentDescriptor::new_raw("Rgb", layout, ComponentHooks::EMPTY) };
        let id = components.register_raw(raw).unwrap();
        assert_eq!(components.lookup("Rgb"), Some(id));
        assert_eq!(components.get(id).unwrap().type_id(), None);

        let raw = unsafe { ComponentDescriptor::new_raw("  ", layout, ComponentHooks::EMPTY) };
        assert_eq!(components.register_raw(raw), Err(RegisterError::EmptyName));
    }
}
