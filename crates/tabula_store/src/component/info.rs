use alloc::borrow::Cow;
use core::alloc::Layout;
use core::any::TypeId;
use core::fmt::Debug;

use super::{Component, ComponentHooks, ComponentId, HookFlags};
use crate::utils::short_type_name;

// -----------------------------------------------------------------------------
// ComponentDescriptor

/// Everything the storage needs to know about a component type.
///
/// Typed components get one from [`ComponentDescriptor::new`]. Components
/// that only exist at runtime (scripting, deserialized schemas) describe
/// themselves with [`ComponentDescriptor::new_raw`].
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    name: Cow<'static, str>,
    type_id: Option<TypeId>,
    layout: Layout,
    hooks: ComponentHooks,
}

impl ComponentDescriptor {
    /// Creates a descriptor for the Rust type `T`.
    pub fn new<T: Component>() -> Self {
        Self {
            name: Cow::Owned(short_type_name::<T>()),
            type_id: Some(TypeId::of::<T>()),
            layout: Layout::new::<T>(),
            hooks: T::HOOKS,
        }
    }

    /// Creates a descriptor for a component with no Rust type.
    ///
    /// # Safety
    /// - Every hook in `hooks` must operate on values of `layout`.
    /// - If `hooks` has no constructor, zero-filled memory must be a valid
    ///   value of the component.
    pub unsafe fn new_raw(
        name: impl Into<Cow<'static, str>>,
        layout: Layout,
        hooks: ComponentHooks,
    ) -> Self {
        Self {
            name: name.into(),
            type_id: None,
            layout,
            hooks,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn hooks(&self) -> &ComponentHooks {
        &self.hooks
    }
}

// -----------------------------------------------------------------------------
// ComponentInfo

/// Runtime information for a registered component.
///
/// Combines a unique [`ComponentId`] with its [`ComponentDescriptor`].
pub struct ComponentInfo {
    id: ComponentId,
    flags: HookFlags,
    descriptor: ComponentDescriptor,
}

impl Debug for ComponentInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("name", &self.descriptor.name)
            .field("size", &self.descriptor.layout.size())
            .field("align", &self.descriptor.layout.align())
            .field("hooks", &self.flags)
            .finish()
    }
}

impl ComponentInfo {
    #[inline]
    pub(crate) fn new(id: ComponentId, descriptor: ComponentDescriptor) -> Self {
        Self {
            id,
            flags: descriptor.hooks.flags(),
            descriptor,
        }
    }

    /// Returns the component's unique ID.
    #[inline(always)]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Returns the name the component is registered under.
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns the component's [`TypeId`], if it is a Rust type.
    #[inline(always)]
    pub fn type_id(&self) -> Option<TypeId> {
        self.descriptor.type_id
    }

    #[inline(always)]
    pub fn layout(&self) -> Layout {
        self.descriptor.layout
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.descriptor.layout.size()
    }

    #[inline(always)]
    pub fn hooks(&self) -> &ComponentHooks {
        &self.descriptor.hooks
    }

    /// Returns which lifecycle hooks the component registered.
    #[inline(always)]
    pub fn flags(&self) -> HookFlags {
        self.flags
    }
}
