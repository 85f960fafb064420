use crate::component::{Component, ComponentDescriptor, ComponentId, RegisterError};
use crate::world::World;

impl World {
    #[inline]
    pub fn register_component<T: Component>(&mut self) -> ComponentId {
        self.components.register::<T>()
    }

    /// Registers a component described only at runtime.
    #[inline]
    pub fn register_raw_component(
        &mut self,
        descriptor: ComponentDescriptor,
    ) -> Result<ComponentId, RegisterError> {
        self.components.register_raw(descriptor)
    }
}
