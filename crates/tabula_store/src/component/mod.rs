// -----------------------------------------------------------------------------
// Modules

mod components;
mod error;
mod hooks;
mod ident;
mod impls;
mod info;

// -----------------------------------------------------------------------------
// Exports

pub use components::Components;
pub use error::RegisterError;
pub use hooks::{Cloner, ComponentHooks, Constructor, Dropper, HookFlags, Mover};
pub use ident::ComponentId;
pub use impls::Component;
pub use info::{ComponentDescriptor, ComponentInfo};
