// -----------------------------------------------------------------------------
// Modules

mod error;
mod impls;
mod methods;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use error::MoveError;
pub use impls::World;
