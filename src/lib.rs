//! Columnar, archetype-based component storage.
//!
//! This is a facade over the member crates:
//!
//! - [`ptr`]: type-erased pointers used at every column boundary.
//! - [`utils`]: niche-optimised integers and hash containers.
//! - [`store`]: component registry, column vectors, tables, the table
//!   graph, the entity index and the direct-access surface on `World`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use tabula_ptr as ptr;
pub use tabula_store as store;
pub use tabula_utils as utils;
