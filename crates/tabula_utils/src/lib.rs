//! Small building blocks shared by the storage crates.
//!
//! - [`num::NonMaxU32`]: an id type whose `Option` costs no extra space.
//! - [`hash`]: `hashbrown` containers with a fixed `foldhash` seed, so that
//!   table lookups hash identically from run to run.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

pub mod hash;
pub mod num;
