//! Columnar, archetype-based storage engine.
//!
//! Every distinct set of component types is backed by one [`Table`], and
//! every table holds one densely packed [`Column`] per component type. An
//! entity's data is found through its [`Record`], a `(table, row)` pair kept
//! in the [`Entities`] index.
//!
//! The [`World`] ties the component registry, the table graph and the entity
//! index together and exposes the direct-access surface: inserting rows,
//! replacing whole columns, and writing raw component values through a
//! record. Operations whose misuse can corrupt memory are `unsafe fn`; their
//! preconditions are only checked when the `debug` feature or
//! `debug_assertions` is enabled.
//!
//! [`Table`]: storage::Table
//! [`Column`]: storage::Column
//! [`Record`]: entity::Record
//! [`Entities`]: entity::Entities
//! [`World`]: world::World
#![cfg_attr(docsrs, feature(doc_cfg))]
#![expect(unsafe_code, reason = "columnar storage manages raw memory")]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Macros used for compilation control.
pub mod cfg {
    #[cfg(any(feature = "debug", debug_assertions))]
    macro_rules! debug {
        (if { $($then:tt)* } else { $($else:tt)* }) => { $($then)* };
        ($($t:tt)*) => { $($t)* };
    }

    #[cfg(not(any(feature = "debug", debug_assertions)))]
    macro_rules! debug {
        (if { $($then:tt)* } else { $($else:tt)* }) => { $($else)* };
        ($($t:tt)*) => {};
    }

    pub(crate) use debug;
}

// -----------------------------------------------------------------------------
// no_std support

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod utils;

pub mod component;
pub mod entity;
pub mod storage;

pub mod world;
