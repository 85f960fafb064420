//! Type-erased pointers for columnar storage.
//!
//! Column data is stored as raw bytes whose element type is only known at
//! runtime. These wrappers keep a lifetime on top of a [`NonNull<u8>`] so that
//! the borrow checker still reasons about how long a pointer is valid, while
//! the pointee type stays erased.
//!
//! - [`Ptr<'a>`]: a type-erased `&'a T`.
//! - [`PtrMut<'a>`]: a type-erased `&'a mut T`.
//! - [`OwningPtr<'a>`]: points at a value the receiver takes ownership of.
//!   If it is neither read nor dropped, the value leaks.
//!
//! None of them manage allocation.
//!
//! [`NonNull<u8>`]: core::ptr::NonNull
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod type_erased;

// -----------------------------------------------------------------------------
// Top-level exports

pub use type_erased::{OwningPtr, Ptr, PtrMut};
