use alloc::string::String;

use thiserror::Error;

/// An error that occurs when registering a component from a raw descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegisterError {
    /// Another component is already registered under this name.
    #[error("a component named `{0}` is already registered")]
    DuplicateName(String),
    /// Component names are used by `table_from_str` and may not be blank.
    #[error("a component name may not be empty")]
    EmptyName,
}
