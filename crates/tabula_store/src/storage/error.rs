use alloc::string::String;

use thiserror::Error;

use crate::component::ComponentId;

/// An error that occurs when resolving a type set to a table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    /// The id has no registered layout, so no column can be built for it.
    #[error("component {0} is not registered")]
    UnknownComponent(ComponentId),
    /// A type string names a component that is not registered.
    #[error("no component is registered under the name `{0}`")]
    UnknownName(String),
    /// A type string has an empty element, such as `"A,,B"`.
    #[error("element {index} of the type string is empty")]
    EmptyName { index: usize },
}
