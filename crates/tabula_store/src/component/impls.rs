use super::ComponentHooks;

// -----------------------------------------------------------------------------
// Component

/// A Rust type that can be stored in table columns.
///
/// The default [`HOOKS`](Component::HOOKS) give the type a destructor and a
/// move-assignment when it has drop glue. Types that should be
/// default-constructed on insert, or copied through `copy_to`, add the
/// matching hooks:
///
/// ```
/// use tabula_store::component::{Component, ComponentHooks};
///
/// #[derive(Default, Clone)]
/// struct Name(String);
///
/// unsafe impl Component for Name {
///     const HOOKS: ComponentHooks = ComponentHooks::of::<Self>()
///         .with_default::<Self>()
///         .with_clone::<Self>();
/// }
/// ```
///
/// # Safety
///
/// - Every hook in `HOOKS` must operate on `Self`.
/// - If `HOOKS` has no constructor, the all-zero bit pattern must be a valid
///   `Self`, because inserted rows are zero-filled.
pub unsafe trait Component: Sized + Send + Sync + 'static {
    const HOOKS: ComponentHooks = ComponentHooks::of::<Self>();
}
